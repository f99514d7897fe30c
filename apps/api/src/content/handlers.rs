use axum::{
    extract::{multipart::Multipart, rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::AdminUser;
use crate::content::models::{
    About, Collaboration, Contact, Education, Experience, Hero, Project, Resume, Skill,
};
use crate::content::validation::{describe, validate_batch, Validate};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::Table;

/// A content table edited as a whole list from the admin forms.
pub struct Collection {
    pub table: Table,
    /// Request body key holding the list, e.g. `{"projects": [...]}`.
    pub key: &'static str,
    pub label: &'static str,
}

pub const EXPERIENCE: Collection = Collection {
    table: Table::Experience,
    key: "experiences",
    label: "Experiences",
};

pub const SKILLS: Collection = Collection {
    table: Table::Skills,
    key: "skills",
    label: "Skills",
};

pub const PROJECTS: Collection = Collection {
    table: Table::Projects,
    key: "projects",
    label: "Projects",
};

pub const EDUCATION: Collection = Collection {
    table: Table::Education,
    key: "education",
    label: "Education",
};

pub const COLLABORATIONS: Collection = Collection {
    table: Table::Collaborations,
    key: "collaborations",
    label: "Collaborations",
};

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    let Json(body) = payload?;
    Ok(body)
}

async fn list(state: &AppState, table: Table) -> Result<Json<Vec<Value>>, AppError> {
    let rows = state.store.fetch_all(table).await?;
    Ok(Json(rows))
}

async fn latest(state: &AppState, table: Table) -> Result<Json<Value>, AppError> {
    state
        .store
        .fetch_latest(table)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No {} content found", table.name())))
}

/// Replaces a whole collection: delete every row, then insert the submitted list.
async fn replace_collection<T>(
    state: &AppState,
    collection: &Collection,
    body: Value,
) -> Result<Json<Vec<Value>>, AppError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let items = match body {
        Value::Object(mut map) => match map.remove(collection.key) {
            Some(Value::Array(items)) => items,
            _ => return Err(not_an_array(collection)),
        },
        _ => return Err(not_an_array(collection)),
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<T>(item)
                .map_err(|e| AppError::BadRequest(format!("{}[{i}]: {e}", collection.key)))
        })
        .collect::<Result<Vec<T>, AppError>>()?;

    let issues = validate_batch(collection.key, &records);
    if !issues.is_empty() {
        return Err(AppError::BadRequest(describe(&issues)));
    }

    let rows = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Internal(e.into()))?;

    let inserted = state
        .store
        .replace_all(collection.table, rows.clone())
        .await?;

    info!(
        "Saved {} {} rows",
        rows.len(),
        collection.table.name()
    );

    Ok(Json(if inserted.is_empty() { rows } else { inserted }))
}

fn not_an_array(collection: &Collection) -> AppError {
    AppError::BadRequest(format!("{} must be an array", collection.label))
}

/// Replaces a single-record table with the submitted record.
async fn replace_singleton<T>(
    state: &AppState,
    table: Table,
    body: Value,
    missing: impl Fn(&T) -> Option<&'static str>,
) -> Result<Json<Value>, AppError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    if !body.is_object() {
        return Err(AppError::BadRequest(format!(
            "{} payload must be a JSON object",
            table.name()
        )));
    }
    let record: T =
        serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(message) = missing(&record) {
        return Err(AppError::BadRequest(message.to_string()));
    }
    let issues = record.validate();
    if !issues.is_empty() {
        return Err(AppError::BadRequest(describe(&issues)));
    }

    let row = serde_json::to_value(&record).map_err(|e| AppError::Internal(e.into()))?;
    let inserted = state.store.replace_all(table, vec![row.clone()]).await?;

    info!("Saved {} record", table.name());
    Ok(Json(inserted.into_iter().next().unwrap_or(row)))
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

// --- hero ---

/// GET /api/admin/hero
pub async fn get_hero(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    latest(&state, Table::Hero).await
}

/// POST /api/admin/hero
pub async fn post_hero(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    replace_singleton::<Hero>(&state, Table::Hero, json_body(payload)?, |h| {
        (blank(&h.title) || blank(&h.subtitle)).then_some("Title and subtitle are required")
    })
    .await
}

// --- about ---

/// GET /api/admin/about
pub async fn get_about(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    latest(&state, Table::About).await
}

/// POST /api/admin/about
pub async fn post_about(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    replace_singleton::<About>(&state, Table::About, json_body(payload)?, |a| {
        blank(&a.content).then_some("Content is required")
    })
    .await
}

// --- resume ---

/// GET /api/admin/resume
pub async fn get_resume(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    latest(&state, Table::Resume).await
}

/// POST /api/admin/resume
pub async fn post_resume(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    replace_singleton::<Resume>(&state, Table::Resume, json_body(payload)?, |r| {
        (blank(&r.file_url) || blank(&r.file_name)).then_some("File URL and file name are required")
    })
    .await
}

/// POST /api/admin/uploadResume (multipart, field `file`)
pub async fn upload_resume(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            file = Some(bytes);
            break;
        }
    }

    let bytes = file
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let now = Utc::now();
    let file_name = format!("resume_{}.pdf", now.timestamp_millis());
    let size = bytes.len();

    let url = state
        .bucket
        .upload(&file_name, bytes)
        .await
        .map_err(|e| AppError::Storage(e.to_string()))?;

    info!("Uploaded resume {file_name} ({size} bytes)");

    let record = Resume {
        file_url: url.clone(),
        file_name,
        uploaded_at: Some(now.to_rfc3339()),
        ..Default::default()
    };
    let row = serde_json::to_value(&record).map_err(|e| AppError::Internal(e.into()))?;
    state.store.replace_all(Table::Resume, vec![row]).await?;

    Ok(Json(json!({ "url": url })))
}

// --- contact details ---

/// GET /api/admin/contact-info
pub async fn get_contact_info(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    latest(&state, Table::Contact).await
}

/// POST /api/admin/contact-info
pub async fn post_contact_info(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    replace_singleton::<Contact>(&state, Table::Contact, json_body(payload)?, |c| {
        blank(&c.email).then_some("Email is required")
    })
    .await
}

// --- collections ---

/// GET /api/admin/experience
pub async fn get_experience(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, EXPERIENCE.table).await
}

/// POST /api/admin/experience
pub async fn post_experience(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    replace_collection::<Experience>(&state, &EXPERIENCE, json_body(payload)?).await
}

/// GET /api/admin/skills
pub async fn get_skills(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, SKILLS.table).await
}

/// POST /api/admin/skills
pub async fn post_skills(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    replace_collection::<Skill>(&state, &SKILLS, json_body(payload)?).await
}

/// GET /api/admin/projects
pub async fn get_projects(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, PROJECTS.table).await
}

/// POST /api/admin/projects
pub async fn post_projects(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    replace_collection::<Project>(&state, &PROJECTS, json_body(payload)?).await
}

/// GET /api/projects/:slug
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .fetch_project_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

/// GET /api/admin/education
pub async fn get_education(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, EDUCATION.table).await
}

/// POST /api/admin/education
pub async fn post_education(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    replace_collection::<Education>(&state, &EDUCATION, json_body(payload)?).await
}

/// GET /api/admin/collaborations
pub async fn get_collaborations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    list(&state, COLLABORATIONS.table).await
}

/// POST /api/admin/collaborations
pub async fn post_collaborations(
    State(state): State<AppState>,
    _admin: AdminUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    replace_collection::<Collaboration>(&state, &COLLABORATIONS, json_body(payload)?).await
}
