use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::content::defaults;
use crate::state::AppState;
use crate::store::{StoreError, Table};

/// Every public section in one response. Sections the store could not provide
/// are filled from built-in defaults and named in `fallbacks`.
#[derive(Debug, Serialize)]
pub struct SiteContent {
    pub hero: Value,
    pub about: Value,
    pub experience: Vec<Value>,
    pub skills: Vec<Value>,
    pub projects: Vec<Value>,
    pub education: Vec<Value>,
    pub collaborations: Vec<Value>,
    pub resume: Option<Value>,
    pub contact: Value,
    pub fallbacks: Vec<&'static str>,
}

fn to_value<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}

fn to_values<T: Serialize>(values: Vec<T>) -> Vec<Value> {
    values.into_iter().map(to_value).collect()
}

struct Fallbacks(Vec<&'static str>);

impl Fallbacks {
    fn one(
        &mut self,
        section: &'static str,
        read: Result<Option<Value>, StoreError>,
        default: Option<Value>,
    ) -> Option<Value> {
        match read {
            Ok(Some(row)) => Some(row),
            Ok(None) => {
                self.0.push(section);
                default
            }
            Err(e) => {
                warn!("Failed to read {section}, using defaults: {e}");
                self.0.push(section);
                default
            }
        }
    }

    fn many(
        &mut self,
        section: &'static str,
        read: Result<Vec<Value>, StoreError>,
        default: Vec<Value>,
    ) -> Vec<Value> {
        match read {
            Ok(rows) if !rows.is_empty() => rows,
            Ok(_) => {
                self.0.push(section);
                default
            }
            Err(e) => {
                warn!("Failed to read {section}, using defaults: {e}");
                self.0.push(section);
                default
            }
        }
    }
}

/// Reads every section concurrently, substituting defaults where needed.
pub async fn load_site(state: &AppState) -> SiteContent {
    let store = state.store.as_ref();
    let (hero, about, experience, skills, projects, education, collaborations, resume, contact) = tokio::join!(
        store.fetch_latest(Table::Hero),
        store.fetch_latest(Table::About),
        store.fetch_all(Table::Experience),
        store.fetch_all(Table::Skills),
        store.fetch_all(Table::Projects),
        store.fetch_all(Table::Education),
        store.fetch_all(Table::Collaborations),
        store.fetch_latest(Table::Resume),
        store.fetch_latest(Table::Contact),
    );

    let mut fb = Fallbacks(Vec::new());
    SiteContent {
        hero: fb
            .one("hero", hero, Some(to_value(defaults::hero())))
            .unwrap_or_default(),
        about: fb
            .one("about", about, Some(to_value(defaults::about())))
            .unwrap_or_default(),
        experience: fb.many(
            "experience",
            experience,
            to_values(defaults::experience()),
        ),
        skills: fb.many("skills", skills, Vec::new()),
        projects: fb.many("projects", projects, to_values(defaults::projects())),
        education: fb.many("education", education, Vec::new()),
        collaborations: fb.many("collaborations", collaborations, Vec::new()),
        resume: fb.one("resume", resume, None),
        contact: fb
            .one("contact", contact, Some(to_value(defaults::contact())))
            .unwrap_or_default(),
        fallbacks: fb.0,
    }
}

/// GET /api/site
pub async fn handle_site(State(state): State<AppState>) -> Json<SiteContent> {
    Json(load_site(&state).await)
}
