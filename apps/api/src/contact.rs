use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::content::validation::{by_field, Checker, FieldIssue};
use crate::errors::AppError;
use crate::mail::{EmailMessage, MailError};
use crate::state::AppState;

/// Body of the public contact form.
#[derive(Debug, Default)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub message: String,
}

impl ContactRequest {
    /// Reads the form field by field. A field holding anything other than a
    /// string is reported under its own name; absent and `null` fields are empty.
    pub fn from_json(body: &Value) -> (Self, Vec<FieldIssue>) {
        let mut c = Checker::new();
        let mut take = |field: &str| match body.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                c.fail(field, "Expected a string");
                None
            }
        };

        let req = ContactRequest {
            name: take("name").unwrap_or_default(),
            email: take("email").unwrap_or_default(),
            role: take("role"),
            message: take("message").unwrap_or_default(),
        };
        (req, c.finish())
    }

    /// Type issues first, then rule issues for fields that were well typed.
    fn issues(&self, mut type_issues: Vec<FieldIssue>) -> Vec<FieldIssue> {
        let rule_issues: Vec<FieldIssue> = self
            .check()
            .into_iter()
            .filter(|i| !type_issues.iter().any(|t| t.field == i.field))
            .collect();
        type_issues.extend(rule_issues);
        type_issues
    }

    fn check(&self) -> Vec<FieldIssue> {
        let mut c = Checker::new();
        c.text("name", &self.name, 1, 200, "Name is required");
        c.email("email", &self.email);
        c.max_len("role", self.role.as_deref(), 200);
        c.text("message", &self.message, 1, 2000, "Message is required");
        c.finish()
    }

    fn role_or_na(&self) -> &str {
        self.role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or("N/A")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds the notification sent to the site owner.
pub fn compose(req: &ContactRequest, to: &str, from: &str) -> EmailMessage {
    let name = req.name.trim();
    let role = req.role_or_na();
    let message = escape_html(&req.message).replace('\n', "<br/>");

    EmailMessage {
        to: to.to_string(),
        from: from.to_string(),
        subject: format!("[Portfolio Contact] {name} — {role}"),
        html: format!(
            "<p><strong>Name:</strong> {}</p><p><strong>Email:</strong> {}</p><p><strong>Role:</strong> {}</p><p>{}</p>",
            escape_html(name),
            escape_html(req.email.trim()),
            escape_html(role),
            message
        ),
    }
}

/// POST /api/contact
pub async fn handle_contact(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(body) = payload?;
    let (req, type_issues) = ContactRequest::from_json(&body);

    let issues = req.issues(type_issues);
    if !issues.is_empty() {
        return Err(AppError::Invalid {
            details: json!(by_field(&issues)),
        });
    }

    let to = state
        .config
        .contact_to_email
        .as_deref()
        .ok_or_else(|| AppError::Misconfigured("CONTACT_TO_EMAIL not set".to_string()))?;

    let email = compose(&req, to, &state.config.contact_from_email);
    let mailer = state.mailer.as_ref().ok_or(MailError::NotConfigured)?;
    mailer.send(&email).await?;

    info!("Contact message from {} forwarded", req.email.trim());
    Ok(Json(json!({ "ok": true })))
}
