use std::collections::BTreeMap;

use serde::Serialize;

use super::models::{About, Collaboration, Contact, Education, Experience, Hero, Project, Resume, Skill};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Joins issues into a single error message.
pub fn describe(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Groups issue messages by field, the shape returned to form clients.
pub fn by_field(issues: &[FieldIssue]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for issue in issues {
        grouped
            .entry(issue.field.clone())
            .or_default()
            .push(issue.message.clone());
    }
    grouped
}

pub fn is_http_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

pub fn is_email(value: &str) -> bool {
    value.parse::<lettre::Address>().is_ok()
}

/// Collects issues for one record. `prefix` scopes field names inside a batch,
/// e.g. `projects[2]`.
pub struct Checker {
    prefix: Option<String>,
    issues: Vec<FieldIssue>,
}

impl Checker {
    pub fn new() -> Self {
        Self {
            prefix: None,
            issues: Vec::new(),
        }
    }

    pub fn scoped(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            issues: Vec::new(),
        }
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) {
        let field = match &self.prefix {
            Some(p) => format!("{p}.{field}"),
            None => field.to_string(),
        };
        self.issues.push(FieldIssue {
            field,
            message: message.into(),
        });
    }

    /// Non-blank text with a character count in `min..=max`.
    pub fn text(&mut self, field: &str, value: &str, min: usize, max: usize, required_msg: &str) {
        let len = value.trim().chars().count();
        if len == 0 {
            self.fail(field, required_msg);
        } else if len < min {
            self.fail(field, format!("Must be at least {min} characters"));
        } else if value.chars().count() > max {
            self.fail(field, format!("Must be at most {max} characters"));
        }
    }

    pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.fail(field, format!("Must be at most {max} characters"));
            }
        }
    }

    /// Optional link. The empty string means "no link".
    pub fn url(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            if !is_http_url(v) {
                self.fail(field, "Invalid URL");
            }
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_email(value.trim()) {
            self.fail(field, "Invalid email address");
        }
    }

    pub fn finish(self) -> Vec<FieldIssue> {
        self.issues
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Validate {
    fn check(&self, c: &mut Checker);

    fn validate(&self) -> Vec<FieldIssue> {
        let mut c = Checker::new();
        self.check(&mut c);
        c.finish()
    }
}

/// Validates every record of a batch, scoping field names by position.
pub fn validate_batch<T: Validate>(key: &str, items: &[T]) -> Vec<FieldIssue> {
    items
        .iter()
        .enumerate()
        .flat_map(|(i, item)| {
            let mut c = Checker::scoped(format!("{key}[{i}]"));
            item.check(&mut c);
            c.finish()
        })
        .collect()
}

impl Validate for Hero {
    fn check(&self, c: &mut Checker) {
        c.text("title", &self.title, 1, 200, "Title is required");
        c.text("subtitle", &self.subtitle, 1, 500, "Subtitle is required");
        c.url("cta_github", Some(&self.cta_github));
        c.url("cta_resume", Some(&self.cta_resume));
    }
}

impl Validate for About {
    fn check(&self, c: &mut Checker) {
        c.text("content", &self.content, 10, 5000, "Content is required");
    }
}

impl Validate for Experience {
    fn check(&self, c: &mut Checker) {
        c.text("company", &self.company, 1, 100, "Company is required");
        c.text("role", &self.role, 1, 100, "Role is required");
        c.text("start_date", &self.start_date, 1, 32, "Start date is required");
        c.text(
            "description",
            &self.description,
            10,
            2000,
            "Description is required",
        );
        c.max_len("location", self.location.as_deref(), 100);
    }
}

impl Validate for Skill {
    fn check(&self, c: &mut Checker) {
        c.text("name", &self.name, 1, 100, "Skill name is required");
        c.max_len("category", self.category.as_deref(), 50);
        c.url("icon_url", self.icon_url.as_deref());
        if let Some(p) = self.proficiency {
            if !(1..=100).contains(&p) {
                c.fail("proficiency", "Must be between 1 and 100");
            }
        }
    }
}

impl Validate for Project {
    fn check(&self, c: &mut Checker) {
        c.text("title", &self.title, 1, 200, "Title is required");
        c.text("slug", &self.slug, 1, 200, "Slug is required");
        c.text(
            "description",
            &self.description,
            10,
            500,
            "Description is required",
        );
        c.max_len("long_description", self.long_description.as_deref(), 5000);
        if self.tech_stack.iter().all(|t| t.trim().is_empty()) {
            c.fail("tech_stack", "At least one technology is required");
        }
        c.url("github_url", self.github_url.as_deref());
        c.url("live_url", self.live_url.as_deref());
        c.url("screenshot", self.screenshot.as_deref());
    }
}

impl Validate for Resume {
    fn check(&self, c: &mut Checker) {
        if self.file_url.trim().is_empty() {
            c.fail("file_url", "File URL is required");
        } else {
            c.url("file_url", Some(&self.file_url));
        }
        c.text("file_name", &self.file_name, 1, 255, "File name is required");
    }
}

impl Validate for Education {
    fn check(&self, c: &mut Checker) {
        c.text("institution", &self.institution, 1, 200, "Institution is required");
        c.text("degree", &self.degree, 1, 200, "Degree is required");
        c.max_len("field_of_study", Some(&self.field_of_study), 200);
        c.text("start_date", &self.start_date, 1, 32, "Start date is required");
        if let Some(gpa) = self.gpa {
            if !(0.0..=5.0).contains(&gpa) {
                c.fail("gpa", "Must be between 0 and 5");
            }
        }
        c.max_len("description", self.description.as_deref(), 2000);
    }
}

impl Validate for Collaboration {
    fn check(&self, c: &mut Checker) {
        c.text("title", &self.title, 1, 200, "Title is required");
        c.text(
            "description",
            &self.description,
            1,
            2000,
            "Description is required",
        );
        c.url("link", self.link.as_deref());
    }
}

impl Validate for Contact {
    fn check(&self, c: &mut Checker) {
        c.email("email", &self.email);
        c.max_len("phone", self.phone.as_deref(), 50);
        c.url("linkedin", self.linkedin.as_deref());
        c.url("github", self.github.as_deref());
        c.max_len("collaboration_text", self.collaboration_text.as_deref(), 2000);
    }
}
