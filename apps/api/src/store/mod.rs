//! Access to the hosted relational store that holds the portfolio content.
//!
//! Rows travel as JSON objects, the same shape the hosted data API hands to
//! clients. Handlers are the only place rows are typed.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Backend(String),

    #[error("Row for table '{table}' must be a JSON object")]
    NotAnObject { table: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
    /// Descending with rows missing the column at the end.
    DescNullsLast,
}

impl Direction {
    fn sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
            Direction::DescNullsLast => "DESC NULLS LAST",
        }
    }
}

/// Every table the service reads or writes. Table and column identifiers are
/// only ever taken from here, never from request input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Hero,
    About,
    Experience,
    Skills,
    Projects,
    Resume,
    Education,
    Collaborations,
    Contact,
    AdminUsers,
}

/// Columns written by the store itself unless every submitted row carries them.
pub const SYSTEM_COLUMNS: &[&str] = &["id", "created_at", "updated_at"];

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Hero => "hero",
            Table::About => "about",
            Table::Experience => "experience",
            Table::Skills => "skills",
            Table::Projects => "projects",
            Table::Resume => "resume",
            Table::Education => "education",
            Table::Collaborations => "collaboration",
            Table::Contact => "contact",
            Table::AdminUsers => "admin_users",
        }
    }

    /// Read ordering applied to collection reads.
    pub fn default_order(self) -> Option<(&'static str, Direction)> {
        match self {
            Table::Experience => Some(("start_date", Direction::Desc)),
            Table::Education => Some(("end_date", Direction::DescNullsLast)),
            Table::Projects => Some(("date", Direction::Desc)),
            Table::Collaborations => Some(("created_at", Direction::Desc)),
            Table::Skills => Some(("name", Direction::Asc)),
            _ => None,
        }
    }

    /// Writable content columns, excluding [`SYSTEM_COLUMNS`].
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Hero => &[
                "title",
                "subtitle",
                "roles",
                "collaboration_roles",
                "cta_github",
                "cta_resume",
            ],
            Table::About => &["content", "personal_touch", "quotes"],
            Table::Experience => &[
                "company",
                "role",
                "start_date",
                "end_date",
                "description",
                "achievements",
                "bullets",
                "tech",
                "location",
            ],
            Table::Skills => &["name", "category", "icon_url", "proficiency"],
            Table::Projects => &[
                "title",
                "slug",
                "description",
                "long_description",
                "tech_stack",
                "tags",
                "github_url",
                "live_url",
                "screenshot",
                "featured",
                "date",
            ],
            Table::Resume => &["file_url", "file_name", "uploaded_at"],
            Table::Education => &[
                "institution",
                "degree",
                "field_of_study",
                "start_date",
                "end_date",
                "gpa",
                "description",
            ],
            Table::Collaborations => &["title", "description", "type", "link", "icon"],
            Table::Contact => &[
                "email",
                "phone",
                "linkedin",
                "github",
                "collaboration_text",
            ],
            Table::AdminUsers => &["email", "role"],
        }
    }

    /// Columns to write for a batch of rows: whitelisted content columns that
    /// appear in at least one row, plus system columns present in all rows.
    pub fn insert_columns(self, rows: &[Value]) -> Vec<&'static str> {
        let has = |row: &Value, col: &str| row.get(col).is_some();

        let system = SYSTEM_COLUMNS
            .iter()
            .copied()
            .filter(|col| !rows.is_empty() && rows.iter().all(|r| has(r, col)));
        let content = self
            .columns()
            .iter()
            .copied()
            .filter(|col| rows.iter().any(|r| has(r, col)));

        system.chain(content).collect()
    }
}

/// The operations the portfolio needs from the hosted data store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// All rows of a table in its default order.
    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>, StoreError>;

    /// The most recently inserted row, if any.
    async fn fetch_latest(&self, table: Table) -> Result<Option<Value>, StoreError>;

    /// Deletes every row of the table, then inserts `rows`. Returns the
    /// inserted rows as stored.
    async fn replace_all(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StoreError>;

    /// The project published under `slug`, if any.
    async fn fetch_project_by_slug(&self, slug: &str) -> Result<Option<Value>, StoreError>;

    /// Whether `email` is listed in `admin_users` with the `ADMIN` role.
    async fn is_admin(&self, email: &str) -> Result<bool, StoreError>;
}
