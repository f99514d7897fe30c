use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;

use super::{ContentStore, StoreError, Table};

/// [`ContentStore`] backed by the hosted Postgres database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn quoted(ident: &str) -> String {
    format!("\"{ident}\"")
}

fn select_all_sql(table: Table) -> String {
    let order = table
        .default_order()
        .map(|(col, dir)| format!(" ORDER BY t.{} {}", quoted(col), dir.sql()))
        .unwrap_or_default();
    format!(
        "SELECT COALESCE(jsonb_agg(to_jsonb(t){order}), '[]'::jsonb) FROM {} t",
        quoted(table.name())
    )
}

fn select_latest_sql(table: Table) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {} t ORDER BY t.\"id\" DESC LIMIT 1",
        quoted(table.name())
    )
}

fn select_project_by_slug_sql() -> String {
    format!(
        "SELECT to_jsonb(t) FROM {} t WHERE t.\"slug\" = $1 LIMIT 1",
        quoted(Table::Projects.name())
    )
}

fn is_admin_sql() -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE \"email\" = $1 AND \"role\" = 'ADMIN')",
        quoted(Table::AdminUsers.name())
    )
}

fn delete_all_sql(table: Table) -> String {
    format!("DELETE FROM {}", quoted(table.name()))
}

fn insert_sql(table: Table, columns: &[&str]) -> String {
    let name = quoted(table.name());
    let cols = columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {name} ({cols}) SELECT {cols} FROM jsonb_populate_recordset(NULL::{name}, $1) RETURNING to_jsonb({name})"
    )
}

#[async_trait]
impl ContentStore for PgStore {
    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        let rows: Value = sqlx::query_scalar(&select_all_sql(table))
            .fetch_one(&self.pool)
            .await?;

        match rows {
            Value::Array(rows) => Ok(rows),
            _ => Ok(Vec::new()),
        }
    }

    async fn fetch_latest(&self, table: Table) -> Result<Option<Value>, StoreError> {
        Ok(sqlx::query_scalar(&select_latest_sql(table))
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn replace_all(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        if rows.iter().any(|r| !r.is_object()) {
            return Err(StoreError::NotAnObject { table: table.name() });
        }

        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(&delete_all_sql(table))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let columns = table.insert_columns(&rows);
        let inserted: Vec<Value> = if rows.is_empty() || columns.is_empty() {
            Vec::new()
        } else {
            sqlx::query_scalar(&insert_sql(table, &columns))
                .bind(Value::Array(rows))
                .fetch_all(&mut *tx)
                .await?
        };

        tx.commit().await?;

        info!(
            "Replaced table {}: deleted {deleted} rows, inserted {}",
            table.name(),
            inserted.len()
        );
        Ok(inserted)
    }

    async fn fetch_project_by_slug(&self, slug: &str) -> Result<Option<Value>, StoreError> {
        Ok(sqlx::query_scalar(&select_project_by_slug_sql())
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn is_admin(&self, email: &str) -> Result<bool, StoreError> {
        Ok(sqlx::query_scalar(&is_admin_sql())
            .bind(email)
            .fetch_one(&self.pool)
            .await?)
    }
}
