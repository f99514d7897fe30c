use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ContentStore, StoreError, Table};

/// In-process store for router tests. Rows are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    admins: Vec<String>,
    failure: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: Table, rows: Vec<Value>) -> Self {
        self.tables
            .lock()
            .expect("store lock poisoned")
            .insert(table, rows);
        self
    }

    pub fn with_admin(mut self, email: &str) -> Self {
        self.admins.push(email.to_string());
        self
    }

    /// Every content operation fails with `message`; admin lookups still work.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables
            .lock()
            .expect("store lock poisoned")
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    fn check(&self) -> Result<(), StoreError> {
        match &self.failure {
            Some(message) => Err(StoreError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch_all(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        Ok(self.rows(table))
    }

    async fn fetch_latest(&self, table: Table) -> Result<Option<Value>, StoreError> {
        self.check()?;
        Ok(self.rows(table).pop())
    }

    async fn replace_all(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        self.check()?;
        if rows.iter().any(|r| !r.is_object()) {
            return Err(StoreError::NotAnObject { table: table.name() });
        }
        let stored: Vec<Value> = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                if let Some(obj) = row.as_object_mut() {
                    obj.entry("id").or_insert_with(|| Value::from(i as u64 + 1));
                }
                row
            })
            .collect();
        self.tables
            .lock()
            .expect("store lock poisoned")
            .insert(table, stored.clone());
        Ok(stored)
    }

    async fn fetch_project_by_slug(&self, slug: &str) -> Result<Option<Value>, StoreError> {
        self.check()?;
        Ok(self
            .rows(Table::Projects)
            .into_iter()
            .find(|row| row.get("slug").and_then(Value::as_str) == Some(slug)))
    }

    async fn is_admin(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.admins.iter().any(|a| a == email))
    }
}
