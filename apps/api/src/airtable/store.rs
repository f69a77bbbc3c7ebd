//! Resume store — pluggable backend receiving uploaded resume text.
//!
//! Default: `AirtableClient`. `MemoryResumeStore` keeps the same
//! find-first-empty-or-create semantics in process.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`, chosen at startup via config.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::info;

use super::StoreError;

/// What the upsert did to the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UpsertOutcome {
    Updated { record_id: String },
    Created { record_id: String },
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Writes `content` into the first row with an empty resume, or appends a
    /// new row when none is empty.
    async fn upsert_resume(&self, content: &str) -> Result<UpsertOutcome, StoreError>;

    /// Short backend name, for logs and the health endpoint.
    fn backend(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryRow {
    pub id: String,
    pub resume: String,
}

#[derive(Default)]
pub struct MemoryResumeStore {
    rows: Mutex<Vec<MemoryRow>>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_rows(rows: Vec<MemoryRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    #[cfg(test)]
    pub async fn rows(&self) -> Vec<MemoryRow> {
        self.rows.lock().await.clone()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn upsert_resume(&self, content: &str) -> Result<UpsertOutcome, StoreError> {
        let mut rows = self.rows.lock().await;

        let outcome = match rows.iter_mut().find(|row| row.resume.is_empty()) {
            Some(row) => {
                row.resume = content.to_string();
                UpsertOutcome::Updated {
                    record_id: row.id.clone(),
                }
            }
            None => {
                let id = format!("mem{}", rows.len() + 1);
                rows.push(MemoryRow {
                    id: id.clone(),
                    resume: content.to_string(),
                });
                UpsertOutcome::Created { record_id: id }
            }
        };

        info!("Resume upserted to memory store: {outcome:?}");
        Ok(outcome)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fills_first_empty_row() {
        let store = MemoryResumeStore::with_rows(vec![
            MemoryRow {
                id: "a".to_string(),
                resume: "existing".to_string(),
            },
            MemoryRow {
                id: "b".to_string(),
                resume: String::new(),
            },
            MemoryRow {
                id: "c".to_string(),
                resume: String::new(),
            },
        ]);

        let outcome = store.upsert_resume("fresh").await.unwrap();

        assert_eq!(
            outcome,
            UpsertOutcome::Updated {
                record_id: "b".to_string()
            }
        );
        let rows = store.rows().await;
        assert_eq!(rows[1].resume, "fresh");
        assert!(rows[2].resume.is_empty());
    }

    #[tokio::test]
    async fn test_appends_when_table_full() {
        let store = MemoryResumeStore::new();
        store.upsert_resume("one").await.unwrap();
        let outcome = store.upsert_resume("two").await.unwrap();

        assert_eq!(
            outcome,
            UpsertOutcome::Created {
                record_id: "mem2".to_string()
            }
        );
        assert_eq!(store.rows().await.len(), 2);
    }

    #[test]
    fn test_outcome_serializes_with_action_tag() {
        let json = serde_json::to_value(UpsertOutcome::Created {
            record_id: "rec9".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"action": "created", "record_id": "rec9"}));
    }
}
