/// Airtable client — the only code that talks to the hosted resume table.
///
/// Wraps the Airtable REST API (list / create / update records) and exposes the
/// find-first-empty-or-create upsert used by the resume upload paths.
/// Failures are not retried; callers surface them as a generic upload failure.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::AirtableConfig;

pub mod store;

pub use store::{MemoryResumeStore, ResumeStore, UpsertOutcome};

/// Column holding the resume text.
pub const RESUME_FIELD: &str = "Resume";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Airtable API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid Airtable URL: {0}")]
    Url(String),

    #[error("Airtable returned no record for {0}")]
    MissingRecord(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirtableRecord {
    pub id: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RecordList {
    records: Vec<AirtableRecord>,
}

#[derive(Debug, Serialize)]
struct RecordWrite<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    fields: &'a HashMap<String, Value>,
}

#[derive(Debug, Serialize)]
struct WriteBody<'a> {
    records: [RecordWrite<'a>; 1],
}

/// Airtable error bodies come as either `{"error": {"type", "message"}}` or
/// `{"error": "NOT_FOUND"}`.
#[derive(Debug, Deserialize)]
struct AirtableErrorBody {
    error: AirtableErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AirtableErrorDetail {
    Detailed {
        #[serde(rename = "type")]
        kind: String,
        message: Option<String>,
    },
    Code(String),
}

impl AirtableErrorDetail {
    fn into_message(self) -> String {
        match self {
            AirtableErrorDetail::Detailed {
                kind,
                message: Some(message),
            } => format!("{kind}: {message}"),
            AirtableErrorDetail::Detailed { kind, message: None } => kind,
            AirtableErrorDetail::Code(code) => code,
        }
    }
}

/// Formula matching rows whose `field` is blank.
pub fn empty_field_formula(field: &str) -> String {
    format!("{{{field}}} = \"\"")
}

#[derive(Clone)]
pub struct AirtableClient {
    client: Client,
    api_key: String,
    records_url: Url,
}

impl AirtableClient {
    pub fn new(config: &AirtableConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            records_url: records_url(&config.api_url, &config.base_id, &config.table)?,
        })
    }

    /// Returns the first record whose `field` is empty, if any.
    pub async fn find_first_empty(&self, field: &str) -> Result<Option<AirtableRecord>, StoreError> {
        let formula = empty_field_formula(field);
        let response = self
            .client
            .get(self.records_url.clone())
            .bearer_auth(&self.api_key)
            .query(&[("filterByFormula", formula.as_str()), ("maxRecords", "1")])
            .send()
            .await?;

        let list: RecordList = check_status(response).await?.json().await?;
        Ok(list.records.into_iter().next())
    }

    pub async fn create_record(
        &self,
        fields: &HashMap<String, Value>,
    ) -> Result<AirtableRecord, StoreError> {
        let body = WriteBody {
            records: [RecordWrite { id: None, fields }],
        };
        let response = self
            .client
            .post(self.records_url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        first_record(check_status(response).await?, "create").await
    }

    pub async fn update_record(
        &self,
        id: &str,
        fields: &HashMap<String, Value>,
    ) -> Result<AirtableRecord, StoreError> {
        let body = WriteBody {
            records: [RecordWrite {
                id: Some(id),
                fields,
            }],
        };
        let response = self
            .client
            .patch(self.records_url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        first_record(check_status(response).await?, "update").await
    }
}

#[async_trait]
impl ResumeStore for AirtableClient {
    async fn upsert_resume(&self, content: &str) -> Result<UpsertOutcome, StoreError> {
        let fields = HashMap::from([(RESUME_FIELD.to_string(), Value::from(content))]);

        let outcome = match self.find_first_empty(RESUME_FIELD).await? {
            Some(empty) => {
                let record = self.update_record(&empty.id, &fields).await?;
                UpsertOutcome::Updated {
                    record_id: record.id,
                }
            }
            None => {
                let record = self.create_record(&fields).await?;
                UpsertOutcome::Created {
                    record_id: record.id,
                }
            }
        };

        info!("Resume upserted to Airtable: {outcome:?}");
        Ok(outcome)
    }

    fn backend(&self) -> &'static str {
        "airtable"
    }
}

fn records_url(api_url: &str, base_id: &str, table: &str) -> Result<Url, StoreError> {
    let mut url = Url::parse(api_url).map_err(|e| StoreError::Url(format!("{api_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Url(format!("{api_url} cannot be a base URL")))?
        .pop_if_empty()
        .push(base_id)
        .push(table);
    Ok(url)
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!("Airtable returned {status}: {body}");
    Err(StoreError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<AirtableErrorBody>(body)
        .map(|e| e.error.into_message())
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body.to_string()
            }
        })
}

async fn first_record(
    response: reqwest::Response,
    op: &'static str,
) -> Result<AirtableRecord, StoreError> {
    let list: RecordList = response.json().await?;
    list.records
        .into_iter()
        .next()
        .ok_or(StoreError::MissingRecord(op))
}
