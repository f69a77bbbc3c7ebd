use std::sync::Arc;
use std::time::Duration;

use crate::airtable::ResumeStore;
use crate::draft::store::DraftStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub drafts: DraftStore,
    /// Pluggable resume store. Default: AirtableClient. Swap via RESUME_STORE env.
    pub resume_store: Arc<dyn ResumeStore>,
    /// Artificial latency before optimize returns its canned text.
    pub optimize_delay: Duration,
}

impl AppState {
    pub fn new(resume_store: Arc<dyn ResumeStore>, optimize_delay: Duration) -> Self {
        Self {
            drafts: DraftStore::new(),
            resume_store,
            optimize_delay,
        }
    }
}
