//! In-memory draft store. Drafts live from page load until the page is left
//! or they sit idle past the TTL; nothing here is persisted.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::draft::models::{DraftUpdate, JobApplicationDraft};
use crate::errors::AppError;
use crate::optimize::OptimizeKind;

/// Upper bound on drafts held at once.
pub const MAX_OPEN_DRAFTS: usize = 10_000;

struct Entry {
    draft: JobApplicationDraft,
    /// Monotonic twin of `draft.updated_at`, used for expiry.
    last_touched: Instant,
}

#[derive(Clone)]
pub struct DraftStore {
    drafts: Arc<RwLock<HashMap<Uuid, Entry>>>,
    capacity: usize,
}

impl Default for DraftStore {
    fn default() -> Self {
        Self::with_capacity(MAX_OPEN_DRAFTS)
    }
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            capacity,
        }
    }

    pub async fn create(&self) -> Result<JobApplicationDraft, AppError> {
        let mut drafts = self.drafts.write().await;
        if drafts.len() >= self.capacity {
            warn!("Draft store full ({} open)", drafts.len());
            return Err(AppError::Unavailable(
                "Too many open sessions, try again later".to_string(),
            ));
        }

        let draft = JobApplicationDraft::new();
        drafts.insert(
            draft.id,
            Entry {
                draft: draft.clone(),
                last_touched: Instant::now(),
            },
        );
        debug!("Draft {} created", draft.id);
        Ok(draft)
    }

    pub async fn get(&self, id: Uuid) -> Result<JobApplicationDraft, AppError> {
        self.drafts
            .read()
            .await
            .get(&id)
            .map(|entry| entry.draft.clone())
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(
        &self,
        id: Uuid,
        update: DraftUpdate,
    ) -> Result<JobApplicationDraft, AppError> {
        self.mutate(id, |draft| draft.apply(update)).await
    }

    pub async fn set_resume(&self, id: Uuid, text: &str) -> Result<JobApplicationDraft, AppError> {
        self.mutate(id, |draft| draft.set_resume(text)).await
    }

    /// Stores generated output in the field for `kind`. The imported resume
    /// is never overwritten.
    pub async fn set_output(
        &self,
        id: Uuid,
        kind: OptimizeKind,
        output: &str,
    ) -> Result<JobApplicationDraft, AppError> {
        self.mutate(id, |draft| {
            let slot = match kind {
                OptimizeKind::Resume => &mut draft.optimized_resume,
                OptimizeKind::CoverLetter => &mut draft.cover_letter,
                OptimizeKind::Interview => &mut draft.interview_prep,
            };
            *slot = output.to_string();
        })
        .await
    }

    pub async fn discard(&self, id: Uuid) -> Result<(), AppError> {
        self.drafts
            .write()
            .await
            .remove(&id)
            .map(|_| debug!("Draft {id} discarded"))
            .ok_or_else(|| not_found(id))
    }

    /// Drops drafts untouched for longer than `ttl`. Returns how many went.
    pub async fn purge_expired(&self, ttl: Duration) -> usize {
        let mut drafts = self.drafts.write().await;
        let before = drafts.len();
        drafts.retain(|_, entry| entry.last_touched.elapsed() <= ttl);
        before - drafts.len()
    }

    pub async fn len(&self) -> usize {
        self.drafts.read().await.len()
    }

    async fn mutate<F>(&self, id: Uuid, f: F) -> Result<JobApplicationDraft, AppError>
    where
        F: FnOnce(&mut JobApplicationDraft),
    {
        let mut drafts = self.drafts.write().await;
        let entry = drafts.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(&mut entry.draft);
        entry.last_touched = Instant::now();
        Ok(entry.draft.clone())
    }
}

/// Spawns the background task that expires idle drafts every `every`.
pub fn spawn_expiry_sweeper(store: DraftStore, ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let purged = store.purge_expired(ttl).await;
            if purged > 0 {
                info!("Expired {purged} idle drafts");
            }
        }
    })
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Draft {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = DraftStore::new();
        let draft = store.create().await.unwrap();
        let fetched = store.get(draft.id).await.unwrap();
        assert_eq!(fetched, draft);
    }

    #[tokio::test]
    async fn test_update_unknown_draft_is_not_found() {
        let store = DraftStore::new();
        let err = store
            .update(Uuid::new_v4(), DraftUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_set_output_routes_by_kind() {
        let store = DraftStore::new();
        let id = store.create().await.unwrap().id;
        store.set_resume(id, "Jane Doe").await.unwrap();

        store.set_output(id, OptimizeKind::CoverLetter, "Dear team").await.unwrap();
        store.set_output(id, OptimizeKind::Resume, "Targeted Jane").await.unwrap();
        let draft = store
            .set_output(id, OptimizeKind::Interview, "Q1: Why us?")
            .await
            .unwrap();

        assert_eq!(draft.cover_letter, "Dear team");
        assert_eq!(draft.interview_prep, "Q1: Why us?");
        assert_eq!(draft.optimized_resume, "Targeted Jane");
        assert_eq!(draft.resume, "Jane Doe");
    }

    #[tokio::test]
    async fn test_discard_removes_draft() {
        let store = DraftStore::new();
        let id = store.create().await.unwrap().id;
        assert_eq!(store.len().await, 1);

        store.discard(id).await.unwrap();
        assert_eq!(store.len().await, 0);
        assert!(store.discard(id).await.is_err());
    }

    #[tokio::test]
    async fn test_create_refused_when_full() {
        let store = DraftStore::with_capacity(2);
        store.create().await.unwrap();
        store.create().await.unwrap();

        let err = store.create().await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_keeps_recently_touched_drafts() {
        let store = DraftStore::new();
        let idle = store.create().await.unwrap().id;
        let active = store.create().await.unwrap().id;

        tokio::time::advance(Duration::from_secs(50)).await;
        store
            .update(
                active,
                DraftUpdate {
                    job_title: Some("SRE".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(20)).await;

        assert_eq!(store.purge_expired(Duration::from_secs(60)).await, 1);
        assert!(store.get(idle).await.is_err());
        assert!(store.get(active).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_expires_abandoned_drafts() {
        let store = DraftStore::new();
        for _ in 0..3 {
            store.create().await.unwrap();
        }

        let sweeper = spawn_expiry_sweeper(
            store.clone(),
            Duration::from_secs(10),
            Duration::from_secs(1),
        );
        tokio::time::sleep(Duration::from_secs(12)).await;

        assert_eq!(store.len().await, 0);
        sweeper.abort();
    }
}
