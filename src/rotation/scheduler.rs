//! Rotation orchestration
//!
//! One `run_once` call is a short read → decide → create sequence: derive
//! the rotation state, compute the successor category, and hand it to the
//! content creator. The scheduler keeps no state of its own between
//! calls.
//!
//! Concurrent `run_once` calls (a manual run overlapping a scheduled
//! firing) can both observe the same "last category" and create two
//! posts tagged with the same category back to back. The component takes
//! no lock to prevent this; callers are expected to keep a single
//! trigger source active.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::ContentCreator;
use crate::models::{BlogCategory, PostSummary, StatusCount};
use crate::storage::PostStore;

use super::error::{RotationError, RotationResult};
use super::ring::CategoryRing;
use super::state::{RotationState, RotationStateReader};

/// Default number of recent posts included in stats
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Outcome of a successful rotation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub category: BlogCategory,
    pub post_id: String,
    pub created_at: DateTime<Utc>,
}

/// Operational statistics over the automation post set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RotationStats {
    pub total_automation_posts: u64,
    pub posts_by_status: Vec<StatusCount>,
    pub recent_posts: Vec<PostSummary>,
}

/// Orchestrates rotation runs and exposes operational controls
pub struct RotationScheduler {
    store: Arc<dyn PostStore>,
    creator: Arc<dyn ContentCreator>,
    reader: RotationStateReader,
}

impl RotationScheduler {
    /// Create a scheduler over the full category ring
    pub fn new(store: Arc<dyn PostStore>, creator: Arc<dyn ContentCreator>) -> Self {
        Self::with_ring(store, creator, CategoryRing::new())
    }

    /// Create a scheduler with a custom ring (test orderings)
    pub fn with_ring(
        store: Arc<dyn PostStore>,
        creator: Arc<dyn ContentCreator>,
        ring: CategoryRing,
    ) -> Self {
        let reader = RotationStateReader::new(store.clone(), ring);
        Self {
            store,
            creator,
            reader,
        }
    }

    /// The ring this scheduler rotates through
    pub fn ring(&self) -> &CategoryRing {
        self.reader.ring()
    }

    /// Derive the current rotation state from the store
    pub async fn current_state(&self) -> RotationResult<RotationState> {
        self.reader.current_state().await
    }

    /// Execute one rotation cycle
    ///
    /// Exactly one category is chosen per call. Creation failures are
    /// surfaced, never retried here; since no record was written the
    /// next run recomputes from the same prior state.
    pub async fn run_once(&self) -> RotationResult<RunResult> {
        let state = self.reader.current_state().await?;
        let category = state.next_category;

        tracing::info!(
            last = state.last_category.map(|c| c.as_str()),
            next = %category,
            "starting rotation run"
        );

        let post = self.creator.create(category).await?;

        tracing::info!(post_id = %post.id, category = %category, "rotation run completed");

        Ok(RunResult {
            category,
            post_id: post.id,
            created_at: post.created_at,
        })
    }

    /// Collect automation post statistics
    ///
    /// Pure read; `recent_limit` bounds the summary listing.
    pub async fn stats(&self, recent_limit: usize) -> RotationResult<RotationStats> {
        let total = self
            .store
            .count_automated()
            .await
            .map_err(|e| RotationError::storage_unavailable("count_automated", e.to_string()))?;

        let by_status = self
            .store
            .count_by_status()
            .await
            .map_err(|e| RotationError::storage_unavailable("count_by_status", e.to_string()))?;

        let recent = self
            .store
            .recent_automated(recent_limit)
            .await
            .map_err(|e| RotationError::storage_unavailable("recent_automated", e.to_string()))?;

        Ok(RotationStats {
            total_automation_posts: total,
            posts_by_status: by_status,
            recent_posts: recent,
        })
    }

    /// Delete every automation post
    ///
    /// Irreversible. Resets the derived state to fresh-start: the next
    /// run picks the ring's first category.
    pub async fn clear_all(&self) -> RotationResult<u64> {
        let deleted = self
            .store
            .delete_all_automated()
            .await
            .map_err(|e| RotationError::clear_failed(0, e.to_string()))?;

        tracing::info!(deleted, "cleared automation posts");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::TemplateContentCreator;
    use crate::storage::MemoryPostStore;
    use async_trait::async_trait;

    /// Creator that always fails, for failure-path tests
    struct FailingCreator;

    #[async_trait]
    impl ContentCreator for FailingCreator {
        async fn create(&self, category: BlogCategory) -> RotationResult<crate::models::AutomatedPost> {
            Err(RotationError::creation_failed(
                category.as_str(),
                "generation unavailable",
            ))
        }
    }

    fn scheduler(store: Arc<MemoryPostStore>) -> RotationScheduler {
        let creator = Arc::new(TemplateContentCreator::new(store.clone()));
        RotationScheduler::new(store, creator)
    }

    #[tokio::test]
    async fn test_first_run_uses_ring_first() {
        let store = Arc::new(MemoryPostStore::new());
        let sched = scheduler(store);

        let result = sched.run_once().await.unwrap();
        assert_eq!(result.category, BlogCategory::AiModels);

        let state = sched.current_state().await.unwrap();
        assert_eq!(state.last_category, Some(BlogCategory::AiModels));
        assert_eq!(state.next_category, BlogCategory::Solutions);
    }

    #[tokio::test]
    async fn test_runs_advance_through_ring() {
        let store = Arc::new(MemoryPostStore::new());
        let sched = scheduler(store);

        let expected = BlogCategory::all();
        for category in &expected {
            let result = sched.run_once().await.unwrap();
            assert_eq!(result.category, *category);
        }

        // Eighth run wraps back to the first category
        let result = sched.run_once().await.unwrap();
        assert_eq!(result.category, expected[0]);
    }

    #[tokio::test]
    async fn test_creation_failure_does_not_advance() {
        let store = Arc::new(MemoryPostStore::new());
        let failing = RotationScheduler::new(store.clone(), Arc::new(FailingCreator));

        let before = failing.current_state().await.unwrap();
        let err = failing.run_once().await.unwrap_err();
        assert!(matches!(err, RotationError::CreationFailed { .. }));

        let after = failing.current_state().await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_storage_outage_aborts_run() {
        let store = Arc::new(MemoryPostStore::new());
        let sched = scheduler(store.clone());

        store.set_available(false);
        let err = sched.run_once().await.unwrap_err();
        assert!(matches!(err, RotationError::StorageUnavailable { .. }));

        store.set_available(true);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_stats_reflect_runs() {
        let store = Arc::new(MemoryPostStore::new());
        let sched = scheduler(store);

        sched.run_once().await.unwrap();
        sched.run_once().await.unwrap();

        let stats = sched.stats(DEFAULT_RECENT_LIMIT).await.unwrap();
        assert_eq!(stats.total_automation_posts, 2);
        assert_eq!(stats.recent_posts.len(), 2);
        assert!(stats.recent_posts[0].created_at >= stats.recent_posts[1].created_at);
    }

    #[tokio::test]
    async fn test_clear_resets_rotation() {
        let store = Arc::new(MemoryPostStore::new());
        let sched = scheduler(store);

        sched.run_once().await.unwrap();
        sched.run_once().await.unwrap();

        let deleted = sched.clear_all().await.unwrap();
        assert_eq!(deleted, 2);

        let state = sched.current_state().await.unwrap();
        assert_eq!(state.last_category, None);
        assert_eq!(state.next_category, BlogCategory::AiModels);

        let stats = sched.stats(DEFAULT_RECENT_LIMIT).await.unwrap();
        assert_eq!(stats.total_automation_posts, 0);
    }

    #[tokio::test]
    async fn test_clear_failure_is_clear_failed() {
        let store = Arc::new(MemoryPostStore::new());
        let sched = scheduler(store.clone());

        store.set_available(false);
        let err = sched.clear_all().await.unwrap_err();
        assert!(matches!(err, RotationError::ClearFailed { .. }));
    }
}
