//! Derived rotation state
//!
//! The rotation holds no cursor of its own: where we are in the ring is
//! recomputed on every call from the most recent automation post. That
//! keeps the component restart-safe, at the cost of the known
//! concurrent-run race documented on [`super::scheduler::RotationScheduler`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::BlogCategory;
use crate::storage::PostStore;

use super::error::{RotationError, RotationResult};
use super::ring::CategoryRing;

/// Snapshot of the rotation's position in the category ring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    /// Category of the most recent automation post, if one exists and
    /// its stored category is recognized
    pub last_category: Option<BlogCategory>,

    /// Creation time of that post
    pub last_run_at: Option<DateTime<Utc>>,

    /// Ring position corresponding to `last_category` (0 if none)
    pub current_index: usize,

    /// The category the next run will use
    pub next_category: BlogCategory,
}

/// Computes [`RotationState`] from the post store
pub struct RotationStateReader {
    store: Arc<dyn PostStore>,
    ring: CategoryRing,
}

impl RotationStateReader {
    pub fn new(store: Arc<dyn PostStore>, ring: CategoryRing) -> Self {
        Self { store, ring }
    }

    pub fn ring(&self) -> &CategoryRing {
        &self.ring
    }

    /// Derive the current rotation state
    ///
    /// One store read per call. A stored category outside the fixed set
    /// is treated as "no prior category" and logged as a data-quality
    /// warning; it never aborts the rotation.
    pub async fn current_state(&self) -> RotationResult<RotationState> {
        let latest = self
            .store
            .latest_automated()
            .await
            .map_err(|e| RotationError::storage_unavailable("latest_automated", e.to_string()))?;

        let (last_category, last_run_at) = match latest {
            Some(post) => {
                let parsed = post.parsed_category();
                if parsed.is_none() {
                    tracing::warn!(
                        post_id = %post.id,
                        category = %post.category,
                        "latest automation post has unrecognized category, treating as fresh start"
                    );
                }
                (parsed, Some(post.created_at))
            }
            None => (None, None),
        };

        let current_index = last_category
            .and_then(|c| self.ring.index_of(c))
            .unwrap_or(0);

        Ok(RotationState {
            last_category,
            last_run_at,
            current_index,
            next_category: self.ring.successor_of(last_category),
        })
    }
}
