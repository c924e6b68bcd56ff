//! Blog category rotation scheduling
//!
//! This module decides which content category the next automatically
//! generated blog post belongs to, cycling through a fixed ring of
//! categories and avoiding repeats by deriving its position from the
//! most recent automation post.
//!
//! # Overview
//!
//! The rotation holds no persisted cursor: the category of the most
//! recently created automation post *is* the state. Every run reads that
//! post, computes the ring successor, and asks the content creator for a
//! new post tagged with it. The new post then becomes the state the next
//! run derives from. This keeps the component restart-safe (a crash
//! between runs loses nothing) and makes `clear_all` a full reset.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                     JobTrigger                        │
//! │        (daily timer, manual run-now, events)          │
//! └──────────────────────────┬────────────────────────────┘
//!                            │ run_once
//! ┌──────────────────────────▼────────────────────────────┐
//! │                  RotationScheduler                    │
//! │  ┌──────────────────┐       ┌─────────────────────┐   │
//! │  │ RotationState    │       │    CategoryRing     │   │
//! │  │ Reader           │──────▶│  (wrap-around       │   │
//! │  │ (latest post)    │       │   successor)        │   │
//! │  └────────┬─────────┘       └─────────────────────┘   │
//! └───────────┼──────────────────────────┬────────────────┘
//!             │ read                     │ create(category)
//!      ┌──────▼──────┐           ┌───────▼────────┐
//!      │  PostStore  │◀──────────│ ContentCreator │
//!      └─────────────┘  insert   └────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`ring`] - Wrap-around category ring
//! - [`state`] - Derived rotation state and its reader
//! - [`scheduler`] - Run orchestration, stats, clear
//! - [`trigger`] - Daily timer loop and manual invocation
//! - [`error`] - Rotation error taxonomy
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use blogmill::generator::TemplateContentCreator;
//! use blogmill::rotation::{JobTrigger, RotationScheduler, TriggerConfig};
//! use blogmill::storage::SqlitePostStore;
//!
//! let store = Arc::new(SqlitePostStore::new("data/posts.db")?);
//! let creator = Arc::new(TemplateContentCreator::new(store.clone()));
//! let scheduler = Arc::new(RotationScheduler::new(store, creator));
//!
//! // One-off run
//! let result = scheduler.run_once().await?;
//! println!("created {} in {}", result.post_id, result.category);
//!
//! // Or let the trigger fire daily at 09:00
//! let trigger = JobTrigger::new(
//!     TriggerConfig::builder().post_time("09:00").build()?,
//!     scheduler,
//! )?;
//! trigger.start().await?;
//! ```
//!
//! # Concurrency
//!
//! `run_once` is one read, one decision, one write. Two concurrent calls
//! can both observe the same "last category" and create duplicate-tagged
//! posts; the component takes no lock to prevent it. Keep a single
//! trigger source active, or accept the occasional duplicate run.

pub mod error;
pub mod ring;
pub mod scheduler;
pub mod state;
pub mod trigger;

// Re-export main types
pub use error::{RotationError, RotationResult};
pub use ring::CategoryRing;
pub use scheduler::{RotationScheduler, RotationStats, RunResult, DEFAULT_RECENT_LIMIT};
pub use state::{RotationState, RotationStateReader};
pub use trigger::{JobTrigger, TriggerConfig, TriggerEvent, TriggerStatus};
