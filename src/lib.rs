//! blogmill - Automated Blog Rotation Scheduler
//!
//! The automation subsystem of the iDevX marketing back office: on a
//! daily trigger it decides which content category the next generated
//! blog post belongs to, cycling through a fixed category ring, and
//! exposes operational controls (state, stats, clear) over a CLI and a
//! small HTTP API.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Core data structures and types
//! - [`rotation`] - Category ring, state derivation, scheduler, trigger
//! - [`generator`] - Content creation collaborator
//! - [`storage`] - Post store (SQLite, in-memory)
//! - [`ops`] - Operational HTTP API
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use blogmill::generator::TemplateContentCreator;
//! use blogmill::rotation::RotationScheduler;
//! use blogmill::storage::SqlitePostStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(SqlitePostStore::new("data/posts.db")?);
//!     let creator = Arc::new(TemplateContentCreator::new(store.clone()));
//!     let scheduler = RotationScheduler::new(store, creator);
//!
//!     let result = scheduler.run_once().await?;
//!     println!("created post {} in {}", result.post_id, result.category);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod ops;
pub mod rotation;
pub mod storage;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::generator::{ContentCreator, TemplateContentCreator};
    pub use crate::models::{AutomatedPost, BlogCategory, BlogType, PostStatus};
    pub use crate::rotation::{
        CategoryRing, JobTrigger, RotationError, RotationScheduler, RotationState, TriggerConfig,
    };
    pub use crate::storage::{PostStore, SqlitePostStore};
}

// Direct re-exports for convenience
pub use models::{AutomatedPost, BlogCategory, BlogType, PostStatus};
