//! Post persistence for the rotation subsystem
//!
//! The scheduler only ever sees the [`PostStore`] trait; SQLite backs it
//! in production and an in-memory implementation backs it in tests.

pub mod repository;

pub use repository::{MemoryPostStore, PostStore, SqlitePostStore};
