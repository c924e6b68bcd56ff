//! Repository abstraction over the post store
//!
//! The rotation component never talks to a database directly; it goes
//! through the [`PostStore`] trait so the backing store can be swapped
//! (SQLite in production, in-memory for tests) and failure modes can be
//! injected in tests.
//!
//! The store is shared with the rest of the back office (manual post
//! authoring, public listings). Every operation here is scoped to the
//! automation discriminator and must tolerate posts appearing or
//! disappearing between calls.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{AutomatedPost, BlogType, PostStatus, PostSummary, StatusCount};

// ============================================================================
// Post Store Trait
// ============================================================================

/// Store operations the rotation component depends on
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Most recently created automation post, if any
    async fn latest_automated(&self) -> Result<Option<AutomatedPost>>;

    /// Persist a new post
    async fn insert(&self, post: &AutomatedPost) -> Result<()>;

    /// Count all automation posts
    async fn count_automated(&self) -> Result<u64>;

    /// Automation post counts grouped by status
    async fn count_by_status(&self) -> Result<Vec<StatusCount>>;

    /// Most recent automation post summaries, newest first
    async fn recent_automated(&self, limit: usize) -> Result<Vec<PostSummary>>;

    /// Delete every automation post, returning the number deleted
    async fn delete_all_automated(&self) -> Result<u64>;
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite-backed post store
///
/// Uses `Mutex` to ensure thread-safety for the SQLite connection.
pub struct SqlitePostStore {
    conn: Mutex<Connection>,
}

impl SqlitePostStore {
    /// Open (or create) the store at the given path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).context("Failed to open SQLite database")?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite post store initialized");
        Ok(store)
    }

    /// Create in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to create in-memory SQLite")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Create database schema
    fn create_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS posts (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL,
                    category TEXT NOT NULL,
                    blog_type TEXT NOT NULL DEFAULT 'manual',
                    status TEXT NOT NULL DEFAULT 'draft',
                    created_at TEXT NOT NULL,
                    content_hash TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_posts_blog_type
                    ON posts(blog_type);

                CREATE INDEX IF NOT EXISTS idx_posts_created_at
                    ON posts(created_at);

                CREATE INDEX IF NOT EXISTS idx_posts_status
                    ON posts(status);
                "#,
        )
        .context("Failed to create SQLite schema")?;

        Ok(())
    }

    fn row_to_post(row: &rusqlite::Row<'_>) -> rusqlite::Result<AutomatedPost> {
        let blog_type: String = row.get("blog_type")?;
        let status: String = row.get("status")?;
        let created_at: String = row.get("created_at")?;

        Ok(AutomatedPost {
            id: row.get("id")?,
            title: row.get("title")?,
            content: row.get("content")?,
            category: row.get("category")?,
            blog_type: blog_type.parse::<BlogType>().unwrap_or(BlogType::Manual),
            status: status.parse::<PostStatus>().unwrap_or(PostStatus::Draft),
            created_at: parse_timestamp(&created_at),
            content_hash: row.get("content_hash")?,
        })
    }
}

/// Parse an RFC 3339 timestamp column, falling back to the epoch so a
/// malformed row sorts last rather than failing the read
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| DateTime::<Utc>::UNIX_EPOCH)
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn latest_automated(&self) -> Result<Option<AutomatedPost>> {
        let conn = self.conn.lock().unwrap();
        let post = conn
            .query_row(
                "SELECT id, title, content, category, blog_type, status, created_at, content_hash
                 FROM posts WHERE blog_type = 'automation'
                 ORDER BY created_at DESC LIMIT 1",
                [],
                Self::row_to_post,
            )
            .optional()
            .context("Failed to query latest automation post")?;

        Ok(post)
    }

    async fn insert(&self, post: &AutomatedPost) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO posts (id, title, content, category, blog_type, status, created_at, content_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                post.id,
                post.title,
                post.content,
                post.category,
                post.blog_type.as_str(),
                post.status.as_str(),
                post.created_at.to_rfc3339(),
                post.content_hash,
            ],
        )
        .context("Failed to insert post")?;

        Ok(())
    }

    async fn count_automated(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: u64 = conn
            .query_row(
                "SELECT COUNT(*) FROM posts WHERE blog_type = 'automation'",
                [],
                |row| row.get(0),
            )
            .context("Failed to count automation posts")?;

        Ok(count)
    }

    async fn count_by_status(&self) -> Result<Vec<StatusCount>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT status, COUNT(*) FROM posts
                 WHERE blog_type = 'automation'
                 GROUP BY status ORDER BY status",
            )
            .context("Failed to prepare status breakdown query")?;

        let counts = stmt
            .query_map([], |row| {
                let status: String = row.get(0)?;
                let count: u64 = row.get(1)?;
                Ok(StatusCount {
                    status: status.parse::<PostStatus>().unwrap_or(PostStatus::Draft),
                    count,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read status breakdown")?;

        Ok(counts)
    }

    async fn recent_automated(&self, limit: usize) -> Result<Vec<PostSummary>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, title, status, created_at FROM posts
                 WHERE blog_type = 'automation'
                 ORDER BY created_at DESC LIMIT ?1",
            )
            .context("Failed to prepare recent posts query")?;

        let summaries = stmt
            .query_map(params![limit as i64], |row| {
                let status: String = row.get(2)?;
                let created_at: String = row.get(3)?;
                Ok(PostSummary {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    status: status.parse::<PostStatus>().unwrap_or(PostStatus::Draft),
                    created_at: parse_timestamp(&created_at),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read recent posts")?;

        Ok(summaries)
    }

    async fn delete_all_automated(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM posts WHERE blog_type = 'automation'", [])
            .context("Failed to delete automation posts")?;

        Ok(deleted as u64)
    }
}

// ============================================================================
// In-Memory Implementation (for testing)
// ============================================================================

/// In-memory post store
///
/// Useful for testing without database dependencies. The `available`
/// switch makes every operation fail, to exercise storage-outage paths.
pub struct MemoryPostStore {
    posts: RwLock<Vec<AutomatedPost>>,
    available: AtomicBool,
}

impl MemoryPostStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability; when false every operation errors
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Insert a post directly, bypassing the trait (test setup helper)
    pub fn seed(&self, post: AutomatedPost) {
        self.posts.write().unwrap().push(post);
    }

    /// Number of stored posts, automation and manual alike
    pub fn len(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.read().unwrap().is_empty()
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(anyhow!("store marked unavailable"))
        }
    }
}

impl Default for MemoryPostStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn latest_automated(&self) -> Result<Option<AutomatedPost>> {
        self.check_available()?;
        let posts = self.posts.read().unwrap();
        Ok(posts
            .iter()
            .filter(|p| p.blog_type == BlogType::Automation)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn insert(&self, post: &AutomatedPost) -> Result<()> {
        self.check_available()?;
        self.posts.write().unwrap().push(post.clone());
        Ok(())
    }

    async fn count_automated(&self) -> Result<u64> {
        self.check_available()?;
        let posts = self.posts.read().unwrap();
        Ok(posts
            .iter()
            .filter(|p| p.blog_type == BlogType::Automation)
            .count() as u64)
    }

    async fn count_by_status(&self) -> Result<Vec<StatusCount>> {
        self.check_available()?;
        let posts = self.posts.read().unwrap();

        let mut draft = 0u64;
        let mut published = 0u64;
        for post in posts.iter().filter(|p| p.blog_type == BlogType::Automation) {
            match post.status {
                PostStatus::Draft => draft += 1,
                PostStatus::Published => published += 1,
            }
        }

        let mut counts = Vec::new();
        if draft > 0 {
            counts.push(StatusCount {
                status: PostStatus::Draft,
                count: draft,
            });
        }
        if published > 0 {
            counts.push(StatusCount {
                status: PostStatus::Published,
                count: published,
            });
        }

        Ok(counts)
    }

    async fn recent_automated(&self, limit: usize) -> Result<Vec<PostSummary>> {
        self.check_available()?;
        let posts = self.posts.read().unwrap();

        let mut automated: Vec<&AutomatedPost> = posts
            .iter()
            .filter(|p| p.blog_type == BlogType::Automation)
            .collect();
        automated.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(automated.iter().take(limit).map(|p| p.summary()).collect())
    }

    async fn delete_all_automated(&self) -> Result<u64> {
        self.check_available()?;
        let mut posts = self.posts.write().unwrap();
        let before = posts.len();
        posts.retain(|p| p.blog_type != BlogType::Automation);
        Ok((before - posts.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlogCategory;
    use chrono::Duration;

    fn automation_post(category: BlogCategory, age_minutes: i64) -> AutomatedPost {
        let mut post = AutomatedPost::new(
            format!("{} post", category.label()),
            "generated body",
            category,
        );
        post.created_at = Utc::now() - Duration::minutes(age_minutes);
        post
    }

    #[tokio::test]
    async fn test_sqlite_roundtrip() {
        let store = SqlitePostStore::in_memory().unwrap();

        let post = automation_post(BlogCategory::Solutions, 0);
        store.insert(&post).await.unwrap();

        let latest = store.latest_automated().await.unwrap().unwrap();
        assert_eq!(latest.id, post.id);
        assert_eq!(latest.category, "solutions");
        assert_eq!(latest.blog_type, BlogType::Automation);
    }

    #[tokio::test]
    async fn test_sqlite_latest_orders_by_created_at() {
        let store = SqlitePostStore::in_memory().unwrap();

        store
            .insert(&automation_post(BlogCategory::AiModels, 60))
            .await
            .unwrap();
        store
            .insert(&automation_post(BlogCategory::Tutorials, 5))
            .await
            .unwrap();
        store
            .insert(&automation_post(BlogCategory::Industry, 30))
            .await
            .unwrap();

        let latest = store.latest_automated().await.unwrap().unwrap();
        assert_eq!(latest.category, "tutorials");
    }

    #[tokio::test]
    async fn test_sqlite_ignores_manual_posts() {
        let store = SqlitePostStore::in_memory().unwrap();

        let mut manual = automation_post(BlogCategory::CompanyNews, 0);
        manual.blog_type = BlogType::Manual;
        store.insert(&manual).await.unwrap();

        assert!(store.latest_automated().await.unwrap().is_none());
        assert_eq!(store.count_automated().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sqlite_count_by_status() {
        let store = SqlitePostStore::in_memory().unwrap();

        store
            .insert(&automation_post(BlogCategory::AiModels, 10))
            .await
            .unwrap();
        let mut published = automation_post(BlogCategory::Solutions, 5);
        published.status = PostStatus::Published;
        store.insert(&published).await.unwrap();

        let counts = store.count_by_status().await.unwrap();
        assert_eq!(counts.len(), 2);
        assert!(counts
            .iter()
            .any(|c| c.status == PostStatus::Draft && c.count == 1));
        assert!(counts
            .iter()
            .any(|c| c.status == PostStatus::Published && c.count == 1));
    }

    #[tokio::test]
    async fn test_sqlite_recent_limit_and_order() {
        let store = SqlitePostStore::in_memory().unwrap();

        for age in [40, 20, 10, 30] {
            store
                .insert(&automation_post(BlogCategory::Engineering, age))
                .await
                .unwrap();
        }

        let recent = store.recent_automated(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].created_at > recent[1].created_at);
    }

    #[tokio::test]
    async fn test_sqlite_delete_all_automated_spares_manual() {
        let store = SqlitePostStore::in_memory().unwrap();

        store
            .insert(&automation_post(BlogCategory::AiModels, 10))
            .await
            .unwrap();
        store
            .insert(&automation_post(BlogCategory::Solutions, 5))
            .await
            .unwrap();
        let mut manual = automation_post(BlogCategory::CompanyNews, 1);
        manual.blog_type = BlogType::Manual;
        store.insert(&manual).await.unwrap();

        let deleted = store.delete_all_automated().await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.count_automated().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_memory_store_matches_sqlite_behavior() {
        let store = MemoryPostStore::new();

        store
            .insert(&automation_post(BlogCategory::AiModels, 60))
            .await
            .unwrap();
        store
            .insert(&automation_post(BlogCategory::Tutorials, 5))
            .await
            .unwrap();

        let latest = store.latest_automated().await.unwrap().unwrap();
        assert_eq!(latest.category, "tutorials");
        assert_eq!(store.count_automated().await.unwrap(), 2);

        let deleted = store.delete_all_automated().await.unwrap();
        assert_eq!(deleted, 2);
        assert!(store.latest_automated().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_unavailable() {
        let store = MemoryPostStore::new();
        store.set_available(false);

        assert!(store.latest_automated().await.is_err());
        assert!(store.count_automated().await.is_err());
        assert!(store.delete_all_automated().await.is_err());

        store.set_available(true);
        assert!(store.latest_automated().await.unwrap().is_none());
    }
}
