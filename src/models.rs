// Core data structures for the blogmill rotation subsystem

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Blog categories for automated post rotation
///
/// The set is fixed and ordered; rotation walks it in declaration order
/// and wraps around after the last member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlogCategory {
    /// AI model releases and deep dives
    AiModels,
    /// Solution and product walkthroughs
    Solutions,
    /// Engineering notes from the platform team
    Engineering,
    /// How-to guides and tutorials
    Tutorials,
    /// Industry trends and commentary
    Industry,
    /// Customer case studies
    CaseStudies,
    /// Company announcements
    CompanyNews,
}

impl BlogCategory {
    /// Get all categories in rotation order
    pub fn all() -> Vec<Self> {
        vec![
            Self::AiModels,
            Self::Solutions,
            Self::Engineering,
            Self::Tutorials,
            Self::Industry,
            Self::CaseStudies,
            Self::CompanyNews,
        ]
    }

    /// Get string representation (matches the stored column value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiModels => "ai-models",
            Self::Solutions => "solutions",
            Self::Engineering => "engineering",
            Self::Tutorials => "tutorials",
            Self::Industry => "industry",
            Self::CaseStudies => "case-studies",
            Self::CompanyNews => "company-news",
        }
    }

    /// Human-readable label for titles and operator output
    pub fn label(&self) -> &'static str {
        match self {
            Self::AiModels => "AI Models",
            Self::Solutions => "Solutions",
            Self::Engineering => "Engineering",
            Self::Tutorials => "Tutorials",
            Self::Industry => "Industry",
            Self::CaseStudies => "Case Studies",
            Self::CompanyNews => "Company News",
        }
    }

    /// Parse from a stored string (lenient: case-insensitive, accepts
    /// legacy underscore separators)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ai-models" | "ai" => Some(Self::AiModels),
            "solutions" => Some(Self::Solutions),
            "engineering" => Some(Self::Engineering),
            "tutorials" | "how-to" => Some(Self::Tutorials),
            "industry" => Some(Self::Industry),
            "case-studies" => Some(Self::CaseStudies),
            "company-news" | "news" => Some(Self::CompanyNews),
            _ => None,
        }
    }
}

impl std::fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Discriminator separating scheduler-created posts from manually
/// authored ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogType {
    Automation,
    Manual,
}

impl BlogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Automation => "automation",
            Self::Manual => "manual",
        }
    }
}

impl std::str::FromStr for BlogType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "automation" => Self::Automation,
            _ => Self::Manual,
        })
    }
}

impl std::fmt::Display for BlogType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

impl PostStatus {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "published" => Self::Published,
            _ => Self::Draft,
        })
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduler-created blog post
///
/// The category is kept as the raw stored string; it is validated against
/// [`BlogCategory`] only where rotation state is derived, so a legacy or
/// hand-edited value cannot make reads fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatedPost {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub blog_type: BlogType,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub content_hash: Option<String>,
}

impl AutomatedPost {
    /// Create a new automation post with a fresh id and timestamp
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: BlogCategory) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            category: category.as_str().to_string(),
            blog_type: BlogType::Automation,
            status: PostStatus::Draft,
            created_at: Utc::now(),
            content_hash: None,
        }
    }

    /// Parsed category, if the stored string is a recognized member
    pub fn parsed_category(&self) -> Option<BlogCategory> {
        BlogCategory::parse(&self.category)
    }

    /// Calculate content hash using SHA256
    pub fn compute_hash(&mut self) {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        self.content_hash = Some(format!("{:x}", hasher.finalize()));
    }

    /// Reduce to the summary fields used by stats listings
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Summary fields of an automation post, for stats listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}

/// Count of automation posts in one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: PostStatus,
    pub count: u64,
}
