//! Content creation collaborator
//!
//! The scheduler hands a category to a [`ContentCreator`] and expects a
//! persisted post back. The production text-generation pipeline plugs in
//! behind this trait; [`TemplateContentCreator`] is the built-in
//! implementation that renders a handlebars skeleton per category so the
//! rotation is usable end to end without the generation service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use handlebars::Handlebars;
use serde_json::json;

use crate::models::{AutomatedPost, BlogCategory, PostStatus};
use crate::rotation::error::{RotationError, RotationResult};
use crate::storage::PostStore;

/// Creates and persists one automation post for a category
#[async_trait]
pub trait ContentCreator: Send + Sync {
    /// Produce a new post tagged with `category`
    ///
    /// On failure no record exists, so the rotation's view of "last
    /// category" is unchanged.
    async fn create(&self, category: BlogCategory) -> RotationResult<AutomatedPost>;
}

const TITLE_TEMPLATE: &str = "{{label}} update — {{date}}";

const BODY_TEMPLATE: &str = "\
## {{label}}

This post was generated by the rotation scheduler for the *{{label}}*
category on {{date}}. Replace this skeleton with edited copy before
publishing.

Category tag: `{{category}}`
";

/// Template-driven content creator
///
/// Renders a title/body skeleton and persists the post as a draft
/// (or published, when constructed with `publish`).
pub struct TemplateContentCreator {
    store: Arc<dyn PostStore>,
    registry: Handlebars<'static>,
    publish: bool,
}

impl TemplateContentCreator {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        let mut registry = Handlebars::new();
        // Template strings are compiled in; registration cannot fail at runtime
        registry
            .register_template_string("title", TITLE_TEMPLATE)
            .expect("built-in title template is valid");
        registry
            .register_template_string("body", BODY_TEMPLATE)
            .expect("built-in body template is valid");

        Self {
            store,
            registry,
            publish: false,
        }
    }

    /// Create posts as published instead of draft
    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    fn render(&self, category: BlogCategory) -> RotationResult<(String, String)> {
        let data = json!({
            "label": category.label(),
            "category": category.as_str(),
            "date": Utc::now().format("%Y-%m-%d").to_string(),
        });

        let title = self
            .registry
            .render("title", &data)
            .map_err(|e| RotationError::creation_failed(category.as_str(), e.to_string()))?;
        let body = self
            .registry
            .render("body", &data)
            .map_err(|e| RotationError::creation_failed(category.as_str(), e.to_string()))?;

        Ok((title, body))
    }
}

#[async_trait]
impl ContentCreator for TemplateContentCreator {
    async fn create(&self, category: BlogCategory) -> RotationResult<AutomatedPost> {
        let (title, body) = self.render(category)?;

        let mut post = AutomatedPost::new(title, body, category);
        if self.publish {
            post.status = PostStatus::Published;
        }
        post.compute_hash();

        self.store
            .insert(&post)
            .await
            .map_err(|e| RotationError::creation_failed(category.as_str(), e.to_string()))?;

        tracing::info!(
            post_id = %post.id,
            category = %category,
            status = %post.status,
            "automation post created"
        );

        Ok(post)
    }
}
