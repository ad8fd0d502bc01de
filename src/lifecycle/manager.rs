use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Article, ArticleDraft, NewArticle, Session, Visibility};
use crate::store::ArticleStore;

/// Number of content characters kept in a derived excerpt.
pub const EXCERPT_LENGTH: usize = 150;

/// First `EXCERPT_LENGTH` characters of `content` followed by an ellipsis.
pub fn derive_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_LENGTH).collect();
    excerpt.push_str("...");
    excerpt
}

/// Names of the required draft fields that are blank after trimming.
pub fn missing_fields(draft: &ArticleDraft) -> Vec<&'static str> {
    [
        ("title", &draft.title),
        ("content", &draft.content),
        ("category", &draft.category),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect()
}

fn authorize(session: Option<&Session>) -> Result<&Session> {
    session.ok_or(AppError::Unauthorized)
}

/// Creates, reads and deletes articles on top of an `ArticleStore`.
///
/// Articles go from nonexistent to published on create and back to
/// nonexistent on delete; there is no draft state and no update.
pub struct ArticleManager<S> {
    store: S,
    placeholder_image: String,
}

impl<S> ArticleManager<S> {
    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn placeholder_image(&self) -> &str {
        &self.placeholder_image
    }
}

impl<S: ArticleStore> ArticleManager<S> {
    pub fn new(store: S, placeholder_image: impl Into<String>) -> Self {
        Self {
            store,
            placeholder_image: placeholder_image.into(),
        }
    }

    pub async fn list_published(&self) -> Result<Vec<Article>> {
        self.store.list_published().await
    }

    pub async fn get_published(&self, id: Uuid) -> Result<Article> {
        self.store.get_by_id(id, Visibility::Public).await
    }

    pub async fn list_all(&self, session: Option<&Session>) -> Result<Vec<Article>> {
        let session = authorize(session)?;
        self.store.list_all(session).await
    }

    /// Any article by id, published or not.
    pub async fn get_for_admin(&self, session: Option<&Session>, id: Uuid) -> Result<Article> {
        let session = authorize(session)?;
        self.store.get_by_id(id, Visibility::Admin(session)).await
    }

    /// Builds the insert payload for `draft` without touching the store.
    pub fn prepare(&self, session: &Session, draft: &ArticleDraft) -> Result<NewArticle> {
        let missing = missing_fields(draft);
        if !missing.is_empty() {
            return Err(AppError::Validation {
                missing_fields: missing,
            });
        }

        let image = draft
            .image
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(self.placeholder_image.as_str())
            .to_string();

        Ok(NewArticle {
            title: draft.title.trim().to_string(),
            content: draft.content.clone(),
            category: draft.category.trim().to_string(),
            image,
            excerpt: derive_excerpt(&draft.content),
            author_id: session.actor.id,
            published: true,
        })
    }

    pub async fn create(&self, session: Option<&Session>, form: &ArticleDraft) -> Result<Article> {
        let session = authorize(session)?;
        let new_article = self.prepare(session, form)?;
        let article = self.store.create(session, new_article).await?;
        tracing::info!("Published article {} ({})", article.id, article.title);
        Ok(article)
    }

    pub async fn delete(&self, session: Option<&Session>, id: Uuid) -> Result<()> {
        let session = authorize(session)?;
        self.store.delete_by_id(session, id).await?;
        tracing::info!("Deleted article {}", id);
        Ok(())
    }
}
