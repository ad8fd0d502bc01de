use reqwest::Method;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Article, NewArticle, Session, Visibility};
use crate::services::BackendClient;

use super::ArticleStore;

const ARTICLES_PATH: &str = "rest/v1/articles";
const NEWEST_FIRST: (&str, &str) = ("order", "created_at.desc");
const PUBLISHED_ONLY: (&str, &str) = ("published", "eq.true");

/// `ArticleStore` over the backend's PostgREST table API.
pub struct RestStore {
    backend: BackendClient,
}

impl RestStore {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    async fn select(
        &self,
        filters: &[(&str, String)],
        access_token: Option<&str>,
    ) -> Result<Vec<Article>> {
        let url = self.backend.endpoint(ARTICLES_PATH)?;

        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());

        let response = self
            .backend
            .request(Method::GET, url, access_token)
            .query(&query)
            .send()
            .await
            .map_err(AppError::store)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Article query failed: HTTP {} {}", status, body);
            return Err(AppError::StoreUnavailable(format!("HTTP {status}")));
        }

        response.json().await.map_err(AppError::store)
    }
}

impl ArticleStore for RestStore {
    async fn list_published(&self) -> Result<Vec<Article>> {
        let filters = [
            (PUBLISHED_ONLY.0, PUBLISHED_ONLY.1.to_string()),
            (NEWEST_FIRST.0, NEWEST_FIRST.1.to_string()),
        ];
        let articles = self.select(&filters, None).await?;
        tracing::debug!("Fetched {} published articles", articles.len());
        Ok(articles)
    }

    async fn list_all(&self, session: &Session) -> Result<Vec<Article>> {
        let filters = [(NEWEST_FIRST.0, NEWEST_FIRST.1.to_string())];
        let articles = self.select(&filters, Some(&session.access_token)).await?;
        tracing::debug!("Fetched {} articles for admin", articles.len());
        Ok(articles)
    }

    async fn get_by_id(&self, id: Uuid, visibility: Visibility<'_>) -> Result<Article> {
        let mut filters = vec![("id", format!("eq.{id}"))];
        if let Visibility::Public = visibility {
            filters.push((PUBLISHED_ONLY.0, PUBLISHED_ONLY.1.to_string()));
        }

        self.select(&filters, visibility.access_token())
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, session: &Session, article: NewArticle) -> Result<Article> {
        let url = self.backend.endpoint(ARTICLES_PATH)?;

        let response = self
            .backend
            .request(Method::POST, url, Some(&session.access_token))
            .header("Prefer", "return=representation")
            .json(&article)
            .send()
            .await
            .map_err(AppError::store)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Article insert failed: HTTP {} {}", status, body);
            return Err(AppError::StoreUnavailable(format!("HTTP {status}")));
        }

        let rows: Vec<Article> = response.json().await.map_err(AppError::store)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::store("insert returned no row"))
    }

    async fn delete_by_id(&self, session: &Session, id: Uuid) -> Result<()> {
        let url = self.backend.endpoint(ARTICLES_PATH)?;

        let response = self
            .backend
            .request(Method::DELETE, url, Some(&session.access_token))
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(AppError::store)?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Article delete failed: HTTP {}", status);
            return Err(AppError::StoreUnavailable(format!("HTTP {status}")));
        }

        Ok(())
    }
}
