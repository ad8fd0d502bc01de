use std::future::Future;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Article, NewArticle, Session, Visibility};

mod rest;

pub use rest::RestStore;

/// Remote CRUD over the `articles` collection.
///
/// Listings are ordered by `created_at`, newest first. Every call is a
/// remote round trip and fails with `StoreUnavailable` on transport or
/// query errors.
pub trait ArticleStore {
    fn list_published(&self) -> impl Future<Output = Result<Vec<Article>>> + Send;

    fn list_all(&self, session: &Session) -> impl Future<Output = Result<Vec<Article>>> + Send;

    /// `NotFound` when the row is absent, or hidden under `Visibility::Public`.
    fn get_by_id(
        &self,
        id: Uuid,
        visibility: Visibility<'_>,
    ) -> impl Future<Output = Result<Article>> + Send;

    fn create(
        &self,
        session: &Session,
        article: NewArticle,
    ) -> impl Future<Output = Result<Article>> + Send;

    /// Deleting an id that does not exist is not an error.
    fn delete_by_id(&self, session: &Session, id: Uuid) -> impl Future<Output = Result<()>> + Send;
}
