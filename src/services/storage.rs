use std::future::Future;

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Session, UploadFile};

use super::backend::{error_message, BackendClient};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSpec {
    pub id: String,
    pub name: String,
    pub public: bool,
    pub allowed_mime_types: Vec<String>,
    pub file_size_limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketCreation {
    Created,
    AlreadyExists,
}

/// Object storage for uploaded images.
pub trait ObjectStorage {
    fn list_buckets(&self, session: &Session) -> impl Future<Output = Result<Vec<Bucket>>> + Send;

    fn create_bucket(
        &self,
        session: &Session,
        spec: &BucketSpec,
    ) -> impl Future<Output = Result<BucketCreation>> + Send;

    fn upload(
        &self,
        session: &Session,
        bucket: &str,
        path: &str,
        file: &UploadFile,
    ) -> impl Future<Output = Result<()>> + Send;

    fn public_url(&self, bucket: &str, path: &str) -> Result<String>;
}

pub struct StorageClient {
    backend: BackendClient,
}

impl StorageClient {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    fn object_path(bucket: &str, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", urlencoding::encode(bucket), encoded.join("/"))
    }
}

impl ObjectStorage for StorageClient {
    async fn list_buckets(&self, session: &Session) -> Result<Vec<Bucket>> {
        let url = self.backend.endpoint("storage/v1/bucket")?;

        let response = self
            .backend
            .request(Method::GET, url, Some(&session.access_token))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::upload(error_message(response).await));
        }

        Ok(response.json().await?)
    }

    async fn create_bucket(&self, session: &Session, spec: &BucketSpec) -> Result<BucketCreation> {
        let url = self.backend.endpoint("storage/v1/bucket")?;

        let response = self
            .backend
            .request(Method::POST, url, Some(&session.access_token))
            .json(spec)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Created storage bucket {}", spec.id);
            return Ok(BucketCreation::Created);
        }

        // The storage API reports duplicates as 409, or as 400 with a
        // "Duplicate" error body.
        let message = error_message(response).await;
        if status == StatusCode::CONFLICT
            || message.contains("already exists")
            || message.contains("Duplicate")
        {
            tracing::debug!("Bucket {} already exists", spec.id);
            return Ok(BucketCreation::AlreadyExists);
        }

        Err(AppError::upload(message))
    }

    async fn upload(
        &self,
        session: &Session,
        bucket: &str,
        path: &str,
        file: &UploadFile,
    ) -> Result<()> {
        let url = self
            .backend
            .endpoint(&format!("storage/v1/object/{}", Self::object_path(bucket, path)))?;

        let response = self
            .backend
            .request(Method::POST, url, Some(&session.access_token))
            .header("content-type", &file.content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(file.bytes.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::upload(error_message(response).await));
        }

        tracing::debug!("Uploaded {} ({} bytes) to {}", path, file.size(), bucket);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String> {
        let url = self.backend.endpoint(&format!(
            "storage/v1/object/public/{}",
            Self::object_path(bucket, path)
        ))?;
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;
    use crate::models::Actor;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn client(server: &mockito::ServerGuard) -> StorageClient {
        StorageClient::new(BackendClient::build(&server.url(), "anon", TIMEOUT).unwrap())
    }

    fn session() -> Session {
        let actor = Actor {
            id: Uuid::new_v4(),
            email: Some("editor@example.com".into()),
        };
        Session::new(actor, "jwt")
    }

    fn spec() -> BucketSpec {
        BucketSpec {
            id: "article-images".into(),
            name: "article-images".into(),
            public: true,
            allowed_mime_types: vec!["image/*".into()],
            file_size_limit: 5_242_880,
        }
    }

    #[tokio::test]
    async fn lists_buckets_with_session_token() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/storage/v1/bucket")
            .match_header("authorization", "Bearer jwt")
            .with_status(200)
            .with_body(r#"[{"id":"avatars","name":"avatars","public":false}]"#)
            .create_async()
            .await;

        let buckets = client(&server).list_buckets(&session()).await.unwrap();

        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].name, "avatars");
    }

    #[tokio::test]
    async fn duplicate_bucket_counts_as_existing() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/storage/v1/bucket")
            .with_status(400)
            .with_body(
                serde_json::json!({
                    "statusCode": "409",
                    "error": "Duplicate",
                    "message": "The resource already exists"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let outcome = client(&server)
            .create_bucket(&session(), &spec())
            .await
            .unwrap();

        assert_eq!(outcome, BucketCreation::AlreadyExists);
    }

    #[tokio::test]
    async fn rejected_bucket_creation_is_upload_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/storage/v1/bucket")
            .with_status(403)
            .with_body(r#"{"message":"new row violates row-level security policy"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .create_bucket(&session(), &spec())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UploadFailed { ref cause } if cause.contains("row-level")));
    }

    #[tokio::test]
    async fn upload_posts_bytes_with_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/article-images/1700000000000-abc.png")
            .match_header("content-type", "image/png")
            .match_body(vec![1u8, 2, 3])
            .with_status(200)
            .with_body(r#"{"Key":"article-images/1700000000000-abc.png"}"#)
            .expect(1)
            .create_async()
            .await;

        let file = UploadFile::new("a.png", "image/png", vec![1, 2, 3]);
        client(&server)
            .upload(&session(), "article-images", "1700000000000-abc.png", &file)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[test]
    fn public_url_points_at_public_object_route() {
        let backend = BackendClient::build("https://demo.example.co", "anon", TIMEOUT);
        let storage = StorageClient::new(backend.unwrap());

        let url = storage.public_url("article-images", "17-x y.png").unwrap();

        assert_eq!(
            url,
            "https://demo.example.co/storage/v1/object/public/article-images/17-x%20y.png"
        );
    }
}
