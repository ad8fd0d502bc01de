//! In-memory doubles for the remote backend, and fixture builders.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Actor, Article, NewArticle, Session, UploadFile, Visibility};
use crate::services::{AuthClient, BackendClient, Bucket, BucketCreation, BucketSpec, ObjectStorage};
use crate::store::ArticleStore;

pub fn article(title: &str, content: &str, category: &str) -> Article {
    Article {
        id: Uuid::new_v4(),
        title: title.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        image: None,
        excerpt: format!("{content}..."),
        created_at: Utc::now(),
        published: true,
        author_id: None,
    }
}

pub fn session() -> Session {
    let actor = Actor {
        id: Uuid::new_v4(),
        email: Some("editor@example.com".to_string()),
    };
    Session::new(actor, "test-token")
}

/// Auth client pointed at a closed local port, for tests that never sign in.
pub fn offline_auth() -> AuthClient {
    let backend = BackendClient::build("http://127.0.0.1:9", "anon", Duration::from_secs(1));
    AuthClient::new(backend.unwrap())
}

/// `ArticleStore` double that keeps rows in insertion order and sorts like
/// the remote table.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<(u64, Article)>>,
    next_seq: AtomicUsize,
    insert_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        let store = Self::new();
        for article in articles {
            store.seed(article);
        }
        store
    }

    pub fn seed(&self, article: Article) {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) as u64;
        self.rows.lock().unwrap().push((seq, article));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("simulated outage".to_string()));
        }
        Ok(())
    }

    fn sorted(&self, include: impl Fn(&Article) -> bool) -> Vec<Article> {
        let rows = self.rows.lock().unwrap();
        let mut selected: Vec<&(u64, Article)> = rows.iter().filter(|(_, a)| include(a)).collect();
        selected.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        selected.into_iter().map(|(_, a)| a.clone()).collect()
    }
}

impl ArticleStore for MemoryStore {
    async fn list_published(&self) -> Result<Vec<Article>> {
        self.check_available()?;
        Ok(self.sorted(|a| a.published))
    }

    async fn list_all(&self, _session: &Session) -> Result<Vec<Article>> {
        self.check_available()?;
        Ok(self.sorted(|_| true))
    }

    async fn get_by_id(&self, id: Uuid, visibility: Visibility<'_>) -> Result<Article> {
        self.check_available()?;
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .map(|(_, a)| a)
            .find(|a| a.id == id)
            .filter(|a| a.published || matches!(visibility, Visibility::Admin(_)))
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, _session: &Session, new_article: NewArticle) -> Result<Article> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let article = Article {
            id: Uuid::new_v4(),
            title: new_article.title,
            content: new_article.content,
            category: new_article.category,
            image: Some(new_article.image),
            excerpt: new_article.excerpt,
            created_at: Utc::now(),
            published: new_article.published,
            author_id: Some(new_article.author_id),
        };
        self.seed(article.clone());
        Ok(article)
    }

    async fn delete_by_id(&self, _session: &Session, id: Uuid) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.rows.lock().unwrap().retain(|(_, a)| a.id != id);
        Ok(())
    }
}

/// `ObjectStorage` double recording buckets and uploaded objects.
#[derive(Default)]
pub struct MemoryStorage {
    buckets: Mutex<Vec<Bucket>>,
    specs: Mutex<Vec<BucketSpec>>,
    objects: Mutex<HashMap<String, UploadFile>>,
    list_calls: AtomicUsize,
    upload_calls: AtomicUsize,
    racing_creator: AtomicBool,
    fail_list: AtomicBool,
    fail_upload: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(name: &str) -> Self {
        let storage = Self::new();
        storage.buckets.lock().unwrap().push(Bucket {
            id: name.to_string(),
            name: name.to_string(),
            public: true,
        });
        storage
    }

    /// Makes the next bucket creation lose a race to another session.
    pub fn set_racing_creator(&self, racing: bool) {
        self.racing_creator.store(racing, Ordering::SeqCst);
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_upload(&self, fail: bool) {
        self.fail_upload.store(fail, Ordering::SeqCst);
    }

    pub fn created_specs(&self) -> Vec<BucketSpec> {
        self.specs.lock().unwrap().clone()
    }

    pub fn object_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

impl ObjectStorage for MemoryStorage {
    async fn list_buckets(&self, _session: &Session) -> Result<Vec<Bucket>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(AppError::upload("bucket listing refused"));
        }
        Ok(self.buckets.lock().unwrap().clone())
    }

    async fn create_bucket(&self, _session: &Session, spec: &BucketSpec) -> Result<BucketCreation> {
        self.specs.lock().unwrap().push(spec.clone());
        let mut buckets = self.buckets.lock().unwrap();
        let exists = buckets.iter().any(|b| b.id == spec.id);
        let racing = self.racing_creator.swap(false, Ordering::SeqCst);
        if !exists {
            buckets.push(Bucket {
                id: spec.id.clone(),
                name: spec.name.clone(),
                public: spec.public,
            });
        }
        if exists || racing {
            Ok(BucketCreation::AlreadyExists)
        } else {
            Ok(BucketCreation::Created)
        }
    }

    async fn upload(
        &self,
        _session: &Session,
        bucket: &str,
        path: &str,
        file: &UploadFile,
    ) -> Result<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(AppError::upload("object rejected"));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{bucket}/{path}"), file.clone());
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String> {
        Ok(format!("https://storage.test/{bucket}/{path}"))
    }
}

pub fn dated(mut article: Article, created_at: DateTime<Utc>) -> Article {
    article.created_at = created_at;
    article
}
