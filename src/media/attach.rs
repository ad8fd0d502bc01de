use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{Session, Splice, UploadFile};
use crate::services::{BucketCreation, BucketSpec, ObjectStorage};

/// Largest accepted upload, in bytes (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_TYPE_PREFIX: &str = "image/";
const SUFFIX_LENGTH: usize = 10;

pub fn validate_file(file: &UploadFile) -> Result<()> {
    if !file.content_type.starts_with(IMAGE_TYPE_PREFIX) {
        return Err(AppError::InvalidFile {
            reason: format!("{} is not an image ({})", file.file_name, file.content_type),
        });
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(AppError::InvalidFile {
            reason: format!(
                "{} is {:.1} MB, images must be 5 MB or smaller",
                file.file_name,
                file.size() as f64 / (1024.0 * 1024.0)
            ),
        });
    }
    Ok(())
}

pub fn image_markup(url: &str) -> String {
    format!("\n\n![Image]({url})\n\n")
}

/// Inserts an image reference at `cursor` (a character offset, clamped to
/// the end of `content`) and places the cursor right after it.
pub fn splice_image(content: &str, cursor: usize, url: &str) -> Splice {
    let markup = image_markup(url);
    let at = content
        .char_indices()
        .nth(cursor)
        .map(|(byte, _)| byte)
        .unwrap_or(content.len());
    let cursor = content[..at].chars().count();

    let mut spliced = String::with_capacity(content.len() + markup.len());
    spliced.push_str(&content[..at]);
    spliced.push_str(&markup);
    spliced.push_str(&content[at..]);

    Splice {
        content: spliced,
        cursor: cursor + markup.chars().count(),
    }
}

/// Object path for a new upload: upload time plus a random suffix.
pub fn object_path(file: &UploadFile) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(char::from)
        .collect::<String>()
        .to_lowercase();
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        suffix,
        file.extension()
    )
}

/// Uploads content images into a dedicated bucket, creating it on first use.
pub struct ImageAttacher<O> {
    storage: O,
    bucket: String,
    bucket_ready: Mutex<bool>,
}

impl<O: ObjectStorage> ImageAttacher<O> {
    pub fn new(storage: O, bucket: impl Into<String>) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
            bucket_ready: Mutex::new(false),
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &O {
        &self.storage
    }

    fn bucket_spec(&self) -> BucketSpec {
        BucketSpec {
            id: self.bucket.clone(),
            name: self.bucket.clone(),
            public: true,
            allowed_mime_types: vec!["image/*".to_string()],
            file_size_limit: MAX_IMAGE_BYTES as u64,
        }
    }

    /// Creates the bucket if it is missing. Losing a creation race to
    /// another session counts as success.
    pub async fn ensure_bucket(&self, session: &Session) -> Result<()> {
        let mut ready = self.bucket_ready.lock().await;
        if *ready {
            return Ok(());
        }

        let buckets = self.storage.list_buckets(session).await?;
        if !buckets.iter().any(|b| b.id == self.bucket || b.name == self.bucket) {
            match self.storage.create_bucket(session, &self.bucket_spec()).await? {
                BucketCreation::Created => tracing::info!("Created media bucket {}", self.bucket),
                BucketCreation::AlreadyExists => {
                    tracing::debug!("Media bucket {} was created concurrently", self.bucket)
                }
            }
        }

        *ready = true;
        Ok(())
    }

    /// Uploads `file` and returns its public URL.
    pub async fn upload(&self, session: &Session, file: &UploadFile) -> Result<String> {
        validate_file(file)?;
        self.ensure_bucket(session).await.map_err(into_upload_failure)?;

        let path = object_path(file);
        self.storage
            .upload(session, &self.bucket, &path, file)
            .await
            .map_err(into_upload_failure)?;

        let url = self
            .storage
            .public_url(&self.bucket, &path)
            .map_err(into_upload_failure)?;
        tracing::info!("Uploaded image {} as {}", file.file_name, url);
        Ok(url)
    }

    /// Validates, uploads and splices `file` into `content` at `cursor`.
    /// On failure `content` is left to the caller unchanged.
    pub async fn attach(
        &self,
        session: Option<&Session>,
        file: &UploadFile,
        content: &str,
        cursor: usize,
    ) -> Result<Splice> {
        let session = session.ok_or(AppError::Unauthorized)?;
        let url = self.upload(session, file).await?;
        Ok(splice_image(content, cursor, &url))
    }
}

fn into_upload_failure(err: AppError) -> AppError {
    match err {
        AppError::UploadFailed { .. } => err,
        other => AppError::upload(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{session, MemoryStorage};

    const BUCKET: &str = "article-images";

    fn png(size: usize) -> UploadFile {
        UploadFile::new("photo.png", "image/png", vec![0u8; size])
    }

    #[test]
    fn splice_inserts_at_cursor() {
        let splice = splice_image("AB", 1, "http://x/y.png");
        let markup = "\n\n![Image](http://x/y.png)\n\n";
        assert_eq!(splice.content, format!("A{markup}B"));
        assert_eq!(splice.cursor, 1 + markup.chars().count());
    }

    #[test]
    fn splice_at_start_and_end() {
        let start = splice_image("body", 0, "u");
        assert_eq!(start.content, "\n\n![Image](u)\n\nbody");

        let end = splice_image("body", 4, "u");
        assert_eq!(end.content, "body\n\n![Image](u)\n\n");
        assert_eq!(end.cursor, end.content.chars().count());
    }

    #[test]
    fn splice_clamps_cursor_past_end() {
        let splice = splice_image("ab", 99, "u");
        assert_eq!(splice.content, "ab\n\n![Image](u)\n\n");
        assert_eq!(splice.cursor, 2 + image_markup("u").chars().count());
    }

    #[test]
    fn splice_counts_characters() {
        let splice = splice_image("héllo", 2, "u");
        assert_eq!(splice.content, "hé\n\n![Image](u)\n\nllo");
        assert_eq!(splice.cursor, 2 + image_markup("u").chars().count());
    }

    #[test]
    fn file_validation_rules() {
        assert!(matches!(
            validate_file(&png(6 * 1024 * 1024)),
            Err(AppError::InvalidFile { .. })
        ));
        assert!(matches!(
            validate_file(&UploadFile::new("notes.txt", "text/plain", vec![0; 1024])),
            Err(AppError::InvalidFile { .. })
        ));
        assert!(validate_file(&png(1024)).is_ok());
        assert!(validate_file(&png(MAX_IMAGE_BYTES)).is_ok());
        assert!(validate_file(&png(MAX_IMAGE_BYTES + 1)).is_err());
    }

    #[test]
    fn object_paths_are_unique_and_keep_extension() {
        let file = png(1);
        let a = object_path(&file);
        let b = object_path(&file);
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        let (millis, rest) = a.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest.len(), SUFFIX_LENGTH + ".png".len());
    }

    #[tokio::test]
    async fn invalid_file_is_never_uploaded() {
        let attacher = ImageAttacher::new(MemoryStorage::new(), BUCKET);
        let session = session();

        let err = attacher
            .attach(Some(&session), &png(6 * 1024 * 1024), "AB", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFile { .. }));
        assert_eq!(attacher.storage().list_calls(), 0);
        assert_eq!(attacher.storage().upload_calls(), 0);
    }

    #[tokio::test]
    async fn first_upload_creates_public_image_bucket() {
        let attacher = ImageAttacher::new(MemoryStorage::new(), BUCKET);
        let session = session();

        let splice = attacher
            .attach(Some(&session), &png(1024), "AB", 1)
            .await
            .unwrap();
        attacher
            .attach(Some(&session), &png(10), &splice.content, splice.cursor)
            .await
            .unwrap();

        let specs = attacher.storage().created_specs();
        assert_eq!(specs.len(), 1);
        assert!(specs[0].public);
        assert_eq!(specs[0].allowed_mime_types, vec!["image/*".to_string()]);
        assert_eq!(specs[0].file_size_limit, 5_242_880);
        assert_eq!(attacher.storage().list_calls(), 1);
        assert_eq!(attacher.storage().object_keys().len(), 2);
    }

    #[tokio::test]
    async fn existing_bucket_is_not_recreated() {
        let attacher = ImageAttacher::new(MemoryStorage::with_bucket(BUCKET), BUCKET);

        let splice = attacher
            .attach(Some(&session()), &png(8), "", 0)
            .await
            .unwrap();

        assert!(attacher.storage().created_specs().is_empty());
        let key = &attacher.storage().object_keys()[0];
        let url = format!("https://storage.test/{key}");
        assert_eq!(splice.content, image_markup(&url));
    }

    #[tokio::test]
    async fn losing_bucket_creation_race_still_uploads() {
        let storage = MemoryStorage::new();
        storage.set_racing_creator(true);
        let attacher = ImageAttacher::new(storage, BUCKET);

        let result = attacher.attach(Some(&session()), &png(8), "x", 1).await;

        assert!(result.is_ok());
        assert_eq!(attacher.storage().upload_calls(), 1);
    }

    #[tokio::test]
    async fn storage_failures_become_upload_failed() {
        let storage = MemoryStorage::new();
        storage.set_fail_list(true);
        let attacher = ImageAttacher::new(storage, BUCKET);
        let err = attacher
            .attach(Some(&session()), &png(8), "AB", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UploadFailed { .. }));

        let storage = MemoryStorage::with_bucket(BUCKET);
        storage.set_fail_upload(true);
        let attacher = ImageAttacher::new(storage, BUCKET);
        let err = attacher
            .attach(Some(&session()), &png(8), "AB", 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UploadFailed { .. }));
    }

    #[tokio::test]
    async fn failed_bucket_check_is_retried_next_time() {
        let storage = MemoryStorage::new();
        storage.set_fail_list(true);
        let attacher = ImageAttacher::new(storage, BUCKET);
        let session = session();

        assert!(attacher.attach(Some(&session), &png(8), "", 0).await.is_err());
        attacher.storage().set_fail_list(false);
        assert!(attacher.attach(Some(&session), &png(8), "", 0).await.is_ok());
        assert_eq!(attacher.storage().list_calls(), 2);
    }

    #[tokio::test]
    async fn anonymous_upload_is_unauthorized() {
        let attacher = ImageAttacher::new(MemoryStorage::new(), BUCKET);
        let err = attacher.attach(None, &png(8), "", 0).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
