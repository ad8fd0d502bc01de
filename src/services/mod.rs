mod auth;
mod backend;
mod storage;

pub use auth::AuthClient;
pub use backend::BackendClient;
pub use storage::{BucketCreation, BucketSpec, ObjectStorage, StorageClient};

#[cfg(test)]
pub use storage::Bucket;
