use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::storage::{Storage, object_from_document, records_from_document};

/// Filesystem variant: each user's resources live as JSON documents under
/// `<root>/user_<id>/<resource>`. The directory is created lazily on the
/// first write; a missing file reads as an empty collection, never an error.
pub struct FilesystemStorage {
    root: PathBuf,
}

impl FilesystemStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        FilesystemStorage {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn user_dir(&self, user_id: i64) -> PathBuf {
        self.root.join(format!("user_{}", user_id))
    }

    fn resource_path(&self, user_id: i64, resource: &str) -> PathBuf {
        self.user_dir(user_id).join(resource)
    }

    async fn read_document(&self, user_id: i64, resource: &str) -> Option<Value> {
        let path = self.resource_path(user_id, resource);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(user_id, resource, error = %err, "resource read failed, loading as empty");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(user_id, resource, error = %err, "resource decode failed, loading as empty");
                None
            }
        }
    }

    async fn write_document(&self, user_id: i64, resource: &str, document: &Value) -> bool {
        if let Err(err) = tokio::fs::create_dir_all(self.user_dir(user_id)).await {
            tracing::error!(user_id, resource, error = %err, "failed to create user directory");
            return false;
        }

        let bytes = match serde_json::to_vec_pretty(document) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(user_id, resource, error = %err, "failed to encode resource");
                return false;
            }
        };

        match tokio::fs::write(self.resource_path(user_id, resource), bytes).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(user_id, resource, error = %err, "resource write failed");
                false
            }
        }
    }
}

#[async_trait]
impl Storage for FilesystemStorage {
    async fn load(&self, user_id: i64, resource: &str) -> Vec<Value> {
        records_from_document(self.read_document(user_id, resource).await)
    }

    async fn replace_all(&self, user_id: i64, resource: &str, records: &[Value]) -> bool {
        self.write_document(user_id, resource, &Value::Array(records.to_vec()))
            .await
    }

    async fn append_one(&self, user_id: i64, resource: &str, record: Value) -> bool {
        let mut records = self.load(user_id, resource).await;
        records.push(record);
        self.write_document(user_id, resource, &Value::Array(records))
            .await
    }

    async fn load_object(&self, user_id: i64, resource: &str) -> Option<Value> {
        object_from_document(self.read_document(user_id, resource).await)
    }

    async fn store_object(&self, user_id: i64, resource: &str, object: &Value) -> bool {
        self.write_document(user_id, resource, object).await
    }
}
