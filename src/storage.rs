use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{Config, StorageBackend};
use crate::errors::ApiError;
use crate::filesystem::FilesystemStorage;
use crate::remote::RemoteStorage;

/// Pluggable persistence for per-user JSON documents.
///
/// Reads are fail-open: a missing or unreadable resource loads as empty, and
/// the underlying failure is logged so "genuinely empty" and "read failed"
/// stay distinguishable in diagnostics. Writes report success as a boolean; a
/// `false` return means the changes may be lost, and callers must not pretend
/// success.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Load a list resource in storage order.
    async fn load(&self, user_id: i64, resource: &str) -> Vec<Value>;

    /// Overwrite the entire resource with `records`.
    async fn replace_all(&self, user_id: i64, resource: &str, records: &[Value]) -> bool;

    /// Append a single record, creating the resource if missing. The append
    /// is a whole-document rewrite, not an incremental write.
    async fn append_one(&self, user_id: i64, resource: &str, record: Value) -> bool;

    /// Load a single-object resource. `None` when missing or unreadable.
    async fn load_object(&self, user_id: i64, resource: &str) -> Option<Value>;

    /// Overwrite a single-object resource.
    async fn store_object(&self, user_id: i64, resource: &str, object: &Value) -> bool;
}

pub type SharedStorage = Arc<dyn Storage>;

/// Build the backend selected by the configuration. Called once at startup;
/// every store receives the result through axum state.
pub fn build_storage(config: &Config) -> SharedStorage {
    match &config.backend {
        StorageBackend::Filesystem => Arc::new(FilesystemStorage::new(&config.data_path)),
        StorageBackend::Remote(remote) => Arc::new(RemoteStorage::new(remote.clone())),
    }
}

/// Normalize a raw document into list records: arrays load as-is, a legacy
/// single-object document loads as one record, anything absent loads empty.
pub fn records_from_document(document: Option<Value>) -> Vec<Value> {
    match document {
        Some(Value::Array(records)) => records,
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

/// Normalize a raw document into a single object: a legacy one-element-list
/// document reads as its first element.
pub fn object_from_document(document: Option<Value>) -> Option<Value> {
    match document {
        Some(Value::Array(values)) => values.into_iter().next(),
        Some(Value::Null) | None => None,
        Some(object) => Some(object),
    }
}

/// Load and decode every record of a list resource. Records that no longer
/// match the expected shape are skipped and logged rather than failing the
/// whole read.
pub async fn load_records<T: DeserializeOwned>(
    storage: &dyn Storage,
    user_id: i64,
    resource: &str,
) -> Vec<T> {
    storage
        .load(user_id, resource)
        .await
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(user_id, resource, error = %err, "skipping malformed record");
                None
            }
        })
        .collect()
}

/// Replace a list resource with `records`, surfacing a failed write as
/// [`ApiError::StorageUnavailable`].
pub async fn save_records<T: Serialize>(
    storage: &dyn Storage,
    user_id: i64,
    resource: &str,
    records: &[T],
) -> Result<(), ApiError> {
    let values = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()
        .map_err(anyhow::Error::from)?;

    if storage.replace_all(user_id, resource, &values).await {
        Ok(())
    } else {
        Err(ApiError::StorageUnavailable {
            user_id,
            resource: resource.to_string(),
        })
    }
}

/// Append one record to a list resource, surfacing a failed write as
/// [`ApiError::StorageUnavailable`].
pub async fn append_record<T: Serialize>(
    storage: &dyn Storage,
    user_id: i64,
    resource: &str,
    record: &T,
) -> Result<(), ApiError> {
    let value = serde_json::to_value(record).map_err(anyhow::Error::from)?;

    if storage.append_one(user_id, resource, value).await {
        Ok(())
    } else {
        Err(ApiError::StorageUnavailable {
            user_id,
            resource: resource.to_string(),
        })
    }
}
