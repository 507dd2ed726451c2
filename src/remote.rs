use async_trait::async_trait;
use serde_json::Value;

use crate::config::RemoteConfig;
use crate::storage::{Storage, object_from_document, records_from_document};

/// Remote object-storage variant: a single bucket holding one object per
/// `(user, resource)` pair, addressed as `user_<id>/<resource>` and exchanged
/// as JSON over the bucket's HTTP object API.
///
/// Download failures of any kind (missing object, bad status, network error,
/// decode error) degrade to an empty result; upload failures are logged and
/// reported as `false`.
pub struct RemoteStorage {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
}

impl RemoteStorage {
    pub fn new(config: RemoteConfig) -> Self {
        RemoteStorage {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            bucket: config.bucket,
        }
    }

    fn object_url(&self, user_id: i64, resource: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/user_{}/{}",
            self.base_url, self.bucket, user_id, resource
        )
    }

    async fn download_document(&self, user_id: i64, resource: &str) -> Option<Value> {
        let response = match self
            .client
            .get(self.object_url(user_id, resource))
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(user_id, resource, error = %err, "object download failed, loading as empty");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!(user_id, resource, status = %response.status(), "object not available");
            return None;
        }

        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(user_id, resource, error = %err, "object decode failed, loading as empty");
                None
            }
        }
    }

    async fn upload_document(&self, user_id: i64, resource: &str, document: &Value) -> bool {
        let response = self
            .client
            .post(self.object_url(user_id, resource))
            .bearer_auth(&self.api_key)
            .header("x-upsert", "true")
            .json(document)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::error!(user_id, resource, status = %response.status(), "object upload rejected");
                false
            }
            Err(err) => {
                tracing::error!(user_id, resource, error = %err, "object upload failed");
                false
            }
        }
    }
}

#[async_trait]
impl Storage for RemoteStorage {
    async fn load(&self, user_id: i64, resource: &str) -> Vec<Value> {
        records_from_document(self.download_document(user_id, resource).await)
    }

    async fn replace_all(&self, user_id: i64, resource: &str, records: &[Value]) -> bool {
        self.upload_document(user_id, resource, &Value::Array(records.to_vec()))
            .await
    }

    async fn append_one(&self, user_id: i64, resource: &str, record: Value) -> bool {
        let mut records = self.load(user_id, resource).await;
        records.push(record);
        self.upload_document(user_id, resource, &Value::Array(records))
            .await
    }

    async fn load_object(&self, user_id: i64, resource: &str) -> Option<Value> {
        object_from_document(self.download_document(user_id, resource).await)
    }

    async fn store_object(&self, user_id: i64, resource: &str, object: &Value) -> bool {
        self.upload_document(user_id, resource, object).await
    }
}
