//! Qdrant REST client.
//!
//! Talks to a Qdrant instance over plain HTTP: collection bootstrap
//! with a geometry check, batched upserts with `wait=true`, deletes by
//! id list or file filter, and a paged scroll that projects each point
//! down to its identity payload fields.

use crate::core::config::StoreConfig;
use crate::core::error::{BrewsyncError, Result};
use crate::core::store::{IndexPoint, VectorStore};
use crate::core::types::IndexRecord;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const SCROLL_PAGE_SIZE: usize = 1000;

#[derive(Debug)]
pub struct QdrantStore {
    client: reqwest::Client,
    base_url: String,
    collection: String,
    api_key: Option<String>,
    vector_size: usize,
    distance: &'static str,
}

#[derive(Deserialize)]
struct CollectionInfoResponse {
    result: CollectionInfo,
}

#[derive(Deserialize)]
struct CollectionInfo {
    config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
    vectors: VectorParams,
}

#[derive(Deserialize)]
struct VectorParams {
    size: usize,
}

#[derive(Deserialize)]
struct ScrollResponse {
    result: ScrollResult,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<ScrollPoint>,
    #[serde(default)]
    next_page_offset: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct ScrollPoint {
    id: serde_json::Value,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// The identity fields projected out of a stored payload
#[derive(Deserialize)]
struct RecordPayload {
    file_id: String,
    config_id: String,
    content_hash: String,
}

impl QdrantStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let distance = match config.distance.as_str() {
            "cosine" => "Cosine",
            "dot" => "Dot",
            "euclid" => "Euclid",
            other => {
                return Err(BrewsyncError::ConfigError(format!(
                    "Unsupported distance metric '{other}'"
                )))
            }
        };
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            api_key: config.api_key.clone(),
            vector_size: config.vector_size,
            distance,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/collections/{}{}", self.base_url, self.collection, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("api-key", key),
            None => request,
        }
    }

    /// Map a non-success response to a store error. Rate limits and
    /// server-side failures are retryable; other rejections are not.
    async fn check_status(response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let retryable = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
        let body = response.text().await.unwrap_or_default();
        Err(BrewsyncError::VectorStore {
            message: format!("{action} failed with {status}: {}", body.trim()),
            retryable,
        })
    }

    async fn create_collection(&self) -> Result<()> {
        let body = json!({
            "vectors": {
                "size": self.vector_size,
                "distance": self.distance,
            }
        });
        let response = self
            .apply_auth(self.client.put(self.url("")))
            .json(&body)
            .send()
            .await?;
        // Another writer may have created it between our GET and PUT
        if response.status() == StatusCode::CONFLICT {
            return Ok(());
        }
        Self::check_status(response, "Collection create").await?;
        info!(
            collection = %self.collection,
            vector_size = self.vector_size,
            distance = self.distance,
            "Created collection"
        );
        Ok(())
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn ensure_collection(&self) -> Result<()> {
        let response = self
            .apply_auth(self.client.get(self.url("")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return self.create_collection().await;
        }
        let response = Self::check_status(response, "Collection lookup").await?;
        let info: CollectionInfoResponse = response.json().await?;
        let existing = info.result.config.params.vectors.size;
        if existing != self.vector_size {
            return Err(BrewsyncError::ConfigError(format!(
                "Collection '{}' has vector size {} but configuration expects {}",
                self.collection, existing, self.vector_size
            )));
        }
        debug!(collection = %self.collection, vector_size = existing, "Collection ready");
        Ok(())
    }

    async fn upsert(&self, points: &[IndexPoint]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let body = json!({ "points": points });
        let response = self
            .apply_auth(self.client.put(self.url("/points")))
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await?;
        Self::check_status(response, "Upsert").await?;
        debug!(collection = %self.collection, points = points.len(), "Upserted points");
        Ok(())
    }

    async fn delete_points(&self, point_ids: &[String]) -> Result<()> {
        if point_ids.is_empty() {
            return Ok(());
        }
        let body = json!({ "points": point_ids });
        let response = self
            .apply_auth(self.client.post(self.url("/points/delete")))
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await?;
        Self::check_status(response, "Delete").await?;
        debug!(collection = %self.collection, points = point_ids.len(), "Deleted points");
        Ok(())
    }

    async fn delete_by_file(&self, file_id: &str) -> Result<()> {
        let body = json!({
            "filter": {
                "must": [
                    { "key": "file_id", "match": { "value": file_id } }
                ]
            }
        });
        let response = self
            .apply_auth(self.client.post(self.url("/points/delete")))
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await?;
        Self::check_status(response, "Delete by file").await?;
        debug!(collection = %self.collection, file_id, "Deleted file points");
        Ok(())
    }

    async fn list_records(&self) -> Result<Vec<IndexRecord>> {
        let mut records = Vec::new();
        let mut offset: Option<serde_json::Value> = None;
        loop {
            let mut body = json!({
                "limit": SCROLL_PAGE_SIZE,
                "with_payload": ["file_id", "config_id", "content_hash"],
                "with_vector": false,
            });
            if let Some(cursor) = &offset {
                body["offset"] = cursor.clone();
            }
            let response = self
                .apply_auth(self.client.post(self.url("/points/scroll")))
                .json(&body)
                .send()
                .await?;
            let response = Self::check_status(response, "Scroll").await?;
            let page: ScrollResponse = response.json().await?;

            for point in page.result.points {
                let point_id = match point.id.as_str() {
                    Some(s) => s.to_string(),
                    None => point.id.to_string(),
                };
                let payload = point.payload.unwrap_or(serde_json::Value::Null);
                match serde_json::from_value::<RecordPayload>(payload) {
                    Ok(identity) => records.push(IndexRecord {
                        point_id,
                        file_id: identity.file_id,
                        config_id: identity.config_id,
                        content_hash: identity.content_hash,
                    }),
                    Err(e) => {
                        warn!(point_id = %point_id, error = %e, "Skipping point with unreadable payload");
                    }
                }
            }

            match page.result.next_page_offset {
                Some(cursor) => offset = Some(cursor),
                None => break,
            }
        }
        debug!(collection = %self.collection, records = records.len(), "Scrolled collection");
        Ok(records)
    }
}
