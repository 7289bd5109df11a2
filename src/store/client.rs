//! PocketBase records client.
//!
//! The point collection lives in a remote PocketBase instance. Only the
//! first page is ever read; anything beyond [`PAGE_SIZE`] records is dropped.
//! See: https://pocketbase.io/docs/api-records/

use std::time::Duration;

use super::models::{NewPoint, PointFields, RecordPage, WeatherPoint};
use crate::errors::AppError;

/// Fixed page size for list calls.
pub const PAGE_SIZE: u32 = 200;

/// Client for one PocketBase collection.
#[derive(Debug, Clone)]
pub struct PocketBaseClient {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

impl PocketBaseClient {
    pub fn new(
        base_url: &str,
        collection: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        })
    }

    fn records_url(&self) -> String {
        format!(
            "{}/api/collections/{}/records",
            self.base_url, self.collection
        )
    }

    /// List the first page of points.
    pub async fn list_points(&self) -> Result<Vec<WeatherPoint>, AppError> {
        let response = self
            .client
            .get(self.records_url())
            .query(&[("page", 1), ("perPage", PAGE_SIZE)])
            .send()
            .await
            .map_err(|e| AppError::StoreError(format!("list request failed: {}", e)))?;

        let page: RecordPage = decode(response, "list").await?;

        if page.total_items > page.items.len() as u64 {
            tracing::warn!(
                "Point store holds {} records, only the first {} are loaded",
                page.total_items,
                page.items.len()
            );
        }

        Ok(page.items)
    }

    /// Create a new record; the store assigns its id.
    pub async fn create_point(&self, point: &NewPoint) -> Result<WeatherPoint, AppError> {
        let response = self
            .client
            .post(self.records_url())
            .json(point)
            .send()
            .await
            .map_err(|e| AppError::StoreError(format!("create request failed: {}", e)))?;

        decode(response, "create").await
    }

    /// Update the writable fields of an existing record.
    pub async fn update_point(
        &self,
        id: &str,
        fields: &PointFields,
    ) -> Result<WeatherPoint, AppError> {
        let url = format!("{}/{}", self.records_url(), id);
        let response = self
            .client
            .patch(&url)
            .json(fields)
            .send()
            .await
            .map_err(|e| AppError::StoreError(format!("update of {} failed: {}", id, e)))?;

        decode(response, "update").await
    }

    /// Whether the PocketBase health endpoint answers with a success status.
    pub async fn is_healthy(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                tracing::debug!("Point store health probe failed: {}", e);
                false
            }
        }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    op: &str,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        return Err(AppError::StoreError(format!(
            "{} returned HTTP {}",
            op, status
        )));
    }
    response
        .json()
        .await
        .map_err(|e| AppError::StoreError(format!("{} response parse error: {}", op, e)))
}
