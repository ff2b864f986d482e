//! Typed async client, one method per service endpoint.

use crate::types::{
    AgentRecord, AllocParams, OrderRequest, OrderResponse, ProductRecord, StatsResponse,
    WarehouseDescriptor,
};
use scene::{Agent, Product, Warehouse};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Anything that prevented a usable response: connection failure, timeout,
/// non-success status or an undecodable body. All of them mean the same
/// thing to the viewer — no update this cycle.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] reqwest::Error);

/// HTTP client for the allocation service.
pub struct AllocationClient {
    http: reqwest::Client,
    base_url: String,
}

impl AllocationClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    pub async fn warehouse(&self) -> Result<Warehouse, ApiError> {
        let descriptor: WarehouseDescriptor = self.get_json("/api/warehouse").await?;
        Ok(descriptor.into())
    }

    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let records: Vec<ProductRecord> = self.get_json("/api/products").await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn agents(&self) -> Result<Vec<Agent>, ApiError> {
        let records: Vec<AgentRecord> = self.get_json("/api/agents").await?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    pub async fn stats(&self, params: &AllocParams) -> Result<StatsResponse, ApiError> {
        Ok(self
            .http
            .get(self.url("/api/stats"))
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    /// Submits a new order. Application-level rejections arrive as a JSON
    /// body with `ok = false`, so the HTTP status is deliberately not
    /// checked here.
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse, ApiError> {
        Ok(self
            .http
            .post(self.url("/api/orders"))
            .json(order)
            .send()
            .await?
            .json()
            .await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        Ok(self
            .http
            .get(self.url(path))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
