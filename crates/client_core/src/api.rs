//! Remote data access for the pizza API.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::protocol::{CartItem, OrderRequest, PastOrderRow, PizzaType};
use tracing::{debug, info, warn};

use crate::error::ClientError;

const CATALOG_PATH: &str = "/api/pizzas";
const PAST_ORDERS_PATH: &str = "/api/past-orders";
const ORDER_PATH: &str = "/api/order";

/// One best-effort attempt per call: no retries, no timeout, no cancellation.
#[async_trait]
pub trait PizzaApi: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<PizzaType>, ClientError>;
    async fn fetch_past_orders(&self, page: u32) -> Result<Vec<PastOrderRow>, ClientError>;
    async fn submit_order(&self, cart: &[CartItem]) -> Result<(), ClientError>;
}

pub struct HttpPizzaApi {
    http: Client,
    base_url: String,
}

impl HttpPizzaApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let endpoint = self.endpoint(path);
        let response = self
            .http
            .get(&endpoint)
            .query(query)
            .send()
            .await
            .map_err(|e| ClientError::network(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::network(&endpoint, e))?;
        serde_json::from_slice(&body).map_err(|e| ClientError::parse(&endpoint, e))
    }
}

#[async_trait]
impl PizzaApi for HttpPizzaApi {
    async fn fetch_catalog(&self) -> Result<Vec<PizzaType>, ClientError> {
        let pizzas: Vec<PizzaType> = self.get_json(CATALOG_PATH, &[]).await.map_err(|err| {
            warn!(error = %err, "catalog: fetch failed");
            err
        })?;
        info!(pizzas = pizzas.len(), "catalog: fetched");
        Ok(pizzas)
    }

    async fn fetch_past_orders(&self, page: u32) -> Result<Vec<PastOrderRow>, ClientError> {
        let rows: Vec<PastOrderRow> = self
            .get_json(PAST_ORDERS_PATH, &[("page", page.to_string())])
            .await
            .map_err(|err| {
                warn!(page, error = %err, "past orders: fetch failed");
                err
            })?;
        info!(page, rows = rows.len(), "past orders: fetched page");
        Ok(rows)
    }

    async fn submit_order(&self, cart: &[CartItem]) -> Result<(), ClientError> {
        let endpoint = self.endpoint(ORDER_PATH);
        let body = OrderRequest {
            cart: cart.to_vec(),
        };
        let response = self
            .http
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(items = cart.len(), error = %e, "order: submit failed");
                ClientError::network(&endpoint, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(items = cart.len(), status = status.as_u16(), "order: rejected");
            return Err(ClientError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        debug!(items = cart.len(), "order: submitted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
