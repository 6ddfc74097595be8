use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::{
    domain::{OrderId, PizzaId},
    protocol::{CartItem, PastOrderRow, PizzaType},
};
use tokio::sync::Mutex;

use crate::{api::PizzaApi, error::ClientError};

/// Scripted stand-in for the HTTP API.
#[derive(Default)]
pub(crate) struct FakePizzaApi {
    catalog_responses: Mutex<VecDeque<Result<Vec<PizzaType>, ClientError>>>,
    pages: Mutex<HashMap<u32, Result<Vec<PastOrderRow>, ClientError>>>,
    pub(crate) submit_failure: Mutex<Option<ClientError>>,
    pub(crate) submitted: Mutex<Vec<Vec<CartItem>>>,
    pub(crate) page_requests: Mutex<Vec<u32>>,
}

impl FakePizzaApi {
    pub(crate) fn with_catalog(pizzas: Vec<PizzaType>) -> Self {
        let api = Self::default();
        api.catalog_responses.try_lock().expect("fresh lock").push_back(Ok(pizzas));
        api
    }

    pub(crate) async fn push_catalog(&self, response: Result<Vec<PizzaType>, ClientError>) {
        self.catalog_responses.lock().await.push_back(response);
    }

    pub(crate) async fn set_page(&self, page: u32, response: Result<Vec<PastOrderRow>, ClientError>) {
        self.pages.lock().await.insert(page, response);
    }

    pub(crate) async fn fail_submissions(&self, err: ClientError) {
        *self.submit_failure.lock().await = Some(err);
    }
}

#[async_trait]
impl PizzaApi for FakePizzaApi {
    async fn fetch_catalog(&self) -> Result<Vec<PizzaType>, ClientError> {
        self.catalog_responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::network("fake:/api/pizzas", "no scripted catalog")))
    }

    async fn fetch_past_orders(&self, page: u32) -> Result<Vec<PastOrderRow>, ClientError> {
        self.page_requests.lock().await.push(page);
        self.pages
            .lock()
            .await
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn submit_order(&self, cart: &[CartItem]) -> Result<(), ClientError> {
        self.submitted.lock().await.push(cart.to_vec());
        match self.submit_failure.lock().await.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub(crate) fn pizza(id: &str, name: &str, prices: &[(&str, i64)]) -> PizzaType {
    PizzaType {
        id: PizzaId::new(id),
        name: name.to_string(),
        description: format!("{name} pizza"),
        image: format!("/public/pizzas/{id}.webp"),
        sizes: Some(
            prices
                .iter()
                .map(|(code, price)| (code.to_string(), Decimal::from(*price)))
                .collect(),
        ),
    }
}

pub(crate) fn rows(first_id: i64, count: usize) -> Vec<PastOrderRow> {
    (0..count as i64)
        .map(|offset| PastOrderRow {
            order_id: OrderId::from(first_id + offset),
            date: "2024-03-01".to_string(),
            time: format!("18:{:02}:00", offset % 60),
        })
        .collect()
}
