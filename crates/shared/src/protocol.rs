use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{OrderId, PizzaId, PizzaSize};

/// One entry of the `/api/pizzas` catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PizzaType {
    pub id: PizzaId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Price per size code, read from JSON numbers by their shortest decimal
    /// form. `None` when the server sent no pricing at all.
    #[serde(default)]
    pub sizes: Option<BTreeMap<String, Decimal>>,
}

impl PizzaType {
    pub fn price_for(&self, size: PizzaSize) -> Option<Decimal> {
        self.sizes.as_ref()?.get(size.code()).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub pizza: PizzaType,
    pub size: PizzaSize,
    pub price: String,
}

/// Body of `POST /api/order`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub cart: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastOrderRow {
    pub order_id: OrderId,
    pub date: String,
    pub time: String,
}
