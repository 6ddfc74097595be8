//! Order-creation screen: catalog loading, form selection, cart submission.

use std::{str::FromStr, sync::Arc};

use shared::{
    domain::{PizzaId, PizzaSize},
    protocol::{CartItem, PizzaType},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    api::PizzaApi,
    cart::CartStore,
    error::ClientError,
    events::{ErrorContext, ScreenError},
    money::format_usd,
};

pub const DEFAULT_PIZZA: &str = "pepperoni";
pub const DEFAULT_SIZE: PizzaSize = PizzaSize::M;

/// What happens to the cart when order submission fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPolicy {
    /// Clear after every attempt, successful or not.
    #[default]
    AlwaysClear,
    /// Keep the cart when the submission fails.
    ClearOnSuccess,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown checkout policy '{0}', expected always_clear or clear_on_success")]
pub struct ParseCheckoutPolicyError(String);

impl FromStr for CheckoutPolicy {
    type Err = ParseCheckoutPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "always_clear" => Ok(Self::AlwaysClear),
            "clear_on_success" => Ok(Self::ClearOnSuccess),
            _ => Err(ParseCheckoutPolicyError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("the menu has not loaded yet")]
    NotReady,
    #[error("pizza '{0}' is not on the menu")]
    UnknownPizza(PizzaId),
    #[error("an order is already being submitted")]
    CheckoutInProgress,
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub pizza_type: PizzaId,
    pub size: PizzaSize,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            pizza_type: PizzaId::new(DEFAULT_PIZZA),
            size: DEFAULT_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    pizzas: Vec<PizzaType>,
    submitting: bool,
    checkout_error: Option<ScreenError>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderPhase {
    Loading,
    Ready(LoadedCatalog),
    Failed(ScreenError),
}

/// Handle for one in-flight catalog request.
#[derive(Debug)]
#[must_use]
pub struct CatalogTicket {
    generation: u64,
}

/// Handle for one in-flight order submission; carries the submitted snapshot.
#[derive(Debug)]
#[must_use]
pub struct CheckoutTicket {
    items: Vec<CartItem>,
}

impl CheckoutTicket {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }
}

/// Read access to the form once the catalog has loaded. Price derivation only
/// exists here, so it cannot run against a missing catalog.
#[derive(Debug, Clone, Copy)]
pub struct ReadyOrder<'a> {
    catalog: &'a LoadedCatalog,
    selection: &'a Selection,
}

impl<'a> ReadyOrder<'a> {
    pub fn pizzas(&self) -> &'a [PizzaType] {
        &self.catalog.pizzas
    }

    pub fn selection(&self) -> &'a Selection {
        self.selection
    }

    pub fn selected_pizza(&self) -> Option<&'a PizzaType> {
        self.catalog
            .pizzas
            .iter()
            .find(|pizza| pizza.id == self.selection.pizza_type)
    }

    /// Selected type and size priced as USD; empty when there is no pricing.
    pub fn price(&self) -> String {
        self.selected_pizza()
            .and_then(|pizza| pizza.price_for(self.selection.size))
            .map(format_usd)
            .unwrap_or_default()
    }

    pub fn is_submitting(&self) -> bool {
        self.catalog.submitting
    }

    pub fn checkout_error(&self) -> Option<&'a ScreenError> {
        self.catalog.checkout_error.as_ref()
    }
}

pub struct OrderScreen {
    api: Arc<dyn PizzaApi>,
    cart: CartStore,
    checkout_policy: CheckoutPolicy,
    selection: Selection,
    phase: OrderPhase,
    generation: u64,
}

impl OrderScreen {
    pub fn new(api: Arc<dyn PizzaApi>, cart: CartStore) -> Self {
        Self {
            api,
            cart,
            checkout_policy: CheckoutPolicy::default(),
            selection: Selection::default(),
            phase: OrderPhase::Loading,
            generation: 0,
        }
    }

    pub fn with_checkout_policy(mut self, checkout_policy: CheckoutPolicy) -> Self {
        self.checkout_policy = checkout_policy;
        self
    }

    pub fn phase(&self) -> &OrderPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, OrderPhase::Loading)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn ready(&self) -> Option<ReadyOrder<'_>> {
        match &self.phase {
            OrderPhase::Ready(catalog) => Some(ReadyOrder {
                catalog,
                selection: &self.selection,
            }),
            _ => None,
        }
    }

    pub fn select_type(&mut self, pizza_type: impl Into<PizzaId>) {
        self.selection.pizza_type = pizza_type.into();
    }

    pub fn select_size(&mut self, size: PizzaSize) {
        self.selection.size = size;
    }

    /// Enters `Loading`; any earlier outstanding ticket becomes stale.
    pub fn begin_catalog_load(&mut self) -> CatalogTicket {
        self.generation += 1;
        self.phase = OrderPhase::Loading;
        debug!(generation = self.generation, "order: catalog requested");
        CatalogTicket {
            generation: self.generation,
        }
    }

    /// Applies a catalog response. Returns `false` when the response was stale
    /// and has been dropped.
    pub fn receive_catalog(
        &mut self,
        ticket: CatalogTicket,
        result: Result<Vec<PizzaType>, ClientError>,
    ) -> bool {
        if ticket.generation != self.generation {
            warn!(
                stale = ticket.generation,
                current = self.generation,
                "order: dropping stale catalog response"
            );
            return false;
        }

        self.phase = match result {
            Ok(pizzas) => {
                let known = pizzas
                    .iter()
                    .any(|pizza| pizza.id == self.selection.pizza_type);
                if let (false, Some(first)) = (known, pizzas.first()) {
                    self.selection.pizza_type = first.id.clone();
                }
                info!(pizzas = pizzas.len(), "order: catalog ready");
                OrderPhase::Ready(LoadedCatalog {
                    pizzas,
                    submitting: false,
                    checkout_error: None,
                })
            }
            Err(err) => OrderPhase::Failed(ScreenError::from_client_error(
                ErrorContext::Catalog,
                &err,
            )),
        };
        true
    }

    /// Fetches the catalog and applies it. On failure the screen moves to
    /// `Failed` and the error is also returned.
    pub async fn load_catalog(&mut self) -> Result<(), ClientError> {
        let ticket = self.begin_catalog_load();
        let result = self.api.fetch_catalog().await;
        let outcome = result.as_ref().map(|_| ()).map_err(|err| err.clone());
        self.receive_catalog(ticket, result);
        outcome
    }

    /// Appends the current selection to the cart. The selection is kept, so
    /// submitting again adds an identical item. Rejected while a checkout is
    /// in flight, because finishing it clears the cart.
    pub async fn add_to_cart(&mut self) -> Result<CartItem, OrderError> {
        let ready = self.ready().ok_or(OrderError::NotReady)?;
        if ready.is_submitting() {
            return Err(OrderError::CheckoutInProgress);
        }
        let pizza = ready
            .selected_pizza()
            .ok_or_else(|| OrderError::UnknownPizza(self.selection.pizza_type.clone()))?;

        let item = CartItem {
            pizza: pizza.clone(),
            size: self.selection.size,
            price: ready.price(),
        };
        self.cart.append(item.clone()).await;
        Ok(item)
    }

    /// Enters the submitting sub-state and snapshots the cart.
    pub async fn begin_checkout(&mut self) -> Result<CheckoutTicket, OrderError> {
        let OrderPhase::Ready(catalog) = &mut self.phase else {
            return Err(OrderError::NotReady);
        };
        if catalog.submitting {
            return Err(OrderError::CheckoutInProgress);
        }
        catalog.submitting = true;
        catalog.checkout_error = None;

        let items = self.cart.read().await;
        debug!(items = items.len(), "order: checkout started");
        Ok(CheckoutTicket { items })
    }

    /// Leaves the submitting sub-state whatever the outcome, clearing the cart
    /// according to the checkout policy.
    pub async fn finish_checkout(
        &mut self,
        ticket: CheckoutTicket,
        result: Result<(), ClientError>,
    ) -> Result<(), OrderError> {
        let clear = result.is_ok() || self.checkout_policy == CheckoutPolicy::AlwaysClear;
        if clear {
            self.cart.clear().await;
        }

        let checkout_error = result
            .as_ref()
            .err()
            .map(|err| ScreenError::from_client_error(ErrorContext::Checkout, err));
        if let OrderPhase::Ready(catalog) = &mut self.phase {
            catalog.submitting = false;
            catalog.checkout_error = checkout_error;
        }

        match &result {
            Ok(()) => info!(items = ticket.items.len(), "order: checkout complete"),
            Err(err) => warn!(
                items = ticket.items.len(),
                cart_cleared = clear,
                error = %err,
                "order: checkout failed"
            ),
        }
        result.map_err(OrderError::from)
    }

    /// Submits the cart and resets it. See [`CheckoutPolicy`] for failures.
    pub async fn checkout(&mut self) -> Result<(), OrderError> {
        let ticket = self.begin_checkout().await?;
        let result = self.api.submit_order(ticket.items()).await;
        self.finish_checkout(ticket, result).await
    }
}

#[cfg(test)]
#[path = "tests/order_tests.rs"]
mod tests;
