//! Client core for the pizza ordering screens: API access, the shared cart,
//! and the order and past-orders controllers.

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod events;
pub mod money;
pub mod order;
pub mod past_orders;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use api::{HttpPizzaApi, PizzaApi};
pub use cart::{CartEvent, CartStore};
pub use config::{load_settings, Settings};
pub use error::ClientError;
pub use events::{ErrorCategory, ErrorContext, ScreenError};
pub use money::format_usd;
pub use order::{CheckoutPolicy, OrderError, OrderPhase, OrderScreen, ReadyOrder, Selection};
pub use past_orders::{PageStatus, PastOrders, PastOrdersError};
