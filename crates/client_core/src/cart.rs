use std::sync::Arc;

use shared::protocol::CartItem;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum CartEvent {
    ItemAdded { position: usize, item: CartItem },
    Cleared { removed: usize },
}

/// Session-lifetime cart shared by the order screen and any cart display.
///
/// Cloning yields another handle onto the same cart. Items keep insertion
/// order and are never deduplicated.
#[derive(Clone)]
pub struct CartStore {
    items: Arc<RwLock<Vec<CartItem>>>,
    events: broadcast::Sender<CartEvent>,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CartStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            events,
        }
    }

    /// Adds `item` at the end and returns its position.
    pub async fn append(&self, item: CartItem) -> usize {
        let mut items = self.items.write().await;
        let position = items.len();
        items.push(item.clone());
        drop(items);

        debug!(position, pizza = %item.pizza.id, size = %item.size, "cart: item added");
        let _ = self.events.send(CartEvent::ItemAdded { position, item });
        position
    }

    /// Empties the cart and returns how many items were dropped.
    pub async fn clear(&self) -> usize {
        let removed = {
            let mut items = self.items.write().await;
            let removed = items.len();
            items.clear();
            removed
        };

        debug!(removed, "cart: cleared");
        let _ = self.events.send(CartEvent::Cleared { removed });
        removed
    }

    pub async fn read(&self) -> Vec<CartItem> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }
}
