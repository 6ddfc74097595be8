//! Paginated past-orders viewer.

use std::{collections::HashMap, sync::Arc, time::Duration};

use shared::protocol::PastOrderRow;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    api::PizzaApi,
    error::ClientError,
    events::{ErrorContext, ScreenError},
};

/// Rows per page served by the endpoint. A shorter page is the last one.
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);
pub const TABLE_HEADERS: [&str; 3] = ["Order ID", "Order Date", "Order Time"];

#[derive(Debug, Error)]
pub enum PastOrdersError {
    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageStatus {
    Loading,
    Loaded(Vec<PastOrderRow>),
    Failed(ScreenError),
}

#[derive(Debug)]
#[must_use]
pub struct PageTicket {
    page: u32,
    generation: u64,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

struct CachedPage {
    rows: Vec<PastOrderRow>,
    fetched_at: Instant,
}

pub struct PastOrders {
    api: Arc<dyn PizzaApi>,
    page: u32,
    page_size: usize,
    stale_after: Duration,
    status: PageStatus,
    cache: HashMap<u32, CachedPage>,
    generation: u64,
}

impl PastOrders {
    pub fn new(api: Arc<dyn PizzaApi>) -> Self {
        Self {
            api,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            stale_after: DEFAULT_STALE_AFTER,
            status: PageStatus::Loading,
            cache: HashMap::new(),
            generation: 0,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, PageStatus::Loading)
    }

    pub fn rows(&self) -> Option<&[PastOrderRow]> {
        match &self.status {
            PageStatus::Loaded(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1 && !self.is_loading()
    }

    /// Only a full page can have a successor; the endpoint sends no total.
    pub fn has_next(&self) -> bool {
        self.page.checked_add(1).is_some()
            && self.rows().is_some_and(|rows| rows.len() >= self.page_size)
    }

    /// Switches to `page`. Returns a ticket when a fetch is needed, or `None`
    /// when a fresh cached copy was shown instead.
    pub fn set_page(&mut self, page: u32) -> Result<Option<PageTicket>, PastOrdersError> {
        if page == 0 {
            return Err(PastOrdersError::InvalidPage(page));
        }

        self.page = page;
        self.generation += 1;

        if let Some(cached) = self.cache.get(&page) {
            if cached.fetched_at.elapsed() < self.stale_after {
                debug!(page, rows = cached.rows.len(), "past orders: serving cached page");
                self.status = PageStatus::Loaded(cached.rows.clone());
                return Ok(None);
            }
            self.cache.remove(&page);
            debug!(page, "past orders: evicted stale cached page");
        }

        self.status = PageStatus::Loading;
        Ok(Some(PageTicket {
            page,
            generation: self.generation,
        }))
    }

    /// Applies a page response. Returns `false` when it was superseded by a
    /// later `set_page` and has been dropped.
    pub fn receive_page(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<PastOrderRow>, ClientError>,
    ) -> bool {
        if ticket.generation != self.generation {
            warn!(
                page = ticket.page,
                current_page = self.page,
                "past orders: dropping stale page response"
            );
            return false;
        }

        self.status = match result {
            Ok(rows) => {
                self.cache.insert(
                    ticket.page,
                    CachedPage {
                        rows: rows.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                info!(page = ticket.page, rows = rows.len(), "past orders: page loaded");
                PageStatus::Loaded(rows)
            }
            Err(err) => PageStatus::Failed(ScreenError::from_client_error(
                ErrorContext::PastOrders,
                &err,
            )),
        };
        true
    }

    /// Shows `page`, fetching it unless a fresh copy is cached.
    pub async fn show_page(&mut self, page: u32) -> Result<(), PastOrdersError> {
        let Some(ticket) = self.set_page(page)? else {
            return Ok(());
        };
        let result = self.api.fetch_past_orders(page).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|err| err.clone());
        self.receive_page(ticket, result);
        Ok(outcome?)
    }

    /// Loads the current page, e.g. when the screen is first shown.
    pub async fn load(&mut self) -> Result<(), PastOrdersError> {
        self.show_page(self.page).await
    }

    /// Moves forward one page. Returns `false` when Next is disabled.
    pub async fn next(&mut self) -> Result<bool, PastOrdersError> {
        let Some(page) = self.page.checked_add(1).filter(|_| self.has_next()) else {
            return Ok(false);
        };
        self.show_page(page).await?;
        Ok(true)
    }

    /// Moves back one page. Returns `false` when Previous is disabled.
    pub async fn previous(&mut self) -> Result<bool, PastOrdersError> {
        let Some(page) = self.page.checked_sub(1).filter(|_| self.has_previous()) else {
            return Ok(false);
        };
        self.show_page(page).await?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "tests/past_orders_tests.rs"]
mod tests;
