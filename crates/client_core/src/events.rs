//! User-visible error state for the order and past-orders screens.

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Server,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Catalog,
    Checkout,
    PastOrders,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenError {
    category: ErrorCategory,
    context: ErrorContext,
    message: String,
}

impl ScreenError {
    pub fn from_client_error(context: ErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Network { .. } => ErrorCategory::Transport,
            ClientError::Status { .. } => ErrorCategory::Server,
            ClientError::Parse { .. } => ErrorCategory::Malformed,
        };

        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn context(&self) -> ErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short text suitable for showing in place of the screen content.
    pub fn summary(&self) -> String {
        let action = match self.context {
            ErrorContext::Catalog => "Could not load the menu",
            ErrorContext::Checkout => "Could not place the order",
            ErrorContext::PastOrders => "Could not load past orders",
        };
        let hint = match self.category {
            ErrorCategory::Transport => "server unreachable; check the API URL and retry",
            ErrorCategory::Server => "the server rejected the request; retry later",
            ErrorCategory::Malformed => "the server sent an unexpected response",
        };
        format!("{action}: {hint}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorizes_client_errors() {
        let err = ScreenError::from_client_error(
            ErrorContext::Checkout,
            &ClientError::network("http://x/api/order", "connection refused"),
        );
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.context(), ErrorContext::Checkout);
        assert!(err.message().contains("connection refused"));
        assert_eq!(
            err.summary(),
            "Could not place the order: server unreachable; check the API URL and retry."
        );

        let err = ScreenError::from_client_error(
            ErrorContext::PastOrders,
            &ClientError::Status {
                endpoint: "http://x/api/past-orders".to_string(),
                status: 503,
            },
        );
        assert_eq!(err.category(), ErrorCategory::Server);
        assert!(err.message().contains("503"));

        let err = ScreenError::from_client_error(
            ErrorContext::Catalog,
            &ClientError::parse("http://x/api/pizzas", "expected value at line 1"),
        );
        assert_eq!(err.category(), ErrorCategory::Malformed);
    }
}
