use thiserror::Error;

/// Failure of a single call to the pizza API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("request to {endpoint} could not complete: {message}")]
    Network { endpoint: String, message: String },
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("{endpoint} returned an unreadable body: {message}")]
    Parse { endpoint: String, message: String },
}

impl ClientError {
    pub fn network(endpoint: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Network {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }

    pub fn parse(endpoint: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            endpoint: endpoint.into(),
            message: err.to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Network { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Parse { endpoint, .. } => endpoint,
        }
    }
}
