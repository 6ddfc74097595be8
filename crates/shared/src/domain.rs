use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-assigned order identifier. The API sends integers today; string
/// identifiers are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderId {
    Number(i64),
    Text(String),
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => fmt::Display::fmt(id, f),
            Self::Text(id) => f.pad(id),
        }
    }
}

/// Catalog identifier of a pizza type, e.g. `pepperoni`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PizzaId(pub String);

impl PizzaId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PizzaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PizzaId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PizzaSize {
    S,
    M,
    L,
}

impl PizzaSize {
    pub const ALL: [PizzaSize; 3] = [PizzaSize::S, PizzaSize::M, PizzaSize::L];

    /// Wire code used as key in the catalog `sizes` mapping.
    pub fn code(self) -> &'static str {
        match self {
            PizzaSize::S => "S",
            PizzaSize::M => "M",
            PizzaSize::L => "L",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PizzaSize::S => "Small",
            PizzaSize::M => "Medium",
            PizzaSize::L => "Large",
        }
    }
}

impl fmt::Display for PizzaSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown pizza size '{0}', expected one of S, M, L")]
pub struct ParsePizzaSizeError(pub String);

impl FromStr for PizzaSize {
    type Err = ParsePizzaSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        PizzaSize::ALL
            .into_iter()
            .find(|size| {
                trimmed.eq_ignore_ascii_case(size.code())
                    || trimmed.eq_ignore_ascii_case(size.label())
            })
            .ok_or_else(|| ParsePizzaSizeError(s.to_string()))
    }
}
