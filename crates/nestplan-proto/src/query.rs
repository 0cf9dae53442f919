//! Top-level request arguments and ordering specifications.

use crate::error::Error;
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Arguments supplied with the root of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestArgs {
    /// Optional filter for the root entity.
    #[serde(default, rename = "where")]
    pub filter: Option<Filter>,
    /// Ordering specification, primary sort key first.
    #[serde(default)]
    pub order_by: Vec<OrderSpec>,
    /// Maximum number of root rows.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of root rows to skip.
    #[serde(default)]
    pub offset: Option<u32>,
}

impl RequestArgs {
    /// Create empty request arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Add an ordering.
    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order_by.push(order);
        self
    }

    /// Set the limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Order specification: a column, or a dotted path through associations
/// ending in a column, plus an explicit direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    /// Column name or dotted path (`customer.region`).
    pub column: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl OrderSpec {
    /// Create an ascending order spec.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Create a descending order spec.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: OrderDirection::Desc,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderDirection {
    /// Ascending order.
    #[serde(alias = "asc", alias = "Asc")]
    Asc,
    /// Descending order.
    #[serde(alias = "desc", alias = "Desc")]
    Desc,
}

impl FromStr for OrderDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(OrderDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(OrderDirection::Desc)
        } else {
            Err(Error::InvalidDirection(s.to_string()))
        }
    }
}

impl std::fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderDirection::Asc => write!(f, "ASC"),
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}
