//! Core type definitions for the catalog.

use serde::{Deserialize, Serialize};

/// Scalar data types an attribute can hold.
///
/// The compiler only reasons about attribute names; types are carried so a
/// schema file describes the same columns the execution engine sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Fixed-precision decimal.
    Decimal,
    /// UTF-8 string.
    String,
    /// Binary data.
    Bytes,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
    /// Structured JSON document.
    Json,
}

impl ScalarType {
    /// Check if values of this type have a total order usable for sorting.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, ScalarType::Bytes | ScalarType::Json)
    }
}
