//! Attribute definitions for entities.

use super::types::ScalarType;
use serde::{Deserialize, Serialize};

/// An attribute (column) declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Attribute name.
    pub name: String,
    /// Attribute data type.
    #[serde(rename = "type")]
    pub field_type: ScalarType,
    /// Whether the attribute may be null.
    #[serde(default)]
    pub nullable: bool,
}

impl FieldDef {
    /// Create a non-nullable attribute.
    pub fn new(name: impl Into<String>, field_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
        }
    }

    /// Create a nullable attribute.
    pub fn optional(name: impl Into<String>, field_type: ScalarType) -> Self {
        Self {
            nullable: true,
            ..Self::new(name, field_type)
        }
    }
}
