//! Entity definitions.

use super::field::FieldDef;
use serde::{Deserialize, Serialize};

/// An entity definition (table schema).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name (unique within schema).
    pub name: String,
    /// Primary key columns in declaration order. Empty when the entity has
    /// no key.
    #[serde(default)]
    pub primary_key: Vec<String>,
    /// Attribute definitions.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create an entity with a single-column primary key.
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: vec![primary_key.into()],
            fields: Vec::new(),
        }
    }

    /// Create an entity without a primary key.
    pub fn keyless(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Replace the primary key with a composite key.
    pub fn with_composite_key<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Add an attribute to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple attributes.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Get an attribute by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if an attribute is declared.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Check if the entity declares a primary key.
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ScalarType;

    #[test]
    fn test_entity_builder() {
        let entity = EntityDef::new("User", "id")
            .with_field(FieldDef::new("id", ScalarType::Uuid))
            .with_field(FieldDef::new("name", ScalarType::String))
            .with_field(FieldDef::optional("email", ScalarType::String));

        assert_eq!(entity.name, "User");
        assert_eq!(entity.primary_key, vec!["id"]);
        assert_eq!(entity.fields.len(), 3);
        assert!(entity.has_field("email"));
        assert!(!entity.has_field("nonexistent"));
    }

    #[test]
    fn test_keys() {
        let line = EntityDef::keyless("OrderLine")
            .with_composite_key(["orderId", "lineNo"])
            .with_field(FieldDef::new("orderId", ScalarType::Uuid))
            .with_field(FieldDef::new("lineNo", ScalarType::Int32));
        assert_eq!(line.primary_key, vec!["orderId", "lineNo"]);
        assert!(line.has_primary_key());

        assert!(!EntityDef::keyless("AuditRow").has_primary_key());
    }
}
