//! Association definitions between entities.

use serde::{Deserialize, Serialize};

/// Cardinality of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One-to-one (unique foreign key).
    OneToOne,
    /// One-to-many (foreign key on the target).
    OneToMany,
    /// Many-to-one (foreign key on the source).
    ManyToOne,
    /// Many-to-many through an edge entity.
    ManyToMany,
}

/// An association declared on `from_entity` under `name`.
///
/// Names are scoped to the source entity, so two entities may both declare
/// an `author` association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    /// Association name as used in selections and qualified paths.
    pub name: String,
    /// Source entity name.
    pub from_entity: String,
    /// Target entity name.
    pub to_entity: String,
    /// Association cardinality.
    pub cardinality: Cardinality,
    /// Join column on the source entity.
    pub from_field: String,
    /// Join column on the target entity.
    pub to_field: String,
    /// Edge entity for many-to-many associations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_entity: Option<String>,
}

impl RelationDef {
    fn with_cardinality(
        cardinality: Cardinality,
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            cardinality,
            from_field: from_field.into(),
            to_field: to_field.into(),
            edge_entity: None,
        }
    }

    /// Create a one-to-many association.
    pub fn one_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self::with_cardinality(
            Cardinality::OneToMany,
            name,
            from_entity,
            from_field,
            to_entity,
            to_field,
        )
    }

    /// Create a many-to-one (belongs-to) association.
    pub fn many_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        from_field: impl Into<String>,
        to_entity: impl Into<String>,
        to_field: impl Into<String>,
    ) -> Self {
        Self::with_cardinality(
            Cardinality::ManyToOne,
            name,
            from_entity,
            from_field,
            to_entity,
            to_field,
        )
    }

    /// Get the inverse association (swapping source and target).
    pub fn inverse(&self, name: impl Into<String>) -> Self {
        let cardinality = match self.cardinality {
            Cardinality::OneToMany => Cardinality::ManyToOne,
            Cardinality::ManyToOne => Cardinality::OneToMany,
            other => other,
        };
        Self {
            name: name.into(),
            from_entity: self.to_entity.clone(),
            to_entity: self.from_entity.clone(),
            cardinality,
            from_field: self.to_field.clone(),
            to_field: self.from_field.clone(),
            edge_entity: self.edge_entity.clone(),
        }
    }

    /// Check if the association can yield more than one target row per source.
    pub fn is_to_many(&self) -> bool {
        matches!(self.cardinality, Cardinality::OneToMany | Cardinality::ManyToMany)
    }
}
