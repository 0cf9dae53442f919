//! Schema bundle - versioned snapshot of the entity and association schema.

use super::{EntityDef, RelationDef};
use crate::error::CompileError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A versioned snapshot of the entire schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBundle {
    /// Schema version (monotonically increasing).
    #[serde(default)]
    pub version: u64,
    /// Entity definitions.
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    /// Association definitions.
    #[serde(default)]
    pub relations: Vec<RelationDef>,
}

impl SchemaBundle {
    /// Create an empty schema bundle.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            entities: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Add an entity to the schema.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.push(entity);
        self
    }

    /// Add an association to the schema.
    pub fn with_relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Get the association `name` declared on `entity`.
    pub fn relation(&self, entity: &str, name: &str) -> Option<&RelationDef> {
        self.relations
            .iter()
            .find(|r| r.from_entity == entity && r.name == name)
    }

    /// Get all associations declared on an entity.
    pub fn relations_from(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .iter()
            .filter(|r| r.from_entity == entity)
            .collect()
    }

    /// List all entity names.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    /// Check the schema for inconsistencies the compiler cannot resolve.
    ///
    /// Fails on duplicate entities, attributes or associations, on primary
    /// key columns that are not declared attributes, on associations whose
    /// endpoints or join columns are unknown, and on association names that
    /// collide with an attribute of the same entity.
    pub fn validate(&self) -> Result<(), CompileError> {
        let mut entity_names = HashSet::new();
        for entity in &self.entities {
            if !entity_names.insert(entity.name.as_str()) {
                return Err(invalid(format!("duplicate entity '{}'", entity.name)));
            }

            let mut field_names = HashSet::new();
            for field in &entity.fields {
                if !field_names.insert(field.name.as_str()) {
                    return Err(invalid(format!(
                        "duplicate attribute '{}' on entity '{}'",
                        field.name, entity.name
                    )));
                }
            }

            for key in &entity.primary_key {
                if !entity.has_field(key) {
                    return Err(invalid(format!(
                        "primary key column '{}' is not an attribute of entity '{}'",
                        key, entity.name
                    )));
                }
            }
        }

        let mut association_names = HashSet::new();
        for relation in &self.relations {
            if !association_names.insert((relation.from_entity.as_str(), relation.name.as_str())) {
                return Err(invalid(format!(
                    "duplicate association '{}' on entity '{}'",
                    relation.name, relation.from_entity
                )));
            }

            let from = self.get_entity(&relation.from_entity).ok_or_else(|| {
                invalid(format!(
                    "association '{}' declared on unknown entity '{}'",
                    relation.name, relation.from_entity
                ))
            })?;
            let to = self.get_entity(&relation.to_entity).ok_or_else(|| {
                invalid(format!(
                    "association '{}' on entity '{}' targets unknown entity '{}'",
                    relation.name, relation.from_entity, relation.to_entity
                ))
            })?;

            if from.has_field(&relation.name) {
                return Err(invalid(format!(
                    "association '{}' collides with an attribute of entity '{}'",
                    relation.name, from.name
                )));
            }
            if !from.has_field(&relation.from_field) {
                return Err(invalid(format!(
                    "join column '{}' is not an attribute of entity '{}'",
                    relation.from_field, from.name
                )));
            }
            if !to.has_field(&relation.to_field) {
                return Err(invalid(format!(
                    "join column '{}' is not an attribute of entity '{}'",
                    relation.to_field, to.name
                )));
            }
            if let Some(edge) = &relation.edge_entity {
                if self.get_entity(edge).is_none() {
                    return Err(invalid(format!(
                        "association '{}' uses unknown edge entity '{}'",
                        relation.name, edge
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> CompileError {
    CompileError::InvalidSchema(message)
}
