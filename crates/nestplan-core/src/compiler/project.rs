//! Attribute projection.

use crate::catalog::EntityDef;
use nestplan_proto::FieldSelection;

/// Project a flat selection onto an entity's attributes.
///
/// Only leaf fields are candidates. Names that are not attributes of the
/// entity (associations, meta fields such as `__typename`, fields resolved
/// elsewhere) are dropped without error. The result is de-duplicated in
/// first-seen order, and any primary key column the selection omitted is
/// prepended in key order.
pub fn project_fields(fields: &[FieldSelection], entity: &EntityDef) -> Vec<String> {
    let mut projected: Vec<String> = Vec::new();
    for field in fields.iter().filter(|f| f.is_leaf()) {
        if entity.has_field(&field.name) && !projected.contains(&field.name) {
            projected.push(field.name.clone());
        }
    }

    let missing_key: Vec<String> = entity
        .primary_key
        .iter()
        .filter(|column| !projected.contains(column))
        .cloned()
        .collect();
    if !missing_key.is_empty() {
        projected.splice(0..0, missing_key);
    }

    projected
}

/// Check if a selection has at least one leaf field.
pub(crate) fn has_leaf_fields(fields: &[FieldSelection]) -> bool {
    fields.iter().any(FieldSelection::is_leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDef, ScalarType};
    use nestplan_proto::Selection;

    fn person() -> EntityDef {
        EntityDef::new("Person", "id")
            .with_field(FieldDef::new("id", ScalarType::Int64))
            .with_field(FieldDef::new("name", ScalarType::String))
            .with_field(FieldDef::optional("bestFriendId", ScalarType::Int64))
    }

    fn leaves(names: &[&str]) -> Vec<FieldSelection> {
        names.iter().map(|n| FieldSelection::new(*n)).collect()
    }

    #[test]
    fn test_key_is_prepended() {
        let projected = project_fields(&leaves(&["name"]), &person());
        assert_eq!(projected, vec!["id", "name"]);
    }

    #[test]
    fn test_selection_order_is_kept() {
        let projected = project_fields(&leaves(&["name", "id", "bestFriendId"]), &person());
        assert_eq!(projected, vec!["name", "id", "bestFriendId"]);
    }

    #[test]
    fn test_unknown_and_meta_fields_are_dropped() {
        let projected = project_fields(&leaves(&["__typename", "nickname", "name"]), &person());
        assert_eq!(projected, vec!["id", "name"]);
    }

    #[test]
    fn test_duplicates_are_removed() {
        let projected = project_fields(&leaves(&["name", "id", "name"]), &person());
        assert_eq!(projected, vec!["name", "id"]);
    }

    #[test]
    fn test_nested_fields_are_not_candidates() {
        let mut fields = leaves(&["name"]);
        fields.push(
            FieldSelection::new("bestFriendId").with_selection(vec![Selection::field("x")]),
        );

        let projected = project_fields(&fields, &person());
        assert_eq!(projected, vec!["id", "name"]);
    }

    #[test]
    fn test_composite_key() {
        let line = EntityDef::keyless("OrderLine")
            .with_composite_key(["orderId", "lineNo"])
            .with_field(FieldDef::new("orderId", ScalarType::Uuid))
            .with_field(FieldDef::new("lineNo", ScalarType::Int32))
            .with_field(FieldDef::new("sku", ScalarType::String));

        let projected = project_fields(&leaves(&["sku", "lineNo"]), &line);
        assert_eq!(projected, vec!["orderId", "sku", "lineNo"]);
    }

    #[test]
    fn test_keyless_entity() {
        let audit = EntityDef::keyless("AuditRow")
            .with_field(FieldDef::new("message", ScalarType::String));

        assert_eq!(project_fields(&leaves(&["message"]), &audit), vec!["message"]);
        assert!(project_fields(&[], &audit).is_empty());
    }

    #[test]
    fn test_has_leaf_fields() {
        assert!(!has_leaf_fields(&[]));
        assert!(!has_leaf_fields(&[
            FieldSelection::new("friend").with_selection(vec![])
        ]));
        assert!(has_leaf_fields(&leaves(&["__typename"])));
    }
}
