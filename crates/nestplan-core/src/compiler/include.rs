//! Association planning.

use super::arguments::{extract_arguments, IncludeArgs};
use super::expand::expand_selections;
use super::project::{has_leaf_fields, project_fields};
use super::PlanCompiler;
use crate::catalog::{EntityDef, RelationDef};
use crate::error::CompileError;
use nestplan_proto::{Argument, FieldSelection, PlanNode, RequestContext, Selection};
use tracing::{debug, trace};

/// Prefix of introspection fields the planner ignores.
const META_FIELD_PREFIX: &str = "__";

/// All occurrences of one association in a selection list.
struct AssociationGroup<'f, 'a> {
    name: &'f str,
    relation: &'a RelationDef,
    arguments: &'f [Argument],
    selection: Vec<Selection>,
}

impl<'a> PlanCompiler<'a> {
    /// Build one include node per association selected in `fields`.
    ///
    /// Nodes appear in the order their association was first selected.
    /// Repeated selections of the same association are merged into a single
    /// node.
    pub fn plan_includes(
        &mut self,
        fields: &[FieldSelection],
        context: &RequestContext,
        entity: &'a EntityDef,
    ) -> Result<Vec<PlanNode>, CompileError> {
        self.plan_includes_at(fields, context, entity, 1)
    }

    fn plan_includes_at(
        &mut self,
        fields: &[FieldSelection],
        context: &RequestContext,
        entity: &'a EntityDef,
        depth: usize,
    ) -> Result<Vec<PlanNode>, CompileError> {
        let groups = self.group_associations(fields, entity)?;
        if groups.is_empty() {
            return Ok(vec![]);
        }

        let max = self.config.max_depth;
        if depth > max {
            return Err(CompileError::DepthExceeded { depth, max });
        }

        let mut nodes = Vec::with_capacity(groups.len());
        for group in groups {
            nodes.push(self.plan_include(group, context, depth)?);
        }
        Ok(nodes)
    }

    fn plan_include(
        &mut self,
        group: AssociationGroup<'_, 'a>,
        context: &RequestContext,
        depth: usize,
    ) -> Result<PlanNode, CompileError> {
        let target = self.entity(&group.relation.to_entity)?;
        let arguments = extract_arguments(group.arguments, &context.variables);
        let args = IncludeArgs::from_arguments(group.name, arguments)?;

        let fields = expand_selections(&group.selection, &context.fragments)?;
        let id = self.next_id();
        let mut node = PlanNode::include(id, group.name, &target.name);
        if has_leaf_fields(&fields) {
            node.attributes = project_fields(&fields, target);
        }
        node.children = self.plan_includes_at(&fields, context, target, depth + 1)?;

        self.bind_filter_joins(args.filter.as_ref(), &mut node.children, target)?;
        node.order = self.compile_order(&args.order_by, &mut node.children, target)?;
        node.separate = args.needs_separate_query();
        node.required = args.required;
        node.filter = args.filter;
        node.limit = args.limit;

        trace!(
            id = %id,
            association = %group.name,
            entity = %target.name,
            required = node.required,
            separate = node.separate,
            "Planned include"
        );
        Ok(node)
    }

    /// Collect the association fields of `fields`, merging repeats.
    fn group_associations<'f>(
        &self,
        fields: &'f [FieldSelection],
        entity: &'a EntityDef,
    ) -> Result<Vec<AssociationGroup<'f, 'a>>, CompileError> {
        let mut groups: Vec<AssociationGroup<'f, 'a>> = Vec::new();

        for field in fields {
            let name = field.name.as_str();
            if name.starts_with(META_FIELD_PREFIX) || entity.has_field(name) {
                continue;
            }
            let relation = self
                .schema
                .relation(&entity.name, name)
                .ok_or_else(|| CompileError::unsupported_field(&entity.name, name))?;

            match groups.iter_mut().find(|g| g.name == name) {
                Some(group) => {
                    debug!(
                        entity = %entity.name,
                        association = %name,
                        "Merging repeated association selection"
                    );
                    if !field.arguments.is_empty() {
                        if group.arguments.is_empty() {
                            group.arguments = &field.arguments;
                        } else if group.arguments != field.arguments.as_slice() {
                            return Err(CompileError::ConflictingArguments {
                                entity: entity.name.clone(),
                                field: name.to_string(),
                            });
                        }
                    }
                    group.selection.extend_from_slice(field.children());
                }
                None => groups.push(AssociationGroup {
                    name,
                    relation,
                    arguments: &field.arguments,
                    selection: field.children().to_vec(),
                }),
            }
        }

        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::fixtures;
    use crate::config::CompilerConfig;
    use nestplan_proto::{ArgValue, NodeId, OrderDirection, OrderInstruction};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn plan(
        schema: &crate::catalog::SchemaBundle,
        entity: &str,
        context: &RequestContext,
    ) -> Result<Vec<PlanNode>, CompileError> {
        let mut compiler = PlanCompiler::new(schema);
        let entity = schema.get_entity(entity).unwrap();
        let fields = expand_selections(&context.selection, &context.fragments)?;
        compiler.plan_includes(&fields, context, entity)
    }

    #[test]
    fn test_attributes_and_meta_fields_are_skipped() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![
            Selection::field("__typename"),
            Selection::field("name"),
        ]);

        assert!(plan(&schema, "Person", &context).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_field() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::field("nickname")]);

        let err = plan(&schema, "Person", &context).unwrap_err();
        assert_eq!(err, CompileError::unsupported_field("Person", "nickname"));
        assert_eq!(
            err.to_string(),
            "field 'nickname' not supported on entity 'Person'"
        );
    }

    #[test]
    fn test_include_with_nested_selection() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::object(
            "customer",
            vec![
                Selection::field("name"),
                Selection::object("region", vec![Selection::field("code")]),
            ],
        )]);

        let nodes = plan(&schema, "Order", &context).unwrap();
        assert_eq!(
            nodes,
            vec![PlanNode::include(NodeId(0), "customer", "Customer")
                .with_attributes(vec!["id".into(), "name".into()])
                .with_child(
                    PlanNode::include(NodeId(1), "region", "Region")
                        .with_attributes(vec!["id".into(), "code".into()])
                )]
        );
    }

    #[test]
    fn test_include_without_leaf_fields_projects_nothing() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::object(
            "customer",
            vec![Selection::object("region", vec![Selection::field("code")])],
        )]);

        let nodes = plan(&schema, "Order", &context).unwrap();
        assert!(nodes[0].is_join_only());
        assert_eq!(nodes[0].children[0].attributes, vec!["id", "code"]);
    }

    #[test]
    fn test_include_arguments() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::Field(
            FieldSelection::new("lines")
                .with_argument("required", true)
                .with_argument("limit", ArgValue::variable("n"))
                .with_argument(
                    "orderBy",
                    vec![ArgValue::List(vec!["quantity".into(), ArgValue::Enum("DESC".into())])],
                )
                .with_argument("where", ArgValue::object([("sku", ArgValue::from("A-1"))]))
                .with_selection(vec![Selection::field("sku")]),
        )])
        .with_variable("n", json!(5));

        let nodes = plan(&schema, "Order", &context).unwrap();
        let lines = &nodes[0];
        assert!(lines.required);
        assert!(lines.separate);
        assert_eq!(lines.limit, Some(5));
        assert_eq!(
            lines.order,
            vec![OrderInstruction::column("quantity", OrderDirection::Desc)]
        );
        assert_eq!(lines.filter.as_ref().map(|f| f.expression()), Some(&json!({ "sku": "A-1" })));
    }

    #[test]
    fn test_unbound_limit_variable_leaves_node_joined() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::Field(
            FieldSelection::new("lines")
                .with_argument("limit", ArgValue::variable("n"))
                .with_selection(vec![Selection::field("sku")]),
        )]);

        let nodes = plan(&schema, "Order", &context).unwrap();
        assert_eq!(nodes[0].limit, None);
        assert!(!nodes[0].separate);
        assert!(!nodes[0].required);
    }

    #[test]
    fn test_nested_filter_binds_against_own_children() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::Field(
            FieldSelection::new("orders")
                .with_argument(
                    "where",
                    ArgValue::object([("$lines.sku$", ArgValue::from("A-1"))]),
                )
                .with_selection(vec![Selection::field("total")]),
        )]);

        let nodes = plan(&schema, "Customer", &context).unwrap();
        let orders = &nodes[0];
        assert_eq!(orders.children.len(), 1);
        let lines = &orders.children[0];
        assert_eq!(lines.alias.as_deref(), Some("lines"));
        assert_eq!(lines.attributes, vec!["id"]);
        assert!(!lines.separate);
    }

    #[test]
    fn test_nested_fragments_are_expanded() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::object(
            "customer",
            vec![Selection::spread("CustomerFields")],
        )])
        .with_fragment(
            "CustomerFields",
            vec![
                Selection::field("name"),
                Selection::object("region", vec![Selection::field("name")]),
            ],
        );

        let nodes = plan(&schema, "Order", &context).unwrap();
        assert_eq!(nodes[0].attributes, vec!["id", "name"]);
        assert_eq!(nodes[0].children[0].alias.as_deref(), Some("region"));
    }

    #[test]
    fn test_repeated_association_is_merged() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![
            Selection::object("customer", vec![Selection::field("name")]),
            Selection::object("lines", vec![Selection::field("sku")]),
            Selection::Field(
                FieldSelection::new("customer")
                    .with_argument("required", true)
                    .with_selection(vec![Selection::object(
                        "region",
                        vec![Selection::field("code")],
                    )]),
            ),
        ]);

        let nodes = plan(&schema, "Order", &context).unwrap();
        let aliases: Vec<_> = nodes.iter().map(|n| n.alias.as_deref()).collect();
        assert_eq!(aliases, vec![Some("customer"), Some("lines")]);
        assert!(nodes[0].required);
        assert_eq!(nodes[0].attributes, vec!["id", "name"]);
        assert_eq!(nodes[0].children[0].alias.as_deref(), Some("region"));
    }

    #[test]
    fn test_conflicting_arguments() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![
            Selection::Field(FieldSelection::new("lines").with_argument("limit", 1)),
            Selection::Field(FieldSelection::new("lines").with_argument("limit", 2)),
        ]);

        let err = plan(&schema, "Order", &context).unwrap_err();
        assert_eq!(
            err,
            CompileError::ConflictingArguments {
                entity: "Order".into(),
                field: "lines".into()
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let schema = fixtures::schema();
        let context = RequestContext::new(vec![Selection::object(
            "bestFriend",
            vec![Selection::object(
                "bestFriend",
                vec![Selection::object("bestFriend", vec![Selection::field("name")])],
            )],
        )]);
        let person = schema.get_entity("Person").unwrap();
        let fields = expand_selections(&context.selection, &context.fragments).unwrap();

        let mut compiler =
            PlanCompiler::new(&schema).with_config(CompilerConfig::new().with_max_depth(2));
        let err = compiler
            .plan_includes(&fields, &context, person)
            .unwrap_err();
        assert_eq!(err, CompileError::DepthExceeded { depth: 3, max: 2 });

        let mut compiler =
            PlanCompiler::new(&schema).with_config(CompilerConfig::new().with_max_depth(3));
        let nodes = compiler.plan_includes(&fields, &context, person).unwrap();
        assert_eq!(nodes[0].depth(), 3);
    }
}
