//! Output formatting for plans and schemas.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use nestplan_core::{RelationDef, SchemaBundle};
use nestplan_proto::{OrderInstruction, PlanNode};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Indented tree
    Tree,
    /// One table row per plan node
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Tree => write!(f, "tree"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a compiled plan.
    fn format_plan(&self, plan: &PlanNode) -> String;

    /// Format a validated schema.
    fn format_schema(&self, schema: &SchemaBundle) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Tree => Box::new(TreeFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_plan(&self, plan: &PlanNode) -> String {
        serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_schema(&self, schema: &SchemaBundle) -> String {
        serde_json::json!({
            "version": schema.version,
            "entities": schema.entity_names(),
            "relations": schema.relations.len(),
        })
        .to_string()
    }
}

/// Tree formatter.
pub struct TreeFormatter;

impl Formatter for TreeFormatter {
    fn format_plan(&self, plan: &PlanNode) -> String {
        let mut output = node_label(plan);
        write_children(plan, "", &mut output);
        output
    }

    fn format_schema(&self, schema: &SchemaBundle) -> String {
        let mut output = format!("schema v{}", schema.version);
        let count = schema.entities.len();
        for (i, entity) in schema.entities.iter().enumerate() {
            let last = i + 1 == count;
            output.push_str(&format!(
                "\n{}{} ({})",
                if last { "└── " } else { "├── " },
                entity.name,
                entity.primary_key.join(", ")
            ));
            let relations = schema.relations_from(&entity.name);
            let rcount = relations.len();
            for (j, relation) in relations.into_iter().enumerate() {
                output.push_str(&format!(
                    "\n{}{}{}",
                    if last { "    " } else { "│   " },
                    if j + 1 == rcount { "└── " } else { "├── " },
                    association_label(relation)
                ));
            }
        }
        output
    }
}

/// `name -> Target`, with `[]` marking to-many associations.
fn association_label(relation: &RelationDef) -> String {
    let suffix = if relation.is_to_many() { "[]" } else { "" };
    format!("{} -> {}{}", relation.name, relation.to_entity, suffix)
}

fn write_children(node: &PlanNode, prefix: &str, output: &mut String) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        output.push('\n');
        output.push_str(prefix);
        output.push_str(if last { "└── " } else { "├── " });
        output.push_str(&node_label(child));

        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        write_children(child, &nested, output);
    }
}

fn node_label(node: &PlanNode) -> String {
    let mut label = match &node.alias {
        Some(alias) => format!("{}: {} {}", alias, node.entity, node.id),
        None => format!("{} {}", node.entity, node.id),
    };

    if node.is_join_only() {
        label.push_str(" (join only)");
    } else {
        label.push_str(&format!(" [{}]", node.attributes.join(", ")));
    }
    if node.required {
        label.push_str(" required");
    }
    if node.separate {
        label.push_str(" separate");
    }
    if let Some(filter) = &node.filter {
        label.push_str(&format!(" where {}", filter.expression()));
    }
    if !node.order.is_empty() {
        label.push_str(&format!(" order by {}", format_order(&node.order)));
    }
    if let Some(limit) = node.limit {
        label.push_str(&format!(" limit {}", limit));
    }
    if let Some(offset) = node.offset {
        label.push_str(&format!(" offset {}", offset));
    }
    label
}

fn format_order(order: &[OrderInstruction]) -> String {
    order
        .iter()
        .map(|instruction| {
            let mut path: Vec<String> = instruction.joins.iter().map(|id| id.to_string()).collect();
            path.push(instruction.column.clone());
            format!("{} {}", path.join("."), instruction.direction)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_plan(&self, plan: &PlanNode) -> String {
        let mut table = Table::new();
        table.set_header(vec![
            "Node",
            "Path",
            "Entity",
            "Attributes",
            "Required",
            "Separate",
            "Order",
            "Limit",
        ]);

        let mut rows = 0;
        let mut stack: Vec<(&PlanNode, String)> = vec![(plan, String::new())];
        while let Some((node, path)) = stack.pop() {
            table.add_row(vec![
                Cell::new(node.id),
                Cell::new(if path.is_empty() { "-" } else { path.as_str() }),
                Cell::new(&node.entity),
                Cell::new(node.attributes.join(", ")),
                Cell::new(node.required),
                Cell::new(node.separate),
                Cell::new(format_order(&node.order)),
                Cell::new(node.limit.map(|l| l.to_string()).unwrap_or_default()),
            ]);
            rows += 1;

            for child in node.children.iter().rev() {
                let alias = child.alias.as_deref().unwrap_or_default();
                let child_path = if path.is_empty() {
                    alias.to_string()
                } else {
                    format!("{}.{}", path, alias)
                };
                stack.push((child, child_path));
            }
        }

        format!("{}\n{} node(s)", table, rows)
    }

    fn format_schema(&self, schema: &SchemaBundle) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Entity", "Primary Key", "Attributes", "Associations"]);

        for entity in &schema.entities {
            let associations: Vec<String> = schema
                .relations_from(&entity.name)
                .iter()
                .map(|r| association_label(r))
                .collect();
            table.add_row(vec![
                entity.name.clone(),
                entity.primary_key.join(", "),
                entity.fields.len().to_string(),
                associations.join(", "),
            ]);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nestplan_proto::{NodeId, OrderDirection};
    use pretty_assertions::assert_eq;

    fn sample_plan() -> PlanNode {
        let mut customer = PlanNode::include(NodeId(1), "customer", "Customer")
            .with_attributes(vec!["id".into(), "name".into()])
            .required();
        customer.children.push(
            PlanNode::include(NodeId(2), "region", "Region").with_attributes(vec!["id".into()]),
        );

        let mut root = PlanNode::root(NodeId(0), "Order")
            .with_attributes(vec!["id".into(), "total".into()])
            .with_limit(100)
            .with_child(customer)
            .with_child(PlanNode::include(NodeId(3), "lines", "OrderLine").with_limit(2));
        root.children[1].separate = true;
        root.order = vec![OrderInstruction {
            joins: vec![NodeId(1), NodeId(2)],
            column: "name".into(),
            direction: OrderDirection::Asc,
        }];
        root
    }

    #[test]
    fn test_tree_output() {
        let output = TreeFormatter.format_plan(&sample_plan());
        assert_eq!(
            output,
            "Order #0 [id, total] order by #1.#2.name ASC limit 100\n\
             ├── customer: Customer #1 [id, name] required\n\
             │   └── region: Region #2 [id]\n\
             └── lines: OrderLine #3 (join only) separate limit 2"
        );
    }

    #[test]
    fn test_json_output_roundtrips() {
        let plan = sample_plan();
        let output = JsonFormatter.format_plan(&plan);
        let decoded: PlanNode = serde_json::from_str(&output).unwrap();
        assert_eq!(decoded, plan);
    }

    #[test]
    fn test_table_output_lists_every_node() {
        let output = TableFormatter.format_plan(&sample_plan());
        assert!(output.contains("customer.region"));
        assert!(output.ends_with("4 node(s)"));
    }

    fn sample_schema() -> SchemaBundle {
        use nestplan_core::{EntityDef, FieldDef, ScalarType};

        let customer = EntityDef::new("Customer", "id")
            .with_field(FieldDef::new("id", ScalarType::Int64));
        let order = EntityDef::new("Order", "id")
            .with_field(FieldDef::new("id", ScalarType::Int64))
            .with_field(FieldDef::new("customerId", ScalarType::Int64));
        let order_customer =
            RelationDef::many_to_one("customer", "Order", "customerId", "Customer", "id");
        let customer_orders = order_customer.inverse("orders");

        SchemaBundle::new(2)
            .with_entity(customer)
            .with_entity(order)
            .with_relation(order_customer)
            .with_relation(customer_orders)
    }

    #[test]
    fn test_tree_schema_marks_to_many() {
        let output = TreeFormatter.format_schema(&sample_schema());
        assert_eq!(
            output,
            "schema v2\n\
             ├── Customer (id)\n\
             │   └── orders -> Order[]\n\
             └── Order (id)\n    \
             └── customer -> Customer"
        );
    }

    #[test]
    fn test_table_schema_lists_associations() {
        let output = TableFormatter.format_schema(&sample_schema());
        assert!(output.contains("orders -> Order[]"));
        assert!(output.contains("customer -> Customer"));
        assert!(!output.contains("Customer[]"));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::Tree.to_string(), "tree");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
