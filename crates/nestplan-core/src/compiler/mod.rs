//! Plan compiler.
//!
//! Turns a selection tree plus request arguments into a nested [`PlanNode`]
//! tree. The stages run in this order for the root and again for every
//! included association:
//!
//! 1. fragment expansion ([`expand_selections`])
//! 2. attribute projection ([`project_fields`])
//! 3. association planning ([`PlanCompiler::plan_includes`])
//! 4. filter join binding ([`PlanCompiler::bind_filter_joins`])
//! 5. order compilation ([`PlanCompiler::compile_order`])
//!
//! Stages 4 and 5 share the join-path resolver, so a path referenced from a
//! filter and from an ordering maps to the same plan node.

mod arguments;
mod expand;
mod filter_binder;
mod include;
mod join_path;
mod order;
mod project;

pub use arguments::{extract_arguments, ArgumentMap, IncludeArgs};
pub use expand::expand_selections;
pub use join_path::ResolvedPath;
pub use project::project_fields;

use crate::catalog::{EntityDef, SchemaBundle};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use nestplan_proto::{NodeId, PlanNode, RequestArgs, RequestContext};
use tracing::debug;

/// Compiles requests against one schema.
///
/// Node ids are allocated from a counter that restarts at every
/// [`compile`](Self::compile) call, so ids are unique within one plan.
pub struct PlanCompiler<'a> {
    schema: &'a SchemaBundle,
    config: CompilerConfig,
    next_id: u32,
}

impl<'a> PlanCompiler<'a> {
    /// Create a compiler with the default configuration.
    pub fn new(schema: &'a SchemaBundle) -> Self {
        Self {
            schema,
            config: CompilerConfig::default(),
            next_id: 0,
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a request for `root_entity` into a plan.
    pub fn compile(
        &mut self,
        args: &RequestArgs,
        context: &RequestContext,
        root_entity: &str,
    ) -> Result<PlanNode, CompileError> {
        self.next_id = 0;
        let entity = self.entity(root_entity)?;
        debug!(entity = %entity.name, "Compiling plan");

        let fields = expand_selections(&context.selection, &context.fragments)?;

        let mut root = PlanNode::root(self.next_id(), &entity.name);
        root.attributes = project_fields(&fields, entity);
        root.children = self.plan_includes(&fields, context, entity)?;

        self.bind_filter_joins(args.filter.as_ref(), &mut root.children, entity)?;
        root.filter = args.filter.clone();
        root.order = self.compile_order(&args.order_by, &mut root.children, entity)?;

        let limit = args
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(self.config.default_limit);
        root.limit = (limit > 0).then_some(limit);
        root.offset = args.offset;

        debug!(
            entity = %entity.name,
            nodes = root.walk().count(),
            depth = root.depth(),
            "Compiled plan"
        );
        Ok(root)
    }

    /// Allocate the next node id.
    pub(crate) fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Look up an entity by name.
    pub(crate) fn entity(&self, name: &str) -> Result<&'a EntityDef, CompileError> {
        self.schema
            .get_entity(name)
            .ok_or_else(|| CompileError::UnknownEntity {
                entity: name.to_string(),
            })
    }

    /// Check a filter column in strict mode.
    pub(crate) fn check_column(
        &self,
        entity: &EntityDef,
        column: &str,
    ) -> Result<(), CompileError> {
        if self.config.strict_columns && !entity.has_field(column) {
            return Err(CompileError::UnknownColumn {
                entity: entity.name.clone(),
                column: column.to_string(),
            });
        }
        Ok(())
    }

    /// Check an order column in strict mode.
    pub(crate) fn check_order_column(
        &self,
        entity: &EntityDef,
        column: &str,
    ) -> Result<(), CompileError> {
        if !self.config.strict_columns {
            return Ok(());
        }
        let field = entity
            .get_field(column)
            .ok_or_else(|| CompileError::UnknownColumn {
                entity: entity.name.clone(),
                column: column.to_string(),
            })?;
        if !field.field_type.is_orderable() {
            return Err(CompileError::UnorderableColumn {
                entity: entity.name.clone(),
                column: column.to_string(),
            });
        }
        Ok(())
    }
}

/// Compile a request with the default configuration.
pub fn compile(
    schema: &SchemaBundle,
    args: &RequestArgs,
    context: &RequestContext,
    root_entity: &str,
) -> Result<PlanNode, CompileError> {
    PlanCompiler::new(schema).compile(args, context, root_entity)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::catalog::{EntityDef, FieldDef, RelationDef, ScalarType, SchemaBundle};

    /// People with a self-referencing association, and a small shop.
    pub fn schema() -> SchemaBundle {
        let person = EntityDef::new("Person", "id")
            .with_field(FieldDef::new("id", ScalarType::Int64))
            .with_field(FieldDef::new("name", ScalarType::String))
            .with_field(FieldDef::optional("bestFriendId", ScalarType::Int64))
            .with_field(FieldDef::optional("avatar", ScalarType::Bytes));

        let region = EntityDef::new("Region", "id")
            .with_field(FieldDef::new("id", ScalarType::Int32))
            .with_field(FieldDef::new("code", ScalarType::String))
            .with_field(FieldDef::new("name", ScalarType::String));

        let customer = EntityDef::new("Customer", "id")
            .with_field(FieldDef::new("id", ScalarType::Uuid))
            .with_field(FieldDef::new("name", ScalarType::String))
            .with_field(FieldDef::new("regionId", ScalarType::Int32));

        let order = EntityDef::new("Order", "id")
            .with_field(FieldDef::new("id", ScalarType::Uuid))
            .with_field(FieldDef::new("customerId", ScalarType::Uuid))
            .with_field(FieldDef::new("total", ScalarType::Decimal))
            .with_field(FieldDef::new("placedAt", ScalarType::Timestamp))
            .with_field(FieldDef::optional("notes", ScalarType::Json));

        let line = EntityDef::new("OrderLine", "id")
            .with_field(FieldDef::new("id", ScalarType::Uuid))
            .with_field(FieldDef::new("orderId", ScalarType::Uuid))
            .with_field(FieldDef::new("sku", ScalarType::String))
            .with_field(FieldDef::new("quantity", ScalarType::Int32));

        let order_customer =
            RelationDef::many_to_one("customer", "Order", "customerId", "Customer", "id");
        let customer_orders = order_customer.inverse("orders");

        SchemaBundle::new(1)
            .with_entity(person)
            .with_entity(region)
            .with_entity(customer)
            .with_entity(order)
            .with_entity(line)
            .with_relation(RelationDef::many_to_one(
                "bestFriend",
                "Person",
                "bestFriendId",
                "Person",
                "id",
            ))
            .with_relation(RelationDef::many_to_one(
                "region", "Customer", "regionId", "Region", "id",
            ))
            .with_relation(order_customer)
            .with_relation(customer_orders)
            .with_relation(RelationDef::one_to_many(
                "lines", "Order", "id", "OrderLine", "orderId",
            ))
    }
}
