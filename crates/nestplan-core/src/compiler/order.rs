//! Order compilation.

use super::PlanCompiler;
use crate::catalog::EntityDef;
use crate::error::CompileError;
use nestplan_proto::{OrderInstruction, OrderSpec, PlanNode, QualifiedRef};

impl<'a> PlanCompiler<'a> {
    /// Compile an ordering specification into order instructions.
    ///
    /// A bare column orders by the current entity. A dotted (or
    /// `$`-delimited) path is resolved through the join-path resolver against
    /// `nodes` and the instruction carries the chain of node ids it crosses.
    pub fn compile_order(
        &mut self,
        order_by: &[OrderSpec],
        nodes: &mut Vec<PlanNode>,
        entity: &'a EntityDef,
    ) -> Result<Vec<OrderInstruction>, CompileError> {
        let mut instructions = Vec::with_capacity(order_by.len());
        for spec in order_by {
            let instruction = match QualifiedRef::parse_path(&spec.column)? {
                Some(reference) => {
                    let resolved = self.resolve_join_path(&reference, nodes, entity)?;
                    self.check_order_column(resolved.entity, &reference.column)?;
                    OrderInstruction {
                        joins: resolved.joins,
                        column: reference.column,
                        direction: spec.direction,
                    }
                }
                None => {
                    self.check_order_column(entity, &spec.column)?;
                    OrderInstruction::column(&spec.column, spec.direction)
                }
            };
            instructions.push(instruction);
        }
        Ok(instructions)
    }
}
