//! Join-path resolution.

use super::PlanCompiler;
use crate::catalog::EntityDef;
use crate::error::CompileError;
use nestplan_proto::{NodeId, PlanNode, QualifiedRef};
use tracing::trace;

/// Outcome of walking a qualified path.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath<'a> {
    /// Entity owning the terminal column.
    pub entity: &'a EntityDef,
    /// Nodes traversed, outermost first.
    pub joins: Vec<NodeId>,
}

impl<'a> PlanCompiler<'a> {
    /// Make sure every association leg of `reference` exists as a plan node.
    ///
    /// Each leg is looked up among `nodes` by alias; an existing node is
    /// reused, otherwise a node projecting only the primary key is appended.
    /// The walk then continues in that node's children. Resolving the same
    /// path again yields the same node ids.
    pub fn resolve_join_path(
        &mut self,
        reference: &QualifiedRef,
        mut nodes: &mut Vec<PlanNode>,
        entity: &'a EntityDef,
    ) -> Result<ResolvedPath<'a>, CompileError> {
        let mut current = entity;
        let mut joins = Vec::with_capacity(reference.legs.len());

        for leg in &reference.legs {
            let relation = self
                .schema
                .relation(&current.name, leg)
                .ok_or_else(|| CompileError::unknown_association(&current.name, leg))?;
            let target = self.entity(&relation.to_entity)?;

            let index = match nodes
                .iter()
                .position(|node| node.alias.as_deref() == Some(leg.as_str()))
            {
                Some(index) => index,
                None => {
                    let id = self.next_id();
                    trace!(
                        id = %id,
                        entity = %current.name,
                        association = %leg,
                        path = %reference,
                        "Synthesized join node"
                    );
                    nodes.push(
                        PlanNode::include(id, leg, &target.name)
                            .with_attributes(target.primary_key.clone()),
                    );
                    nodes.len() - 1
                }
            };

            joins.push(nodes[index].id);
            nodes = &mut nodes[index].children;
            current = target;
        }

        Ok(ResolvedPath {
            entity: current,
            joins,
        })
    }

    /// Check if every leg of `reference` is an association and its column an
    /// attribute of the terminal entity, without touching the plan.
    pub(crate) fn is_known_path(&self, reference: &QualifiedRef, entity: &EntityDef) -> bool {
        let mut current = entity;
        for leg in &reference.legs {
            let target = self
                .schema
                .relation(&current.name, leg)
                .and_then(|relation| self.schema.get_entity(&relation.to_entity));
            match target {
                Some(target) => current = target,
                None => return false,
            }
        }
        current.has_field(&reference.column)
    }
}
