//! Nested plan types produced by the compiler.
//!
//! A plan is a tree of [`PlanNode`]s. The root node targets the requested
//! entity; every child is an include of an association relative to its
//! parent. Each node carries a [`NodeId`] that is unique within one
//! compilation, so order instructions can point at the exact join node the
//! execution engine has to reuse.

use crate::filter::Filter;
use crate::query::OrderDirection;
use serde::{Deserialize, Serialize};

/// Identity of a plan node within one compiled plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One node of a compiled plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNode {
    /// Node identity.
    pub id: NodeId,
    /// Target entity name.
    pub entity: String,
    /// Association name as seen from the parent (`None` for the root).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Attributes to project. Empty means the node projects nothing
    /// explicit and only exists for joining or filtering.
    pub attributes: Vec<String>,
    /// Filter for this node's rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Ordering for this node's rows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<OrderInstruction>,
    /// Row limit (per parent for includes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Rows to skip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Inner-join semantics: parents without a match are excluded.
    pub required: bool,
    /// Must run as an independent follow-up query.
    pub separate: bool,
    /// Included associations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlanNode>,
}

impl PlanNode {
    /// Create a root node for an entity.
    pub fn root(id: NodeId, entity: impl Into<String>) -> Self {
        Self {
            id,
            entity: entity.into(),
            alias: None,
            attributes: vec![],
            filter: None,
            order: vec![],
            limit: None,
            offset: None,
            required: false,
            separate: false,
            children: vec![],
        }
    }

    /// Create an include node for an association.
    pub fn include(id: NodeId, alias: impl Into<String>, entity: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            ..Self::root(id, entity)
        }
    }

    /// Set the projected attributes.
    pub fn with_attributes(mut self, attributes: Vec<String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the filter.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Mark as required (inner join).
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Add a child node.
    pub fn with_child(mut self, child: PlanNode) -> Self {
        self.children.push(child);
        self
    }

    /// Find a direct child by alias.
    pub fn child(&self, alias: &str) -> Option<&PlanNode> {
        self.children
            .iter()
            .find(|c| c.alias.as_deref() == Some(alias))
    }

    /// Find a node anywhere in this subtree by id.
    pub fn find(&self, id: NodeId) -> Option<&PlanNode> {
        self.walk().find(|n| n.id == id)
    }

    /// Iterate over this node and all descendants in pre-order.
    pub fn walk(&self) -> impl Iterator<Item = &PlanNode> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Depth of the subtree rooted here (1 for a leaf node).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(PlanNode::depth).max().unwrap_or(0)
    }

    /// Check if this node projects nothing explicit.
    pub fn is_join_only(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A compiled ordering instruction.
///
/// `joins` is the chain of include nodes traversed to reach the column,
/// outermost first; empty for a column on the node's own entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInstruction {
    /// Join chain by node identity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub joins: Vec<NodeId>,
    /// Column on the terminal entity.
    pub column: String,
    /// Sort direction.
    pub direction: OrderDirection,
}

impl OrderInstruction {
    /// Create an instruction for a column on the current entity.
    pub fn column(column: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            joins: vec![],
            column: column.into(),
            direction,
        }
    }

    /// Check if this instruction crosses a join boundary.
    pub fn is_cross_join(&self) -> bool {
        !self.joins.is_empty()
    }
}
