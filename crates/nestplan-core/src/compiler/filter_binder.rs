//! Filter join binding.

use super::PlanCompiler;
use crate::catalog::EntityDef;
use crate::error::CompileError;
use nestplan_proto::{Filter, FilterRef, PlanNode, ReferenceSite};
use tracing::trace;

impl<'a> PlanCompiler<'a> {
    /// Ensure a join node exists for every qualified reference in `filter`.
    ///
    /// References in object keys are always bound. Reference-like string
    /// values are bound only when their whole path exists in the schema;
    /// anything else is treated as literal data. The filter is only scanned;
    /// attaching it to its node is up to the caller.
    pub fn bind_filter_joins(
        &mut self,
        filter: Option<&Filter>,
        nodes: &mut Vec<PlanNode>,
        entity: &'a EntityDef,
    ) -> Result<(), CompileError> {
        let Some(filter) = filter else {
            return Ok(());
        };

        for FilterRef { reference, site } in filter.qualified_refs()? {
            if site == ReferenceSite::Value && !self.is_known_path(&reference, entity) {
                trace!(
                    entity = %entity.name,
                    value = %reference,
                    "Treating reference-like filter value as a literal"
                );
                continue;
            }
            let resolved = self.resolve_join_path(&reference, nodes, entity)?;
            self.check_column(resolved.entity, &reference.column)?;
            trace!(
                entity = %entity.name,
                reference = %reference,
                joins = resolved.joins.len(),
                "Bound filter reference"
            );
        }
        Ok(())
    }
}
