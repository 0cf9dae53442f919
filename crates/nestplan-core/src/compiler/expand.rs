//! Fragment expansion.

use crate::error::CompileError;
use nestplan_proto::{FieldSelection, Fragments, Selection};

/// Inline fragment spreads into a flat list of concrete fields.
///
/// Fragment contents are spliced at the position of the spread, recursively,
/// preserving sibling order. Duplicates are kept. Only this level is
/// flattened: nested selections of the returned fields still contain their
/// own spreads and are expanded when the planner descends into them.
///
/// The input is never modified; the result is a new list.
pub fn expand_selections(
    selections: &[Selection],
    fragments: &Fragments,
) -> Result<Vec<FieldSelection>, CompileError> {
    let mut expanded = Vec::with_capacity(selections.len());
    let mut active = Vec::new();
    expand_into(selections, fragments, &mut active, &mut expanded)?;
    Ok(expanded)
}

fn expand_into<'s>(
    selections: &'s [Selection],
    fragments: &'s Fragments,
    active: &mut Vec<&'s str>,
    expanded: &mut Vec<FieldSelection>,
) -> Result<(), CompileError> {
    for selection in selections {
        match selection {
            Selection::Field(field) => expanded.push(field.clone()),
            Selection::Spread(spread) => {
                let name = spread.name.as_str();
                if active.contains(&name) {
                    return Err(CompileError::FragmentCycle {
                        name: name.to_string(),
                    });
                }
                let body = fragments
                    .get(name)
                    .ok_or_else(|| CompileError::UnknownFragment {
                        name: name.to_string(),
                    })?;

                active.push(name);
                expand_into(body, fragments, active, expanded)?;
                active.pop();
            }
        }
    }
    Ok(())
}
