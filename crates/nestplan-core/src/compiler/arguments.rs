//! Argument resolution and the typed include argument set.

use crate::error::CompileError;
use nestplan_proto::{ArgValue, Argument, Filter, OrderDirection, OrderSpec, Variables};
use serde_json::Value;
use tracing::debug;

/// Resolved arguments keyed by name.
pub type ArgumentMap = serde_json::Map<String, Value>;

/// Resolve a field's arguments against the request variables.
///
/// A top-level argument bound to an unknown variable is omitted, as if the
/// caller had not supplied it. Unknown variables nested inside lists or
/// objects resolve to null.
pub fn extract_arguments(arguments: &[Argument], variables: &Variables) -> ArgumentMap {
    let mut resolved = ArgumentMap::new();
    for argument in arguments {
        match &argument.value {
            ArgValue::Variable { name } if !variables.contains_key(name) => {
                debug!(
                    argument = %argument.name,
                    variable = %name,
                    "Omitting argument bound to an undefined variable"
                );
            }
            value => {
                resolved.insert(argument.name.clone(), resolve_value(value, variables));
            }
        }
    }
    resolved
}

fn resolve_value(value: &ArgValue, variables: &Variables) -> Value {
    match value {
        ArgValue::Variable { name } => variables.get(name).cloned().unwrap_or(Value::Null),
        ArgValue::Null => Value::Null,
        ArgValue::Bool(b) => Value::Bool(*b),
        ArgValue::Int(i) => Value::from(*i),
        ArgValue::Float(f) => Value::from(*f),
        ArgValue::String(s) | ArgValue::Enum(s) => Value::String(s.clone()),
        ArgValue::List(items) => items.iter().map(|v| resolve_value(v, variables)).collect(),
        ArgValue::Object(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, variables)))
                .collect(),
        ),
    }
}

/// Argument name for the inner-join flag.
pub const ARG_REQUIRED: &str = "required";
/// Argument name for the include filter.
pub const ARG_WHERE: &str = "where";
/// Argument name for the include ordering.
pub const ARG_ORDER_BY: &str = "orderBy";
/// Argument name for the include limit.
pub const ARG_LIMIT: &str = "limit";

/// The arguments of an association field the planner understands.
///
/// Anything else is kept in `other` for the execution engine or caller-level
/// validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludeArgs {
    /// Inner-join semantics.
    pub required: bool,
    /// Filter on the included rows.
    pub filter: Option<Filter>,
    /// Ordering of the included rows.
    pub order_by: Vec<OrderSpec>,
    /// Positive row limit; a limit of zero means no limit.
    pub limit: Option<u32>,
    /// Unrecognized arguments, passed through untouched.
    pub other: ArgumentMap,
}

impl IncludeArgs {
    /// Interpret resolved arguments for the association field `field`.
    pub fn from_arguments(field: &str, arguments: ArgumentMap) -> Result<Self, CompileError> {
        let mut args = IncludeArgs::default();
        for (name, value) in arguments {
            match name.as_str() {
                ARG_REQUIRED => args.required = parse_required(field, &value)?,
                ARG_WHERE => args.filter = parse_where(field, value)?,
                ARG_ORDER_BY => args.order_by = parse_order_by(field, &value)?,
                ARG_LIMIT => args.limit = parse_limit(field, &value)?,
                _ => {
                    args.other.insert(name, value);
                }
            }
        }
        Ok(args)
    }

    /// Check if the include must run as an independent query.
    pub fn needs_separate_query(&self) -> bool {
        !self.order_by.is_empty() || self.limit.is_some()
    }
}

fn parse_required(field: &str, value: &Value) -> Result<bool, CompileError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        _ => Err(CompileError::invalid_argument(
            field,
            ARG_REQUIRED,
            "expected a boolean",
        )),
    }
}

fn parse_where(field: &str, value: Value) -> Result<Option<Filter>, CompileError> {
    match value {
        Value::Null => Ok(None),
        Value::Object(_) | Value::Array(_) => Ok(Some(Filter::new(value))),
        _ => Err(CompileError::invalid_argument(
            field,
            ARG_WHERE,
            "expected an object or a list",
        )),
    }
}

fn parse_limit(field: &str, value: &Value) -> Result<Option<u32>, CompileError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            let limit = n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| {
                    CompileError::invalid_argument(
                        field,
                        ARG_LIMIT,
                        format!("expected a non-negative 32-bit integer, got {}", n),
                    )
                })?;
            Ok((limit > 0).then_some(limit))
        }
        _ => Err(CompileError::invalid_argument(
            field,
            ARG_LIMIT,
            "expected an integer",
        )),
    }
}

/// Parse an ordering argument.
///
/// Accepts a list whose items are either `[column, direction]` pairs or
/// `{"column": ..., "direction": ...}` objects. Directions must be explicit.
pub(crate) fn parse_order_by(field: &str, value: &Value) -> Result<Vec<OrderSpec>, CompileError> {
    let items = match value {
        Value::Null => return Ok(vec![]),
        Value::Array(items) => items,
        _ => {
            return Err(CompileError::invalid_argument(
                field,
                ARG_ORDER_BY,
                "expected a list of orderings",
            ))
        }
    };

    items
        .iter()
        .map(|item| {
            let (column, direction) = match item {
                Value::Array(pair) if pair.len() == 2 => (&pair[0], &pair[1]),
                Value::Object(map) => (
                    map.get("column").unwrap_or(&Value::Null),
                    map.get("direction").unwrap_or(&Value::Null),
                ),
                _ => {
                    return Err(CompileError::invalid_argument(
                        field,
                        ARG_ORDER_BY,
                        "each ordering must be a [column, direction] pair or an object",
                    ))
                }
            };

            let column = column.as_str().ok_or_else(|| {
                CompileError::invalid_argument(
                    field,
                    ARG_ORDER_BY,
                    "ordering column must be a string",
                )
            })?;
            let direction = direction
                .as_str()
                .ok_or_else(|| {
                    CompileError::invalid_argument(
                        field,
                        ARG_ORDER_BY,
                        format!("ordering of '{}' needs an explicit direction", column),
                    )
                })?
                .parse::<OrderDirection>()
                .map_err(|e| CompileError::invalid_argument(field, ARG_ORDER_BY, e.to_string()))?;

            Ok(OrderSpec {
                column: column.to_string(),
                direction,
            })
        })
        .collect()
}
