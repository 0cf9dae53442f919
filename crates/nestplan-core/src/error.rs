//! Core error types.

use thiserror::Error;

/// Errors raised while compiling a request into a plan.
///
/// Every error aborts compilation; no partial plan is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Protocol-level error (malformed qualified reference, bad direction).
    #[error("protocol error: {0}")]
    Protocol(#[from] nestplan_proto::Error),

    /// The requested root entity is not in the schema.
    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    /// A selection spreads a fragment that is not defined.
    #[error("unknown fragment '{name}'")]
    UnknownFragment { name: String },

    /// A fragment spreads itself, directly or through other fragments.
    #[error("fragment '{name}' spreads itself")]
    FragmentCycle { name: String },

    /// A selected field is neither an attribute nor an association.
    #[error("field '{field}' not supported on entity '{entity}'")]
    UnsupportedField { entity: String, field: String },

    /// A qualified path names an association the entity does not declare.
    #[error("no association '{association}' found on entity '{entity}'")]
    UnknownAssociation { entity: String, association: String },

    /// An argument value has the wrong shape.
    #[error("invalid argument '{argument}' on field '{field}': {reason}")]
    InvalidArgument {
        field: String,
        argument: String,
        reason: String,
    },

    /// The same association is selected twice with different arguments.
    #[error("association '{field}' on entity '{entity}' is selected with conflicting arguments")]
    ConflictingArguments { entity: String, field: String },

    /// An order or filter column is not an attribute (strict mode only).
    #[error("unknown column '{column}' on entity '{entity}'")]
    UnknownColumn { entity: String, column: String },

    /// An order column has a type without a total order (strict mode only).
    #[error("column '{column}' on entity '{entity}' cannot be used for ordering")]
    UnorderableColumn { entity: String, column: String },

    /// Selection nesting exceeds the configured maximum.
    #[error("selection depth {depth} exceeds maximum allowed depth {max}")]
    DepthExceeded { depth: usize, max: usize },

    /// The schema itself is inconsistent.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl CompileError {
    /// Create an unsupported field error.
    pub fn unsupported_field(entity: &str, field: &str) -> Self {
        CompileError::UnsupportedField {
            entity: entity.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an unknown association error.
    pub fn unknown_association(entity: &str, association: &str) -> Self {
        CompileError::UnknownAssociation {
            entity: entity.to_string(),
            association: association.to_string(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(field: &str, argument: &str, reason: impl Into<String>) -> Self {
        CompileError::InvalidArgument {
            field: field.to_string(),
            argument: argument.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = CompileError::unsupported_field("Person", "nickname");
        assert_eq!(err.to_string(), "field 'nickname' not supported on entity 'Person'");

        let err = CompileError::unknown_association("Order", "warehouse");
        assert_eq!(err.to_string(), "no association 'warehouse' found on entity 'Order'");
    }

    #[test]
    fn test_protocol_conversion() {
        let err: CompileError = nestplan_proto::Error::InvalidDirection("up".into()).into();
        assert!(matches!(err, CompileError::Protocol(_)));
        assert!(err.to_string().contains("'up'"));
    }
}
