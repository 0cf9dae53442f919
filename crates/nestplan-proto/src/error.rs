//! Protocol error types.

use thiserror::Error;

/// Errors raised while interpreting request-level IR values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A `$`-delimited join-column reference that does not follow the
    /// `$leg.leg.column$` grammar.
    #[error("malformed qualified reference '{reference}': {reason}")]
    MalformedReference {
        reference: String,
        reason: &'static str,
    },

    /// An order direction other than ASC or DESC.
    #[error("invalid order direction '{0}', expected ASC or DESC")]
    InvalidDirection(String),
}
