//! nestplan protocol types.
//!
//! This crate defines the IR exchanged between the query-language front end,
//! the plan compiler, and the execution engine. Every type derives serde so
//! requests and plans can be stored or shipped as JSON.
//!
//! # Modules
//!
//! - [`selection`] - Selection trees, fragments, arguments and variables
//! - [`filter`] - Opaque filter expressions and qualified join references
//! - [`query`] - Root request arguments and order specifications
//! - [`plan`] - The nested plan produced by the compiler
//! - [`error`] - Protocol error types

pub mod error;
pub mod filter;
pub mod plan;
pub mod query;
pub mod selection;

pub use error::Error;

// Re-export commonly used types at crate root
pub use filter::{Filter, FilterRef, QualifiedRef, ReferenceSite};
pub use plan::{NodeId, OrderInstruction, PlanNode};
pub use query::{OrderDirection, OrderSpec, RequestArgs};
pub use selection::{
    ArgValue, Argument, FieldSelection, FragmentSpread, Fragments, RequestContext, Selection,
    Variables,
};
