//! nestplan core - schema catalog and plan compiler.
//!
//! This crate compiles a client selection tree into a nested plan the
//! execution engine can run: which entity each node reads, which attributes
//! it projects, how it joins to its parent, and how it is filtered, ordered
//! and limited.
//!
//! # Example
//!
//! ```
//! use nestplan_core::catalog::{EntityDef, FieldDef, RelationDef, ScalarType, SchemaBundle};
//! use nestplan_core::proto::{RequestArgs, RequestContext, Selection};
//!
//! let schema = SchemaBundle::new(1)
//!     .with_entity(
//!         EntityDef::new("Person", "id")
//!             .with_field(FieldDef::new("id", ScalarType::Int64))
//!             .with_field(FieldDef::new("name", ScalarType::String))
//!             .with_field(FieldDef::optional("bestFriendId", ScalarType::Int64)),
//!     )
//!     .with_relation(RelationDef::many_to_one(
//!         "bestFriend", "Person", "bestFriendId", "Person", "id",
//!     ));
//!
//! let context = RequestContext::new(vec![
//!     Selection::field("name"),
//!     Selection::object("bestFriend", vec![Selection::field("name")]),
//! ]);
//!
//! let plan = nestplan_core::compile(&schema, &RequestArgs::new(), &context, "Person").unwrap();
//! assert_eq!(plan.attributes, vec!["id", "name"]);
//! assert_eq!(plan.children[0].alias.as_deref(), Some("bestFriend"));
//! assert_eq!(plan.limit, Some(100));
//! ```

pub mod catalog;
pub mod compiler;
pub mod config;
pub mod error;

pub use catalog::{Cardinality, EntityDef, FieldDef, RelationDef, ScalarType, SchemaBundle};
pub use compiler::{
    compile, expand_selections, extract_arguments, project_fields, ArgumentMap, IncludeArgs,
    PlanCompiler, ResolvedPath,
};
pub use config::{CompilerConfig, DEFAULT_LIMIT, DEFAULT_MAX_DEPTH};
pub use error::CompileError;

/// Re-export protocol types.
pub use nestplan_proto as proto;
