//! Schema catalog consumed by the compiler.
//!
//! The catalog describes entities, their attributes and primary keys, and the
//! associations between them. It is produced by the mapping layer and is
//! read-only for the compiler.

mod entity;
mod field;
mod relation;
mod schema;
mod types;

pub use entity::EntityDef;
pub use field::FieldDef;
pub use relation::{Cardinality, RelationDef};
pub use schema::SchemaBundle;
pub use types::ScalarType;
