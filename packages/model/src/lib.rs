//! # SchemaFlow Model
//!
//! Data structures for a schema diagram: entities (relational tables or
//! document collections), their fields, and relationships between them.
//!
//! The model has no behavior of its own. The editor mutates it through
//! events, the compilers read it to produce DDL or schema code.

mod changes;
mod data_type;
mod diagram;
mod error;
mod id_generator;

pub use changes::{EntityChanges, FieldChanges};
pub use data_type::{DataType, DocumentType, SqlType};
pub use diagram::{
    Cardinality, DatabaseKind, Diagram, Entity, EntityKind, Field, FieldMapping, Metadata,
    Position, Relationship,
};
pub use error::ModelError;
pub use id_generator::{get_actor_seed, IdGenerator};
