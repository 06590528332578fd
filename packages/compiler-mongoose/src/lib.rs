//! # SchemaFlow Mongoose Compiler
//!
//! Turns the document part of a diagram into Mongoose schema and model
//! declarations (CommonJS).

mod compiler;
mod options;

pub use compiler::{compile_to_mongoose, generate_document_schemas};
pub use options::MongooseOptions;
