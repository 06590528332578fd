//! # SchemaFlow SQL Compiler
//!
//! Turns the relational part of a diagram into MySQL DDL: one
//! `CREATE TABLE` per table, followed by one `ALTER TABLE ... ADD CONSTRAINT`
//! per resolvable relationship mapping.

mod compiler;
mod options;

pub use compiler::{compile_to_sql, generate_relational_ddl};
pub use options::SqlOptions;

#[cfg(test)]
mod tests;
