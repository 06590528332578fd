//! Closed column/property type vocabularies.
//!
//! Relational entities draw from [`SqlType`], document entities from
//! [`DocumentType`]. The wire spellings of the two sets never overlap
//! (`BOOLEAN` vs `Boolean`, `DATE` vs `Date`), so a single untagged string
//! always decodes to exactly one of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relational (MySQL) column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Int,
    Bigint,
    Tinyint,
    Decimal,
    Float,
    Double,
    Varchar,
    Char,
    Text,
    Longtext,
    Enum,
    Date,
    Datetime,
    Timestamp,
    Boolean,
    Json,
    Blob,
}

impl SqlType {
    /// Keyword as written in DDL
    pub fn keyword(&self) -> &'static str {
        match self {
            SqlType::Int => "INT",
            SqlType::Bigint => "BIGINT",
            SqlType::Tinyint => "TINYINT",
            SqlType::Decimal => "DECIMAL",
            SqlType::Float => "FLOAT",
            SqlType::Double => "DOUBLE",
            SqlType::Varchar => "VARCHAR",
            SqlType::Char => "CHAR",
            SqlType::Text => "TEXT",
            SqlType::Longtext => "LONGTEXT",
            SqlType::Enum => "ENUM",
            SqlType::Date => "DATE",
            SqlType::Datetime => "DATETIME",
            SqlType::Timestamp => "TIMESTAMP",
            SqlType::Boolean => "BOOLEAN",
            SqlType::Json => "JSON",
            SqlType::Blob => "BLOB",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, SqlType::Int | SqlType::Bigint | SqlType::Tinyint)
    }

    /// Types that take a length parameter
    pub fn is_string_like(&self) -> bool {
        matches!(self, SqlType::Varchar | SqlType::Char | SqlType::Enum)
    }
}

/// Document (MongoDB) property types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    ObjectId,
    String,
    Number,
    Boolean,
    Date,
    Array,
    Object,
    Decimal128,
    Map,
    Buffer,
    #[serde(rename = "UUID")]
    Uuid,
}

impl DocumentType {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentType::ObjectId => "ObjectId",
            DocumentType::String => "String",
            DocumentType::Number => "Number",
            DocumentType::Boolean => "Boolean",
            DocumentType::Date => "Date",
            DocumentType::Array => "Array",
            DocumentType::Object => "Object",
            DocumentType::Decimal128 => "Decimal128",
            DocumentType::Map => "Map",
            DocumentType::Buffer => "Buffer",
            DocumentType::Uuid => "UUID",
        }
    }
}

/// A field's declared type, from either vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataType {
    Sql(SqlType),
    Document(DocumentType),
}

impl DataType {
    pub fn as_sql(&self) -> Option<SqlType> {
        match self {
            DataType::Sql(t) => Some(*t),
            DataType::Document(_) => None,
        }
    }

    pub fn as_document(&self) -> Option<DocumentType> {
        match self {
            DataType::Document(t) => Some(*t),
            DataType::Sql(_) => None,
        }
    }
}

impl From<SqlType> for DataType {
    fn from(t: SqlType) -> Self {
        DataType::Sql(t)
    }
}

impl From<DocumentType> for DataType {
    fn from(t: DocumentType) -> Self {
        DataType::Document(t)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Sql(t) => f.write_str(t.keyword()),
            DataType::Document(t) => f.write_str(t.name()),
        }
    }
}
