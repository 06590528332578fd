//! # Diagram Model
//!
//! Entities (tables or collections), their fields, and the relationships
//! between them. This module holds data only; every change to a live diagram
//! goes through the editor's event reducer.
//!
//! ## Invariants
//!
//! - An entity id never changes once created
//! - Field ids are unique within their owning entity (not globally)
//! - Relationship mappings refer to fields by *name* and may dangle;
//!   consumers skip unresolved names instead of failing

use crate::{DataType, ModelError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether an entity is a relational table or a document collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Relational,
    Document,
}

/// Canvas coordinates, owned by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A column (relational) or property (document)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    /// Relational only
    #[serde(default)]
    pub is_primary_key: bool,

    /// Relational only
    #[serde(default)]
    pub is_foreign_key: bool,

    #[serde(default)]
    pub is_nullable: bool,

    #[serde(default)]
    pub is_unique: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Explicit length for string-like relational types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
}

impl Field {
    pub fn new(id: impl Into<String>, name: impl Into<String>, data_type: impl Into<DataType>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data_type: Some(data_type.into()),
            is_primary_key: false,
            is_foreign_key: false,
            is_nullable: false,
            is_unique: false,
            default_value: None,
            length: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self) -> Self {
        self.is_foreign_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }
}

/// A table or collection node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub kind: EntityKind,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub position: Position,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Entity {
    pub fn new(id: impl Into<String>, kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            position: Position::default(),
            fields: Vec::new(),
        }
    }

    pub fn relational(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Relational, name)
    }

    pub fn document(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, EntityKind::Document, name)
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn find_field(&self, field_id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn find_field_mut(&mut self, field_id: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.id == field_id)
    }

    /// Resolve a field by name, the way relationship mappings address fields
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_relational(&self) -> bool {
        self.kind == EntityKind::Relational
    }

    pub fn is_document(&self) -> bool {
        self.kind == EntityKind::Document
    }
}

/// Relationship cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cardinality {
    #[serde(rename = "one-to-one", alias = "1:1")]
    OneToOne,
    #[default]
    #[serde(rename = "one-to-many", alias = "1:N")]
    OneToMany,
    #[serde(rename = "many-to-one", alias = "N:1")]
    ManyToOne,
    #[serde(rename = "many-to-many", alias = "N:M")]
    ManyToMany,
}

/// Field-level link carried by a relationship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    pub target_field: String,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl FieldMapping {
    pub fn new(source_field: impl Into<String>, target_field: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
            cardinality,
        }
    }
}

/// Directed edge from `source` entity to `target` entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source: String,
    pub target: String,

    #[serde(default)]
    pub field_mappings: Vec<FieldMapping>,

    #[serde(default)]
    pub cardinality: Cardinality,

    #[serde(default = "default_true")]
    pub show_fields: bool,

    #[serde(default = "default_true")]
    pub show_cardinality: bool,
}

fn default_true() -> bool {
    true
}

impl Relationship {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            field_mappings: Vec::new(),
            cardinality: Cardinality::default(),
            show_fields: true,
            show_cardinality: true,
        }
    }

    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.field_mappings.push(mapping);
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Whether this relationship touches the given entity at either end
    pub fn touches(&self, entity_id: &str) -> bool {
        self.source == entity_id || self.target == entity_id
    }
}

/// Target database family of a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatabaseKind {
    #[default]
    Mysql,
    Mongodb,
}

impl DatabaseKind {
    /// Kind given to newly created entities
    pub fn entity_kind(&self) -> EntityKind {
        match self {
            DatabaseKind::Mysql => EntityKind::Relational,
            DatabaseKind::Mongodb => EntityKind::Document,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub version: u32,

    #[serde(alias = "dbType")]
    pub database_kind: DatabaseKind,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    pub fn new(database_kind: DatabaseKind) -> Self {
        let now = Utc::now();
        Self {
            version: 1,
            database_kind,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new(DatabaseKind::default())
    }
}

/// Persisted diagram: the unit of storage and of undo/redo
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagram {
    #[serde(default)]
    pub entities: Vec<Entity>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,

    #[serde(default)]
    pub metadata: Metadata,
}

impl Diagram {
    pub fn new(database_kind: DatabaseKind) -> Self {
        Self {
            entities: Vec::new(),
            relationships: Vec::new(),
            metadata: Metadata::new(database_kind),
        }
    }

    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn find_entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == entity_id)
    }
}
