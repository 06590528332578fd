//! Partial updates carried by `EntityUpdated` / `FieldUpdated` events.
//!
//! Merging is shallow: each supplied attribute replaces the stored one,
//! absent attributes are left alone. Clearable attributes use
//! `Option<Option<T>>` so that an explicit `null` on the wire clears them.

use crate::{DataType, Entity, Field, Position};
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Replaces the whole field list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<Field>>,
}

impl EntityChanges {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn move_to(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn merge_into(&self, entity: &mut Entity) {
        if let Some(name) = &self.name {
            entity.name = name.clone();
        }
        if let Some(position) = self.position {
            entity.position = position;
        }
        if let Some(fields) = &self.fields {
            entity.fields = fields.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(
        rename = "type",
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_type: Option<Option<DataType>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_primary_key: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_foreign_key: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub length: Option<Option<u32>>,
}

impl FieldChanges {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn retype(data_type: impl Into<DataType>) -> Self {
        Self {
            data_type: Some(Some(data_type.into())),
            ..Default::default()
        }
    }

    pub fn merge_into(&self, field: &mut Field) {
        if let Some(name) = &self.name {
            field.name = name.clone();
        }
        if let Some(data_type) = self.data_type {
            field.data_type = data_type;
        }
        if let Some(flag) = self.is_primary_key {
            field.is_primary_key = flag;
        }
        if let Some(flag) = self.is_foreign_key {
            field.is_foreign_key = flag;
        }
        if let Some(flag) = self.is_nullable {
            field.is_nullable = flag;
        }
        if let Some(flag) = self.is_unique {
            field.is_unique = flag;
        }
        if let Some(default_value) = &self.default_value {
            field.default_value = default_value.clone();
        }
        if let Some(length) = self.length {
            field.length = length;
        }
    }
}
