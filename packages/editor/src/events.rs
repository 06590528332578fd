//! # Diagram Events
//!
//! Atomic, typed descriptions of one diagram mutation. Events are the only
//! way a canvas changes, whether the change originates locally or arrives
//! from a collaborator.
//!
//! ## Event Semantics
//!
//! ### Stale references
//! - An event naming a missing entity, field or relationship is a no-op
//! - Reported as [`Applied::Stale`], never as an error
//! - Delivery across peers is unordered, so a delete may overtake an update
//!
//! ### Duplicates
//! - Adding an entity, field or relationship whose id is already present is
//!   a no-op; at-least-once delivery must not break id uniqueness
//!
//! ### EntityDeleted
//! - Removes every relationship with the entity at either end, and no others
//! - Clears the selection if it pointed at the removed entity
//!
//! ### Updates
//! - Shallow merge of the supplied attributes; last write wins

use crate::Canvas;
use schemaflow_model::{Entity, EntityChanges, Field, FieldChanges, Relationship};
use serde::{Deserialize, Serialize};

/// Variant-specific payload of an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum EventKind {
    EntityAdded {
        entity: Entity,
    },

    EntityDeleted {
        entity_id: String,
    },

    EntityUpdated {
        entity_id: String,
        changes: EntityChanges,
    },

    FieldAdded {
        entity_id: String,
        field: Field,
    },

    FieldUpdated {
        entity_id: String,
        field_id: String,
        changes: FieldChanges,
    },

    FieldDeleted {
        entity_id: String,
        field_id: String,
    },

    RelationshipAdded {
        relationship: Relationship,
    },

    RelationshipDeleted {
        relationship_id: String,
    },
}

/// A stamped event as exchanged with collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramEvent {
    #[serde(flatten)]
    pub kind: EventKind,

    pub diagram_id: String,

    /// Originating actor (local user or a specific collaborator)
    pub actor_id: String,

    /// Epoch milliseconds
    pub timestamp: i64,
}

impl DiagramEvent {
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outcome of applying an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The canvas reflects the event
    Changed,

    /// The event referred to something absent (or already present); nothing
    /// changed
    Stale,
}

impl EventKind {
    /// Variant name, as it appears in the `type` tag
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::EntityAdded { .. } => "EntityAdded",
            EventKind::EntityDeleted { .. } => "EntityDeleted",
            EventKind::EntityUpdated { .. } => "EntityUpdated",
            EventKind::FieldAdded { .. } => "FieldAdded",
            EventKind::FieldUpdated { .. } => "FieldUpdated",
            EventKind::FieldDeleted { .. } => "FieldDeleted",
            EventKind::RelationshipAdded { .. } => "RelationshipAdded",
            EventKind::RelationshipDeleted { .. } => "RelationshipDeleted",
        }
    }

    /// Apply this event to the canvas
    pub fn apply(&self, canvas: &mut Canvas) -> Applied {
        match self {
            EventKind::EntityAdded { entity } => Self::apply_add_entity(canvas, entity),

            EventKind::EntityDeleted { entity_id } => Self::apply_delete_entity(canvas, entity_id),

            EventKind::EntityUpdated { entity_id, changes } => {
                match canvas.find_entity_mut(entity_id) {
                    Some(entity) => {
                        changes.merge_into(entity);
                        Applied::Changed
                    }
                    None => Applied::Stale,
                }
            }

            EventKind::FieldAdded { entity_id, field } => {
                let Some(entity) = canvas.find_entity_mut(entity_id) else {
                    return Applied::Stale;
                };
                if entity.find_field(&field.id).is_some() {
                    return Applied::Stale;
                }
                entity.fields.push(field.clone());
                Applied::Changed
            }

            EventKind::FieldUpdated { entity_id, field_id, changes } => {
                match canvas
                    .find_entity_mut(entity_id)
                    .and_then(|entity| entity.find_field_mut(field_id))
                {
                    Some(field) => {
                        changes.merge_into(field);
                        Applied::Changed
                    }
                    None => Applied::Stale,
                }
            }

            EventKind::FieldDeleted { entity_id, field_id } => {
                let Some(entity) = canvas.find_entity_mut(entity_id) else {
                    return Applied::Stale;
                };
                let before = entity.fields.len();
                entity.fields.retain(|f| &f.id != field_id);
                if entity.fields.len() == before {
                    Applied::Stale
                } else {
                    Applied::Changed
                }
            }

            EventKind::RelationshipAdded { relationship } => {
                Self::apply_add_relationship(canvas, relationship)
            }

            EventKind::RelationshipDeleted { relationship_id } => {
                let before = canvas.relationships.len();
                canvas.relationships.retain(|r| &r.id != relationship_id);
                if canvas.relationships.len() == before {
                    Applied::Stale
                } else {
                    Applied::Changed
                }
            }
        }
    }

    fn apply_add_entity(canvas: &mut Canvas, entity: &Entity) -> Applied {
        if canvas.find_entity(&entity.id).is_some() {
            return Applied::Stale;
        }
        canvas.entities.push(entity.clone());
        canvas.selected = Some(entity.id.clone());
        Applied::Changed
    }

    fn apply_delete_entity(canvas: &mut Canvas, entity_id: &str) -> Applied {
        let Some(pos) = canvas.entities.iter().position(|e| e.id == entity_id) else {
            return Applied::Stale;
        };

        canvas.entities.remove(pos);
        canvas.relationships.retain(|r| !r.touches(entity_id));

        if canvas.selected.as_deref() == Some(entity_id) {
            canvas.selected = None;
        }

        Applied::Changed
    }

    fn apply_add_relationship(canvas: &mut Canvas, relationship: &Relationship) -> Applied {
        if canvas.find_relationship(&relationship.id).is_some() {
            return Applied::Stale;
        }
        // Endpoints must exist; mapped field names may dangle
        if canvas.find_entity(&relationship.source).is_none()
            || canvas.find_entity(&relationship.target).is_none()
        {
            return Applied::Stale;
        }
        canvas.relationships.push(relationship.clone());
        Applied::Changed
    }
}
