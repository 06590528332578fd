//! # Canvas
//!
//! The mutable working set of one editing session: entities, relationships
//! and the current selection. Fields are crate-private; outside this crate
//! the canvas can only be read, and changes go through dispatched events.

use schemaflow_model::{Diagram, Entity, Relationship};

/// Live diagram content of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    pub(crate) entities: Vec<Entity>,
    pub(crate) relationships: Vec<Relationship>,
    pub(crate) selected: Option<String>,
}

/// Owned copy of entities and relationships captured for undo/redo.
///
/// Selection is deliberately absent: it is UI state, not diagram content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_diagram(diagram: &Diagram) -> Self {
        Self {
            entities: diagram.entities.clone(),
            relationships: diagram.relationships.clone(),
            selected: None,
        }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn find_entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == entity_id)
    }

    pub(crate) fn find_entity_mut(&mut self, entity_id: &str) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == entity_id)
    }

    pub fn find_relationship(&self, relationship_id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == relationship_id)
    }

    /// Deep copy of the current content
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            entities: self.entities.clone(),
            relationships: self.relationships.clone(),
        }
    }

    /// Install `snapshot` as current content and hand back what it replaced.
    /// Selection is left as it was.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) -> Snapshot {
        Snapshot {
            entities: std::mem::replace(&mut self.entities, snapshot.entities),
            relationships: std::mem::replace(&mut self.relationships, snapshot.relationships),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaflow_model::{Field, SqlType};

    #[test]
    fn test_snapshot_is_independent_of_live_state() {
        let mut canvas = Canvas::new();
        canvas
            .entities
            .push(Entity::relational("t1", "users").with_field(Field::new("f1", "id", SqlType::Int)));

        let snapshot = canvas.snapshot();
        canvas.entities[0].name = "accounts".to_string();
        canvas.entities[0].fields.clear();

        assert_eq!(snapshot.entities[0].name, "users");
        assert_eq!(snapshot.entities[0].fields.len(), 1);
    }

    #[test]
    fn test_restore_keeps_selection() {
        let mut canvas = Canvas::new();
        canvas.entities.push(Entity::relational("t1", "users"));
        canvas.selected = Some("t1".to_string());

        let previous = canvas.restore(Snapshot::default());

        assert!(canvas.entities.is_empty());
        assert_eq!(previous.entities.len(), 1);
        assert_eq!(canvas.selected(), Some("t1"));
    }
}
