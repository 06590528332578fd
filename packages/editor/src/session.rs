//! # Edit Session
//!
//! One session per open diagram. The session exclusively owns the diagram's
//! live state and is the single mutation entry point for it:
//!
//! ```text
//! intent ──> dispatch ──> [snapshot] ──> stamp ──> apply ──> channel.send
//! remote ──> receive  ──────────────────────────> apply
//! ```
//!
//! Remote events are applied exactly once, with no history snapshot and no
//! outbound echo.

use crate::channel::{CollaborationChannel, Offline};
use crate::{Applied, Canvas, DiagramEvent, EditorConfig, EditorError, EventKind, UndoStack};
use chrono::Utc;
use schemaflow_model::{
    Cardinality, DatabaseKind, Diagram, DocumentType, Entity, EntityChanges, EntityKind, Field,
    FieldChanges, FieldMapping, IdGenerator, Metadata, Position, Relationship, SqlType,
};
use tokio::sync::mpsc::UnboundedReceiver;

/// Boolean field attributes that can be toggled as one discrete edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldFlag {
    PrimaryKey,
    ForeignKey,
    Nullable,
    Unique,
}

impl FieldFlag {
    fn read(&self, field: &Field) -> bool {
        match self {
            FieldFlag::PrimaryKey => field.is_primary_key,
            FieldFlag::ForeignKey => field.is_foreign_key,
            FieldFlag::Nullable => field.is_nullable,
            FieldFlag::Unique => field.is_unique,
        }
    }

    fn changes(&self, value: bool) -> FieldChanges {
        let mut changes = FieldChanges::default();
        match self {
            FieldFlag::PrimaryKey => changes.is_primary_key = Some(value),
            FieldFlag::ForeignKey => changes.is_foreign_key = Some(value),
            FieldFlag::Nullable => changes.is_nullable = Some(value),
            FieldFlag::Unique => changes.is_unique = Some(value),
        }
        changes
    }
}

/// How an event enters the dispatcher
#[derive(Debug, Clone, Copy)]
struct Route {
    snapshot: bool,
    rebroadcast: bool,
}

/// Editing state for one diagram and one actor
pub struct EditSession {
    diagram_id: String,
    actor_id: String,
    canvas: Canvas,
    metadata: Metadata,
    history: UndoStack,
    ids: IdGenerator,
    channel: Box<dyn CollaborationChannel>,
}

impl EditSession {
    /// Create an empty, offline session
    pub fn new(diagram_id: impl Into<String>, actor_id: impl Into<String>) -> Self {
        let diagram_id = diagram_id.into();
        let actor_id = actor_id.into();
        Self {
            ids: IdGenerator::new(&diagram_id, &actor_id),
            diagram_id,
            actor_id,
            canvas: Canvas::new(),
            metadata: Metadata::default(),
            history: UndoStack::new(),
            channel: Box::new(Offline),
        }
    }

    pub fn with_config(diagram_id: impl Into<String>, config: &EditorConfig) -> Self {
        let mut session = Self::new(diagram_id, config.actor_id.clone());
        session.history = UndoStack::with_max_levels(config.history_depth);
        session
    }

    pub fn with_channel(mut self, channel: impl CollaborationChannel + 'static) -> Self {
        self.set_channel(channel);
        self
    }

    pub fn with_database_kind(mut self, database_kind: DatabaseKind) -> Self {
        self.metadata.database_kind = database_kind;
        self
    }

    pub fn set_channel(&mut self, channel: impl CollaborationChannel + 'static) {
        self.channel = Box::new(channel);
    }

    /// Disconnect from collaborators
    pub fn go_offline(&mut self) {
        self.channel = Box::new(Offline);
    }

    pub fn diagram_id(&self) -> &str {
        &self.diagram_id
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn entities(&self) -> &[Entity] {
        self.canvas.entities()
    }

    pub fn relationships(&self) -> &[Relationship] {
        self.canvas.relationships()
    }

    pub fn selected(&self) -> Option<&str> {
        self.canvas.selected()
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    // --- Event dispatch ---

    /// Stamp, apply and publish a locally-originated event.
    ///
    /// With `should_snapshot`, the current content is pushed onto the undo
    /// stack first. Continuous input (per-keystroke renames) passes `false`.
    pub fn dispatch(&mut self, kind: EventKind, should_snapshot: bool) -> Applied {
        let event = DiagramEvent {
            kind,
            diagram_id: self.diagram_id.clone(),
            actor_id: self.actor_id.clone(),
            timestamp: Utc::now().timestamp_millis(),
        };

        self.route(
            event,
            Route {
                snapshot: should_snapshot,
                rebroadcast: true,
            },
        )
    }

    /// Apply an event that arrived from a collaborator
    pub fn receive(&mut self, event: DiagramEvent) -> Applied {
        if event.diagram_id != self.diagram_id {
            tracing::warn!(
                diagram = %event.diagram_id,
                expected = %self.diagram_id,
                "ignoring event for another diagram"
            );
            return Applied::Stale;
        }

        self.route(
            event,
            Route {
                snapshot: false,
                rebroadcast: false,
            },
        )
    }

    /// Decode a wire payload and apply it as a remote event
    pub fn receive_json(&mut self, payload: &str) -> Result<Applied, EditorError> {
        let event = DiagramEvent::from_json(payload)?;
        Ok(self.receive(event))
    }

    /// Apply every event currently queued in `inbox`; returns how many
    /// changed the canvas
    pub fn drain(&mut self, inbox: &mut UnboundedReceiver<DiagramEvent>) -> usize {
        let mut changed = 0;
        while let Ok(event) = inbox.try_recv() {
            if self.receive(event) == Applied::Changed {
                changed += 1;
            }
        }
        changed
    }

    fn route(&mut self, event: DiagramEvent, route: Route) -> Applied {
        tracing::debug!(
            event = event.kind.name(),
            actor = %event.actor_id,
            snapshot = route.snapshot,
            rebroadcast = route.rebroadcast,
            "dispatch"
        );

        if route.snapshot {
            self.history.snapshot(&self.canvas);
        }

        let applied = event.kind.apply(&mut self.canvas);
        if applied == Applied::Stale {
            tracing::debug!(event = event.kind.name(), "stale event, nothing changed");
        }

        if route.rebroadcast {
            self.channel.send(&event);
        }

        applied
    }

    // --- History ---

    /// Capture the current content ahead of an edit made in several
    /// non-snapshotting steps (e.g. when a text input gains focus)
    pub fn snapshot(&mut self) {
        self.history.snapshot(&self.canvas);
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.canvas)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.canvas)
    }

    // --- Intents ---

    /// Add a table (or collection, for document diagrams) with a default
    /// identity field. Returns the new entity id.
    pub fn add_table(&mut self) -> String {
        let kind = self.metadata.database_kind.entity_kind();
        let n = self.canvas.entities.len() + 1;
        let entity_id = self.ids.new_id();

        let (name, identity) = match kind {
            EntityKind::Relational => (
                format!("Table {}", n),
                Field::new(self.ids.new_id(), "id", SqlType::Int).primary_key(),
            ),
            EntityKind::Document => (
                format!("Collection {}", n),
                Field::new(self.ids.new_id(), "_id", DocumentType::ObjectId).primary_key(),
            ),
        };

        // Cascade new tables so they don't stack exactly on top of each other
        let offset = ((n - 1) % 5) as f64 * 24.0;
        let entity = Entity::new(entity_id.clone(), kind, name)
            .at(Position::new(100.0 + offset, 100.0 + offset))
            .with_field(identity);

        self.dispatch(EventKind::EntityAdded { entity }, true);
        entity_id
    }

    pub fn delete_entity(&mut self, entity_id: &str) -> Applied {
        self.dispatch(
            EventKind::EntityDeleted {
                entity_id: entity_id.to_string(),
            },
            true,
        )
    }

    /// Continuous input; callers snapshot on focus
    pub fn rename_entity(&mut self, entity_id: &str, name: &str) -> Applied {
        self.dispatch(
            EventKind::EntityUpdated {
                entity_id: entity_id.to_string(),
                changes: EntityChanges::rename(name),
            },
            false,
        )
    }

    pub fn move_entity(&mut self, entity_id: &str, position: Position) -> Applied {
        self.dispatch(
            EventKind::EntityUpdated {
                entity_id: entity_id.to_string(),
                changes: EntityChanges::move_to(position),
            },
            true,
        )
    }

    /// Append a nullable `new_field`. Returns the field id, or `None` when
    /// the entity does not exist.
    pub fn add_field(&mut self, entity_id: &str) -> Option<String> {
        let kind = self.canvas.find_entity(entity_id)?.kind;
        let field_id = self.ids.new_id();

        let field = match kind {
            EntityKind::Relational => Field::new(field_id.clone(), "new_field", SqlType::Varchar),
            EntityKind::Document => Field::new(field_id.clone(), "new_field", DocumentType::String),
        }
        .nullable();

        self.dispatch(
            EventKind::FieldAdded {
                entity_id: entity_id.to_string(),
                field,
            },
            true,
        );
        Some(field_id)
    }

    /// Continuous input; callers snapshot on focus
    pub fn update_field(&mut self, entity_id: &str, field_id: &str, changes: FieldChanges) -> Applied {
        self.dispatch(
            EventKind::FieldUpdated {
                entity_id: entity_id.to_string(),
                field_id: field_id.to_string(),
                changes,
            },
            false,
        )
    }

    /// Flip a boolean attribute as one undoable step. A missing field is a
    /// no-op and takes no snapshot.
    pub fn toggle_flag(&mut self, entity_id: &str, field_id: &str, flag: FieldFlag) -> Applied {
        let Some(current) = self
            .canvas
            .find_entity(entity_id)
            .and_then(|e| e.find_field(field_id))
            .map(|f| flag.read(f))
        else {
            return Applied::Stale;
        };

        self.dispatch(
            EventKind::FieldUpdated {
                entity_id: entity_id.to_string(),
                field_id: field_id.to_string(),
                changes: flag.changes(!current),
            },
            true,
        )
    }

    pub fn toggle_primary_key(&mut self, entity_id: &str, field_id: &str) -> Applied {
        self.toggle_flag(entity_id, field_id, FieldFlag::PrimaryKey)
    }

    pub fn toggle_foreign_key(&mut self, entity_id: &str, field_id: &str) -> Applied {
        self.toggle_flag(entity_id, field_id, FieldFlag::ForeignKey)
    }

    pub fn toggle_nullable(&mut self, entity_id: &str, field_id: &str) -> Applied {
        self.toggle_flag(entity_id, field_id, FieldFlag::Nullable)
    }

    pub fn toggle_unique(&mut self, entity_id: &str, field_id: &str) -> Applied {
        self.toggle_flag(entity_id, field_id, FieldFlag::Unique)
    }

    pub fn delete_field(&mut self, entity_id: &str, field_id: &str) -> Applied {
        self.dispatch(
            EventKind::FieldDeleted {
                entity_id: entity_id.to_string(),
                field_id: field_id.to_string(),
            },
            true,
        )
    }

    /// Draw a relationship from `source` to `target`. Returns its id.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        mappings: Vec<FieldMapping>,
        cardinality: Cardinality,
    ) -> String {
        let relationship_id = self.ids.new_id();
        let mut relationship =
            Relationship::new(relationship_id.clone(), source, target).with_cardinality(cardinality);
        relationship.field_mappings = mappings;

        self.dispatch(EventKind::RelationshipAdded { relationship }, true);
        relationship_id
    }

    pub fn disconnect(&mut self, relationship_id: &str) -> Applied {
        self.dispatch(
            EventKind::RelationshipDeleted {
                relationship_id: relationship_id.to_string(),
            },
            true,
        )
    }

    /// Selection is local UI state; it is neither an event nor history
    pub fn select(&mut self, entity_id: Option<&str>) {
        self.canvas.selected = entity_id.map(str::to_string);
    }

    // --- Persistence boundary ---

    /// Replace the whole diagram (initial load or version restore).
    /// Selection and history are reset.
    pub fn load(&mut self, diagram: Diagram) {
        self.canvas = Canvas::from_diagram(&diagram);
        self.metadata = diagram.metadata;
        self.history.clear();
    }

    pub fn load_json(&mut self, source: &str) -> Result<(), EditorError> {
        let diagram = Diagram::from_json(source)?;
        self.load(diagram);
        Ok(())
    }

    /// Persistence payload of the current state, with `updated_at` bumped
    pub fn content(&self) -> Diagram {
        let mut metadata = self.metadata.clone();
        metadata.updated_at = Utc::now();

        Diagram {
            entities: self.canvas.entities.clone(),
            relationships: self.canvas.relationships.clone(),
            metadata,
        }
    }

    pub fn content_json(&self) -> Result<String, EditorError> {
        Ok(self.content().to_json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = EditSession::new("d1", "alice");

        assert_eq!(session.diagram_id(), "d1");
        assert_eq!(session.actor_id(), "alice");
        assert!(session.entities().is_empty());
        assert!(session.selected().is_none());
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_with_config() {
        let config = EditorConfig {
            history_depth: 3,
            actor_id: "carol".to_string(),
        };
        let session = EditSession::with_config("d1", &config);

        assert_eq!(session.actor_id(), "carol");
        assert_eq!(session.history().max_levels(), 3);
    }

    #[test]
    fn test_add_table_relational_defaults() {
        let mut session = EditSession::new("d1", "alice");
        let id = session.add_table();

        let table = session.canvas().find_entity(&id).unwrap();
        assert_eq!(table.name, "Table 1");
        assert!(table.is_relational());
        assert_eq!(table.fields.len(), 1);
        assert_eq!(table.fields[0].name, "id");
        assert!(table.fields[0].is_primary_key);
        assert_eq!(session.selected(), Some(id.as_str()));
        assert_eq!(session.history().undo_levels(), 1);
    }

    #[test]
    fn test_add_table_document_defaults() {
        let mut session = EditSession::new("d1", "alice").with_database_kind(DatabaseKind::Mongodb);
        session.add_table();
        let id = session.add_table();

        let collection = session.canvas().find_entity(&id).unwrap();
        assert_eq!(collection.name, "Collection 2");
        assert!(collection.is_document());
        assert_eq!(collection.fields[0].name, "_id");
        assert_eq!(
            collection.fields[0].data_type,
            Some(DocumentType::ObjectId.into())
        );
    }

    #[test]
    fn test_add_field_to_missing_entity() {
        let mut session = EditSession::new("d1", "alice");
        assert!(session.add_field("ghost").is_none());
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_rename_does_not_snapshot() {
        let mut session = EditSession::new("d1", "alice");
        let id = session.add_table();
        let levels = session.history().undo_levels();

        session.rename_entity(&id, "u");
        session.rename_entity(&id, "us");
        session.rename_entity(&id, "users");

        assert_eq!(session.history().undo_levels(), levels);
        assert_eq!(session.canvas().find_entity(&id).unwrap().name, "users");
    }

    #[test]
    fn test_toggle_missing_field_takes_no_snapshot() {
        let mut session = EditSession::new("d1", "alice");
        let id = session.add_table();
        let levels = session.history().undo_levels();

        assert_eq!(session.toggle_primary_key(&id, "ghost"), Applied::Stale);
        assert_eq!(session.history().undo_levels(), levels);
    }

    #[test]
    fn test_toggle_flips_and_undoes() {
        let mut session = EditSession::new("d1", "alice");
        let table = session.add_table();
        let field = session.add_field(&table).unwrap();

        session.toggle_unique(&table, &field);
        assert!(session.canvas().find_entity(&table).unwrap().find_field(&field).unwrap().is_unique);

        session.undo();
        assert!(!session.canvas().find_entity(&table).unwrap().find_field(&field).unwrap().is_unique);
    }

    #[test]
    fn test_select() {
        let mut session = EditSession::new("d1", "alice");
        let id = session.add_table();

        session.select(None);
        assert!(session.selected().is_none());

        session.select(Some(&id));
        assert_eq!(session.selected(), Some(id.as_str()));
    }

    #[test]
    fn test_load_resets_history_and_selection() {
        let mut session = EditSession::new("d1", "alice");
        session.add_table();
        assert!(session.history().can_undo());

        let diagram = Diagram::new(DatabaseKind::Mongodb);
        session.load(diagram);

        assert!(session.entities().is_empty());
        assert!(session.selected().is_none());
        assert!(!session.history().can_undo());
        assert_eq!(session.metadata().database_kind, DatabaseKind::Mongodb);
    }

    #[test]
    fn test_content_bumps_updated_at() {
        let mut session = EditSession::new("d1", "alice");
        session.add_table();
        let created = session.metadata().updated_at;

        let content = session.content();
        assert_eq!(content.entities.len(), 1);
        assert!(content.metadata.updated_at >= created);
    }
}
