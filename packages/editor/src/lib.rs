//! # SchemaFlow Editor
//!
//! Core diagram editing engine for SchemaFlow.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ intents: add_table, toggle_primary_key, ... │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: single dispatch point              │
//! │  - Snapshot history (undo/redo)             │
//! │  - Stamp events (diagram, actor, time)      │
//! │  - Apply to canvas                          │
//! │  - Publish to collaborators                 │
//! └─────────────────────────────────────────────┘
//!          ↓                          ↑
//! ┌──────────────────┐      ┌──────────────────┐
//! │ channel: outbound│      │ receive: inbound │
//! │ (fire-and-forget)│      │ (no echo, no     │
//! │                  │      │  history)        │
//! └──────────────────┘      └──────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Events are the only mutation path**: local and remote changes apply
//!    through the same reducer
//! 2. **Stale is not an error**: events naming missing targets are no-ops
//! 3. **History is local**: undo/redo restores snapshots and is never
//!    broadcast
//! 4. **No echo**: remote events are never re-published
//!
//! ## Usage
//!
//! ### Single-user editing
//!
//! ```rust,ignore
//! use schemaflow_editor::EditSession;
//!
//! let mut session = EditSession::new("diagram-1", "alice");
//!
//! let users = session.add_table();
//! session.rename_entity(&users, "users");
//! let email = session.add_field(&users).unwrap();
//! session.toggle_unique(&users, &email);
//!
//! session.undo();
//! let payload = session.content_json()?;
//! ```
//!
//! ### Collaborative editing
//!
//! ```rust,ignore
//! use schemaflow_editor::{EditSession, EventRelay, RelayChannel};
//! use std::sync::Arc;
//!
//! let relay = Arc::new(EventRelay::new());
//! let mut inbox = relay.add_peer("bob");
//!
//! let mut bob = EditSession::new("diagram-1", "bob")
//!     .with_channel(RelayChannel::new(relay.clone()));
//!
//! // Apply whatever alice published since the last tick
//! bob.drain(&mut inbox);
//! ```

mod canvas;
mod channel;
mod config;
mod errors;
mod events;
mod session;
mod undo_stack;

pub use canvas::{Canvas, Snapshot};
pub use channel::{CollaborationChannel, EventRelay, MpscChannel, Offline, RelayChannel};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use errors::EditorError;
pub use events::{Applied, DiagramEvent, EventKind};
pub use session::{EditSession, FieldFlag};
pub use undo_stack::{UndoStack, DEFAULT_HISTORY_DEPTH};

// Re-export the data model for convenience
pub use schemaflow_model as model;
