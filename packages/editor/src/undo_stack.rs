//! # Undo/Redo Stack
//!
//! Snapshot-based history for a canvas.
//!
//! ## Design
//!
//! - Callers take a snapshot *before* a mutation that should be reversible
//! - Undo swaps the most recent snapshot in and moves the current state to
//!   the redo stack
//! - Redo is symmetric
//! - A new snapshot clears the redo stack (a new edit branch invalidates the
//!   future)
//! - Only entities and relationships are captured; selection is untouched
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! stack.snapshot(&canvas);
//! // ... mutate canvas ...
//!
//! stack.undo(&mut canvas);
//! stack.redo(&mut canvas);
//! ```

use crate::{Canvas, Snapshot};

/// Default number of undo levels
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Undo/redo stack for a canvas
#[derive(Debug)]
pub struct UndoStack {
    /// Captured states (most recent last)
    undo_stack: Vec<Snapshot>,

    /// States displaced by undo (most recently undone last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Capture the current canvas content ahead of a mutation
    pub fn snapshot(&mut self, canvas: &Canvas) {
        self.push_undo(canvas.snapshot());

        // New action invalidates future
        self.redo_stack.clear();

        tracing::trace!(levels = self.undo_stack.len(), "history snapshot");
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);

        // Oldest entries go first
        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            let excess = self.undo_stack.len() - self.max_levels;
            self.undo_stack.drain(..excess);
            tracing::trace!(evicted = excess, "history eviction");
        }
    }

    /// Restore the most recent snapshot. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };

        let current = canvas.restore(previous);
        self.redo_stack.push(current);
        true
    }

    /// Reapply the most recently undone state. Returns `false` when there
    /// is nothing to redo.
    pub fn redo(&mut self, canvas: &mut Canvas) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };

        let current = canvas.restore(next);
        self.push_undo(current);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
