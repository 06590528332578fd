//! Error types for the editor

use thiserror::Error;

/// Failures at the editor's decoding boundaries.
///
/// Applying events never fails; stale references are no-ops.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid event payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Model error: {0}")]
    Model(#[from] schemaflow_model::ModelError),
}
