use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid diagram payload: {0}")]
    Json(#[from] serde_json::Error),
}
