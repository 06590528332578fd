use crate::undo_stack::DEFAULT_HISTORY_DEPTH;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "schemaflow.config.json";

/// Editor session configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo levels (0 = unlimited)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Actor id stamped on locally-originated events
    #[serde(default = "default_actor_id")]
    pub actor_id: String,
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

fn default_actor_id() -> String {
    "local".to_string()
}

impl EditorConfig {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(EditorConfig::default())
        }
    }

    pub fn from_json(source: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
            actor_id: default_actor_id(),
        }
    }
}
