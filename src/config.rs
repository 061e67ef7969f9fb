use crate::error::ConfigError;
use crate::graph::Position;
use serde::{Deserialize, Serialize};
use std::fs;

/// Behavioural settings of a [`crate::graph::NodeGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Node types that `remove_node` refuses to delete.
    pub protected_node_types: Vec<String>,
    /// Where `add_node_at_default` places new nodes.
    pub default_position: Position,
    /// Whether newly inserted nodes start out selected.
    pub start_selected: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            protected_node_types: vec!["Output".to_string()],
            default_position: Position::new(100.0, 100.0),
            start_selected: false,
        }
    }
}

impl GraphConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_protected(&self, type_name: &str) -> bool {
        self.protected_node_types.iter().any(|t| t == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GraphConfig::from_json_str(r#"{ "start_selected": true }"#).unwrap();
        assert!(config.start_selected);
        assert!(config.is_protected("Output"));
        assert_eq!(config.default_position, Position::new(100.0, 100.0));
    }

    #[test]
    fn protected_types_can_be_cleared() {
        let config = GraphConfig::from_json_str(r#"{ "protected_node_types": [] }"#).unwrap();
        assert!(!config.is_protected("Output"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GraphConfig::from_json_str("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
