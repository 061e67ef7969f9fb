use crate::graph::{Edge, NodeId};
use crate::value::Value;
use thiserror::Error;

/// Errors produced by the registry, graph mutation and recomputation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node type '{0}' is not registered")]
    UnknownNodeType(String),

    #[error("Node {0} does not exist in the graph")]
    NodeNotFound(NodeId),

    #[error("Node type '{type_name}' has no property '{identifier}'")]
    UnknownProperty {
        type_name: String,
        identifier: String,
    },

    #[error("No wire connects {0}")]
    EdgeNotFound(Edge),

    #[error("{0} node has no compute() implementation")]
    MissingCompute(String),

    #[error("Setup of node type '{type_name}' failed: {message}")]
    SetupFailed { type_name: String, message: String },

    #[error(
        "Type mismatch reading property '{identifier}': expected {expected}, but found {} '{found}'",
        .found.kind()
    )]
    TypeMismatch {
        identifier: String,
        expected: String,
        found: Value,
    },

    #[error("Definition of node type '{type_name}' is invalid: {message}")]
    InvalidDefinition { type_name: String, message: String },

    #[error("Node type '{type_name}' declares property '{identifier}' more than once")]
    DuplicateProperty {
        type_name: String,
        identifier: String,
    },
}

/// Errors that can occur while loading a `GraphConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
