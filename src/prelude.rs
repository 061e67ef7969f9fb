//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the nodegraph crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use nodegraph::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example() -> Result<(), GraphError> {
//! let config = GraphConfig::from_json_str(r#"{ "start_selected": true }"#)
//!     .expect("valid config");
//! let registry = Arc::new(NodeRegistry::builder().with_builtin_node_types().build()?);
//! let mut graph = NodeGraph::with_config(registry, config);
//!
//! let color = tokio_test::block_on(graph.add_node_at_default("Color"))?;
//! for layer in find_downstream_depth_layers(&graph, color)? {
//!     println!("{:?}", layer);
//! }
//! # Ok(())
//! # }
//! ```

// Graph and propagation
pub use crate::graph::{
    Edge, NodeGraph, NodeId, NodeInstance, NodePhase, PendingNode, Position, WireOutcome,
    WireRejection,
};
pub use crate::propagation::{PropagationReport, find_downstream_depth_layers};

// Registry and node definitions
pub use crate::definition::{
    ConnectorDefinition, Direction, NodeDefinition, PropertyDefinition, RowData, RowDefinition,
};
pub use crate::registry::{ComputeInputs, NodeRegistry, NodeType, Outputs, Widget};

// Values
pub use crate::value::{Color, Value};

// Configuration and errors
pub use crate::config::GraphConfig;
pub use crate::error::{ConfigError, GraphError};
