//! # nodegraph - Node Graph Model and Propagation Engine
//!
//! **nodegraph** is the data model behind a visual node editor: node types are
//! registered once, placed as instances, wired output-to-input, and every
//! edit recomputes exactly the nodes that depend on it, in dependency order.
//!
//! ## Core Workflow
//!
//! 1.  **Register Node Types**: Implement [`NodeType`](registry::NodeType) for your
//!     operations (or use the built-ins in [`nodes`]) and build a
//!     [`NodeRegistry`](registry::NodeRegistry) with `NodeRegistry::builder()`.
//! 2.  **Create a Graph**: Share the registry with a [`NodeGraph`](graph::NodeGraph)
//!     through an `Arc`, optionally with a [`GraphConfig`](config::GraphConfig).
//! 3.  **Place Nodes**: `create_node` runs each type's asynchronous `setup()` and
//!     its first `compute` before the node becomes visible to wiring.
//! 4.  **Wire and Edit**: `connect_wire`, `disconnect_wire` and
//!     `set_final_property_value_and_propagate` keep every output consistent by
//!     recomputing the downstream nodes layer by layer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nodegraph::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), GraphError> {
//!     let registry = Arc::new(NodeRegistry::builder().with_builtin_node_types().build()?);
//!     let mut graph = NodeGraph::new(registry);
//!
//!     tokio_test::block_on(async {
//!         let noise = graph.create_node("Perlin Noise", 0.0, 0.0).await?;
//!         let output = graph.create_node("Output", 300.0, 0.0).await?;
//!
//!         let outcome = graph.connect_wire(noise, "pattern", output, "diffuse")?;
//!         assert!(outcome.is_connected());
//!
//!         // Editing the scale recomputes the noise node, then everything it feeds.
//!         let report =
//!             graph.set_final_property_value_and_propagate(noise, "scale", Value::Number(8.0))?;
//!         println!("Recomputed {:?}", report.order);
//!
//!         println!("{}", nodegraph::nodes::output::fragment_shader(&graph, output)?);
//!         Ok::<(), GraphError>(())
//!     })
//! }
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod graph;
pub mod nodes;
pub mod prelude;
pub mod propagation;
pub mod registry;
pub mod value;
