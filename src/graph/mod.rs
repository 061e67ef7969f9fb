//! The connection graph: placed node instances and the wires between them.

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::registry::NodeRegistry;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod instance;
mod properties;
mod selection;
mod wiring;

pub use instance::{NodeId, NodeInstance, NodePhase, PendingNode, PortRef, Position};
pub use wiring::{WireOutcome, WireRejection};

pub(crate) use instance::{resolve_input, run_compute};

/// A directed wire from an `out` property to an `in` property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub source_identifier: String,
    pub destination: NodeId,
    pub destination_identifier: String,
}

impl Edge {
    pub fn new(
        source: NodeId,
        source_identifier: &str,
        destination: NodeId,
        destination_identifier: &str,
    ) -> Self {
        Self {
            source,
            source_identifier: source_identifier.to_string(),
            destination,
            destination_identifier: destination_identifier.to_string(),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source, self.source_identifier, self.destination, self.destination_identifier
        )
    }
}

/// Owns every placed node and keeps both endpoints of each wire in sync.
///
/// All mutation goes through `&mut self`, so a propagation pass always runs
/// to completion before the next edit is applied.
pub struct NodeGraph {
    registry: Arc<NodeRegistry>,
    config: GraphConfig,
    nodes: AHashMap<NodeId, NodeInstance>,
    next_node_id: u32,
}

impl NodeGraph {
    pub fn new(registry: Arc<NodeRegistry>) -> Self {
        Self::with_config(registry, GraphConfig::default())
    }

    pub fn with_config(registry: Arc<NodeRegistry>, config: GraphConfig) -> Self {
        Self {
            registry,
            config,
            nodes: AHashMap::new(),
            next_node_id: 0,
        }
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub(crate) fn registry_handle(&self) -> Arc<NodeRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Constructs, sets up and computes a node of `type_name`, then places it.
    ///
    /// The graph stays exclusively borrowed while `setup()` is pending, so no
    /// wiring can observe a half-initialised node.
    pub async fn create_node(
        &mut self,
        type_name: &str,
        x: f64,
        y: f64,
    ) -> Result<NodeId, GraphError> {
        let registry = self.registry_handle();
        let pending = registry.instantiate(type_name, Position::new(x, y))?;
        let instance = pending.prepare(&registry).await?;
        Ok(self.insert_node(instance))
    }

    /// `create_node` at the configured default position.
    pub async fn add_node_at_default(&mut self, type_name: &str) -> Result<NodeId, GraphError> {
        let Position { x, y } = self.config.default_position;
        self.create_node(type_name, x, y).await
    }

    /// Places a ready instance and returns its handle.
    pub fn insert_node(&mut self, mut instance: NodeInstance) -> NodeId {
        debug_assert!(
            instance
                .in_connections
                .values()
                .chain(instance.out_connections.values())
                .all(Vec::is_empty),
            "inserted instances must not carry wires"
        );
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        instance.selected = self.config.start_selected;
        log::info!(
            "Added {} node {} at ({}, {})",
            instance.type_name,
            id,
            instance.position.x,
            instance.position.y
        );
        self.nodes.insert(id, instance);
        id
    }

    /// Severs every wire touching `id` and removes it.
    ///
    /// Protected node types (see `GraphConfig`) are left in place and
    /// `Ok(None)` is returned.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Option<NodeInstance>, GraphError> {
        let node = self.node(id)?;
        if self.config.is_protected(&node.type_name) {
            log::debug!("Refusing to remove protected {} node {}", node.type_name, id);
            return Ok(None);
        }

        // Collect first, then detach, so no connection list is mutated while
        // it is being walked.
        let incident = self.edges_touching(id);
        let mut roots = Vec::new();
        for edge in &incident {
            self.detach_edge(edge)?;
            if edge.destination != id {
                self.notify_bound_widgets(edge.destination, &edge.destination_identifier);
                roots.push(edge.destination);
            }
        }

        let mut instance = self
            .nodes
            .remove(&id)
            .ok_or(GraphError::NodeNotFound(id))?;
        instance.selected = false;
        log::info!(
            "Removed {} node {} and {} wire(s)",
            instance.type_name,
            id,
            incident.len()
        );

        self.recompute_from_roots(&roots);
        Ok(Some(instance))
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeInstance, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeInstance, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Handles of all placed nodes in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().sorted().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) -> Result<(), GraphError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    /// Every wire in the graph, ordered by source node then port names.
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes
            .iter()
            .flat_map(|(&source, node)| {
                node.out_connections.iter().flat_map(move |(port, targets)| {
                    targets
                        .iter()
                        .map(move |t| Edge::new(source, port, t.node, &t.identifier))
                })
            })
            .sorted()
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes
            .values()
            .flat_map(|n| n.out_connections.values())
            .map(Vec::len)
            .sum()
    }

    /// Wires feeding `identifier` on `id`; 0 or 1 for a valid port.
    pub fn in_degree(&self, id: NodeId, identifier: &str) -> Result<usize, GraphError> {
        Ok(self
            .node(id)?
            .in_connections
            .get(identifier)
            .map_or(0, Vec::len))
    }

    /// Wires leaving `identifier` on `id`.
    pub fn out_degree(&self, id: NodeId, identifier: &str) -> Result<usize, GraphError> {
        Ok(self
            .node(id)?
            .out_connections
            .get(identifier)
            .map_or(0, Vec::len))
    }

    pub fn connection_exists(&self, edge: &Edge) -> bool {
        let Ok(source) = self.node(edge.source) else {
            return false;
        };
        source
            .out_connections
            .get(&edge.source_identifier)
            .is_some_and(|targets| {
                targets.iter().any(|t| {
                    t.node == edge.destination && t.identifier == edge.destination_identifier
                })
            })
    }

    /// Whether `to` can be reached from `from` by following wires downstream.
    pub fn is_reachable(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = AHashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(self.downstream_of(current));
        }
        false
    }

    /// Nodes directly fed by `id`, one entry per wire.
    pub(crate) fn downstream_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(&id)
            .into_iter()
            .flat_map(|n| n.out_connections.values())
            .flatten()
            .map(|t| t.node)
    }

    pub(crate) fn nodes_map(&self) -> &AHashMap<NodeId, NodeInstance> {
        &self.nodes
    }

    pub(crate) fn nodes_map_mut(&mut self) -> &mut AHashMap<NodeId, NodeInstance> {
        &mut self.nodes
    }

    /// Every wire with `id` on either end.
    fn edges_touching(&self, id: NodeId) -> Vec<Edge> {
        let Some(node) = self.nodes.get(&id) else {
            return Vec::new();
        };
        let incoming = node.in_connections.iter().flat_map(|(port, sources)| {
            sources
                .iter()
                .map(move |s| Edge::new(s.node, &s.identifier, id, port))
        });
        let outgoing = node.out_connections.iter().flat_map(|(port, targets)| {
            targets
                .iter()
                .map(move |t| Edge::new(id, port, t.node, &t.identifier))
        });
        incoming.chain(outgoing).collect()
    }

    /// Adds both halves of `edge`. Callers have already validated it.
    fn attach_edge(&mut self, edge: &Edge) -> Result<(), GraphError> {
        if !self.contains(edge.destination) {
            return Err(GraphError::NodeNotFound(edge.destination));
        }
        self.node_mut(edge.source)?
            .out_connections
            .entry(edge.source_identifier.clone())
            .or_default()
            .push(PortRef::new(edge.destination, &edge.destination_identifier));
        self.node_mut(edge.destination)?
            .in_connections
            .entry(edge.destination_identifier.clone())
            .or_default()
            .push(PortRef::new(edge.source, &edge.source_identifier));
        Ok(())
    }

    /// Removes both halves of `edge`, or neither if either half is missing.
    fn detach_edge(&mut self, edge: &Edge) -> Result<(), GraphError> {
        let out_index = self
            .node(edge.source)?
            .out_connections
            .get(&edge.source_identifier)
            .and_then(|targets| {
                targets.iter().position(|t| {
                    t.node == edge.destination && t.identifier == edge.destination_identifier
                })
            });
        let in_index = self
            .node(edge.destination)?
            .in_connections
            .get(&edge.destination_identifier)
            .and_then(|sources| {
                sources
                    .iter()
                    .position(|s| s.node == edge.source && s.identifier == edge.source_identifier)
            });

        let (Some(out_index), Some(in_index)) = (out_index, in_index) else {
            return Err(GraphError::EdgeNotFound(edge.clone()));
        };

        if let Some(targets) = self
            .node_mut(edge.source)?
            .out_connections
            .get_mut(&edge.source_identifier)
        {
            targets.remove(out_index);
        }
        if let Some(sources) = self
            .node_mut(edge.destination)?
            .in_connections
            .get_mut(&edge.destination_identifier)
        {
            sources.remove(in_index);
        }
        Ok(())
    }
}
