use crate::definition::{Direction, RowData};
use crate::error::GraphError;
use crate::registry::{ComputeInputs, NodeRegistry, Outputs};
use crate::value::Value;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a node placed in a [`super::NodeGraph`].
///
/// Handles are never reused within one graph, so a handle to a removed node
/// fails lookups with `NodeNotFound` instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Placement of a node on the canvas, in graph (unscaled) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The far side of a wire as seen from one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node: NodeId,
    pub identifier: String,
}

impl PortRef {
    pub fn new(node: NodeId, identifier: &str) -> Self {
        Self {
            node,
            identifier: identifier.to_string(),
        }
    }
}

/// Lifecycle phase of a node instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodePhase {
    /// Built from its definition; `setup()` and the initial compute are pending.
    Constructed,
    /// Fully initialised and allowed into a graph.
    Ready,
}

/// Runtime state of one placed node.
///
/// Only obtainable through [`PendingNode::prepare`], so every instance a graph
/// sees is in the ready phase.
#[derive(Debug)]
pub struct NodeInstance {
    pub(crate) type_name: String,
    pub(crate) property_values: AHashMap<String, Value>,
    pub(crate) in_connections: AHashMap<String, Vec<PortRef>>,
    pub(crate) out_connections: AHashMap<String, Vec<PortRef>>,
    pub(crate) row_data: AHashMap<String, RowData>,
    pub(crate) position: Position,
    pub(crate) selected: bool,
    phase: NodePhase,
}

impl NodeInstance {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn phase(&self) -> NodePhase {
        self.phase
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn property_values(&self) -> &AHashMap<String, Value> {
        &self.property_values
    }

    /// The node's own stored value, ignoring any wire.
    pub fn stored_value(&self, identifier: &str) -> Option<&Value> {
        self.property_values.get(identifier)
    }

    pub fn in_connections(&self) -> &AHashMap<String, Vec<PortRef>> {
        &self.in_connections
    }

    pub fn out_connections(&self) -> &AHashMap<String, Vec<PortRef>> {
        &self.out_connections
    }

    /// The wire feeding `identifier`, if any.
    pub fn input_source(&self, identifier: &str) -> Option<&PortRef> {
        self.in_connections
            .get(identifier)
            .and_then(|edges| edges.first())
    }

    pub fn row_data(&self, row_name: &str) -> Option<&RowData> {
        self.row_data.get(row_name)
    }

    pub fn has_input(&self, identifier: &str) -> bool {
        self.in_connections.contains_key(identifier)
    }

    pub fn has_output(&self, identifier: &str) -> bool {
        self.out_connections.contains_key(identifier)
    }

    /// Stores a compute result, keeping only declared `out` properties.
    /// Returns the identifiers that were written.
    pub(crate) fn apply_outputs(&mut self, outputs: Outputs) -> Vec<String> {
        let mut written = Vec::with_capacity(outputs.len());
        for (identifier, value) in outputs {
            if !self.out_connections.contains_key(&identifier) {
                log::warn!(
                    "{} node produced '{}', which is not one of its outputs",
                    self.type_name,
                    identifier
                );
                continue;
            }
            self.property_values.insert(identifier.clone(), value);
            written.push(identifier);
        }
        written
    }

    /// Calls `property_value_was_updated` on every row bound to `identifier`.
    pub(crate) fn notify_bound_widgets(&self, registry: &NodeRegistry, identifier: &str) {
        let Ok(definition) = registry.definition(&self.type_name) else {
            return;
        };
        for row in definition.rows_bound_to(identifier) {
            if let Some(widget) = registry.widget(&row.widget) {
                widget.property_value_was_updated(self, row);
            }
        }
    }
}

/// A node in the constructed phase, not yet usable in a graph.
#[derive(Debug)]
pub struct PendingNode {
    instance: NodeInstance,
}

impl PendingNode {
    /// Builds connection maps, default property values and row state from the
    /// registered definition.
    pub(crate) fn new(
        registry: &NodeRegistry,
        type_name: &str,
        position: Position,
    ) -> Result<Self, GraphError> {
        let definition = registry.definition(type_name)?;

        let empty_connections = |direction: Direction| {
            definition
                .properties_in(direction)
                .map(|p| (p.identifier.clone(), Vec::new()))
                .collect::<AHashMap<_, _>>()
        };

        let property_values: AHashMap<String, Value> = definition
            .properties
            .iter()
            .map(|p| (p.identifier.clone(), p.default.clone()))
            .collect();

        let mut row_data: AHashMap<String, RowData> = definition
            .rows
            .iter()
            .filter_map(|row| row.name.clone().map(|name| (name, row.data.clone())))
            .collect();

        for row in &definition.rows {
            let (Some(name), Some(widget)) = (&row.name, registry.widget(&row.widget)) else {
                continue;
            };
            if let Some(data) = row_data.get_mut(name) {
                widget.reset_row_data_to_property_value(&property_values, data, row);
            }
        }

        Ok(Self {
            instance: NodeInstance {
                type_name: definition.name.clone(),
                property_values,
                in_connections: empty_connections(Direction::In),
                out_connections: empty_connections(Direction::Out),
                row_data,
                position,
                selected: false,
                phase: NodePhase::Constructed,
            },
        })
    }

    pub fn phase(&self) -> NodePhase {
        self.instance.phase
    }

    pub fn instance(&self) -> &NodeInstance {
        &self.instance
    }

    /// Runs the type's `setup()` and the initial compute, producing a ready
    /// instance whose outputs are consistent with its defaults.
    pub async fn prepare(self, registry: &NodeRegistry) -> Result<NodeInstance, GraphError> {
        let mut instance = self.instance;
        let node_type = registry.node_type(&instance.type_name)?;

        node_type.setup().await?;

        if let Some(outputs) = run_compute(registry, &instance, None) {
            for identifier in instance.apply_outputs(outputs) {
                instance.notify_bound_widgets(registry, &identifier);
            }
        }

        instance.phase = NodePhase::Ready;
        Ok(instance)
    }
}

/// Looks up the value an input currently sees: the upstream output when the
/// input is wired, otherwise the node's own stored value.
pub(crate) fn resolve_input<'a>(
    node: &'a NodeInstance,
    nodes: Option<&'a AHashMap<NodeId, NodeInstance>>,
    identifier: &str,
) -> Option<&'a Value> {
    if let (Some(source), Some(nodes)) = (node.input_source(identifier), nodes) {
        if let Some(upstream) = nodes.get(&source.node) {
            return upstream.property_values.get(&source.identifier);
        }
    }
    node.property_values.get(identifier)
}

/// Invokes the node type's `compute`, logging instead of failing.
pub(crate) fn run_compute(
    registry: &NodeRegistry,
    node: &NodeInstance,
    nodes: Option<&AHashMap<NodeId, NodeInstance>>,
) -> Option<Outputs> {
    let node_type = match registry.node_type(&node.type_name) {
        Ok(node_type) => node_type,
        Err(e) => {
            log::error!("{}", e);
            return None;
        }
    };
    match node_type.compute(&ComputeInputs::new(node, nodes)) {
        Ok(outputs) => Some(outputs),
        Err(e @ GraphError::MissingCompute(_)) => {
            log::error!("{}", e);
            None
        }
        Err(e) => {
            log::warn!("{} node failed to compute: {}", node.type_name, e);
            None
        }
    }
}
