use crate::definition::{NodeDefinition, validate_definition};
use crate::error::GraphError;
use crate::graph::{PendingNode, Position};
use ahash::AHashMap;
use itertools::Itertools;

mod node_type;
mod widget;

pub use node_type::{ComputeInputs, NodeType, Outputs};
pub use widget::Widget;

/// Maps node-type names to their capabilities and widget kinds to their hooks.
///
/// Built once at startup and then shared read-only (typically behind an
/// `Arc`) by every graph that places nodes of these types.
pub struct NodeRegistry {
    node_types: AHashMap<String, Box<dyn NodeType>>,
    widgets: AHashMap<String, Box<dyn Widget>>,
}

pub struct NodeRegistryBuilder {
    node_types: AHashMap<String, Box<dyn NodeType>>,
    widgets: AHashMap<String, Box<dyn Widget>>,
}

impl NodeRegistryBuilder {
    pub fn new() -> Self {
        Self {
            node_types: AHashMap::new(),
            widgets: AHashMap::new(),
        }
    }

    /// Registers every node type shipped in [`crate::nodes`].
    pub fn with_builtin_node_types(mut self) -> Self {
        crate::nodes::register_builtin_node_types(&mut self);
        self
    }

    pub fn with_node_type(mut self, node_type: impl NodeType + 'static) -> Self {
        self.register_node_type(Box::new(node_type));
        self
    }

    pub fn with_widget(mut self, widget: impl Widget + 'static) -> Self {
        let kind = widget.widget_type().to_string();
        if self.widgets.insert(kind.clone(), Box::new(widget)).is_some() {
            log::warn!("Widget kind '{}' registered twice; keeping the latest", kind);
        }
        self
    }

    pub(crate) fn register_node_type(&mut self, node_type: Box<dyn NodeType>) {
        let name = node_type.definition().name.clone();
        if self.node_types.insert(name.clone(), node_type).is_some() {
            log::warn!("Node type '{}' registered twice; keeping the latest", name);
        }
    }

    /// Validates every definition and freezes the registry.
    pub fn build(self) -> Result<NodeRegistry, GraphError> {
        for node_type in self.node_types.values() {
            validate_definition(node_type.definition())?;
        }
        log::debug!(
            "Registry built with node types [{}]",
            self.node_types.keys().sorted().join(", ")
        );
        Ok(NodeRegistry {
            node_types: self.node_types,
            widgets: self.widgets,
        })
    }
}

impl Default for NodeRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn builder() -> NodeRegistryBuilder {
        NodeRegistryBuilder::new()
    }

    pub fn node_type(&self, type_name: &str) -> Result<&dyn NodeType, GraphError> {
        self.node_types
            .get(type_name)
            .map(|t| t.as_ref())
            .ok_or_else(|| GraphError::UnknownNodeType(type_name.to_string()))
    }

    pub fn definition(&self, type_name: &str) -> Result<&NodeDefinition, GraphError> {
        self.node_type(type_name).map(|t| t.definition())
    }

    pub fn widget(&self, kind: &str) -> Option<&dyn Widget> {
        self.widgets.get(kind).map(|w| w.as_ref())
    }

    /// Registered node-type names in alphabetical order.
    pub fn type_names(&self) -> Vec<&str> {
        self.node_types.keys().map(String::as_str).sorted().collect()
    }

    /// Builds a node in the constructed phase; see [`PendingNode::prepare`].
    pub fn instantiate(
        &self,
        type_name: &str,
        position: Position,
    ) -> Result<PendingNode, GraphError> {
        PendingNode::new(self, type_name, position)
    }
}
