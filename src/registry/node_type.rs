use crate::definition::NodeDefinition;
use crate::error::GraphError;
use crate::graph::{NodeId, NodeInstance, resolve_input};
use crate::value::{Color, Value};
use ahash::AHashMap;
use async_trait::async_trait;

/// Output property values produced by one `compute` call.
pub type Outputs = Vec<(String, Value)>;

/// The capability contract of a node type, resolved once at registration.
///
/// `compute` must be a pure function of the values visible through
/// [`ComputeInputs`]: calling it twice with unchanged inputs yields the same
/// outputs, and it never touches the graph.
#[async_trait]
pub trait NodeType: Send + Sync {
    fn definition(&self) -> &NodeDefinition;

    /// One-time asynchronous preparation run before a new instance is first
    /// computed (e.g. assembling shader source).
    async fn setup(&self) -> Result<(), GraphError> {
        Ok(())
    }

    fn compute(&self, _inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        Err(GraphError::MissingCompute(self.definition().name.clone()))
    }
}

/// Read-only view of a node's current input values during `compute`.
pub struct ComputeInputs<'a> {
    node: &'a NodeInstance,
    nodes: Option<&'a AHashMap<NodeId, NodeInstance>>,
}

impl<'a> ComputeInputs<'a> {
    pub(crate) fn new(
        node: &'a NodeInstance,
        nodes: Option<&'a AHashMap<NodeId, NodeInstance>>,
    ) -> Self {
        Self { node, nodes }
    }

    pub fn node(&self) -> &NodeInstance {
        self.node
    }

    /// The upstream output if `identifier` is wired, otherwise the node's own
    /// stored value.
    pub fn get(&self, identifier: &str) -> Option<&'a Value> {
        resolve_input(self.node, self.nodes, identifier)
    }

    pub fn value(&self, identifier: &str) -> Result<&'a Value, GraphError> {
        self.get(identifier).ok_or_else(|| GraphError::UnknownProperty {
            type_name: self.node.type_name.clone(),
            identifier: identifier.to_string(),
        })
    }

    pub fn number(&self, identifier: &str) -> Result<f64, GraphError> {
        let value = self.value(identifier)?;
        value
            .as_number()
            .ok_or_else(|| mismatch(identifier, "Number", value))
    }

    pub fn color(&self, identifier: &str) -> Result<Color, GraphError> {
        let value = self.value(identifier)?;
        value
            .as_color()
            .ok_or_else(|| mismatch(identifier, "Color", value))
    }

    pub fn text(&self, identifier: &str) -> Result<&'a str, GraphError> {
        let value = self.value(identifier)?;
        value
            .as_text()
            .ok_or_else(|| mismatch(identifier, "Text", value))
    }
}

fn mismatch(identifier: &str, expected: &str, found: &Value) -> GraphError {
    GraphError::TypeMismatch {
        identifier: identifier.to_string(),
        expected: expected.to_string(),
        found: found.clone(),
    }
}
