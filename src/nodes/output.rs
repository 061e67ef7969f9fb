use super::perlin_noise;
use crate::definition::{ConnectorDefinition, NodeDefinition, PropertyDefinition, RowDefinition};
use crate::error::GraphError;
use crate::graph::{NodeGraph, NodeId};
use crate::registry::{ComputeInputs, NodeType, Outputs};
use crate::value::Color;
use async_trait::async_trait;

pub const NAME: &str = "Output";

/// The sink every scene renders through. Has no outputs of its own.
pub struct Output {
    definition: NodeDefinition,
}

impl Output {
    pub fn new() -> Self {
        let definition = NodeDefinition::new(NAME)
            .with_row(
                RowDefinition::new("Label")
                    .with_label("Diffuse")
                    .with_connector(ConnectorDefinition::input("diffuse", 3, "vec3")),
            )
            .with_property(PropertyDefinition::input(
                "diffuse",
                Color::new(0.5, 0.5, 0.5),
            ));
        Self { definition }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for Output {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn compute(&self, _inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        Ok(Vec::new())
    }
}

/// Renders the fragment shader for the `Output` node `id` from whatever
/// currently feeds its `diffuse` input.
pub fn fragment_shader(graph: &NodeGraph, id: NodeId) -> Result<String, GraphError> {
    let node = graph.node(id)?;
    let diffuse = graph
        .get_in_property_value(id, "diffuse")?
        .ok_or_else(|| GraphError::UnknownProperty {
            type_name: node.type_name().to_string(),
            identifier: "diffuse".to_string(),
        })?
        .to_shader_expr();

    let mut source = String::from("precision mediump float;\nvarying vec2 uv;\n\n");
    if diffuse.contains("perlin(") {
        source.push_str(&perlin_noise::noise_library());
        source.push_str("\n\n");
    }
    source.push_str(&format!(
        "void main() {{\n    gl_FragColor = vec4(vec3({}), 1.0);\n}}\n",
        diffuse
    ));
    Ok(source)
}
