use crate::definition::{ConnectorDefinition, NodeDefinition, PropertyDefinition, RowDefinition};
use crate::error::GraphError;
use crate::registry::{ComputeInputs, NodeType, Outputs};
use crate::value::{Color, Value};
use async_trait::async_trait;

pub const NAME: &str = "Color";

/// Builds a constant colour from three numeric channels.
pub struct ColorNode {
    definition: NodeDefinition,
}

impl ColorNode {
    pub fn new() -> Self {
        let mut definition = NodeDefinition::new(NAME).with_row(
            RowDefinition::new("Swatch")
                .named("Swatch")
                .bind_output("color")
                .with_connector(ConnectorDefinition::output("color", 3, "vec3")),
        );
        for channel in ["r", "g", "b"] {
            definition = definition
                .with_row(
                    RowDefinition::new("Input")
                        .named(&channel.to_uppercase())
                        .with_label(&channel.to_uppercase())
                        .bind_input(channel)
                        .with_connector(ConnectorDefinition::input(channel, 1, "float")),
                )
                .with_property(PropertyDefinition::input(channel, 1.0));
        }
        Self {
            definition: definition.with_property(PropertyDefinition::output("color", Color::WHITE)),
        }
    }
}

impl Default for ColorNode {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for ColorNode {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn compute(&self, inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        let color = Color::new(inputs.number("r")?, inputs.number("g")?, inputs.number("b")?);
        Ok(vec![("color".to_string(), Value::Color(color.clamped()))])
    }
}
