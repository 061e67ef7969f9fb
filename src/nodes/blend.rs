use crate::definition::{ConnectorDefinition, NodeDefinition, PropertyDefinition, RowDefinition};
use crate::error::GraphError;
use crate::registry::{ComputeInputs, NodeType, Outputs};
use crate::value::{Color, Value};
use async_trait::async_trait;

pub const NAME: &str = "Blend";

pub const MODES: [&str; 3] = ["mix", "add", "multiply"];

/// Combines two inputs. Colour operands are blended numerically; anything
/// else (e.g. a noise expression) yields a GLSL expression.
pub struct Blend {
    definition: NodeDefinition,
}

impl Blend {
    pub fn new() -> Self {
        let definition = NodeDefinition::new(NAME)
            .with_row(
                RowDefinition::new("Thumbnail")
                    .named("Preview")
                    .bind_output("result")
                    .with_connector(ConnectorDefinition::output("result", 3, "vec3")),
            )
            .with_row(
                RowDefinition::new("Dropdown")
                    .named("Mode")
                    .with_label("Mode")
                    .with_choices(&MODES)
                    .bind_input("mode"),
            )
            .with_row(
                RowDefinition::new("Label")
                    .with_label("A")
                    .with_connector(ConnectorDefinition::input("a", 3, "vec3")),
            )
            .with_row(
                RowDefinition::new("Label")
                    .with_label("B")
                    .with_connector(ConnectorDefinition::input("b", 3, "vec3")),
            )
            .with_row(
                RowDefinition::new("Input")
                    .named("Factor")
                    .with_label("Factor")
                    .bind_input("factor")
                    .with_connector(ConnectorDefinition::input("factor", 1, "float")),
            )
            .with_property(PropertyDefinition::input("a", Color::BLACK))
            .with_property(PropertyDefinition::input("b", Color::WHITE))
            .with_property(PropertyDefinition::input("factor", 0.5))
            .with_property(PropertyDefinition::input("mode", "mix"))
            .with_property(PropertyDefinition::output("result", Value::Null));
        Self { definition }
    }
}

impl Default for Blend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for Blend {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn compute(&self, inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        let mode = inputs.text("mode")?;
        if !MODES.contains(&mode) {
            return Err(GraphError::TypeMismatch {
                identifier: "mode".to_string(),
                expected: MODES.join("|"),
                found: Value::Text(mode.to_string()),
            });
        }

        let a = inputs.value("a")?;
        let b = inputs.value("b")?;
        let factor = inputs.value("factor")?;

        let result = match (a.as_color(), b.as_color(), factor.as_number()) {
            (Some(a), Some(b), Some(t)) => Value::Color(blend_colors(mode, a, b, t)),
            _ => Value::Shader(blend_expr(
                mode,
                &operand(a),
                &operand(b),
                &factor.to_shader_expr(),
            )),
        };
        Ok(vec![("result".to_string(), result)])
    }
}

fn blend_colors(mode: &str, a: Color, b: Color, t: f64) -> Color {
    match mode {
        "add" => Color::new(a.r + b.r, a.g + b.g, a.b + b.b).clamped(),
        "multiply" => Color::new(a.r * b.r, a.g * b.g, a.b * b.b),
        _ => a.lerp(b, t),
    }
}

fn blend_expr(mode: &str, a: &str, b: &str, t: &str) -> String {
    match mode {
        "add" => format!("({} + {})", a, b),
        "multiply" => format!("({} * {})", a, b),
        _ => format!("mix({}, {}, {})", a, b, t),
    }
}

/// Scalars are splatted so every operand is a `vec3`.
fn operand(value: &Value) -> String {
    match value {
        Value::Color(_) => value.to_shader_expr(),
        other => format!("vec3({})", other.to_shader_expr()),
    }
}
