use crate::definition::{ConnectorDefinition, NodeDefinition, PropertyDefinition, RowDefinition};
use crate::error::GraphError;
use crate::registry::{ComputeInputs, NodeType, Outputs};
use crate::value::Value;
use async_trait::async_trait;

pub const NAME: &str = "Perlin Noise";

const NOISE_FUNCTIONS: [&str; 4] = [
    "vec2 fade(vec2 t) { return t * t * t * (t * (t * 6.0 - 15.0) + 10.0); }",
    "vec4 permute(vec4 x) { return mod(((x * 34.0) + 1.0) * x, 289.0); }",
    "float cnoise(vec2 P) {\n    vec4 Pi = floor(P.xyxy) + vec4(0.0, 0.0, 1.0, 1.0);\n    vec4 Pf = fract(P.xyxy) - vec4(0.0, 0.0, 1.0, 1.0);\n    Pi = mod(Pi, 289.0);\n    vec4 ix = Pi.xzxz;\n    vec4 iy = Pi.yyww;\n    vec4 fx = Pf.xzxz;\n    vec4 fy = Pf.yyww;\n    vec4 i = permute(permute(ix) + iy);\n    vec4 gx = 2.0 * fract(i * 0.0243902439) - 1.0;\n    vec4 gy = abs(gx) - 0.5;\n    gx = gx - floor(gx + 0.5);\n    vec2 g00 = vec2(gx.x, gy.x);\n    vec2 g10 = vec2(gx.y, gy.y);\n    vec2 g01 = vec2(gx.z, gy.z);\n    vec2 g11 = vec2(gx.w, gy.w);\n    vec4 norm = 1.79284291400159 - 0.85373472095314 * vec4(dot(g00, g00), dot(g01, g01), dot(g10, g10), dot(g11, g11));\n    g00 *= norm.x; g01 *= norm.y; g10 *= norm.z; g11 *= norm.w;\n    float n00 = dot(g00, vec2(fx.x, fy.x));\n    float n10 = dot(g10, vec2(fx.y, fy.y));\n    float n01 = dot(g01, vec2(fx.z, fy.z));\n    float n11 = dot(g11, vec2(fx.w, fy.w));\n    vec2 fade_xy = fade(Pf.xy);\n    vec2 n_x = mix(vec2(n00, n01), vec2(n10, n11), fade_xy.x);\n    return 2.3 * mix(n_x.x, n_x.y, fade_xy.y);\n}",
    "float perlin(vec2 p, float octaves) {\n    float total = 0.0;\n    float amplitude = 0.5;\n    for (int i = 0; i < 8; i++) {\n        if (float(i) >= octaves) break;\n        total += amplitude * cnoise(p);\n        p *= 2.0;\n        amplitude *= 0.5;\n    }\n    return total * 0.5 + 0.5;\n}",
];

/// GLSL source of `perlin(vec2, float)` and its helpers.
pub fn noise_library() -> String {
    NOISE_FUNCTIONS.join("\n\n")
}

/// Fractal Perlin noise over the fragment's `uv`, emitted as a shader expression.
pub struct PerlinNoise {
    definition: NodeDefinition,
}

impl PerlinNoise {
    pub fn new() -> Self {
        let definition = NodeDefinition::new(NAME)
            .with_row(
                RowDefinition::new("Thumbnail")
                    .named("Preview")
                    .bind_output("pattern")
                    .with_connector(ConnectorDefinition::output("pattern", 1, "float")),
            )
            .with_row(
                RowDefinition::new("Input")
                    .named("Scale")
                    .with_label("Scale")
                    .bind_input("scale")
                    .with_connector(ConnectorDefinition::input("scale", 1, "float")),
            )
            .with_row(
                RowDefinition::new("Input")
                    .named("Octaves")
                    .with_label("Octaves")
                    .bind_input("octaves")
                    .with_connector(ConnectorDefinition::input("octaves", 1, "float")),
            )
            .with_property(PropertyDefinition::input("scale", 4.0))
            .with_property(PropertyDefinition::input("octaves", 3.0))
            .with_property(PropertyDefinition::output("pattern", Value::Null));
        Self { definition }
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeType for PerlinNoise {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn compute(&self, inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        let scale = inputs.value("scale")?.to_shader_expr();
        let octaves = inputs.value("octaves")?.to_shader_expr();
        Ok(vec![(
            "pattern".to_string(),
            Value::Shader(format!("perlin(uv * {}, {})", scale, octaves)),
        )])
    }
}
