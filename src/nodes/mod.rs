//! Node types shipped with the crate.
//!
//! They double as worked examples of the [`NodeType`](crate::registry::NodeType)
//! contract. `Perlin Noise` emits shader expressions, `Blend` mixes numeric
//! and shader-expression results, and `Output` renders the final fragment
//! shader.

use crate::registry::NodeRegistryBuilder;

pub mod blend;
pub mod color;
pub mod output;
pub mod perlin_noise;

pub use blend::Blend;
pub use color::ColorNode;
pub use output::Output;
pub use perlin_noise::PerlinNoise;

pub(crate) fn register_builtin_node_types(builder: &mut NodeRegistryBuilder) {
    builder.register_node_type(Box::new(PerlinNoise::new()));
    builder.register_node_type(Box::new(ColorNode::new()));
    builder.register_node_type(Box::new(Blend::new()));
    builder.register_node_type(Box::new(Output::new()));
}
