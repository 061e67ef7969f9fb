pub mod node;
pub mod row;
mod validation;

pub use node::*;
pub use row::*;
pub(crate) use validation::validate_definition;
