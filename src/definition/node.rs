use super::row::RowDefinition;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a property is fed by a wire (`In`) or feeds wires (`Out`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// A named, directioned value slot declared by a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub identifier: String,
    pub direction: Direction,
    pub default: Value,
}

impl PropertyDefinition {
    pub fn input(identifier: &str, default: impl Into<Value>) -> Self {
        Self {
            identifier: identifier.to_string(),
            direction: Direction::In,
            default: default.into(),
        }
    }

    pub fn output(identifier: &str, default: impl Into<Value>) -> Self {
        Self {
            identifier: identifier.to_string(),
            direction: Direction::Out,
            default: default.into(),
        }
    }
}

/// The immutable template of a node type: its UI rows and its properties.
///
/// Property identifiers are unique within a definition; this is checked when
/// the owning type is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
    pub rows: Vec<RowDefinition>,
    pub properties: Vec<PropertyDefinition>,
}

impl NodeDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            rows: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_row(mut self, row: RowDefinition) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }

    pub fn property(&self, identifier: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.identifier == identifier)
    }

    /// Properties declared with the given direction, in declaration order.
    pub fn properties_in(&self, direction: Direction) -> impl Iterator<Item = &PropertyDefinition> {
        self.properties
            .iter()
            .filter(move |p| p.direction == direction)
    }

    pub fn has_port(&self, identifier: &str, direction: Direction) -> bool {
        self.property(identifier)
            .is_some_and(|p| p.direction == direction)
    }

    /// The row whose widget edits `identifier`.
    pub fn input_bound_row(&self, identifier: &str) -> Option<&RowDefinition> {
        self.rows
            .iter()
            .find(|r| r.options.input_bound_identifier.as_deref() == Some(identifier))
    }

    /// The row whose widget displays `identifier`.
    pub fn output_bound_row(&self, identifier: &str) -> Option<&RowDefinition> {
        self.rows
            .iter()
            .find(|r| r.options.output_bound_identifier.as_deref() == Some(identifier))
    }

    /// Rows that edit or display `identifier`.
    pub fn rows_bound_to<'a>(
        &'a self,
        identifier: &'a str,
    ) -> impl Iterator<Item = &'a RowDefinition> + 'a {
        self.rows.iter().filter(move |r| {
            r.options.input_bound_identifier.as_deref() == Some(identifier)
                || r.options.output_bound_identifier.as_deref() == Some(identifier)
        })
    }
}
