use super::node::Direction;
use crate::value::Value;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Port metadata drawn next to a row: the dot a wire attaches to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorDefinition {
    pub identifier: String,
    pub direction: Direction,
    /// Component count of the carried value (1 for scalars, 3 for colours).
    pub dimensions: u8,
    pub data_type: String,
}

impl ConnectorDefinition {
    pub fn input(identifier: &str, dimensions: u8, data_type: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            direction: Direction::In,
            dimensions,
            data_type: data_type.to_string(),
        }
    }

    pub fn output(identifier: &str, dimensions: u8, data_type: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            direction: Direction::Out,
            dimensions,
            data_type: data_type.to_string(),
        }
    }
}

/// Bindings between a row's widget and the node's properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowOptions {
    /// Property the widget writes when the user edits it.
    pub input_bound_identifier: Option<String>,
    /// Property the widget displays whenever it changes.
    pub output_bound_identifier: Option<String>,
    pub label: Option<String>,
    /// Choices offered by dropdown-style widgets.
    #[serde(default)]
    pub choices: Vec<String>,
}

/// Per-instance widget state for one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowData {
    /// The value last entered through the row's widget.
    pub input_value: Option<Value>,
    #[serde(default)]
    pub fields: AHashMap<String, Value>,
}

/// One UI row of a node: a widget plus the connectors drawn beside it.
///
/// Only named rows carry per-instance `RowData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowDefinition {
    pub name: Option<String>,
    pub widget: String,
    #[serde(default)]
    pub connectors: Vec<ConnectorDefinition>,
    #[serde(default)]
    pub options: RowOptions,
    #[serde(default)]
    pub data: RowData,
}

impl RowDefinition {
    pub fn new(widget: &str) -> Self {
        Self {
            name: None,
            widget: widget.to_string(),
            connectors: Vec::new(),
            options: RowOptions::default(),
            data: RowData::default(),
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_connector(mut self, connector: ConnectorDefinition) -> Self {
        self.connectors.push(connector);
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.options.label = Some(label.to_string());
        self
    }

    pub fn with_choices(mut self, choices: &[&str]) -> Self {
        self.options.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn bind_input(mut self, identifier: &str) -> Self {
        self.options.input_bound_identifier = Some(identifier.to_string());
        self
    }

    pub fn bind_output(mut self, identifier: &str) -> Self {
        self.options.output_bound_identifier = Some(identifier.to_string());
        self
    }

    pub fn with_data(mut self, data: RowData) -> Self {
        self.data = data;
        self
    }
}
