//! Common test utilities: recording node types, a recording widget and graph builders.
use async_trait::async_trait;
use nodegraph::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Widget kind used by every row of the test node types.
pub const DISPLAY: &str = "Display";

/// Counts every `compute` and `setup` call made by the test node types.
#[derive(Clone, Default)]
pub struct Counters {
    pub computes: Arc<AtomicUsize>,
    pub setups: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Counters {
    pub fn computes(&self) -> usize {
        self.computes.load(Ordering::SeqCst)
    }

    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }
}

/// `Relay`: `output = input + 1`.
pub struct Relay {
    definition: NodeDefinition,
    counters: Counters,
}

impl Relay {
    pub fn new(counters: Counters) -> Self {
        let definition = NodeDefinition::new("Relay")
            .with_row(
                RowDefinition::new(DISPLAY)
                    .named("Input")
                    .bind_input("input")
                    .with_connector(ConnectorDefinition::input("input", 1, "float")),
            )
            .with_row(
                RowDefinition::new(DISPLAY)
                    .named("Output")
                    .bind_output("output")
                    .with_connector(ConnectorDefinition::output("output", 1, "float")),
            )
            .with_property(PropertyDefinition::input("input", 0.0))
            .with_property(PropertyDefinition::output("output", 0.0));
        Self {
            definition,
            counters,
        }
    }
}

#[async_trait]
impl NodeType for Relay {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    async fn setup(&self) -> Result<(), GraphError> {
        self.counters.setups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn compute(&self, inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        self.counters.computes.fetch_add(1, Ordering::SeqCst);
        let input = inputs.number("input")?;
        Ok(vec![("output".to_string(), Value::Number(input + 1.0))])
    }
}

/// `Sum`: `sum = a + b`.
pub struct Sum {
    definition: NodeDefinition,
    counters: Counters,
}

impl Sum {
    pub fn new(counters: Counters) -> Self {
        let definition = NodeDefinition::new("Sum")
            .with_property(PropertyDefinition::input("a", 0.0))
            .with_property(PropertyDefinition::input("b", 0.0))
            .with_property(PropertyDefinition::output("sum", 0.0));
        Self {
            definition,
            counters,
        }
    }
}

#[async_trait]
impl NodeType for Sum {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    fn compute(&self, inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        self.counters.computes.fetch_add(1, Ordering::SeqCst);
        let sum = inputs.number("a")? + inputs.number("b")?;
        Ok(vec![("sum".to_string(), Value::Number(sum))])
    }
}

/// `Broken`: declares ports but has no `compute`.
pub struct Broken {
    definition: NodeDefinition,
}

impl Broken {
    pub fn new() -> Self {
        let definition = NodeDefinition::new("Broken")
            .with_property(PropertyDefinition::input("input", 0.0))
            .with_property(PropertyDefinition::output("output", -1.0));
        Self { definition }
    }
}

#[async_trait]
impl NodeType for Broken {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }
}

/// `Faulty`: its `setup` always fails.
pub struct Faulty {
    definition: NodeDefinition,
}

impl Faulty {
    pub fn new() -> Self {
        Self {
            definition: NodeDefinition::new("Faulty")
                .with_property(PropertyDefinition::output("output", 0.0)),
        }
    }
}

#[async_trait]
impl NodeType for Faulty {
    fn definition(&self) -> &NodeDefinition {
        &self.definition
    }

    async fn setup(&self) -> Result<(), GraphError> {
        Err(GraphError::SetupFailed {
            type_name: "Faulty".to_string(),
            message: "no GPU".to_string(),
        })
    }

    fn compute(&self, _inputs: &ComputeInputs<'_>) -> Result<Outputs, GraphError> {
        Ok(Vec::new())
    }
}

/// Records every hook call as `"<hook>:<row name>"`.
#[derive(Clone, Default)]
pub struct RecordingWidget {
    pub events: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl RecordingWidget {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, event: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == event).count()
    }

    fn record(&self, hook: &str, row: &RowDefinition) {
        let name = row.name.clone().unwrap_or_default();
        self.events.lock().unwrap().push(format!("{}:{}", hook, name));
    }
}

impl Widget for RecordingWidget {
    fn widget_type(&self) -> &str {
        DISPLAY
    }

    fn reset_row_data_to_property_value(
        &self,
        property_values: &ahash::AHashMap<String, Value>,
        row_data: &mut RowData,
        row: &RowDefinition,
    ) {
        if let Some(bound) = &row.options.input_bound_identifier {
            row_data.input_value = property_values.get(bound).cloned();
        }
        self.record("reset", row);
    }

    fn update_element_display_value(&self, _node: &NodeInstance, row: &RowDefinition) {
        self.record("display", row);
    }

    fn property_value_was_updated(&self, _node: &NodeInstance, row: &RowDefinition) {
        self.record("updated", row);
    }
}

/// A graph over the test node types plus the built-ins.
pub struct Fixture {
    pub graph: NodeGraph,
    pub counters: Counters,
    pub widget: RecordingWidget,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        let counters = Counters::default();
        let widget = RecordingWidget::default();
        let registry = NodeRegistry::builder()
            .with_builtin_node_types()
            .with_node_type(Relay::new(counters.clone()))
            .with_node_type(Sum::new(counters.clone()))
            .with_node_type(Broken::new())
            .with_node_type(Faulty::new())
            .with_widget(widget.clone())
            .build()
            .expect("Failed to build test registry");
        Self {
            graph: NodeGraph::with_config(Arc::new(registry), config),
            counters,
            widget,
        }
    }

    /// Places a node at the origin.
    pub fn add(&mut self, type_name: &str) -> NodeId {
        tokio_test::block_on(self.graph.create_node(type_name, 0.0, 0.0))
            .expect("Failed to create node")
    }

    /// Connects and asserts the wire was accepted.
    pub fn wire(&mut self, source: NodeId, output: &str, destination: NodeId, input: &str) {
        let outcome = self
            .graph
            .connect_wire(source, output, destination, input)
            .expect("Failed to connect wire");
        assert!(outcome.is_connected(), "wire was rejected: {:?}", outcome);
    }

    /// Numeric value of an output property.
    pub fn out(&self, id: NodeId, identifier: &str) -> f64 {
        self.graph
            .get_out_property_value(id, identifier)
            .expect("node exists")
            .and_then(Value::as_number)
            .expect("numeric output")
    }

    /// Numeric value an input currently sees.
    pub fn seen(&self, id: NodeId, identifier: &str) -> f64 {
        self.graph
            .get_in_property_value(id, identifier)
            .expect("node exists")
            .and_then(Value::as_number)
            .expect("numeric input")
    }
}
