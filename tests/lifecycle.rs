//! Registry lookups and the constructed -> ready lifecycle of node instances.
mod common;
use common::*;
use nodegraph::prelude::*;
use std::sync::Arc;

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn test_instantiate_builds_constructed_node() {
        let fx = Fixture::new();
        let registry = fx.graph.registry();

        let pending = registry
            .instantiate("Sum", Position::new(1.0, 2.0))
            .expect("Sum is registered");
        let node = pending.instance();

        assert_eq!(pending.phase(), NodePhase::Constructed);
        assert_eq!(node.position(), Position::new(1.0, 2.0));
        assert_eq!(node.stored_value("a"), Some(&Value::Number(0.0)));
        assert!(node.has_input("a") && node.has_input("b"));
        assert!(node.has_output("sum"));
        assert!(!node.has_input("sum"));
        assert!(node.in_connections().values().all(Vec::is_empty));
        assert_eq!(fx.counters.computes(), 0);
    }

    #[test]
    fn test_prepare_runs_setup_then_compute() {
        let mut fx = Fixture::new();
        let pending = fx
            .graph
            .registry()
            .instantiate("Relay", Position::default())
            .unwrap();

        let instance = tokio_test::block_on(pending.prepare(fx.graph.registry())).unwrap();

        assert_eq!(instance.phase(), NodePhase::Ready);
        assert_eq!(fx.counters.setups(), 1);
        assert_eq!(fx.counters.computes(), 1);
        assert_eq!(instance.stored_value("output"), Some(&Value::Number(1.0)));

        let id = fx.graph.insert_node(instance);
        assert_eq!(fx.graph.node(id).unwrap().phase(), NodePhase::Ready);
        assert_eq!(fx.graph.len(), 1);
    }

    #[test]
    fn test_unknown_node_type() {
        let mut fx = Fixture::new();

        assert!(matches!(
            fx.graph.registry().instantiate("Nope", Position::default()),
            Err(GraphError::UnknownNodeType(name)) if name == "Nope"
        ));
        assert_eq!(
            tokio_test::block_on(fx.graph.create_node("Nope", 0.0, 0.0)),
            Err(GraphError::UnknownNodeType("Nope".to_string()))
        );
        assert!(fx.graph.is_empty());
    }

    #[test]
    fn test_failed_setup_keeps_node_out_of_graph() {
        let mut fx = Fixture::new();

        let result = tokio_test::block_on(fx.graph.create_node("Faulty", 0.0, 0.0));

        assert!(matches!(result, Err(GraphError::SetupFailed { .. })));
        assert!(fx.graph.is_empty());
    }

    #[test]
    fn test_registry_lists_types() {
        let fx = Fixture::new();

        assert_eq!(
            fx.graph.registry().type_names(),
            vec![
                "Blend",
                "Broken",
                "Color",
                "Faulty",
                "Output",
                "Perlin Noise",
                "Relay",
                "Sum"
            ]
        );
        assert!(fx.graph.registry().widget(DISPLAY).is_some());
        assert!(fx.graph.registry().widget("Slider").is_none());
    }

    #[test]
    fn test_registry_rejects_invalid_definition() {
        struct Twice(NodeDefinition);

        #[async_trait::async_trait]
        impl NodeType for Twice {
            fn definition(&self) -> &NodeDefinition {
                &self.0
            }
        }

        let definition = NodeDefinition::new("Twice")
            .with_property(PropertyDefinition::input("x", 0.0))
            .with_property(PropertyDefinition::output("x", 0.0));
        let result = NodeRegistry::builder()
            .with_node_type(Twice(definition))
            .build();

        assert!(matches!(
            result,
            Err(GraphError::DuplicateProperty { identifier, .. }) if identifier == "x"
        ));
    }

    #[test]
    fn test_graphs_share_one_registry() {
        let registry = Arc::new(
            NodeRegistry::builder()
                .with_builtin_node_types()
                .build()
                .unwrap(),
        );
        let mut first = NodeGraph::new(Arc::clone(&registry));
        let second = NodeGraph::new(Arc::clone(&registry));

        tokio_test::block_on(first.create_node("Color", 0.0, 0.0)).unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(Arc::strong_count(&registry), 3);
    }

    #[test]
    fn test_display_formats() {
        let fx = {
            let mut fx = Fixture::new();
            fx.add("Relay");
            fx.add("Relay");
            fx
        };
        let ids = fx.graph.node_ids();
        let edge = Edge::new(ids[0], "output", ids[1], "input");

        assert_eq!(ids[0].to_string(), "#0");
        assert_eq!(edge.to_string(), "#0.output -> #1.input");
        assert_eq!(
            GraphError::EdgeNotFound(edge).to_string(),
            "No wire connects #0.output -> #1.input"
        );
        assert_eq!(
            GraphError::MissingCompute("Broken".to_string()).to_string(),
            "Broken node has no compute() implementation"
        );
        assert_eq!(Value::Number(4.0).to_string(), "4");
    }

    #[test]
    fn test_type_mismatch_names_the_found_kind() {
        let error = GraphError::TypeMismatch {
            identifier: "mode".to_string(),
            expected: "Text".to_string(),
            found: Value::Number(2.0),
        };

        assert_eq!(
            error.to_string(),
            "Type mismatch reading property 'mode': expected Text, but found Number '2'"
        );
    }

    #[test]
    fn test_config_file_errors() {
        assert!(matches!(
            GraphConfig::from_file("does/not/exist.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
