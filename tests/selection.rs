//! Selection and placement.
mod common;
use common::*;
use nodegraph::prelude::*;

#[cfg(test)]
mod selection_tests {
    use super::*;

    #[test]
    fn test_select_replace_and_toggle() {
        let mut fx = Fixture::new();
        let a = fx.add("Relay");
        let b = fx.add("Relay");
        let c = fx.add("Relay");

        fx.graph.select_node(a).unwrap();
        fx.graph.select_node(b).unwrap();
        assert_eq!(fx.graph.selected_nodes(), vec![a, b]);

        fx.graph.replace_selection(c).unwrap();
        assert_eq!(fx.graph.selected_nodes(), vec![c]);

        assert!(fx.graph.toggle_node_selection(a).unwrap());
        assert!(!fx.graph.toggle_node_selection(c).unwrap());
        assert_eq!(fx.graph.selected_nodes(), vec![a]);

        fx.graph.deselect_node(a).unwrap();
        assert!(fx.graph.selected_nodes().is_empty());
    }

    #[test]
    fn test_bulk_selection() {
        let mut fx = Fixture::new();
        let a = fx.add("Relay");
        let b = fx.add("Relay");
        let c = fx.add("Relay");

        fx.graph.select_all();
        assert_eq!(fx.graph.selected_nodes(), vec![a, b, c]);

        fx.graph.deselect_all_except(&[b]);
        assert_eq!(fx.graph.selected_nodes(), vec![b]);

        fx.graph.deselect_all();
        assert!(fx.graph.selected_nodes().is_empty());
    }

    #[test]
    fn test_move_selected_translates_positions() {
        let mut fx = Fixture::new();
        let a = fx.add("Relay");
        let b = fx.add("Relay");
        assert!(!fx.graph.move_selected(5.0, 5.0));

        fx.graph.select_node(a).unwrap();
        assert!(fx.graph.move_selected(10.0, -4.0));

        assert_eq!(fx.graph.node(a).unwrap().position(), Position::new(10.0, -4.0));
        assert_eq!(fx.graph.node(b).unwrap().position(), Position::new(0.0, 0.0));
    }

    #[test]
    fn test_zero_move_reports_nothing_moved() {
        let mut fx = Fixture::new();
        let a = fx.add("Relay");
        fx.graph.select_node(a).unwrap();

        assert!(!fx.graph.move_selected(0.0, 0.0));
        assert_eq!(fx.graph.node(a).unwrap().position(), Position::new(0.0, 0.0));
    }

    #[test]
    fn test_remove_selected_skips_protected() {
        let mut fx = Fixture::new();
        let output = fx.add("Output");
        let color = fx.add("Color");
        let relay = fx.add("Relay");
        fx.wire(color, "color", output, "diffuse");

        fx.graph.select_all();
        let removed = fx.graph.remove_selected().unwrap();

        assert_eq!(removed, vec![color, relay]);
        assert_eq!(fx.graph.node_ids(), vec![output]);
        assert_eq!(fx.graph.selected_nodes(), vec![output]);
        assert_eq!(fx.graph.in_degree(output, "diffuse").unwrap(), 0);
    }

    #[test]
    fn test_removed_node_is_deselected() {
        let mut fx = Fixture::new();
        let a = fx.add("Relay");
        fx.graph.select_node(a).unwrap();

        let removed = fx.graph.remove_node(a).unwrap().unwrap();

        assert!(!removed.is_selected());
        assert!(fx.graph.selected_nodes().is_empty());
    }

    #[test]
    fn test_config_controls_placement_and_selection() {
        let config = GraphConfig {
            start_selected: true,
            default_position: Position::new(40.0, 60.0),
            protected_node_types: vec!["Relay".to_string()],
        };
        let mut fx = Fixture::with_config(config);

        let a = tokio_test::block_on(fx.graph.add_node_at_default("Relay")).unwrap();
        let out = fx.add("Output");

        assert_eq!(fx.graph.node(a).unwrap().position(), Position::new(40.0, 60.0));
        assert_eq!(fx.graph.selected_nodes(), vec![a, out]);
        assert!(fx.graph.remove_node(a).unwrap().is_none());
        assert!(fx.graph.remove_node(out).unwrap().is_some());
    }

    #[test]
    fn test_set_position() {
        let mut fx = Fixture::new();
        let a = fx.add("Relay");

        fx.graph.set_position(a, Position::new(3.0, 4.0)).unwrap();

        assert_eq!(fx.graph.node(a).unwrap().position(), Position::new(3.0, 4.0));
    }
}
