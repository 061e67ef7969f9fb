use super::{NodeGraph, NodeId};
use crate::error::GraphError;
use itertools::Itertools;

impl NodeGraph {
    pub fn select_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.node_mut(id)?.selected = true;
        Ok(())
    }

    pub fn deselect_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.node_mut(id)?.selected = false;
        Ok(())
    }

    /// Flips the flag and returns the new state.
    pub fn toggle_node_selection(&mut self, id: NodeId) -> Result<bool, GraphError> {
        let node = self.node_mut(id)?;
        node.selected = !node.selected;
        Ok(node.selected)
    }

    /// Makes `id` the only selected node.
    pub fn replace_selection(&mut self, id: NodeId) -> Result<(), GraphError> {
        self.node(id)?;
        self.deselect_all_except(&[id]);
        self.select_node(id)
    }

    pub fn select_all(&mut self) {
        self.set_all_selected(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all_selected(false);
    }

    /// Deselects everything not in `keep`; nodes in `keep` keep their flag.
    pub fn deselect_all_except(&mut self, keep: &[NodeId]) {
        for (id, node) in self.nodes_map_mut() {
            if !keep.contains(id) {
                node.selected = false;
            }
        }
    }

    /// Selected node handles in ascending order.
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.nodes_map()
            .iter()
            .filter(|(_, node)| node.selected)
            .map(|(&id, _)| id)
            .sorted()
            .collect()
    }

    /// Translates every selected node. Returns whether anything moved.
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> bool {
        let mut moved = false;
        for node in self.nodes_map_mut().values_mut().filter(|n| n.selected) {
            node.position = node.position.translated(dx, dy);
            moved = true;
        }
        moved && (dx != 0.0 || dy != 0.0)
    }

    /// Removes every selected node except protected ones and returns the
    /// handles that were removed.
    pub fn remove_selected(&mut self) -> Result<Vec<NodeId>, GraphError> {
        let mut removed = Vec::new();
        for id in self.selected_nodes() {
            if self.remove_node(id)?.is_some() {
                removed.push(id);
            }
        }
        if !removed.is_empty() {
            log::info!("Removed {} selected node(s)", removed.len());
        }
        Ok(removed)
    }

    fn set_all_selected(&mut self, selected: bool) {
        for node in self.nodes_map_mut().values_mut() {
            node.selected = selected;
        }
    }
}
