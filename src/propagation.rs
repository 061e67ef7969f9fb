//! Dependency-ordered recomputation after an edit.
//!
//! Downstream nodes are grouped by the length of the *longest* wire path from
//! the changed node. Recomputing layer by layer then guarantees that every
//! input of a node is already up to date when the node itself is computed,
//! and each affected node is computed exactly once per pass.

use crate::error::GraphError;
use crate::graph::{NodeGraph, NodeId, run_compute};
use ahash::AHashMap;
use std::collections::{BTreeSet, VecDeque};

/// The nodes one propagation pass recomputed, in the order it computed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub order: Vec<NodeId>,
    /// Deepest layer reached; 0 when only the root was recomputed.
    pub depth: usize,
}

impl PropagationReport {
    /// Index of `id` in the recompute order.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.order.iter().position(|&n| n == id)
    }

    pub fn recomputed(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }
}

/// Layers `1..=max_depth` of the nodes downstream of `id`.
///
/// A node reachable over paths of different length lands in the layer of the
/// longest one. `id` itself is not part of the result.
pub fn find_downstream_depth_layers(
    graph: &NodeGraph,
    id: NodeId,
) -> Result<Vec<BTreeSet<NodeId>>, GraphError> {
    graph.node(id)?;
    let mut layers = group_into_layers(&longest_path_depths(graph, &[id]));
    if !layers.is_empty() {
        layers.remove(0);
    }
    Ok(layers)
}

/// Longest-path depth of every node reachable from `roots`, roots seeded at 0.
///
/// A node is re-queued only when its depth grows, so its successors are
/// revisited with the final depth at the latest once every path has been
/// seen. Termination relies on the graph being acyclic, which `connect_wire`
/// guarantees.
fn longest_path_depths(graph: &NodeGraph, roots: &[NodeId]) -> AHashMap<NodeId, usize> {
    let mut depths: AHashMap<NodeId, usize> = roots.iter().map(|&r| (r, 0)).collect();
    let mut queue: VecDeque<NodeId> = roots.iter().copied().collect();

    while let Some(current) = queue.pop_front() {
        let next_depth = depths.get(&current).copied().unwrap_or(0) + 1;
        for downstream in graph.downstream_of(current) {
            if depths.get(&downstream).is_some_and(|&d| d >= next_depth) {
                continue;
            }
            depths.insert(downstream, next_depth);
            queue.push_back(downstream);
        }
    }
    depths
}

fn group_into_layers(depths: &AHashMap<NodeId, usize>) -> Vec<BTreeSet<NodeId>> {
    let max_depth = depths.values().copied().max().unwrap_or(0);
    let mut layers = vec![BTreeSet::new(); if depths.is_empty() { 0 } else { max_depth + 1 }];
    for (&id, &depth) in depths {
        layers[depth].insert(id);
    }
    layers
}

impl NodeGraph {
    /// Recomputes `id`, then every node downstream of it layer by layer.
    pub fn recompute_downstream(&mut self, id: NodeId) -> Result<PropagationReport, GraphError> {
        self.node(id)?;
        Ok(self.recompute_from_roots(&[id]))
    }

    /// One pass seeded at several nodes at once. Roots that sit below another
    /// root are lifted into the matching layer so they are computed only after
    /// it. Handles that no longer exist are skipped.
    pub(crate) fn recompute_from_roots(&mut self, roots: &[NodeId]) -> PropagationReport {
        let mut seeds: Vec<NodeId> = roots.iter().copied().filter(|&r| self.contains(r)).collect();
        seeds.sort_unstable();
        seeds.dedup();
        if seeds.is_empty() {
            return PropagationReport::default();
        }

        let layers = group_into_layers(&longest_path_depths(self, &seeds));
        log::debug!(
            "Propagating from {:?} over {} layer(s)",
            seeds,
            layers.len().saturating_sub(1)
        );

        let mut report = PropagationReport {
            order: Vec::with_capacity(layers.iter().map(BTreeSet::len).sum()),
            depth: layers.len().saturating_sub(1),
        };
        for layer in layers {
            for id in layer {
                self.recompute_node(id);
                report.order.push(id);
            }
        }
        report
    }

    /// Runs `compute` for one node and stores its outputs. Failures are logged
    /// and leave the previous outputs in place.
    fn recompute_node(&mut self, id: NodeId) {
        let registry = self.registry_handle();
        let Some(node) = self.nodes_map().get(&id) else {
            return;
        };
        let Some(outputs) = run_compute(&registry, node, Some(self.nodes_map())) else {
            return;
        };
        let Some(node) = self.nodes_map_mut().get_mut(&id) else {
            return;
        };
        let written = node.apply_outputs(outputs);
        log::debug!("Recomputed {} ({} output(s))", id, written.len());
        for identifier in written {
            self.notify_bound_widgets(id, &identifier);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_are_indexed_by_depth() {
        let depths: AHashMap<NodeId, usize> =
            [(NodeId(0), 0), (NodeId(3), 2), (NodeId(1), 1), (NodeId(2), 1)]
                .into_iter()
                .collect();
        let layers = group_into_layers(&depths);
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[0], BTreeSet::from([NodeId(0)]));
        assert_eq!(layers[1], BTreeSet::from([NodeId(1), NodeId(2)]));
        assert_eq!(layers[2], BTreeSet::from([NodeId(3)]));
    }

    #[test]
    fn no_depths_means_no_layers() {
        assert!(group_into_layers(&AHashMap::new()).is_empty());
    }
}
