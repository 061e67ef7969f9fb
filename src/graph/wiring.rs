use super::{Edge, NodeGraph, NodeId};
use crate::definition::Direction;
use crate::error::GraphError;
use std::fmt;

/// Result of a wiring request that referenced existing nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireOutcome {
    /// The wire now exists. `replaced` is the wire that previously fed the
    /// destination input, if there was one.
    Connected { replaced: Option<Edge> },
    /// The request broke a wiring rule and the graph was left untouched.
    Rejected(WireRejection),
}

impl WireOutcome {
    pub fn is_connected(&self) -> bool {
        matches!(self, WireOutcome::Connected { .. })
    }
}

/// Why a wire was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireRejection {
    /// The source identifier is not an `out` property of the source node.
    NotAnOutput,
    /// The destination identifier is not an `in` property of the destination node.
    NotAnInput,
    SelfLoop,
    Duplicate,
    /// The source is already downstream of the destination.
    WouldCreateCycle,
}

impl fmt::Display for WireRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            WireRejection::NotAnOutput => "source is not an output",
            WireRejection::NotAnInput => "destination is not an input",
            WireRejection::SelfLoop => "a node cannot feed itself",
            WireRejection::Duplicate => "the wire already exists",
            WireRejection::WouldCreateCycle => "the wire would create a cycle",
        };
        f.write_str(reason)
    }
}

impl NodeGraph {
    /// Wires `source.source_identifier` into `destination.destination_identifier`.
    ///
    /// Rule violations are reported through [`WireOutcome::Rejected`], never as
    /// errors; only unknown node handles fail. An input that is already fed is
    /// rewired (last wire wins), then the destination and everything below it
    /// is recomputed.
    pub fn connect_wire(
        &mut self,
        source: NodeId,
        source_identifier: &str,
        destination: NodeId,
        destination_identifier: &str,
    ) -> Result<WireOutcome, GraphError> {
        let edge = Edge::new(source, source_identifier, destination, destination_identifier);
        if let Some(rejection) = self.check_wire(&edge)? {
            log::debug!("Rejected wire {}: {}", edge, rejection);
            return Ok(WireOutcome::Rejected(rejection));
        }

        // The replaced wire needs no propagation of its own; the pass below
        // starts at the same destination.
        let replaced = self
            .node(destination)?
            .input_source(destination_identifier)
            .map(|prior| {
                Edge::new(prior.node, &prior.identifier, destination, destination_identifier)
            });
        if let Some(prior) = &replaced {
            self.detach_edge(prior)?;
            log::debug!("Replaced wire {}", prior);
        }

        self.attach_edge(&edge)?;
        log::debug!("Connected wire {}", edge);

        self.notify_bound_widgets(destination, destination_identifier);
        self.recompute_downstream(destination)?;
        Ok(WireOutcome::Connected { replaced })
    }

    /// Removes an existing wire and recomputes from its destination.
    ///
    /// Fails with `EdgeNotFound`, leaving the graph untouched, when no such
    /// wire exists.
    pub fn disconnect_wire(
        &mut self,
        source: NodeId,
        source_identifier: &str,
        destination: NodeId,
        destination_identifier: &str,
    ) -> Result<(), GraphError> {
        let edge = Edge::new(source, source_identifier, destination, destination_identifier);
        self.detach_edge(&edge)?;
        log::debug!("Disconnected wire {}", edge);

        self.notify_bound_widgets(destination, destination_identifier);
        self.recompute_downstream(destination)?;
        Ok(())
    }

    /// Returns the first wiring rule `edge` breaks, if any.
    fn check_wire(&self, edge: &Edge) -> Result<Option<WireRejection>, GraphError> {
        let source = self.node(edge.source)?;
        let destination = self.node(edge.destination)?;
        let registry = self.registry();

        if !registry
            .definition(source.type_name())?
            .has_port(&edge.source_identifier, Direction::Out)
        {
            return Ok(Some(WireRejection::NotAnOutput));
        }
        if !registry
            .definition(destination.type_name())?
            .has_port(&edge.destination_identifier, Direction::In)
        {
            return Ok(Some(WireRejection::NotAnInput));
        }
        if edge.source == edge.destination {
            return Ok(Some(WireRejection::SelfLoop));
        }
        if self.connection_exists(edge) {
            return Ok(Some(WireRejection::Duplicate));
        }
        if self.is_reachable(edge.destination, edge.source) {
            return Ok(Some(WireRejection::WouldCreateCycle));
        }
        Ok(None)
    }

    /// Forwards a change of `identifier` on `id` to the widget displaying it.
    pub(crate) fn notify_bound_widgets(&self, id: NodeId, identifier: &str) {
        if let Some(node) = self.nodes_map().get(&id) {
            node.notify_bound_widgets(self.registry(), identifier);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reasons_read_as_sentences() {
        assert_eq!(
            WireRejection::WouldCreateCycle.to_string(),
            "the wire would create a cycle"
        );
        assert_eq!(WireRejection::SelfLoop.to_string(), "a node cannot feed itself");
    }
}
