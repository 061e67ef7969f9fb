use super::{NodeGraph, NodeId, resolve_input};
use crate::definition::Direction;
use crate::error::GraphError;
use crate::propagation::PropagationReport;
use crate::value::Value;

impl NodeGraph {
    /// The value an input currently sees: the upstream output while the input
    /// is wired, otherwise the node's own stored value.
    pub fn get_in_property_value(
        &self,
        id: NodeId,
        identifier: &str,
    ) -> Result<Option<&Value>, GraphError> {
        let node = self.node(id)?;
        Ok(resolve_input(node, Some(self.nodes_map()), identifier))
    }

    pub fn get_out_property_value(
        &self,
        id: NodeId,
        identifier: &str,
    ) -> Result<Option<&Value>, GraphError> {
        Ok(self.node(id)?.stored_value(identifier))
    }

    /// Stores `value` without recomputing anything.
    pub fn set_property_value(
        &mut self,
        id: NodeId,
        identifier: &str,
        value: Value,
    ) -> Result<(), GraphError> {
        let type_name = self.node(id)?.type_name().to_string();
        if self.registry().definition(&type_name)?.property(identifier).is_none() {
            return Err(GraphError::UnknownProperty {
                type_name,
                identifier: identifier.to_string(),
            });
        }
        self.node_mut(id)?
            .property_values
            .insert(identifier.to_string(), value);
        self.notify_bound_widgets(id, identifier);
        Ok(())
    }

    /// Commits a user edit: updates the editing widget's state, stores the
    /// value and recomputes the node and everything downstream of it.
    pub fn set_final_property_value_and_propagate(
        &mut self,
        id: NodeId,
        identifier: &str,
        value: Value,
    ) -> Result<PropagationReport, GraphError> {
        let type_name = self.node(id)?.type_name().to_string();
        let registry = self.registry_handle();
        let definition = registry.definition(&type_name)?;

        if let Some(row) = definition.input_bound_row(identifier) {
            if let Some(name) = &row.name {
                if let Some(data) = self.node_mut(id)?.row_data.get_mut(name) {
                    data.input_value = Some(value.clone());
                }
            }
            if let Some(widget) = registry.widget(&row.widget) {
                widget.update_element_display_value(self.node(id)?, row);
            }
        }

        if definition.has_port(identifier, Direction::In)
            && self.node(id)?.input_source(identifier).is_some()
        {
            log::debug!(
                "Stored '{}' on {} while it is wired; the wire keeps precedence",
                identifier,
                id
            );
        }

        self.set_property_value(id, identifier, value)?;
        self.recompute_downstream(id)
    }
}
