use super::node::NodeDefinition;
use crate::error::GraphError;
use ahash::AHashSet;

/// Checks the structural rules every registered definition must satisfy.
pub(crate) fn validate_definition(definition: &NodeDefinition) -> Result<(), GraphError> {
    let mut seen = AHashSet::new();
    for property in &definition.properties {
        if !seen.insert(property.identifier.as_str()) {
            return Err(GraphError::DuplicateProperty {
                type_name: definition.name.clone(),
                identifier: property.identifier.clone(),
            });
        }
    }

    let mut row_names = AHashSet::new();
    for row in &definition.rows {
        if let Some(name) = &row.name {
            if !row_names.insert(name.as_str()) {
                return Err(invalid(definition, format!("row '{}' is declared twice", name)));
            }
        }

        for connector in &row.connectors {
            if !definition.has_port(&connector.identifier, connector.direction) {
                return Err(invalid(
                    definition,
                    format!(
                        "connector '{}' has no matching '{}' property",
                        connector.identifier, connector.direction
                    ),
                ));
            }
        }

        let bindings = [
            row.options.input_bound_identifier.as_deref(),
            row.options.output_bound_identifier.as_deref(),
        ];
        for identifier in bindings.into_iter().flatten() {
            if definition.property(identifier).is_none() {
                return Err(invalid(
                    definition,
                    format!("row binding '{}' names no property", identifier),
                ));
            }
            if row.name.is_none() {
                return Err(invalid(
                    definition,
                    format!("row bound to '{}' must be named", identifier),
                ));
            }
        }
    }

    Ok(())
}

fn invalid(definition: &NodeDefinition, message: String) -> GraphError {
    GraphError::InvalidDefinition {
        type_name: definition.name.clone(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ConnectorDefinition, PropertyDefinition, RowDefinition};

    fn base() -> NodeDefinition {
        NodeDefinition::new("Test")
            .with_property(PropertyDefinition::input("x", 1.0))
            .with_property(PropertyDefinition::output("y", 0.0))
    }

    #[test]
    fn accepts_well_formed_definition() {
        let def = base().with_row(
            RowDefinition::new("Input")
                .named("X")
                .bind_input("x")
                .with_connector(ConnectorDefinition::input("x", 1, "number")),
        );
        assert!(validate_definition(&def).is_ok());
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let def = base().with_property(PropertyDefinition::output("x", 0.0));
        assert_eq!(
            validate_definition(&def),
            Err(GraphError::DuplicateProperty {
                type_name: "Test".to_string(),
                identifier: "x".to_string(),
            })
        );
    }

    #[test]
    fn rejects_connector_with_wrong_direction() {
        let def = base().with_row(
            RowDefinition::new("Label").with_connector(ConnectorDefinition::output("x", 1, "number")),
        );
        assert!(matches!(
            validate_definition(&def),
            Err(GraphError::InvalidDefinition { .. })
        ));
    }

    #[test]
    fn rejects_unknown_binding() {
        let def = base().with_row(RowDefinition::new("Input").named("Z").bind_input("z"));
        assert!(matches!(
            validate_definition(&def),
            Err(GraphError::InvalidDefinition { .. })
        ));
    }
}
