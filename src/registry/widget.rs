use crate::definition::{RowData, RowDefinition};
use crate::graph::NodeInstance;
use crate::value::Value;
use ahash::AHashMap;

/// Notification hooks implemented by the UI layer for one widget kind.
///
/// Every hook is optional; the defaults do nothing, which is the same as the
/// widget not providing the hook at all. Rows whose widget kind is not
/// registered receive no notifications.
pub trait Widget: Send + Sync {
    /// The widget kind named by `RowDefinition::widget`.
    fn widget_type(&self) -> &str;

    /// Called once while a node is constructed so the row's state can mirror
    /// the default property values.
    fn reset_row_data_to_property_value(
        &self,
        _property_values: &AHashMap<String, Value>,
        _row_data: &mut RowData,
        _row: &RowDefinition,
    ) {
    }

    /// Called after `RowData::input_value` was replaced programmatically.
    fn update_element_display_value(&self, _node: &NodeInstance, _row: &RowDefinition) {}

    /// Called when a property the row is bound to changed value or wiring.
    fn property_value_was_updated(&self, _node: &NodeInstance, _row: &RowDefinition) {}
}
