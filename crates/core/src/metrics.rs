//! Metrics definitions for the selection catalog.
//!
//! Metrics are collected using the `metrics` crate. Nothing is exported
//! unless the embedding pipeline installs a recorder; without one every call
//! here is a no-op.

use metrics::{counter, describe_counter};

use crate::schema::{EntityKind, ItemKind};

/// Initialize all metric descriptions.
/// Call this once at startup, after the recorder is installed.
pub fn init_metrics() {
    describe_counter!(
        "items_registered_total",
        "Total number of item specs merged into the catalog"
    );
    describe_counter!(
        "registrations_rejected_total",
        "Total number of item specs rejected during registration"
    );
    describe_counter!(
        "unknown_discriminators_total",
        "Total number of registered event names without variant fields"
    );
    describe_counter!(
        "records_projected_total",
        "Total number of records projected through the shape resolver"
    );
}

/// Record an item spec merged into the catalog.
pub fn record_item_registered(kind: ItemKind) {
    counter!("items_registered_total", "kind" => kind.as_str()).increment(1);
}

/// Record a rejected registration.
pub fn record_registration_rejected(kind: ItemKind) {
    counter!("registrations_rejected_total", "kind" => kind.as_str()).increment(1);
}

/// Record an event name that degraded to the common field set.
pub fn record_unknown_discriminator() {
    counter!("unknown_discriminators_total").increment(1);
}

/// Record a projected record.
///
/// # Arguments
/// * `entity` - Kind of the root record that was projected
pub fn record_projection(entity: EntityKind) {
    counter!("records_projected_total", "kind" => entity.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sans recorder installé, les compteurs ne doivent jamais paniquer
    #[test]
    fn test_metrics_are_noop_without_recorder() {
        init_metrics();
        record_item_registered(ItemKind::Event);
        record_registration_rejected(ItemKind::Call);
        record_unknown_discriminator();
        record_projection(EntityKind::Extrinsic);
    }
}
