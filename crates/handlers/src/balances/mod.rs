//! Balances pallet handler bundle.
//!
//! This bundle declares the data the Balances transfer handlers read.
//!
//! # Declared Items
//!
//! - `Balances.Transfer` event - transfer arguments, plus the emitting
//!   extrinsic's hash, fee and tip
//! - `Balances.transfer_keep_alive` / `Balances.transfer_allow_death` calls -
//!   arguments, origin and outcome, plus the enclosing extrinsic's hash and fee
//!
//! # Usage
//!
//! ```ignore
//! use prism_handlers::BalancesBundle;
//!
//! registry.register(Box::new(BalancesBundle::new()));
//! ```

use serde_json::json;

use prism_core::ItemSpec;

use crate::HandlerBundle;

/// Transfer calls whose arguments and outcome are tracked.
pub const TRANSFER_CALLS: &[&str] = &[
    "Balances.transfer_keep_alive",
    "Balances.transfer_allow_death",
];

/// Handler bundle for the Balances pallet.
#[derive(Debug, Clone, Default)]
pub struct BalancesBundle;

impl BalancesBundle {
    /// Create a new Balances bundle.
    pub fn new() -> Self {
        Self
    }
}

impl HandlerBundle for BalancesBundle {
    fn name(&self) -> &str {
        "balances"
    }

    fn items(&self) -> Vec<ItemSpec> {
        let mut items = vec![ItemSpec::event(
            "Balances.Transfer",
            json!({
                "args": true,
                "extrinsic": {"hash": true, "fee": true, "tip": true},
            }),
        )];
        items.extend(TRANSFER_CALLS.iter().map(|name| {
            ItemSpec::call(
                *name,
                json!({
                    "args": true,
                    "origin": true,
                    "success": true,
                    "error": true,
                    "extrinsic": {"hash": true, "fee": true},
                }),
            )
        }));
        items
    }

    fn priority(&self) -> i32 {
        // High priority - other bundles usually extend balance data
        100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::ItemCatalog;
    use prism_core::schema::ItemKind;

    // Test critique: toutes les déclarations du bundle sont valides pour le catalogue
    #[test]
    fn test_items_register_cleanly() {
        let mut catalog = ItemCatalog::new();
        for spec in BalancesBundle::new().items() {
            catalog.add_spec(&spec).unwrap();
        }
        assert_eq!(catalog.len(), 1 + TRANSFER_CALLS.len());

        let transfer = catalog.get(ItemKind::Event, "Balances.Transfer");
        assert!(transfer.is_selected("extrinsic"));
        assert!(!transfer.is_selected("call"));

        let call = catalog.get(ItemKind::Call, TRANSFER_CALLS[0]);
        assert!(call.is_selected("extrinsic"));
        assert!(!call.is_selected("parent"));
    }
}
