//! Bundle registry for building the item catalog.

use std::cmp::Reverse;

use tracing::{debug, info, warn};

use prism_core::ItemCatalog;

use crate::bundle::HandlerBundle;
use crate::error::{BundleError, BundleResult};

/// Registry for managing handler bundles.
///
/// The registry handles:
/// - Bundle registration with priority ordering
/// - Catalog construction from every bundle's item specs
///
/// # Example
///
/// ```ignore
/// let mut registry = BundleRegistry::new();
///
/// // Register bundles (order doesn't matter - the catalog merge is order-independent)
/// registry.register(Box::new(BalancesBundle::new()));
/// registry.register(Box::new(FileBundle::load("items/staking.json")?));
///
/// // Frozen catalog for the processing loop
/// let catalog = Arc::new(registry.into_catalog()?);
/// ```
pub struct BundleRegistry {
    bundles: Vec<Box<dyn HandlerBundle>>,
}

impl BundleRegistry {
    /// Create a new empty bundle registry.
    pub fn new() -> Self {
        Self {
            bundles: Vec::new(),
        }
    }

    /// Register a handler bundle.
    pub fn register(&mut self, bundle: Box<dyn HandlerBundle>) {
        info!(bundle = bundle.name(), "📦 Registering handler bundle");
        self.bundles.push(bundle);
    }

    /// Build the frozen item catalog.
    ///
    /// Adds every bundle's items in priority order (higher first). The first
    /// rejected item aborts the build and is reported with its bundle name.
    pub fn into_catalog(self) -> BundleResult<ItemCatalog> {
        let mut sorted = self.bundles;
        sorted.sort_by_key(|b| Reverse(b.priority()));

        let mut catalog = ItemCatalog::new();
        for bundle in &sorted {
            let items = bundle.items();
            if items.is_empty() {
                debug!(bundle = bundle.name(), "No items declared");
                continue;
            }

            for spec in &items {
                catalog.add_spec(spec).map_err(|source| {
                    warn!(
                        bundle = bundle.name(),
                        kind = %spec.kind,
                        item = %spec.name,
                        error = %source,
                        "⚠️  Item rejected"
                    );
                    BundleError::Registration {
                        bundle: bundle.name().to_string(),
                        kind: spec.kind,
                        name: spec.name.clone(),
                        source,
                    }
                })?;
            }

            debug!(
                bundle = bundle.name(),
                items = items.len(),
                "Items registered"
            );
        }

        catalog.freeze();
        Ok(catalog)
    }

    /// Get the names of all registered bundles.
    pub fn bundle_names(&self) -> Vec<&str> {
        self.bundles.iter().map(|b| b.name()).collect()
    }

    /// Get the number of registered bundles.
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Check if no bundles are registered.
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl Default for BundleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::ItemSpec;
    use prism_core::schema::ItemKind;
    use serde_json::json;

    struct MockBundle {
        name: &'static str,
        priority: i32,
        items: Vec<ItemSpec>,
    }

    impl HandlerBundle for MockBundle {
        fn name(&self) -> &str { self.name }
        fn items(&self) -> Vec<ItemSpec> { self.items.clone() }
        fn priority(&self) -> i32 { self.priority }
    }

    // Test critique: les demandes de plusieurs bundles sur la même clé sont fusionnées
    #[test]
    fn test_bundles_merge_into_frozen_catalog() {
        let mut registry = BundleRegistry::new();
        registry.register(Box::new(MockBundle {
            name: "low_priority",
            priority: 0,
            items: vec![ItemSpec::call("Balances.transfer", json!({"args": true}))],
        }));
        registry.register(Box::new(MockBundle {
            name: "high_priority",
            priority: 100,
            items: vec![
                ItemSpec::call("Balances.transfer", json!({"parent": true})),
                ItemSpec::event("Staking.Rewarded", json!({"args": true})),
            ],
        }));
        assert_eq!(registry.bundle_names(), vec!["low_priority", "high_priority"]);

        let catalog = registry.into_catalog().unwrap();
        assert!(catalog.is_frozen());
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(ItemKind::Call, "Balances.transfer").to_value(),
            json!({"args": true, "parent": true})
        );
    }

    #[test]
    fn test_rejected_item_names_bundle() {
        let mut registry = BundleRegistry::new();
        registry.register(Box::new(MockBundle {
            name: "broken",
            priority: 0,
            items: vec![ItemSpec::event("EVM.Log", json!({"contract": true}))],
        }));

        let err = registry.into_catalog().unwrap_err();
        assert!(matches!(
            err,
            BundleError::Registration { ref bundle, ref name, .. } if bundle == "broken" && name == "EVM.Log"
        ));
    }

    #[test]
    fn test_empty_registry_builds_empty_catalog() {
        let registry = BundleRegistry::default();
        assert!(registry.is_empty());
        let catalog = registry.into_catalog().unwrap();
        assert!(catalog.is_empty() && catalog.is_frozen());
    }
}
