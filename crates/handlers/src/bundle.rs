//! Handler bundle trait definition.

use prism_core::ItemSpec;

/// A self-contained group of handlers declaring the items they consume.
///
/// Bundles provide a plugin-like architecture where each bundle can:
/// - Declare the events and calls its handlers need, with the fields they read
/// - Be independently developed and tested
///
/// # Example
///
/// ```ignore
/// pub struct MyBundle;
///
/// impl HandlerBundle for MyBundle {
///     fn name(&self) -> &str { "my_bundle" }
///
///     fn items(&self) -> Vec<ItemSpec> {
///         vec![ItemSpec::event("Balances.Transfer", json!({"args": true}))]
///     }
/// }
/// ```
pub trait HandlerBundle: Send + Sync {
    /// Unique name identifying this bundle.
    ///
    /// Used for logging and error reporting.
    fn name(&self) -> &str;

    /// Item specs declared by this bundle's handlers.
    ///
    /// Several handlers may declare the same `(kind, name)`; the catalog
    /// merges their requests.
    fn items(&self) -> Vec<ItemSpec>;

    /// Priority for registration (higher = earlier).
    ///
    /// Merging is order-independent, so this only affects log order and
    /// which bundle is reported first on error. Default is 0.
    fn priority(&self) -> i32 {
        0
    }
}
