//! Handler bundles for Prism.
//!
//! This crate provides a plugin-like system for declaring the items that
//! handlers consume. Each bundle is self-contained and lists its
//! [`ItemSpec`](prism_core::ItemSpec)s; the [`BundleRegistry`] merges them
//! into one frozen [`ItemCatalog`](prism_core::ItemCatalog).
//!
//! # Creating a Custom Bundle
//!
//! ```ignore
//! use prism_handlers::{HandlerBundle, BundleRegistry};
//!
//! pub struct MyPalletBundle;
//!
//! impl HandlerBundle for MyPalletBundle {
//!     fn name(&self) -> &str {
//!         "my_pallet"
//!     }
//!
//!     fn items(&self) -> Vec<ItemSpec> {
//!         vec![ItemSpec::event("MyPallet.Created", json!({"args": true, "call": {"origin": true}}))]
//!     }
//! }
//! ```
//!
//! # Registering Bundles
//!
//! ```ignore
//! let mut registry = BundleRegistry::new();
//! registry.register(Box::new(BalancesBundle::new()));
//! registry.register(Box::new(FileBundle::load("items.json")?));
//!
//! // Frozen catalog, shared by the projection workers
//! let catalog = Arc::new(registry.into_catalog()?);
//! ```

pub mod balances;

mod bundle;
mod error;
mod file;
mod registry;

pub use bundle::HandlerBundle;
pub use error::{BundleError, BundleResult};
pub use file::FileBundle;
pub use registry::BundleRegistry;

// Re-export balances bundle for convenience
pub use balances::BalancesBundle;
