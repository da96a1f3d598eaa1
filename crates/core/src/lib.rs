//! Core data-selection layer for Prism.
//!
//! This crate contains the record models, the selection request calculus
//! and the item catalog that Substrate indexing handlers use to declare the
//! fields they need. It is the innermost layer: no I/O, no async, no
//! dependency on how records are fetched or decoded.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      prism (binary)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    prism-handlers                           │
//! │               (bundles, registration)                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                     prism-core  ← YOU ARE HERE              │
//! │      (models, schema, selection, resolver, catalog)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`models`] - Decoded records (Call, Extrinsic, Event)
//! - [`schema`] - Field sets per entity and event variant
//! - [`selection`] - Canonical selection requests and their merge
//! - [`services`] - Shape resolver and item catalog
//! - [`error`] - Registration error types
//! - [`metrics`] - Counter definitions
//!
//! # Key Concepts
//!
//! ## Selection requests
//!
//! A handler states which optional fields of a record it needs. Requests are
//! normalized against the entity's [`schema::FieldSet`] once, at registration.
//!
//! ## Merge lattice
//!
//! Requests for the same `(kind, name)` are joined field by field
//! (`absent < partial < full`), so the catalog holds the smallest request
//! that satisfies every handler.
//!
//! ## Catalog lifecycle
//!
//! 1. Handlers register item specs into an [`ItemCatalog`]
//! 2. The catalog is frozen
//! 3. Every decoded record is projected with its catalog entry
//!
//! # Example
//!
//! ```
//! use prism_core::models::{Event, ItemRecord, Phase};
//! use prism_core::schema::ItemKind;
//! use prism_core::ItemCatalog;
//! use serde_json::json;
//!
//! let mut catalog = ItemCatalog::new();
//! catalog.add_item(ItemKind::Event, "Balances.Transfer", &json!({"call": true})).unwrap();
//! catalog.freeze();
//!
//! let event = Event::new("e1", 0, "Balances.Transfer", Phase::Finalization);
//! let item = catalog.project(&ItemRecord::Event(event));
//! assert_eq!(item.data["phase"], json!("Finalization"));
//! assert!(!item.data.contains_key("call"));
//! ```

pub mod error;
pub mod metrics;
pub mod models;
pub mod schema;
pub mod selection;
pub mod services;

pub use error::{SelectionError, SelectionResult, UnknownDiscriminator};
pub use services::{ItemCatalog, ItemKey, ItemSpec, ProjectedItem, Projection, Shape};
