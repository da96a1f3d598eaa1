//! Error types for bundle registration.

use thiserror::Error;

use prism_core::SelectionError;
use prism_core::schema::ItemKind;

/// Errors raised while loading bundles or building the catalog.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A bundle declared an item the catalog refused.
    #[error("Bundle '{bundle}' rejected {kind} item '{name}': {source}")]
    Registration {
        /// Bundle that declared the item.
        bundle: String,
        /// Item kind.
        kind: ItemKind,
        /// Item name.
        name: String,
        /// Underlying selection error.
        #[source]
        source: SelectionError,
    },

    /// An item spec file could not be read.
    #[error("Failed to read item file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An item spec file is not a valid JSON array of item specs.
    #[error("Failed to parse item file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for bundle operations.
pub type BundleResult<T> = Result<T, BundleError>;
