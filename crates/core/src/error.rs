//! Error types for the selection calculus.
//!
//! This module defines the registration-time error taxonomy:
//!
//! - [`SelectionError`] - Fatal errors raised while normalizing, merging or
//!   registering a selection request
//! - [`UnknownDiscriminator`] - Non-fatal signal that an event name is not one
//!   of the recognized variants; callers degrade to the common field set
//!
//! Projection never fails: every request reaching the resolver has already
//! been validated by the catalog.

use thiserror::Error;

use crate::schema::{EntityKind, FieldSet, ItemKind};

// =============================================================================
// Selection Errors
// =============================================================================

/// Errors raised while building selection requests and the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The request names a field outside the entity/discriminator field set.
    #[error("Unknown field '{field}' for {fields}")]
    UnknownField {
        /// Field set the request was normalized against.
        fields: FieldSet,
        /// Offending field name.
        field: String,
    },

    /// A field was given a value that is not a valid selection.
    #[error("Invalid selection for '{field}' on {entity}: expected {expected}, found {found}")]
    InvalidValue {
        /// Entity owning the field.
        entity: EntityKind,
        /// Field name (`*` for the request root).
        field: String,
        /// What the field accepts.
        expected: &'static str,
        /// JSON type that was found instead.
        found: &'static str,
    },

    /// Two requests normalized against different field sets were merged.
    #[error("Cannot merge a request for {left} with a request for {right}")]
    DiscriminatorMismatch {
        /// Field set of the left operand.
        left: FieldSet,
        /// Field set of the right operand.
        right: FieldSet,
    },

    /// An item was registered after the catalog was frozen.
    #[error("Catalog is frozen, cannot register {kind} item '{name}'")]
    CatalogFrozen {
        /// Item kind of the rejected registration.
        kind: ItemKind,
        /// Item name of the rejected registration.
        name: String,
    },
}

// =============================================================================
// Discriminator
// =============================================================================

/// An event name that is not one of the recognized variants.
///
/// Not fatal: the event keeps the common field set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized event name: {0}")]
pub struct UnknownDiscriminator(pub String);

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for selection operations.
pub type SelectionResult<T> = Result<T, SelectionError>;
