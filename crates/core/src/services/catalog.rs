//! Item catalog - merged selection requests keyed by `(kind, name)`.
//!
//! The catalog is filled during handler registration, frozen before
//! processing starts, then shared read-only (usually behind an `Arc`) by
//! every projection worker.
//!
//! # Lifecycle
//!
//! 1. [`ItemCatalog::add_item`] for each handler interest (normalize + merge)
//! 2. [`ItemCatalog::freeze`]
//! 3. [`ItemCatalog::get`] / [`ItemCatalog::project`] per record

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::{SelectionError, SelectionResult};
use crate::metrics::{record_item_registered, record_registration_rejected};
use crate::models::ItemRecord;
use crate::schema::{FieldSet, ItemKind};
use crate::selection::Request;
use crate::services::resolver::{ProjectedItem, project_item};

// =============================================================================
// Item specs
// =============================================================================

/// Catalog key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKey {
    pub kind: ItemKind,
    pub name: String,
}

impl ItemKey {
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

/// One handler's declared interest in an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub kind: ItemKind,
    pub name: String,
    /// Loose JSON request; omitted means identifying fields only.
    #[serde(default)]
    pub request: Value,
}

impl ItemSpec {
    pub fn event(name: impl Into<String>, request: Value) -> Self {
        Self {
            kind: ItemKind::Event,
            name: name.into(),
            request,
        }
    }

    pub fn call(name: impl Into<String>, request: Value) -> Self {
        Self {
            kind: ItemKind::Call,
            name: name.into(),
            request,
        }
    }
}

// =============================================================================
// ItemCatalog
// =============================================================================

/// Registry of merged selection requests.
///
/// Items merge only on an exact `(kind, name)` match; any other pair keeps
/// its own entry.
#[derive(Debug, Default)]
pub struct ItemCatalog {
    entries: HashMap<ItemKey, Request>,
    frozen: bool,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one handler's interest.
    ///
    /// Normalizes `request` against the field set of `(kind, name)` and
    /// merges it into the existing entry. On error the catalog is left
    /// exactly as it was.
    #[instrument(skip(self, request))]
    pub fn add_item(&mut self, kind: ItemKind, name: &str, request: &Value) -> SelectionResult<()> {
        if self.frozen {
            warn!("⚠️  Registration attempted after catalog freeze");
            record_registration_rejected(kind);
            return Err(SelectionError::CatalogFrozen {
                kind,
                name: name.to_string(),
            });
        }

        let merged = self.merged_entry(kind, name, request).inspect_err(|e| {
            debug!(error = %e, "Item rejected");
            record_registration_rejected(kind);
        })?;

        self.entries.insert(ItemKey::new(kind, name), merged);
        record_item_registered(kind);
        debug!("Item merged into catalog");

        Ok(())
    }

    /// Register an [`ItemSpec`].
    pub fn add_spec(&mut self, spec: &ItemSpec) -> SelectionResult<()> {
        self.add_item(spec.kind, &spec.name, &spec.request)
    }

    fn merged_entry(&self, kind: ItemKind, name: &str, request: &Value) -> SelectionResult<Request> {
        let normalized = Request::normalize(FieldSet::for_item_reported(kind, name), request)?;

        match self.entries.get(&ItemKey::new(kind, name)) {
            Some(existing) => existing.join(&normalized),
            None => Ok(normalized),
        }
    }

    /// Make the catalog read-only.
    pub fn freeze(&mut self) {
        if !self.frozen {
            self.frozen = true;
            info!(items = self.entries.len(), "🧊 Item catalog frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Merged request for `(kind, name)`.
    ///
    /// Unregistered items get the identifying-only request: their records
    /// stay identifiable but carry no optional fields.
    pub fn get(&self, kind: ItemKind, name: &str) -> Cow<'_, Request> {
        match self.entries.get(&ItemKey::new(kind, name)) {
            Some(request) => Cow::Borrowed(request),
            None => Cow::Owned(Request::empty(FieldSet::for_item(kind, name))),
        }
    }

    /// Whether a handler registered interest in `(kind, name)`.
    pub fn contains(&self, kind: ItemKind, name: &str) -> bool {
        self.entries.contains_key(&ItemKey::new(kind, name))
    }

    /// Registered keys, sorted by kind then name.
    pub fn items(&self) -> Vec<&ItemKey> {
        let mut keys: Vec<_> = self.entries.keys().collect();
        keys.sort();
        keys
    }

    /// Merged entries as item specs, sorted by key.
    pub fn to_specs(&self) -> Vec<ItemSpec> {
        self.items()
            .into_iter()
            .map(|key| ItemSpec {
                kind: key.kind,
                name: key.name.clone(),
                request: self.entries[key].to_value(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Project a decoded record with its merged request.
    pub fn project(&self, record: &ItemRecord) -> ProjectedItem {
        let request = self.get(record.kind(), record.name());
        project_item(record, &request)
    }
}

// =============================================================================
// Tests
// =============================================================================
