//! Bundle loaded from a JSON item spec file.

use std::fs;
use std::path::Path;

use tracing::debug;

use prism_core::ItemSpec;

use crate::bundle::HandlerBundle;
use crate::error::{BundleError, BundleResult};

/// Item specs declared in a file rather than in code.
///
/// The file holds a JSON array:
///
/// ```json
/// [
///   {"kind": "event", "name": "Balances.Transfer", "request": {"args": true, "call": true}},
///   {"kind": "call", "name": "Balances.transfer_keep_alive"}
/// ]
/// ```
#[derive(Debug, Clone)]
pub struct FileBundle {
    name: String,
    items: Vec<ItemSpec>,
}

impl FileBundle {
    /// Load a bundle named after the file stem.
    pub fn load(path: impl AsRef<Path>) -> BundleResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: display.clone(),
            source,
        })?;
        let items: Vec<ItemSpec> =
            serde_json::from_str(&content).map_err(|source| BundleError::Parse {
                path: display.clone(),
                source,
            })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or(display);
        debug!(bundle = %name, items = items.len(), "Loaded item file");

        Ok(Self::from_specs(name, items))
    }

    pub fn from_specs(name: impl Into<String>, items: Vec<ItemSpec>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

impl HandlerBundle for FileBundle {
    fn name(&self) -> &str {
        &self.name
    }

    fn items(&self) -> Vec<ItemSpec> {
        self.items.clone()
    }
}
