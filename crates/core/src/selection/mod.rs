//! Selection requests in canonical form.
//!
//! Handlers describe the fields they need with loose JSON: a field may be
//! omitted, `false`, `true`, or (for relations) a nested object. Normalization
//! turns that into a [`Request`] where every stored field is either
//! [`Selection::Full`] or [`Selection::Partial`]; absent fields are simply not
//! stored.
//!
//! # Example
//!
//! ```
//! use prism_core::schema::{EntityKind, FieldSet};
//! use prism_core::selection::Request;
//! use serde_json::json;
//!
//! let fields = FieldSet::common(EntityKind::Call);
//! let request = Request::normalize(fields, &json!({"args": true, "parent": {"args": true}})).unwrap();
//! assert!(request.is_selected("parent"));
//! assert!(!request.is_selected("origin"));
//! ```

mod merge;

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::{SelectionError, SelectionResult};
use crate::schema::{FieldKind, FieldSet};

pub use merge::merge;

/// Canonical selection of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Include the field; for relations, expand one level with the default shape.
    Full,
    /// Include a relation using a nested request.
    Partial(Request),
}

impl Serialize for Selection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Full => serializer.serialize_bool(true),
            Self::Partial(request) => request.serialize(serializer),
        }
    }
}

/// A normalized selection request against one [`FieldSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    fields: FieldSet,
    selected: BTreeMap<&'static str, Selection>,
}

impl Request {
    /// Request selecting nothing beyond the identifying fields.
    pub fn empty(fields: FieldSet) -> Self {
        Self {
            fields,
            selected: BTreeMap::new(),
        }
    }

    /// Request selecting every scalar and fully expanding every relation.
    pub fn full(fields: FieldSet) -> Self {
        let mut selected: BTreeMap<_, _> =
            fields.scalars().map(|name| (name, Selection::Full)).collect();
        for (name, _) in fields.relations() {
            selected.insert(*name, Selection::Full);
        }
        Self { fields, selected }
    }

    /// Normalize a loose JSON request against `fields`.
    ///
    /// At the root, `true` selects everything, `false`/`null` selects only
    /// the identifying fields and an object is normalized field by field.
    pub fn normalize(fields: FieldSet, value: &Value) -> SelectionResult<Self> {
        match value {
            Value::Bool(true) => Ok(Self::full(fields)),
            Value::Bool(false) | Value::Null => Ok(Self::empty(fields)),
            Value::Object(map) => Self::normalize_object(fields, map),
            other => Err(SelectionError::InvalidValue {
                entity: fields.entity(),
                field: "*".to_string(),
                expected: "boolean or object",
                found: json_type(other),
            }),
        }
    }

    fn normalize_object(fields: FieldSet, map: &Map<String, Value>) -> SelectionResult<Self> {
        let mut selected = BTreeMap::new();

        for (key, value) in map {
            let (name, kind) = fields
                .lookup(key)
                .ok_or_else(|| SelectionError::UnknownField {
                    fields,
                    field: key.clone(),
                })?;

            let invalid = |expected| SelectionError::InvalidValue {
                entity: fields.entity(),
                field: key.clone(),
                expected,
                found: json_type(value),
            };

            match (kind, value) {
                (_, Value::Bool(false) | Value::Null) => {}
                // Always projected; accepted so callers can be explicit
                (FieldKind::Identifying, Value::Bool(true)) => {}
                (FieldKind::Scalar | FieldKind::Relation(_), Value::Bool(true)) => {
                    selected.insert(name, Selection::Full);
                }
                (FieldKind::Relation(target), Value::Object(nested)) => {
                    let nested = Self::normalize_object(FieldSet::common(target), nested)?;
                    selected.insert(name, Selection::Partial(nested));
                }
                (FieldKind::Relation(_), _) => return Err(invalid("boolean or object")),
                (FieldKind::Identifying | FieldKind::Scalar, _) => return Err(invalid("boolean")),
            }
        }

        Ok(Self { fields, selected })
    }

    /// Field set this request was normalized against.
    pub fn field_set(&self) -> FieldSet {
        self.fields
    }

    /// Selection of a field, `None` when absent.
    pub fn get(&self, field: &str) -> Option<&Selection> {
        self.selected.get(field)
    }

    pub fn is_selected(&self, field: &str) -> bool {
        self.selected.contains_key(field)
    }

    /// Selected fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Selection)> {
        self.selected.iter().map(|(name, selection)| (*name, selection))
    }

    /// Whether only the identifying fields are selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Loose JSON form; normalizing it again yields an equal request.
    pub fn to_value(&self) -> Value {
        let map = self
            .selected
            .iter()
            .map(|(name, selection)| {
                let value = match selection {
                    Selection::Full => Value::Bool(true),
                    Selection::Partial(nested) => nested.to_value(),
                };
                (name.to_string(), value)
            })
            .collect();
        Value::Object(map)
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.selected.len()))?;
        for (name, selection) in &self.selected {
            map.serialize_entry(name, selection)?;
        }
        map.end()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================
