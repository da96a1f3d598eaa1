//! Shape resolver and record projection.
//!
//! [`resolve`] computes the exact output shape of one record from its
//! selection request and, for events, its actual phase. [`project`] then
//! copies exactly the keys of that shape out of a decoded record.
//!
//! Both are pure: they never touch the request or the catalog, and cannot
//! fail once the request has been validated.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::metrics::record_projection;
use crate::models::{Call, CallRecord, Event, ItemRecord, Phase, Record};
use crate::schema::{EntityKind, FieldSet, ItemKind};
use crate::selection::{Request, Selection};

/// A projected record: exactly the keys of its resolved [`Shape`].
pub type Projection = Map<String, Value>;

// =============================================================================
// Shape
// =============================================================================

/// Output shape of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    entity: EntityKind,
    fields: Vec<&'static str>,
    relations: Vec<(&'static str, Shape)>,
}

impl Shape {
    /// Default shape used when a relation is selected with `true`:
    /// identifying fields plus every common scalar, no nested relations.
    pub fn canonical(entity: EntityKind) -> Self {
        let set = FieldSet::common(entity);
        let mut fields = entity.identifying_fields().to_vec();
        fields.extend(set.scalars());
        Self {
            entity,
            fields,
            relations: Vec::new(),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Identifying and scalar fields, in projection order.
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Relation sub-shapes.
    pub fn relations(&self) -> &[(&'static str, Shape)] {
        &self.relations
    }

    /// Sub-shape of a relation, if it is part of this shape.
    pub fn relation(&self, name: &str) -> Option<&Shape> {
        self.relations
            .iter()
            .find(|(relation, _)| *relation == name)
            .map(|(_, shape)| shape)
    }

    /// Every top-level key of the shape.
    pub fn keys(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .copied()
            .chain(self.relations.iter().map(|(name, _)| *name))
            .collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|field| *field == key) || self.relation(key).is_some()
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve the output shape of a record.
///
/// The discriminator comes from the request's field set. `phase` is the
/// instance's actual phase for events; `None` resolves the widest shape, as
/// if the event ran in `ApplyExtrinsic`. Non-event entities ignore it.
pub fn resolve(request: &Request, phase: Option<Phase>) -> Shape {
    let set = request.field_set();
    let entity = set.entity();

    let mut fields = entity.identifying_fields().to_vec();
    fields.extend(set.scalars().filter(|name| request.is_selected(name)));

    let mut with_relations = true;
    if entity == EntityKind::Event {
        let wants_context = set.relations().iter().any(|(name, _)| request.is_selected(name));
        if wants_context {
            if !fields.contains(&"phase") {
                fields.push("phase");
            }
            // call/extrinsic do not exist for Initialization/Finalization events
            with_relations = matches!(phase, None | Some(Phase::ApplyExtrinsic));
        }
    }

    let relations = if with_relations {
        set.relations()
            .iter()
            .filter_map(|(name, target)| {
                let shape = match request.get(name)? {
                    Selection::Full => Shape::canonical(*target),
                    Selection::Partial(nested) => resolve(nested, None),
                };
                Some((*name, shape))
            })
            .collect()
    } else {
        Vec::new()
    };

    Shape {
        entity,
        fields,
        relations,
    }
}

// =============================================================================
// Projection
// =============================================================================

/// Copy the keys of `shape` out of `record`.
///
/// Relations the instance does not have (a root call's `parent`) are left
/// out rather than fabricated.
pub fn project(record: &dyn Record, shape: &Shape) -> Projection {
    let mut out = Map::new();

    for field in shape.fields() {
        let value = record.field(field).unwrap_or(Value::Null);
        out.insert(field.to_string(), value);
    }

    for (name, sub) in shape.relations() {
        if let Some(related) = record.related(name) {
            out.insert(name.to_string(), Value::Object(project(related, sub)));
        }
    }

    out
}

/// Project an event using its actual phase.
pub fn project_event(event: &Event, request: &Request) -> Projection {
    project(event, &resolve(request, Some(event.phase)))
}

/// Project a call.
pub fn project_call(call: &Call, request: &Request) -> Projection {
    project(call, &resolve(request, None))
}

/// Project a call item: the call itself, and its enclosing extrinsic when
/// the request selects it and the decoder supplied it.
pub fn project_call_item(item: &CallRecord, request: &Request) -> (Projection, Option<Projection>) {
    let shape = resolve(request, None);
    // Call::related never yields `extrinsic`, so the call part stays flat
    let call = project(&item.call, &shape);
    let extrinsic = shape
        .relation("extrinsic")
        .zip(item.extrinsic.as_ref())
        .map(|(sub, extrinsic)| project(extrinsic, sub));
    (call, extrinsic)
}

/// A projected record wrapped with its item key.
///
/// Serializes as `{"kind": "event", "name": ..., "event": {...}}`, or
/// `{"kind": "call", "name": ..., "call": {...}, "extrinsic": {...}}`, the
/// per-record argument handlers receive.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedItem {
    pub kind: ItemKind,
    pub name: String,
    pub data: Projection,
    /// Enclosing extrinsic of a call item.
    pub extrinsic: Option<Projection>,
}

impl Serialize for ProjectedItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 3 + usize::from(self.extrinsic.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("kind", &self.kind)?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry(self.kind.as_str(), &self.data)?;
        if let Some(extrinsic) = &self.extrinsic {
            map.serialize_entry("extrinsic", extrinsic)?;
        }
        map.end()
    }
}

/// Project a decoded item with the request registered for it.
pub fn project_item(record: &ItemRecord, request: &Request) -> ProjectedItem {
    let (data, extrinsic) = match record {
        ItemRecord::Event(event) => (project_event(event, request), None),
        ItemRecord::Call(item) => project_call_item(item, request),
    };
    record_projection(record.kind().entity());

    ProjectedItem {
        kind: record.kind(),
        name: record.name().to_string(),
        data,
        extrinsic,
    }
}

// =============================================================================
// Tests
// =============================================================================
