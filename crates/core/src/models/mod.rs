//! Decoded chain records the resolver projects.
//!
//! These models are populated by the decoder layer with every canonical
//! field. The resolver only ever projects fields away; it never fabricates
//! values that the decoder did not supply.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{EntityKind, EventVariant, FieldKind, FieldSet, ItemKind};

// =============================================================================
// Phase
// =============================================================================

/// Block execution phase an event was emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    ApplyExtrinsic,
    Initialization,
    Finalization,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApplyExtrinsic => "ApplyExtrinsic",
            Self::Initialization => "Initialization",
            Self::Finalization => "Finalization",
        }
    }
}

// =============================================================================
// Calls
// =============================================================================

/// A dispatched call, possibly nested inside an enclosing call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    /// Unique identifier.
    pub id: String,
    /// Position of the call among the block items.
    pub pos: u32,
    /// Qualified call name (e.g., "Balances.transfer").
    pub name: String,
    /// Call arguments as JSON.
    #[serde(default)]
    pub args: Value,
    /// Dispatch origin (if decoded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<Value>,
    /// Whether the call succeeded.
    pub success: bool,
    /// Dispatch error if the call failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Enclosing call (None for root calls).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Call>>,
}

// =============================================================================
// Extrinsics
// =============================================================================

/// A submitted transaction or inherent wrapping a root call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extrinsic {
    /// Unique identifier.
    pub id: String,
    /// Position of the extrinsic among the block items.
    pub pos: u32,
    /// Index within the block (0-based).
    pub index: u32,
    /// Extrinsic format version.
    pub version: u32,
    /// Signature payload (None for unsigned/inherent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Value>,
    /// Fee paid (in smallest unit).
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    pub fee: Option<u128>,
    /// Tip paid (in smallest unit).
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    pub tip: Option<u128>,
    /// Extrinsic hash (hex).
    pub hash: String,
    /// Root call.
    pub call: Call,
}

// =============================================================================
// Events
// =============================================================================

/// A chain-emitted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    pub id: String,
    /// Position of the event among the block items.
    pub pos: u32,
    /// Qualified event name (e.g., "Balances.Transfer").
    pub name: String,
    /// Execution phase.
    pub phase: Phase,
    /// Event arguments as JSON.
    #[serde(default)]
    pub args: Value,
    /// Emitting call (ApplyExtrinsic phase only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call: Option<Call>,
    /// Emitting extrinsic (ApplyExtrinsic phase only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrinsic: Option<Extrinsic>,
    /// Variant-specific fields keyed by wire name (e.g., `address` for `EVM.Log`).
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Event {
    pub fn new(id: impl Into<String>, pos: u32, name: impl Into<String>, phase: Phase) -> Self {
        Self {
            id: id.into(),
            pos,
            name: name.into(),
            phase,
            args: Value::Null,
            call: None,
            extrinsic: None,
            payload: Map::new(),
        }
    }

    /// Set a variant-specific field.
    pub fn with_field(mut self, field: &str, value: Value) -> Self {
        self.payload.insert(field.to_string(), value);
        self
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    pub fn with_call(mut self, call: Call) -> Self {
        self.call = Some(call);
        self
    }

    pub fn with_extrinsic(mut self, extrinsic: Extrinsic) -> Self {
        self.extrinsic = Some(extrinsic);
        self
    }

    /// Variant recognized from this event's name.
    pub fn variant(&self) -> EventVariant {
        EventVariant::from_name(&self.name)
    }
}

// =============================================================================
// Item records
// =============================================================================

/// A call handed over as an item, with the extrinsic it was dispatched in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(flatten)]
    pub call: Call,
    /// Enclosing extrinsic (if decoded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extrinsic: Option<Extrinsic>,
}

impl From<Call> for CallRecord {
    fn from(call: Call) -> Self {
        Self {
            call,
            extrinsic: None,
        }
    }
}

/// A record as handed over by the decoder, tagged with its item kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRecord {
    Event(Event),
    Call(CallRecord),
}

impl ItemRecord {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Event(_) => ItemKind::Event,
            Self::Call(_) => ItemKind::Call,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Event(event) => &event.name,
            Self::Call(item) => &item.call.name,
        }
    }
}

// =============================================================================
// Field access
// =============================================================================

/// Read access to a record's fields by wire name.
///
/// Implemented by every decoded entity so the projector can copy fields
/// without knowing the concrete type.
pub trait Record {
    /// Entity kind of the record.
    fn entity(&self) -> EntityKind;

    /// Value of an identifying or scalar field.
    ///
    /// Returns `None` only for names outside the entity's field set; a known
    /// field the decoder left empty yields `Value::Null`.
    fn field(&self, name: &str) -> Option<Value>;

    /// Related record behind a relation field, if the instance has one.
    fn related(&self, name: &str) -> Option<&dyn Record>;
}

fn optional(value: &Option<Value>) -> Value {
    value.clone().unwrap_or(Value::Null)
}

impl Record for Call {
    fn entity(&self) -> EntityKind {
        EntityKind::Call
    }

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => Value::from(self.id.as_str()),
            "pos" => Value::from(self.pos),
            "name" => Value::from(self.name.as_str()),
            "args" => self.args.clone(),
            "origin" => optional(&self.origin),
            "success" => Value::from(self.success),
            "error" => optional(&self.error),
            _ => return None,
        };
        Some(value)
    }

    fn related(&self, name: &str) -> Option<&dyn Record> {
        match name {
            "parent" => self.parent.as_deref().map(|call| call as &dyn Record),
            _ => None,
        }
    }
}

impl Record for Extrinsic {
    fn entity(&self) -> EntityKind {
        EntityKind::Extrinsic
    }

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => Value::from(self.id.as_str()),
            "pos" => Value::from(self.pos),
            "index" => Value::from(self.index),
            "version" => Value::from(self.version),
            "signature" => optional(&self.signature),
            "fee" => amount::to_value(self.fee),
            "tip" => amount::to_value(self.tip),
            "hash" => Value::from(self.hash.as_str()),
            _ => return None,
        };
        Some(value)
    }

    fn related(&self, name: &str) -> Option<&dyn Record> {
        match name {
            "call" => Some(&self.call as &dyn Record),
            _ => None,
        }
    }
}

impl Record for Event {
    fn entity(&self) -> EntityKind {
        EntityKind::Event
    }

    fn field(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => Value::from(self.id.as_str()),
            "pos" => Value::from(self.pos),
            "name" => Value::from(self.name.as_str()),
            "phase" => Value::from(self.phase.as_str()),
            "args" => self.args.clone(),
            other => {
                let fields = FieldSet::new(EntityKind::Event, self.variant());
                match fields.lookup(other) {
                    Some((_, FieldKind::Scalar)) => {
                        self.payload.get(other).cloned().unwrap_or(Value::Null)
                    }
                    _ => return None,
                }
            }
        };
        Some(value)
    }

    fn related(&self, name: &str) -> Option<&dyn Record> {
        // call/extrinsic do not exist outside ApplyExtrinsic
        if self.phase != Phase::ApplyExtrinsic {
            return None;
        }
        match name {
            "call" => self.call.as_ref().map(|call| call as &dyn Record),
            "extrinsic" => self.extrinsic.as_ref().map(|x| x as &dyn Record),
            _ => None,
        }
    }
}

// =============================================================================
// Amount encoding
// =============================================================================

/// Serde helpers for optional u128 amounts.
///
/// JSON numbers top out at u64, so amounts are written as decimal strings and
/// read from either a string or a number.
mod amount {
    use serde::{Deserialize, Deserializer, Serializer, de};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => serializer.serialize_str(&amount.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u128>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => parse(&value)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid amount: {value}"))),
        }
    }

    pub fn to_value(value: Option<u128>) -> Value {
        value
            .map(|amount| Value::String(amount.to_string()))
            .unwrap_or(Value::Null)
    }

    fn parse(value: &Value) -> Option<u128> {
        match value {
            Value::Number(n) => n.as_u64().map(u128::from),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str) -> Call {
        Call {
            id: id.into(),
            pos: 1,
            name: "Balances.transfer".into(),
            args: json!({"dest": "0xbb", "value": "10"}),
            origin: None,
            success: true,
            error: None,
            parent: None,
        }
    }

    #[test]
    fn event_deserializes_variant_payload() {
        let event: Event = serde_json::from_value(json!({
            "id": "0000000001-000002",
            "pos": 4,
            "name": "EVM.Log",
            "phase": "ApplyExtrinsic",
            "args": {},
            "address": "0xaa",
            "topics": ["0x01"],
        }))
        .unwrap();

        assert_eq!(event.variant(), EventVariant::EvmLog);
        assert_eq!(event.field("address"), Some(json!("0xaa")));
        assert_eq!(event.field("topics"), Some(json!(["0x01"])));
        // Champ du variant connu mais non fourni par le décodeur
        assert_eq!(event.field("data"), Some(Value::Null));
    }

    #[test]
    fn event_payload_hidden_for_other_variants() {
        let event = Event::new("e1", 0, "Balances.Transfer", Phase::Finalization)
            .with_field("address", json!("0xaa"));
        assert_eq!(event.field("address"), None);
    }

    #[test]
    fn event_relations_absent_outside_apply_extrinsic() {
        let event = Event::new("e1", 0, "Balances.Transfer", Phase::Initialization)
            .with_call(call("c1"));
        assert!(event.related("call").is_none());

        let event = Event::new("e1", 0, "Balances.Transfer", Phase::ApplyExtrinsic)
            .with_call(call("c1"));
        assert_eq!(event.related("call").unwrap().field("id"), Some(json!("c1")));
    }

    #[test]
    fn call_parent_relation() {
        let mut child = call("c2");
        child.parent = Some(Box::new(call("c1")));
        let parent = child.related("parent").unwrap();
        assert_eq!(parent.entity(), EntityKind::Call);
        assert_eq!(parent.field("id"), Some(json!("c1")));
        assert!(call("c3").related("parent").is_none());
    }

    // Test critique: les montants Substrate dépassent u64
    #[test]
    fn extrinsic_amounts_accept_strings_and_numbers() {
        let extrinsic: Extrinsic = serde_json::from_value(json!({
            "id": "x1",
            "pos": 0,
            "index": 2,
            "version": 4,
            "fee": "340282366920938463463374607431768211455",
            "tip": 5,
            "hash": "0xabc",
            "call": call("c1"),
        }))
        .unwrap();

        assert_eq!(extrinsic.fee, Some(u128::MAX));
        assert_eq!(extrinsic.tip, Some(5));
        assert_eq!(extrinsic.field("tip"), Some(json!("5")));
        assert_eq!(extrinsic.field("signature"), Some(Value::Null));
        assert_eq!(extrinsic.field("name"), None);
    }

    #[test]
    fn item_record_is_tagged_by_kind() {
        let record: ItemRecord = serde_json::from_value(json!({
            "kind": "call",
            "id": "c1",
            "pos": 0,
            "name": "System.remark",
            "success": false,
        }))
        .unwrap();

        assert_eq!(record.kind(), ItemKind::Call);
        assert_eq!(record.name(), "System.remark");
    }

    #[test]
    fn call_record_carries_extrinsic() {
        let record: ItemRecord = serde_json::from_value(json!({
            "kind": "call",
            "id": "c1",
            "pos": 1,
            "name": "Balances.transfer",
            "success": true,
            "extrinsic": {
                "id": "x1",
                "pos": 0,
                "index": 1,
                "version": 4,
                "hash": "0xabc",
                "call": call("c1"),
            },
        }))
        .unwrap();

        let ItemRecord::Call(item) = record else {
            panic!("call record expected");
        };
        assert_eq!(item.call.id, "c1");
        assert_eq!(item.extrinsic.as_ref().map(|x| x.hash.as_str()), Some("0xabc"));
        // L'extrinsic n'est pas une relation de l'appel lui-même
        assert!(item.call.related("extrinsic").is_none());
    }
}
