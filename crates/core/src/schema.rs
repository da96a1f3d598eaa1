//! Field sets of the selectable record kinds.
//!
//! Every selection request is normalized against a [`FieldSet`]: an entity
//! kind plus, for events, the variant recognized from the event name. The
//! field set decides which names are identifying (always present), which are
//! scalars (present iff selected) and which are relations to another entity.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::UnknownDiscriminator;
use crate::metrics::record_unknown_discriminator;

// =============================================================================
// Field tables
// =============================================================================

const CALL_IDENTIFYING: &[&str] = &["id", "pos", "name"];
const CALL_SCALARS: &[&str] = &["args", "origin", "success", "error"];
const CALL_RELATIONS: &[(&str, EntityKind)] = &[("parent", EntityKind::Call)];
const CALL_ITEM_RELATIONS: &[(&str, EntityKind)] = &[
    ("parent", EntityKind::Call),
    ("extrinsic", EntityKind::Extrinsic),
];

const EXTRINSIC_IDENTIFYING: &[&str] = &["id", "pos"];
const EXTRINSIC_SCALARS: &[&str] = &["index", "version", "signature", "fee", "tip", "hash"];
const EXTRINSIC_RELATIONS: &[(&str, EntityKind)] = &[("call", EntityKind::Call)];

const EVENT_IDENTIFYING: &[&str] = &["id", "pos", "name"];
const EVENT_SCALARS: &[&str] = &["args", "phase", "evmTxHash"];
const EVENT_RELATIONS: &[(&str, EntityKind)] = &[
    ("call", EntityKind::Call),
    ("extrinsic", EntityKind::Extrinsic),
];

const EVM_LOG_FIELDS: &[&str] = &["address", "topics", "data"];
const CONTRACT_EMITTED_FIELDS: &[&str] = &["contract", "data"];
const GEAR_MESSAGE_ENQUEUED_FIELDS: &[&str] = &["messageId", "source", "destination", "entry"];
const GEAR_USER_MESSAGE_SENT_FIELDS: &[&str] = &["message", "expiration"];

// =============================================================================
// Entity & item kinds
// =============================================================================

/// Record kinds a selection can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Call,
    Extrinsic,
    Event,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Extrinsic => "extrinsic",
            Self::Event => "event",
        }
    }

    /// Fields present in every projection of this entity.
    pub fn identifying_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Call => CALL_IDENTIFYING,
            Self::Extrinsic => EXTRINSIC_IDENTIFYING,
            Self::Event => EVENT_IDENTIFYING,
        }
    }

    /// Scalars shared by every instance, regardless of discriminator.
    pub fn common_scalars(&self) -> &'static [&'static str] {
        match self {
            Self::Call => CALL_SCALARS,
            Self::Extrinsic => EXTRINSIC_SCALARS,
            Self::Event => EVENT_SCALARS,
        }
    }

    /// Relation fields and the entity each one points to.
    pub fn relations(&self) -> &'static [(&'static str, EntityKind)] {
        match self {
            Self::Call => CALL_RELATIONS,
            Self::Extrinsic => EXTRINSIC_RELATIONS,
            Self::Event => EVENT_RELATIONS,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds of items a handler can register interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Event,
    Call,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Event => "event",
            Self::Call => "call",
        }
    }

    /// Entity the item's request selects from.
    pub fn entity(&self) -> EntityKind {
        match self {
            Self::Event => EntityKind::Event,
            Self::Call => EntityKind::Call,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Event variants
// =============================================================================

/// Event names that add their own scalar fields on top of the common set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventVariant {
    /// Any event without variant-specific fields.
    #[default]
    Common,
    /// `EVM.Log`
    EvmLog,
    /// `Contracts.ContractEmitted`
    ContractsContractEmitted,
    /// `Gear.MessageEnqueued`
    GearMessageEnqueued,
    /// `Gear.UserMessageSent`
    GearUserMessageSent,
}

impl EventVariant {
    /// Variants recognized from an event name.
    pub const RECOGNIZED: [EventVariant; 4] = [
        Self::EvmLog,
        Self::ContractsContractEmitted,
        Self::GearMessageEnqueued,
        Self::GearUserMessageSent,
    ];

    /// Recognize the variant carried by an event name.
    pub fn recognize(name: &str) -> Result<Self, UnknownDiscriminator> {
        Self::RECOGNIZED
            .into_iter()
            .find(|variant| variant.event_name() == Some(name))
            .ok_or_else(|| UnknownDiscriminator(name.to_string()))
    }

    /// Variant for `name`, falling back to [`EventVariant::Common`].
    pub fn from_name(name: &str) -> Self {
        Self::recognize(name).unwrap_or_default()
    }

    /// Same as [`EventVariant::from_name`] but reports the fallback.
    ///
    /// Used at registration time, where an unrecognized name is worth a log
    /// line; the projection path uses [`EventVariant::from_name`].
    pub fn from_name_reported(name: &str) -> Self {
        match Self::recognize(name) {
            Ok(variant) => variant,
            Err(unknown) => {
                debug!(event = %unknown.0, "Event name has no variant fields, using common set");
                record_unknown_discriminator();
                Self::Common
            }
        }
    }

    /// Event name matched by this variant (`None` for the common set).
    pub fn event_name(&self) -> Option<&'static str> {
        match self {
            Self::Common => None,
            Self::EvmLog => Some("EVM.Log"),
            Self::ContractsContractEmitted => Some("Contracts.ContractEmitted"),
            Self::GearMessageEnqueued => Some("Gear.MessageEnqueued"),
            Self::GearUserMessageSent => Some("Gear.UserMessageSent"),
        }
    }

    /// Scalars only this variant carries.
    pub fn variant_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Common => &[],
            Self::EvmLog => EVM_LOG_FIELDS,
            Self::ContractsContractEmitted => CONTRACT_EMITTED_FIELDS,
            Self::GearMessageEnqueued => GEAR_MESSAGE_ENQUEUED_FIELDS,
            Self::GearUserMessageSent => GEAR_USER_MESSAGE_SENT_FIELDS,
        }
    }
}

// =============================================================================
// Field sets
// =============================================================================

/// How a field participates in a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Always present, selecting it is a no-op.
    Identifying,
    /// Present iff selected.
    Scalar,
    /// Sub-object of the given entity.
    Relation(EntityKind),
}

/// The known fields of one entity under one discriminator.
///
/// A call registered as an item also reaches its enclosing extrinsic; a call
/// nested under another record does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldSet {
    entity: EntityKind,
    variant: EventVariant,
    call_item: bool,
}

impl FieldSet {
    /// Field set of `entity` under `variant`.
    ///
    /// Only events have variants; any other entity always gets the common set.
    pub fn new(entity: EntityKind, variant: EventVariant) -> Self {
        let variant = match entity {
            EntityKind::Event => variant,
            _ => EventVariant::Common,
        };
        Self {
            entity,
            variant,
            call_item: false,
        }
    }

    /// Field set without variant fields.
    pub fn common(entity: EntityKind) -> Self {
        Self::new(entity, EventVariant::Common)
    }

    /// Root field set of a call item: the call plus its `extrinsic`.
    pub fn call_item() -> Self {
        Self {
            call_item: true,
            ..Self::common(EntityKind::Call)
        }
    }

    /// Field set for an item key, without reporting unrecognized event names.
    pub fn for_item(kind: ItemKind, name: &str) -> Self {
        Self::item(kind, || EventVariant::from_name(name))
    }

    /// Same as [`FieldSet::for_item`], reporting unrecognized event names.
    pub fn for_item_reported(kind: ItemKind, name: &str) -> Self {
        Self::item(kind, || EventVariant::from_name_reported(name))
    }

    fn item(kind: ItemKind, variant: impl FnOnce() -> EventVariant) -> Self {
        match kind {
            ItemKind::Event => Self::new(EntityKind::Event, variant()),
            ItemKind::Call => Self::call_item(),
        }
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn variant(&self) -> EventVariant {
        self.variant
    }

    pub fn is_call_item(&self) -> bool {
        self.call_item
    }

    /// Resolve a field name to its canonical static name and kind.
    pub fn lookup(&self, field: &str) -> Option<(&'static str, FieldKind)> {
        let entity = self.entity;
        if let Some(name) = entity
            .identifying_fields()
            .iter()
            .copied()
            .find(|f| *f == field)
        {
            return Some((name, FieldKind::Identifying));
        }
        if let Some(name) = self.scalars().find(|f| *f == field) {
            return Some((name, FieldKind::Scalar));
        }
        self.relations()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(name, target)| (*name, FieldKind::Relation(*target)))
    }

    /// Selectable scalars: the common set followed by the variant set.
    pub fn scalars(&self) -> impl Iterator<Item = &'static str> + use<> {
        self.entity
            .common_scalars()
            .iter()
            .chain(self.variant.variant_fields())
            .copied()
    }

    pub fn relations(&self) -> &'static [(&'static str, EntityKind)] {
        if self.call_item {
            CALL_ITEM_RELATIONS
        } else {
            self.entity.relations()
        }
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.variant.event_name() {
            Some(name) => write!(f, "{} {}", self.entity, name),
            None if self.call_item => write!(f, "{} item", self.entity),
            None => write!(f, "{}", self.entity),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
