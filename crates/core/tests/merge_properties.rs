//! Property-based tests for the merge lattice and the shape resolver.
//!
//! Requests are generated as loose JSON and normalized, so every property
//! runs over the same inputs handlers can register.

use proptest::prelude::*;
use serde_json::{Map, Value};

use prism_core::models::Phase;
use prism_core::schema::{EntityKind, EventVariant, FieldSet};
use prism_core::selection::{Request, Selection};
use prism_core::services::resolve;

// ============================================================================
// Strategies
// ============================================================================

fn scalars(names: &'static [&'static str]) -> impl Strategy<Value = Map<String, Value>> {
    // None = omitted, Some(flag) = explicit true/false
    prop::collection::vec(prop::option::of(any::<bool>()), names.len()).prop_map(move |flags| {
        names
            .iter()
            .zip(flags)
            .filter_map(|(name, flag)| flag.map(|flag| (name.to_string(), Value::Bool(flag))))
            .collect()
    })
}

fn relation(nested: BoxedStrategy<Value>) -> BoxedStrategy<Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Bool(false))),
        Just(Some(Value::Bool(true))),
        nested.prop_map(Some),
    ]
    .boxed()
}

fn with_relation(mut map: Map<String, Value>, name: &str, value: Option<Value>) -> Map<String, Value> {
    if let Some(value) = value {
        map.insert(name.to_string(), value);
    }
    map
}

fn call_json(depth: u32) -> BoxedStrategy<Value> {
    let base = scalars(&["args", "origin", "success", "error"]);
    if depth == 0 {
        return base.prop_map(Value::Object).boxed();
    }
    (base, relation(call_json(depth - 1)))
        .prop_map(|(map, parent)| Value::Object(with_relation(map, "parent", parent)))
        .boxed()
}

fn extrinsic_json() -> BoxedStrategy<Value> {
    (
        scalars(&["index", "version", "signature", "fee", "tip", "hash"]),
        relation(call_json(1)),
    )
        .prop_map(|(map, call)| Value::Object(with_relation(map, "call", call)))
        .boxed()
}

fn event_json() -> BoxedStrategy<Value> {
    (
        scalars(&["args", "phase", "address", "topics", "data", "evmTxHash"]),
        relation(call_json(2)),
        relation(extrinsic_json()),
    )
        .prop_map(|(map, call, extrinsic)| {
            let map = with_relation(map, "call", call);
            Value::Object(with_relation(map, "extrinsic", extrinsic))
        })
        .boxed()
}

fn evm_fields() -> FieldSet {
    FieldSet::new(EntityKind::Event, EventVariant::EvmLog)
}

fn event_request() -> impl Strategy<Value = Request> {
    event_json().prop_map(|value| Request::normalize(evm_fields(), &value).unwrap())
}

fn phase() -> impl Strategy<Value = Phase> {
    prop_oneof![
        Just(Phase::ApplyExtrinsic),
        Just(Phase::Initialization),
        Just(Phase::Finalization),
    ]
}

fn shape_keys(request: &Request, phase: Phase) -> Vec<&'static str> {
    resolve(request, Some(phase)).keys()
}

// ============================================================================
// Lattice laws
// ============================================================================

proptest! {
    #[test]
    fn merge_is_idempotent(a in event_request()) {
        prop_assert_eq!(a.join(&a).unwrap(), a);
    }

    #[test]
    fn merge_is_commutative(a in event_request(), b in event_request()) {
        prop_assert_eq!(a.join(&b).unwrap(), b.join(&a).unwrap());
    }

    #[test]
    fn merge_is_associative(a in event_request(), b in event_request(), c in event_request()) {
        let left = a.join(&b.join(&c).unwrap()).unwrap();
        let right = a.join(&b).unwrap().join(&c).unwrap();
        let other = a.join(&c).unwrap().join(&b).unwrap();
        prop_assert_eq!(&left, &right);
        prop_assert_eq!(&left, &other);
    }

    #[test]
    fn full_relation_absorbs(a in event_request()) {
        let full_call = Request::normalize(evm_fields(), &serde_json::json!({"call": true})).unwrap();
        let joined = a.join(&full_call).unwrap();
        prop_assert_eq!(joined.get("call"), Some(&Selection::Full));

        // One level down: extrinsic.call = true
        let nested = Request::normalize(
            evm_fields(),
            &serde_json::json!({"extrinsic": {"call": true}}),
        ).unwrap();
        let joined = a.join(&nested).unwrap();
        match joined.get("extrinsic") {
            Some(Selection::Full) => {}
            Some(Selection::Partial(extrinsic)) => {
                prop_assert_eq!(extrinsic.get("call"), Some(&Selection::Full));
            }
            None => prop_assert!(false, "extrinsic must be selected after merge"),
        }
    }

    #[test]
    fn merge_never_drops_a_selection(a in event_request(), b in event_request()) {
        let merged = a.join(&b).unwrap();
        for (name, _) in a.iter().chain(b.iter()) {
            prop_assert!(merged.is_selected(name));
        }
    }
}

// ============================================================================
// Resolver properties
// ============================================================================

proptest! {
    #[test]
    fn identifying_fields_always_resolved(a in event_request(), phase in phase()) {
        let shape = resolve(&a, Some(phase));
        prop_assert_eq!(&shape.fields()[..3], &["id", "pos", "name"][..]);
    }

    #[test]
    fn merged_shape_covers_both_operands(a in event_request(), b in event_request(), phase in phase()) {
        let merged = shape_keys(&a.join(&b).unwrap(), phase);
        for key in shape_keys(&a, phase).into_iter().chain(shape_keys(&b, phase)) {
            prop_assert!(merged.contains(&key), "missing {}", key);
        }
    }

    #[test]
    fn relations_only_for_apply_extrinsic(a in event_request(), phase in phase()) {
        let shape = resolve(&a, Some(phase));
        let has_relations = !shape.relations().is_empty();
        if phase != Phase::ApplyExtrinsic {
            prop_assert!(!has_relations);
        }
        if has_relations {
            prop_assert!(shape.contains("phase"));
        }
    }

    #[test]
    fn normalization_roundtrips_through_json(value in event_json()) {
        let request = Request::normalize(evm_fields(), &value).unwrap();
        prop_assert_eq!(Request::normalize(evm_fields(), &request.to_value()).unwrap(), request);
    }
}
