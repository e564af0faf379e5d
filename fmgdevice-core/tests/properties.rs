//! Property-based tests using proptest
//!
//! These tests check the flatten/expand conversion against randomly generated
//! wire objects: round trips, list order, naming and partial updates.

use std::collections::BTreeSet;

use fmgdevice_core::differ::with_changes;
use fmgdevice_core::naming::{to_local_name, to_wire_key};
use fmgdevice_core::{
    ConfigObject, FieldDescriptor, Flattener, PatchTable, ResourceData, ResourceSchema, Value,
    expand_object,
};
use proptest::prelude::*;
use serde_json::{Map, Value as JsonValue, json};

fn schema() -> ResourceSchema {
    ResourceSchema::new("switch_controller_dynamic_port_policy")
        .with_key("name")
        .attribute(FieldDescriptor::path_param("device_name", "device", None))
        .attribute(FieldDescriptor::string("name"))
        .attribute(FieldDescriptor::int("fosid").with_wire_key("id"))
        .attribute(FieldDescriptor::int("bandwidth_limit"))
        .attribute(FieldDescriptor::scalar(
            "enabled",
            fmgdevice_core::ScalarType::Bool,
        ))
        .attribute(FieldDescriptor::string_set("allowaccess").computed())
        .attribute(FieldDescriptor::block(
            "wan_extension",
            vec![
                FieldDescriptor::string("modem1_extension"),
                FieldDescriptor::int("priority"),
            ],
        ))
        .attribute(FieldDescriptor::list(
            "policy",
            vec![
                FieldDescriptor::string("name"),
                FieldDescriptor::int("vlan"),
                FieldDescriptor::string("n802_1x").with_wire_key("802-1x"),
                FieldDescriptor::string_set("interface_tags"),
            ],
        ))
}

/// Generate a non-empty set of words as a sorted wire list
fn arb_word_set() -> impl Strategy<Value = JsonValue> {
    prop::collection::btree_set("[a-z]{1,8}", 1..5)
        .prop_map(|set: BTreeSet<String>| json!(set.into_iter().collect::<Vec<_>>()))
}

/// Generate one `policy` element; `name` is always present so it never flattens empty
fn arb_policy() -> impl Strategy<Value = JsonValue> {
    (
        "[a-z][a-z0-9-]{0,15}",
        prop::option::of(1i64..4095),
        prop::option::of("[a-z]{1,10}"),
        prop::option::of(arb_word_set()),
    )
        .prop_map(|(name, vlan, dot1x, tags)| {
            let mut m = Map::new();
            m.insert("name".to_string(), json!(name));
            if let Some(v) = vlan {
                m.insert("vlan".to_string(), json!(v));
            }
            if let Some(d) = dot1x {
                m.insert("802-1x".to_string(), json!(d));
            }
            if let Some(t) = tags {
                m.insert("interface-tags".to_string(), t);
            }
            JsonValue::Object(m)
        })
}

fn arb_block() -> impl Strategy<Value = JsonValue> {
    (prop::option::of("[a-z0-9]{1,10}"), prop::option::of(0i64..100)).prop_map(
        |(modem, priority)| {
            let mut m = Map::new();
            if let Some(v) = modem {
                m.insert("modem1-extension".to_string(), json!(v));
            }
            if let Some(p) = priority {
                m.insert("priority".to_string(), json!(p));
            }
            JsonValue::Object(m)
        },
    )
}

/// Generate a wire object consistent with `schema()`
fn arb_wire_object() -> impl Strategy<Value = ConfigObject> {
    (
        prop::option::of("[a-z][a-z0-9-]{0,15}"),
        prop::option::of(0i64..100_000),
        prop::option::of(any::<i64>()),
        prop::option::of(any::<bool>()),
        prop::option::of(arb_word_set()),
        prop::option::of(arb_block()),
        prop::option::of(prop::collection::vec(arb_policy(), 1..6)),
    )
        .prop_map(|(name, id, bw, enabled, access, block, policy)| {
            let mut m = Map::new();
            if let Some(v) = name {
                m.insert("name".to_string(), json!(v));
            }
            if let Some(v) = id {
                m.insert("id".to_string(), json!(v));
            }
            if let Some(v) = bw {
                m.insert("bandwidth-limit".to_string(), json!(v));
            }
            if let Some(v) = enabled {
                m.insert("enabled".to_string(), json!(v));
            }
            if let Some(v) = access {
                m.insert("allowaccess".to_string(), v);
            }
            if let Some(v) = block {
                m.insert("wan-extension".to_string(), v);
            }
            if let Some(v) = policy {
                m.insert("policy".to_string(), JsonValue::Array(v));
            }
            ConfigObject::from(m)
        })
}

fn flatten_into_state(schema: &ResourceSchema, object: &ConfigObject) -> ResourceData {
    let patches = PatchTable::new();
    let attributes = Flattener::new(&schema.resource_type, &patches)
        .flatten_object(schema, object)
        .expect("generated objects match the schema");
    let mut data = ResourceData::new(schema.resource_type.clone());
    for (k, v) in attributes {
        data.set(k, v);
    }
    data
}

proptest! {
    /// expand(flatten(w)) == w for every wire object the schema can hold
    #[test]
    fn flatten_then_expand_round_trips(object in arb_wire_object()) {
        let schema = schema();
        let data = flatten_into_state(&schema, &object);
        let expanded = expand_object(&schema, &data).unwrap();
        prop_assert_eq!(expanded, object);
    }

    /// Repeated blocks keep their wire order through flatten and expand
    #[test]
    fn policy_order_is_preserved(policies in prop::collection::vec(arb_policy(), 1..10)) {
        let schema = schema();
        let names: Vec<JsonValue> = policies.iter().map(|p| p["name"].clone()).collect();
        let object = ConfigObject::from_json(json!({"policy": policies})).unwrap();

        let data = flatten_into_state(&schema, &object);
        let expanded = expand_object(&schema, &data).unwrap();
        let round_tripped: Vec<JsonValue> = expanded
            .get("policy")
            .and_then(JsonValue::as_array)
            .unwrap()
            .iter()
            .map(|p| p["name"].clone())
            .collect();
        prop_assert_eq!(round_tripped, names);
    }

    /// Local name -> wire key -> local name is the identity
    #[test]
    fn naming_transform_inverts(name in "[a-z][a-z0-9]{0,6}(_[a-z0-9]{1,6}){0,3}") {
        prop_assert_eq!(to_local_name(&to_wire_key(&name)), name);
    }

    /// Distinct local names never collapse onto one wire key
    #[test]
    fn naming_transform_is_injective(
        a in "[a-z][a-z0-9]{0,6}(_[a-z0-9]{1,6}){0,3}",
        b in "[a-z][a-z0-9]{0,6}(_[a-z0-9]{1,6}){0,3}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(to_wire_key(&a), to_wire_key(&b));
    }

    /// Only set or changed fields reach the wire
    #[test]
    fn unset_unchanged_fields_are_excluded(
        set_mask in prop::collection::vec(any::<bool>(), 3),
        changed_mask in prop::collection::vec(any::<bool>(), 3),
    ) {
        let schema = schema();
        let candidates = [
            ("name", "name", Value::string("ports")),
            ("bandwidth_limit", "bandwidth-limit", Value::Int(200)),
            ("allowaccess", "allowaccess", Value::set(["ping", "https"])),
        ];

        let mut data = ResourceData::new(schema.resource_type.clone());
        let mut expected = BTreeSet::new();
        for (i, (name, wire_key, value)) in candidates.iter().enumerate() {
            if set_mask[i] {
                data.set(*name, value.clone());
            }
            if changed_mask[i] {
                data.mark_changed(*name);
            }
            if set_mask[i] || changed_mask[i] {
                expected.insert(wire_key.to_string());
            }
        }

        let expanded = expand_object(&schema, &data).unwrap();
        let keys: BTreeSet<String> = expanded.keys().cloned().collect();
        prop_assert_eq!(keys, expected);
    }
}

#[test]
fn bandwidth_update_scenario() {
    let schema = schema();
    let object =
        ConfigObject::from_json(json!({"bandwidth-limit": 100, "allowaccess": ["ping", "https"]}))
            .unwrap();

    let prior = flatten_into_state(&schema, &object);
    assert_eq!(prior.get("bandwidth_limit"), Some(&Value::Int(100)));
    assert_eq!(prior.get("allowaccess"), Some(&Value::set(["ping", "https"])));

    // the desired configuration changes bandwidth_limit and leaves allowaccess out
    let desired = ResourceData::new(schema.resource_type.clone())
        .with_attribute("bandwidth_limit", Value::Int(200));
    let data = with_changes(&schema, &prior, &desired);
    assert!(data.has_change("bandwidth_limit"));
    assert!(!data.has_change("allowaccess"));

    let expanded = expand_object(&schema, &data).unwrap();
    assert_eq!(expanded.to_json(), json!({"bandwidth-limit": 200}));
}

#[test]
fn empty_collections_are_unset() {
    let schema = schema();
    let object = ConfigObject::from_json(json!({
        "name": "ports",
        "allowaccess": [],
        "policy": [{"name": "p1", "interface-tags": []}],
    }))
    .unwrap();
    let state = flatten_into_state(&schema, &object);
    assert_eq!(state.get("allowaccess"), Some(&Value::set(Vec::<String>::new())));
    assert!(state.get_ok("allowaccess").is_none());

    // empty collections are not sent, at the top level or inside elements
    let expanded = expand_object(&schema, &state).unwrap();
    assert_eq!(
        expanded.to_json(),
        json!({"name": "ports", "policy": [{"name": "p1"}]})
    );

    // and dropping them from the desired state is not a change
    let object = ConfigObject::from_json(json!({"name": "ports", "policy": []})).unwrap();
    let prior = flatten_into_state(&schema, &object);
    let desired = ResourceData::new(schema.resource_type.clone())
        .with_attribute("name", Value::string("ports"));
    let data = with_changes(&schema, &prior, &desired);
    assert!(!data.has_change("policy"));
    assert_eq!(expand_object(&schema, &data).unwrap().to_json(), json!({"name": "ports"}));
}
