//! End-to-end CRUD tests against the in-memory device API

use std::collections::HashMap;

use fmgdevice_core::differ::with_changes;
use fmgdevice_core::{ApiError, ConfigObject, PathParams, ResourceData, Value};
use fmgdevice_provider::memory::{InMemoryDeviceApi, Method};
use fmgdevice_provider::{
    FmgDeviceProvider, Operation, ProviderConfig, ProviderError, all_schemas, get_schema,
};
use serde_json::json;

fn config() -> ProviderConfig {
    ProviderConfig {
        device_name: Some("fgt-01".to_string()),
        device_vdom: Some("root".to_string()),
        adom: Some("root".to_string()),
        ..ProviderConfig::default()
    }
}

fn provider_with(config: ProviderConfig) -> FmgDeviceProvider<InMemoryDeviceApi> {
    FmgDeviceProvider::new(InMemoryDeviceApi::for_schemas(&all_schemas()), config)
}

fn provider() -> FmgDeviceProvider<InMemoryDeviceApi> {
    provider_with(config())
}

fn vdom_params() -> PathParams {
    PathParams::from([
        ("device".to_string(), "fgt-01".to_string()),
        ("vdom".to_string(), "root".to_string()),
    ])
}

fn object(value: serde_json::Value) -> ConfigObject {
    ConfigObject::from_json(value).unwrap()
}

fn map(entries: &[(&str, Value)]) -> Value {
    Value::Map(
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<HashMap<_, _>>(),
    )
}

#[tokio::test]
async fn read_then_partial_update() {
    let provider = provider();
    provider
        .client()
        .insert(
            "extension_controller_extender",
            vdom_params(),
            Some("fx-01"),
            object(json!({
                "name": "fx-01",
                "bandwidth-limit": 100,
                "allowaccess": ["ping", "https"],
            })),
        )
        .await;

    let mut prior = ResourceData::new("extension_controller_extender").with_id("fx-01");
    provider.read_resource(&mut prior).await.unwrap();
    assert_eq!(prior.get("bandwidth_limit"), Some(&Value::Int(100)));
    assert_eq!(prior.get("allowaccess"), Some(&Value::set(["ping", "https"])));

    let schema = get_schema("extension_controller_extender").unwrap();
    let desired = ResourceData::new("extension_controller_extender")
        .with_attribute("name", Value::string("fx-01"))
        .with_attribute("bandwidth_limit", Value::Int(200));
    let mut data = with_changes(&schema, &prior, &desired);
    provider.update_resource(&mut data).await.unwrap();

    let calls = provider.client().calls().await;
    let update = calls.iter().find(|c| c.method == Method::Update).unwrap();
    assert_eq!(update.mkey.as_deref(), Some("fx-01"));
    assert_eq!(
        update.object.as_ref().unwrap().to_json(),
        json!({"name": "fx-01", "bandwidth-limit": 200})
    );

    // the untouched field survives on the device and in refreshed state
    assert_eq!(data.get("allowaccess"), Some(&Value::set(["ping", "https"])));
    assert_eq!(data.get("bandwidth_limit"), Some(&Value::Int(200)));
}

#[tokio::test]
async fn read_of_missing_object_is_idempotent() {
    let provider = provider();
    let mut data = ResourceData::new("system_interface")
        .with_id("port1")
        .with_attribute("name", Value::string("port1"));

    for _ in 0..3 {
        provider.read_resource(&mut data).await.unwrap();
        assert_eq!(data.id(), None);
    }

    // an API that reports not-found as an error behaves the same
    let mut data = ResourceData::new("system_interface").with_id("port1");
    provider
        .client()
        .fail_next(ApiError::NotFound("port1".to_string()))
        .await;
    provider.read_resource(&mut data).await.unwrap();
    assert_eq!(data.id(), None);
}

#[tokio::test]
async fn missing_device_name_fails_every_operation() {
    let provider = provider_with(ProviderConfig::default());
    let expected = "system_interface: Parameter device_name is missing";

    let mut data = ResourceData::new("system_interface")
        .with_id("port1")
        .with_attribute("name", Value::string("port1"));

    let create = provider
        .create_resource(&mut data.clone())
        .await
        .unwrap_err();
    let read = provider.read_resource(&mut data.clone()).await.unwrap_err();
    let update = provider
        .update_resource(&mut data.clone())
        .await
        .unwrap_err();
    let delete = provider.delete_resource(&mut data).await.unwrap_err();

    for err in [create, read, update, delete] {
        assert_eq!(err.to_string(), expected);
    }
    assert!(provider.client().calls().await.is_empty());
    assert_eq!(data.id(), Some("port1"));
}

#[tokio::test]
async fn missing_device_name_fails_without_identifier() {
    let provider = provider_with(ProviderConfig::default());
    let mut data =
        ResourceData::new("system_interface").with_attribute("name", Value::string("port1"));

    let read = provider.read_resource(&mut data).await.unwrap_err();
    let delete = provider.delete_resource(&mut data).await.unwrap_err();
    for err in [read, delete] {
        assert_eq!(
            err,
            ProviderError::MissingPathParameter {
                resource_type: "system_interface".to_string(),
                param: "device_name".to_string(),
            }
        );
    }
    assert!(provider.client().calls().await.is_empty());
}

#[tokio::test]
async fn policy_order_survives_create_and_read() {
    let provider = provider();
    let names = ["guest", "phones", "cameras"];
    let policies: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            map(&[
                ("name", Value::string(*name)),
                ("match_period", Value::Int(i as i64 + 1)),
                ("n802_1x", Value::string("default-8021x")),
            ])
        })
        .collect();

    let mut data = ResourceData::new("switch_controller_dynamic_port_policy")
        .with_attribute("name", Value::string("office"))
        .with_attribute("policy", Value::List(policies));
    provider.create_resource(&mut data).await.unwrap();

    let stored = provider
        .client()
        .get(
            "switch_controller_dynamic_port_policy",
            &vdom_params(),
            Some("office"),
        )
        .await
        .unwrap();
    let wire_names: Vec<&str> = stored
        .get("policy")
        .and_then(|p| p.as_array())
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(wire_names, names);
    assert_eq!(stored.get("policy").unwrap()[0]["802-1x"], json!("default-8021x"));

    let Some(Value::List(read_back)) = data.get("policy") else {
        panic!("policy should flatten to a list");
    };
    let local_names: Vec<&str> = read_back
        .iter()
        .map(|p| match p {
            Value::Map(m) => m["name"].as_str().unwrap(),
            _ => panic!("policy element should be a map"),
        })
        .collect();
    assert_eq!(local_names, names);
}

#[tokio::test]
async fn md5_keys_keep_order_and_stay_sensitive() {
    let provider = provider();
    let keys = Value::List(vec![
        map(&[("fosid", Value::Int(2)), ("key_string", Value::string("beta"))]),
        map(&[("fosid", Value::Int(1)), ("key_string", Value::string("alpha"))]),
    ]);
    let mut data = ResourceData::new("router_ospf_ospfinterface")
        .with_attribute("name", Value::string("wan1-ospf"))
        .with_attribute("authentication", Value::string("md5"))
        .with_attribute("md5_keys", keys.clone());
    provider.create_resource(&mut data).await.unwrap();

    let schema = get_schema("router_ospf_ospfinterface").unwrap();
    let stored = provider
        .client()
        .get("router_ospf_ospfinterface", &vdom_params(), Some("wan1-ospf"))
        .await
        .unwrap();
    assert_eq!(
        stored.get("md5-keys"),
        Some(&json!([
            {"id": 2, "key-string": "beta"},
            {"id": 1, "key-string": "alpha"},
        ]))
    );
    assert_eq!(
        stored.redacted(&schema).get("md5-keys"),
        Some(&json!([
            {"id": 2, "key-string": "<sensitive>"},
            {"id": 1, "key-string": "<sensitive>"},
        ]))
    );
    assert_eq!(data.get("md5_keys"), Some(&keys));
}

#[tokio::test]
async fn standalone_cluster_nested_blocks() {
    let provider = provider();
    provider
        .client()
        .insert(
            "system_standalonecluster",
            PathParams::from([("device".to_string(), "fgt-01".to_string())]),
            None,
            object(json!({
                "standalone-group-id": 1,
                "session-sync-dev": "port3 port4",
                "cluster-peer": [{
                    "sync-id": 1,
                    "peerip": "10.0.0.2",
                    "peervd": ["root"],
                    "session-sync-filter": {
                        "srcintf": ["port1"],
                        "custom-service": [
                            {"id": 1, "src-port-range": "0-0", "dst-port-range": "80-80"},
                            {"id": 2, "src-port-range": "0-0", "dst-port-range": "443-443"},
                        ],
                    },
                }],
            })),
        )
        .await;

    let data = provider
        .import_resource("system_standalonecluster", "SystemStandalonecluster")
        .await
        .unwrap();
    assert_eq!(data.id(), Some("SystemStandalonecluster"));
    assert_eq!(data.get("device_name"), Some(&Value::string("fgt-01")));
    assert_eq!(
        data.get("session_sync_dev"),
        Some(&Value::set(["port3", "port4"]))
    );

    let Some(Value::List(peers)) = data.get("cluster_peer") else {
        panic!("cluster_peer should flatten to a list");
    };
    let Value::Map(peer) = &peers[0] else {
        panic!("peer should be a map");
    };
    assert_eq!(peer["peervd"], Value::string("root"));
    let Value::List(filter) = &peer["session_sync_filter"] else {
        panic!("session_sync_filter should be a one-element list");
    };
    assert_eq!(filter.len(), 1);
    let Value::Map(filter) = &filter[0] else {
        panic!("filter should be a map");
    };
    assert_eq!(filter["srcintf"], Value::string("port1"));
    let Value::List(services) = &filter["custom_service"] else {
        panic!("custom_service should be a list");
    };
    assert_eq!(services.len(), 2);
}

#[tokio::test]
async fn import_uses_import_options() {
    let provider = provider_with(ProviderConfig {
        import_options: vec!["wtp=FP221E3X1", "device_vdom=vd1"]
            .into_iter()
            .map(String::from)
            .collect(),
        ..config()
    });
    let params = PathParams::from([
        ("device".to_string(), "fgt-01".to_string()),
        ("vdom".to_string(), "root".to_string()),
        ("wtp".to_string(), "FP221E3X1".to_string()),
    ]);
    provider
        .client()
        .insert(
            "wireless_controller_wtp_radio1",
            params,
            None,
            object(json!({"radio-id": 1, "band": "802.11ax-5G", "vaps": "corp guest"})),
        )
        .await;

    let data = provider
        .import_resource("wireless_controller_wtp_radio1", "WirelessControllerWtpRadio1")
        .await
        .unwrap();
    // the provider VDOM wins over the import option
    assert_eq!(data.get("device_vdom"), Some(&Value::string("root")));
    assert_eq!(data.get("wtp"), Some(&Value::string("FP221E3X1")));
    assert_eq!(data.get("radio_id"), Some(&Value::Int(1)));
    assert_eq!(data.get("vaps"), Some(&Value::set(["corp", "guest"])));
}

#[tokio::test]
async fn import_of_missing_object_fails() {
    let provider = provider();
    let err = provider
        .import_resource("system_interface", "port9")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ProviderError::Remote {
            resource_type: "system_interface".to_string(),
            operation: Operation::Read,
            source: ApiError::NotFound("port9".to_string()),
        }
    );
}

#[tokio::test]
async fn apply_replaces_on_force_new_change() {
    let provider = provider();
    let desired = ResourceData::new("system_interface")
        .with_attribute("name", Value::string("port1"))
        .with_attribute("mtu", Value::Int(1500));
    let prior = provider.apply(None, &desired).await.unwrap();
    assert_eq!(prior.id(), Some("port1"));

    let renamed = ResourceData::new("system_interface")
        .with_attribute("name", Value::string("port2"))
        .with_attribute("mtu", Value::Int(1500));
    let state = provider.apply(Some(&prior), &renamed).await.unwrap();
    assert_eq!(state.id(), Some("port2"));

    let device = PathParams::from([("device".to_string(), "fgt-01".to_string())]);
    let client = provider.client();
    assert!(client.get("system_interface", &device, Some("port1")).await.is_none());
    assert!(client.get("system_interface", &device, Some("port2")).await.is_some());

    let methods: Vec<Method> = client.calls().await.iter().map(|c| c.method).collect();
    assert_eq!(
        methods,
        vec![
            Method::Create,
            Method::Read,
            Method::Delete,
            Method::Create,
            Method::Read
        ]
    );
}

#[tokio::test]
async fn apply_clears_removed_field() {
    let provider = provider();
    let desired = ResourceData::new("system_interface")
        .with_attribute("name", Value::string("port1"))
        .with_attribute("alias", Value::string("uplink"))
        .with_attribute("mtu", Value::Int(1500));
    let prior = provider.apply(None, &desired).await.unwrap();

    let mut without_alias = desired.clone();
    without_alias.remove("alias");
    let state = provider.apply(Some(&prior), &without_alias).await.unwrap();
    assert_eq!(state.get("alias"), None);

    let calls = provider.client().calls().await;
    let update = calls.iter().find(|c| c.method == Method::Update).unwrap();
    let sent = update.object.as_ref().unwrap();
    assert_eq!(sent.get("alias"), Some(&serde_json::Value::Null));
    assert_eq!(sent.get("mtu"), Some(&json!(1500)));
}

#[tokio::test]
async fn apply_without_changes_only_reads() {
    let provider = provider();
    let desired = ResourceData::new("log_setting")
        .with_attribute("resolve_ip", Value::string("enable"));
    let prior = provider.apply(None, &desired).await.unwrap();
    assert_eq!(prior.id(), Some("LogSetting"));

    let state = provider.apply(Some(&prior), &prior.clone()).await.unwrap();
    assert_eq!(state.get("resolve_ip"), Some(&Value::string("enable")));
    let last = provider.client().calls().await.pop().unwrap();
    assert_eq!(last.method, Method::Read);
}

#[tokio::test]
async fn apply_of_state_loaded_from_json_is_stable() {
    let provider = provider();
    let desired = ResourceData::from_json(
        "system_interface",
        &json!({
            "name": "port1",
            "allowaccess": ["ping", "https"],
            "mtu_override": "enable",
        }),
    )
    .unwrap();
    let prior = provider.apply(None, &desired).await.unwrap();
    assert_eq!(prior.get("allowaccess"), Some(&Value::set(["https", "ping"])));

    let state = provider.apply(Some(&prior), &desired).await.unwrap();
    assert_eq!(state.id(), Some("port1"));

    let methods: Vec<Method> = provider
        .client()
        .calls()
        .await
        .iter()
        .map(|c| c.method)
        .collect();
    assert_eq!(methods, vec![Method::Create, Method::Read, Method::Read]);
}
