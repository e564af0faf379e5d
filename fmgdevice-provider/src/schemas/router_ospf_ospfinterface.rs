//! router_ospf_ospfinterface schema definition
//!
//! FortiManager path: /pm/config/device/{device}/vdom/{vdom}/router/ospf/ospf-interface

use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

use super::{FmgSchemaConfig, device_name, device_vdom};

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("router_ospf_ospfinterface")
            .with_key("name")
            .with_workspace()
            .with_description("OSPF interface configuration.")
            .attribute(device_name())
            .attribute(device_vdom())
            .attribute(FieldDescriptor::string("name").required().force_new())
            .attribute(FieldDescriptor::string("comments"))
            .attribute(FieldDescriptor::string("interface"))
            .attribute(FieldDescriptor::string("ip"))
            .attribute(FieldDescriptor::string("authentication"))
            .attribute(FieldDescriptor::string("authentication_key").sensitive())
            .attribute(FieldDescriptor::string("keychain"))
            .attribute(FieldDescriptor::int("cost"))
            .attribute(FieldDescriptor::int("dead_interval"))
            .attribute(FieldDescriptor::int("hello_interval"))
            .attribute(FieldDescriptor::int("hello_multiplier"))
            .attribute(FieldDescriptor::int("retransmit_interval"))
            .attribute(FieldDescriptor::int("transmit_delay"))
            .attribute(FieldDescriptor::int("priority"))
            .attribute(FieldDescriptor::int("mtu"))
            .attribute(FieldDescriptor::string("mtu_ignore"))
            .attribute(FieldDescriptor::string("network_type"))
            .attribute(FieldDescriptor::string("bfd"))
            .attribute(FieldDescriptor::string("status"))
            .attribute(FieldDescriptor::string("md5_keychain"))
            .attribute(
                FieldDescriptor::list(
                    "md5_keys",
                    vec![
                        FieldDescriptor::int("fosid").with_wire_key("id"),
                        FieldDescriptor::string("key_string").sensitive(),
                    ],
                )
                .with_description("MD5 key; order is significant to the device."),
            ),
        patches: vec![
            ("interface", PatchRule::FirstElement),
            ("keychain", PatchRule::FirstElement),
            ("md5_keychain", PatchRule::FirstElement),
        ],
    }
}
