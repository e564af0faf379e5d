//! system_interface schema definition
//!
//! FortiManager path: /pm/config/device/{device}/global/system/interface

use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

use super::{FmgSchemaConfig, device_name};

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("system_interface")
            .with_key("name")
            .with_workspace()
            .with_description("Configure interfaces.")
            .attribute(device_name())
            .attribute(FieldDescriptor::string("name").required().force_new())
            .attribute(FieldDescriptor::string("vdom").with_description("Interface is in this virtual domain (VDOM)."))
            .attribute(FieldDescriptor::string("type").computed())
            .attribute(FieldDescriptor::string("mode").computed())
            .attribute(FieldDescriptor::string_set("ip"))
            .attribute(FieldDescriptor::string_set("allowaccess").computed())
            .attribute(FieldDescriptor::string("status"))
            .attribute(FieldDescriptor::string("alias"))
            .attribute(FieldDescriptor::string("description"))
            .attribute(FieldDescriptor::string("role"))
            .attribute(FieldDescriptor::string("interface").with_description("Parent interface of a VLAN."))
            .attribute(FieldDescriptor::int("vlanid"))
            .attribute(FieldDescriptor::string("mtu_override"))
            .attribute(FieldDescriptor::int("mtu"))
            .attribute(FieldDescriptor::int("inbandwidth"))
            .attribute(FieldDescriptor::int("outbandwidth"))
            .attribute(FieldDescriptor::string("macaddr").computed())
            .attribute(FieldDescriptor::string("snmp_index").read_only())
            .attribute(
                FieldDescriptor::list(
                    "secondaryip",
                    vec![
                        FieldDescriptor::int("fosid").with_wire_key("id"),
                        FieldDescriptor::string_set("ip"),
                        FieldDescriptor::string_set("allowaccess"),
                        FieldDescriptor::string("gwdetect"),
                    ],
                )
                .with_description("Second IP address of interface."),
            ),
        patches: vec![
            ("vdom", PatchRule::FirstElement),
            ("interface", PatchRule::FirstElement),
            ("mtu", PatchRule::ParseInt),
        ],
    }
}
