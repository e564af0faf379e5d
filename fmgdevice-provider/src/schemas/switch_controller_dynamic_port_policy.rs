//! switch_controller_dynamic_port_policy schema definition
//!
//! FortiManager path: /pm/config/device/{device}/vdom/{vdom}/switch-controller/dynamic-port-policy

use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

use super::{FmgSchemaConfig, device_name, device_vdom};

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("switch_controller_dynamic_port_policy")
            .with_key("name")
            .with_workspace()
            .with_description("Configure Dynamic port policy to be applied on the managed FortiSwitch ports.")
            .attribute(device_name())
            .attribute(device_vdom())
            .attribute(FieldDescriptor::string("name").required().force_new())
            .attribute(FieldDescriptor::string("description"))
            .attribute(FieldDescriptor::string("fortilink"))
            .attribute(
                FieldDescriptor::list(
                    "policy",
                    vec![
                        FieldDescriptor::string("name"),
                        FieldDescriptor::string("description"),
                        FieldDescriptor::string("status"),
                        FieldDescriptor::string("category"),
                        FieldDescriptor::string("match_type"),
                        FieldDescriptor::int("match_period"),
                        FieldDescriptor::string("match_remove"),
                        FieldDescriptor::string("mac"),
                        FieldDescriptor::string("hw_vendor"),
                        FieldDescriptor::string("type"),
                        FieldDescriptor::string("family"),
                        FieldDescriptor::string("host"),
                        FieldDescriptor::string_set("interface_tags"),
                        FieldDescriptor::string("lldp_profile"),
                        FieldDescriptor::string("qos_policy"),
                        FieldDescriptor::string("n802_1x").with_wire_key("802-1x"),
                        FieldDescriptor::string("vlan_policy"),
                        FieldDescriptor::string("bounce_port_link"),
                        FieldDescriptor::string("bounce_port_duration").computed(),
                        FieldDescriptor::string("poe_reset"),
                    ],
                )
                .with_description("Port policies with matching criteria and actions, evaluated in order."),
            ),
        patches: vec![
            ("fortilink", PatchRule::FirstElement),
            ("policy.lldp_profile", PatchRule::FirstElement),
            ("policy.qos_policy", PatchRule::FirstElement),
            ("policy.n802_1x", PatchRule::FirstElement),
            ("policy.vlan_policy", PatchRule::FirstElement),
            ("policy.interface_tags", PatchRule::SplitWords),
        ],
    }
}
