//! extension_controller_extender schema definition
//!
//! FortiManager path: /pm/config/device/{device}/vdom/{vdom}/extension-controller/extender

use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

use super::{FmgSchemaConfig, device_name, device_vdom};

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("extension_controller_extender")
            .with_key("name")
            .with_workspace()
            .with_description("Extender controller configuration.")
            .attribute(device_name())
            .attribute(device_vdom())
            .attribute(FieldDescriptor::string("name").required().force_new())
            .attribute(
                FieldDescriptor::string("fosid")
                    .with_wire_key("id")
                    .with_description("FortiExtender serial number."),
            )
            .attribute(FieldDescriptor::string("authorized"))
            .attribute(FieldDescriptor::string("description"))
            .attribute(FieldDescriptor::string("device_id").read_only())
            .attribute(FieldDescriptor::string("extension_type"))
            .attribute(FieldDescriptor::string("profile"))
            .attribute(FieldDescriptor::string("vdom").computed())
            .attribute(FieldDescriptor::string("login_password").sensitive())
            .attribute(FieldDescriptor::string("login_password_change"))
            .attribute(FieldDescriptor::string("override_allowaccess"))
            .attribute(FieldDescriptor::string_set("allowaccess").computed())
            .attribute(FieldDescriptor::int("bandwidth_limit"))
            .attribute(FieldDescriptor::string("enforce_bandwidth"))
            .attribute(FieldDescriptor::string("firmware_provision_latest"))
            .attribute(FieldDescriptor::block(
                "wan_extension",
                vec![
                    FieldDescriptor::string("modem1_extension"),
                    FieldDescriptor::string("modem2_extension"),
                    FieldDescriptor::string("modem1_pdn1_interface"),
                    FieldDescriptor::string("modem1_pdn2_interface"),
                    FieldDescriptor::string("modem2_pdn1_interface"),
                    FieldDescriptor::string("modem2_pdn2_interface"),
                ],
            )),
        patches: vec![
            ("profile", PatchRule::FirstElement),
            ("wan_extension.modem1_extension", PatchRule::FirstElement),
            ("wan_extension.modem2_extension", PatchRule::FirstElement),
            ("bandwidth_limit", PatchRule::ParseInt),
        ],
    }
}
