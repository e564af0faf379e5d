//! wireless_controller_wtp_radio1 schema definition
//!
//! Singleton under a parent WTP. FortiManager path:
//! /pm/config/device/{device}/vdom/{vdom}/wireless-controller/wtp/{wtp}/radio-1

use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

use super::{FmgSchemaConfig, device_name, device_vdom};

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("wireless_controller_wtp_radio1")
            .with_description("Configuration options for radio 1.")
            .attribute(device_name())
            .attribute(device_vdom())
            .attribute(
                FieldDescriptor::path_param("wtp", "wtp", None)
                    .with_description("Parent WTP identifier."),
            )
            .attribute(FieldDescriptor::int("radio_id").read_only())
            .attribute(FieldDescriptor::string("override_band"))
            .attribute(FieldDescriptor::string("band"))
            .attribute(FieldDescriptor::string("override_txpower"))
            .attribute(FieldDescriptor::string("auto_power_level"))
            .attribute(FieldDescriptor::int("auto_power_high"))
            .attribute(FieldDescriptor::int("auto_power_low"))
            .attribute(FieldDescriptor::string("power_mode"))
            .attribute(FieldDescriptor::int("power_level"))
            .attribute(FieldDescriptor::int("power_value"))
            .attribute(FieldDescriptor::string("override_vaps"))
            .attribute(FieldDescriptor::string("vap_all"))
            .attribute(FieldDescriptor::string_set("vaps"))
            .attribute(FieldDescriptor::string("override_channel"))
            .attribute(FieldDescriptor::string_set("channel"))
            .attribute(FieldDescriptor::string("drma_manual_mode"))
            .attribute(FieldDescriptor::string("spectrum_analysis")),
        patches: vec![
            ("vaps", PatchRule::SplitWords),
            ("channel", PatchRule::SplitWords),
        ],
    }
}
