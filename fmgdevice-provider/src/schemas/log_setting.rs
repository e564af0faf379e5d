//! log_setting schema definition
//!
//! Singleton per VDOM. FortiManager path:
//! /pm/config/device/{device}/vdom/{vdom}/log/setting

use fmgdevice_core::{FieldDescriptor, ResourceSchema};

use super::{FmgSchemaConfig, device_name, device_vdom};

pub fn config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        schema: ResourceSchema::new("log_setting")
            .with_workspace()
            .with_description("Configure general log settings.")
            .attribute(device_name())
            .attribute(device_vdom())
            .attribute(FieldDescriptor::string("resolve_ip"))
            .attribute(FieldDescriptor::string("resolve_port"))
            .attribute(FieldDescriptor::string("log_user_in_upper"))
            .attribute(FieldDescriptor::string("fwpolicy_implicit_log"))
            .attribute(FieldDescriptor::string("fwpolicy6_implicit_log"))
            .attribute(FieldDescriptor::string("extended_log"))
            .attribute(FieldDescriptor::string("local_in_allow"))
            .attribute(FieldDescriptor::string("local_in_deny_unicast"))
            .attribute(FieldDescriptor::string("local_in_deny_broadcast"))
            .attribute(FieldDescriptor::string("local_out"))
            .attribute(FieldDescriptor::string("daemon_log"))
            .attribute(FieldDescriptor::string("neighbor_event"))
            .attribute(FieldDescriptor::string("brief_traffic_format"))
            .attribute(FieldDescriptor::string("user_anonymize"))
            .attribute(FieldDescriptor::string("expolicy_implicit_log"))
            .attribute(FieldDescriptor::string("log_policy_comment"))
            .attribute(FieldDescriptor::string("faz_override"))
            .attribute(FieldDescriptor::string("syslog_override"))
            .attribute(FieldDescriptor::string("rest_api_set"))
            .attribute(FieldDescriptor::string("rest_api_get"))
            .attribute(FieldDescriptor::string("anonymization_hash").sensitive())
            .attribute(FieldDescriptor::string_set("custom_log_fields")),
        patches: Vec::new(),
    }
}
