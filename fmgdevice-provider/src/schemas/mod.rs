//! FortiManager device resource schema tables
//!
//! One module per resource type. Each table lists path parameters first, then
//! configuration fields in the order the device API documents them.

mod extension_controller_extender;
mod log_setting;
mod router_ospf_ospfinterface;
mod switch_controller_dynamic_port_policy;
mod system_interface;
mod system_standalonecluster;
mod wireless_controller_wtp_radio1;

use fmgdevice_core::schema::ProviderSetting;
use fmgdevice_core::{FieldDescriptor, PatchRule, ResourceSchema};

/// Schema configuration for one resource type
///
/// Combines the schema table with the patch rules for fields the device API
/// is known to return in a different shape than declared.
pub struct FmgSchemaConfig {
    pub schema: ResourceSchema,
    /// (index-free field path, rule)
    pub patches: Vec<(&'static str, PatchRule)>,
}

/// Returns every shipped schema configuration
pub fn configs() -> Vec<FmgSchemaConfig> {
    vec![
        extension_controller_extender::config(),
        log_setting::config(),
        router_ospf_ospfinterface::config(),
        switch_controller_dynamic_port_policy::config(),
        system_interface::config(),
        system_standalonecluster::config(),
        wireless_controller_wtp_radio1::config(),
    ]
}

/// Returns all resource schemas
pub fn all_schemas() -> Vec<ResourceSchema> {
    configs().into_iter().map(|c| c.schema).collect()
}

/// Get the schema for a resource type
pub fn get_schema(resource_type: &str) -> Option<ResourceSchema> {
    configs()
        .into_iter()
        .map(|c| c.schema)
        .find(|s| s.resource_type == resource_type)
}

/// `device_name` path parameter, falling back to the provider's device
pub(crate) fn device_name() -> FieldDescriptor {
    FieldDescriptor::path_param("device_name", "device", Some(ProviderSetting::DeviceName))
        .with_description("The name of the managed device.")
}

/// `device_vdom` path parameter, falling back to the provider's VDOM
pub(crate) fn device_vdom() -> FieldDescriptor {
    FieldDescriptor::path_param("device_vdom", "vdom", Some(ProviderSetting::DeviceVdom))
        .with_description("The VDOM of the managed device.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_schema_passes_naming_check() {
        for schema in all_schemas() {
            assert_eq!(
                schema.check_naming(),
                Ok(()),
                "naming check failed for {}",
                schema.resource_type
            );
        }
    }

    #[test]
    fn resource_types_are_unique() {
        let schemas = all_schemas();
        let names: HashSet<&str> = schemas.iter().map(|s| s.resource_type.as_str()).collect();
        assert_eq!(names.len(), schemas.len());
    }

    #[test]
    fn natural_keys_name_existing_fields() {
        for schema in all_schemas() {
            if let fmgdevice_core::Identity::NaturalKey(key) = &schema.identity {
                let field = schema.field(key).unwrap_or_else(|| {
                    panic!("{}: key {} is not a field", schema.resource_type, key)
                });
                assert!(!field.is_path_param());
            }
        }
    }

    #[test]
    fn path_params_come_first_and_force_new() {
        for schema in all_schemas() {
            let first_config = schema
                .fields
                .iter()
                .position(|f| !f.is_path_param())
                .unwrap_or(schema.fields.len());
            assert!(
                schema.fields[first_config..]
                    .iter()
                    .all(|f| !f.is_path_param()),
                "{}: path parameters must precede configuration fields",
                schema.resource_type
            );
            for field in schema.path_params() {
                assert!(field.access.force_new && field.access.computed);
            }
        }
    }

    #[test]
    fn patch_paths_resolve_to_fields() {
        for config in configs() {
            for (path, _) in &config.patches {
                let mut fields = config.schema.fields.as_slice();
                let mut found = None;
                for segment in path.split('.') {
                    found = fields.iter().find(|f| f.name == segment);
                    fields = found.and_then(|f| f.sub_fields()).unwrap_or(&[]);
                }
                assert!(
                    found.is_some(),
                    "{}: patch path {} does not name a field",
                    config.schema.resource_type,
                    path
                );
            }
        }
    }

    #[test]
    fn get_schema_by_name() {
        assert!(get_schema("system_interface").is_some());
        assert!(get_schema("log_setting").unwrap().is_singleton());
        assert!(get_schema("vpc").is_none());
    }
}
