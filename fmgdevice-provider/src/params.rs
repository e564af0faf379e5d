//! Path parameter resolution
//!
//! Each path parameter is taken from the resource attribute of the same name,
//! then from the provider setting it falls back to, and on reads from the
//! import options. A parameter that resolves to nothing fails the operation.

use fmgdevice_core::schema::ProviderSetting;
use fmgdevice_core::{PathParams, ResourceData, ResourceSchema};

use crate::config::ProviderConfig;
use crate::error::{ProviderError, ProviderResult};

/// Which sources an operation may resolve path parameters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Create, update and delete
    Write,
    /// Read and import also consult the import options
    Read,
}

/// Resolve every path parameter of `schema`, in table order
pub fn resolve_path_params(
    schema: &ResourceSchema,
    data: &ResourceData,
    config: &ProviderConfig,
    resolution: Resolution,
) -> ProviderResult<PathParams> {
    let mut params = PathParams::new();

    for field in schema.path_params() {
        let Some(param) = &field.path_param else {
            continue;
        };

        let value = data
            .get_string(&field.name)
            .or_else(|| param.fallback.and_then(|s| setting(config, s)))
            .or_else(|| match resolution {
                Resolution::Read => config.import_option(&field.name),
                Resolution::Write => None,
            })
            .ok_or_else(|| ProviderError::MissingPathParameter {
                resource_type: schema.resource_type.clone(),
                param: field.name.clone(),
            })?;

        params.insert(param.wire_name.clone(), value.to_string());
    }

    Ok(params)
}

fn setting(config: &ProviderConfig, setting: ProviderSetting) -> Option<&str> {
    let value = match setting {
        ProviderSetting::DeviceName => config.device_name.as_deref(),
        ProviderSetting::DeviceVdom => config.device_vdom.as_deref(),
    };
    value.filter(|v| !v.is_empty())
}
