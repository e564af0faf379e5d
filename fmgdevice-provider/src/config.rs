//! Provider configuration
//!
//! Loaded from a JSON file and overridden by `FORTIMANAGER_*` environment
//! variables. Holds the ambient values path parameters fall back to.

use std::path::Path;

use fmgdevice_core::api::WorkspaceParams;
use fmgdevice_core::CallOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_DEVICE_NAME: &str = "FORTIMANAGER_DEVICE_NAME";
pub const ENV_DEVICE_VDOM: &str = "FORTIMANAGER_DEVICE_VDOM";
pub const ENV_ADOM: &str = "FORTIMANAGER_ADOM";
pub const ENV_IMPORT_OPTIONS: &str = "FORTIMANAGER_IMPORT_OPTIONS";

/// Errors that can occur when loading the provider configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid import option '{0}': expected key=value")]
    InvalidImportOption(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Managed device addressed when a resource leaves `device_name` unset
    pub device_name: Option<String>,
    pub device_vdom: Option<String>,
    /// Administrative domain for workspace locking
    pub adom: Option<String>,
    /// Passed through to the API client on every call
    pub retries: u32,
    /// `key=value` pairs consulted on read when a path parameter is unset
    pub import_options: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            device_vdom: None,
            adom: None,
            retries: 1,
            import_options: Vec::new(),
        }
    }
}

impl ProviderConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_DEVICE_NAME) {
            self.device_name = Some(v);
        }
        if let Some(v) = get(ENV_DEVICE_VDOM) {
            self.device_vdom = Some(v);
        }
        if let Some(v) = get(ENV_ADOM) {
            self.adom = Some(v);
        }
        if let Some(v) = get(ENV_IMPORT_OPTIONS) {
            self.import_options = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for option in &self.import_options {
            match option.split_once('=') {
                Some((key, _)) if !key.trim().is_empty() => {}
                _ => return Err(ConfigError::InvalidImportOption(option.clone())),
            }
        }
        Ok(())
    }

    /// Value of an import option, if present and non-empty
    pub fn import_option(&self, key: &str) -> Option<&str> {
        self.import_options.iter().find_map(|option| {
            let (k, v) = option.split_once('=')?;
            (k.trim() == key && !v.trim().is_empty()).then(|| v.trim())
        })
    }

    /// Per-call options; the ADOM is attached only for workspace resources
    pub fn call_options(&self, workspace: bool) -> CallOptions {
        CallOptions {
            retries: self.retries,
            workspace: self
                .adom
                .as_ref()
                .filter(|adom| workspace && !adom.is_empty())
                .map(|adom| WorkspaceParams { adom: adom.clone() }),
        }
    }
}
