//! Device API - Trait abstracting the FortiManager device-object endpoints
//!
//! Transport, authentication and session handling live behind this trait.
//! Every call receives its own `CallOptions`; implementations must not keep
//! per-call settings on the client.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::object::ConfigObject;

/// Path parameters addressing an object (e.g., `device`, `vdom`, `wtp`)
pub type PathParams = BTreeMap<String, String>;

/// Administrative domain context for workspace locking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceParams {
    pub adom: String,
}

/// Per-call settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    /// Retry count handed to the transport; this layer never loops
    pub retries: u32,
    pub workspace: Option<WorkspaceParams>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            retries: 1,
            workspace: None,
        }
    }
}

/// Everything needed to address one resource type's endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub resource_type: String,
    pub params: PathParams,
    pub options: CallOptions,
}

impl ApiRequest {
    pub fn new(resource_type: impl Into<String>, params: PathParams) -> Self {
        Self {
            resource_type: resource_type.into(),
            params,
            options: CallOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CallOptions) -> Self {
        self.options = options;
        self
    }
}

/// Error returned by the device API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The device rejected the request (validation, permissions)
    #[error("request rejected (code {code}): {message}")]
    Rejected { code: i64, message: String },

    /// The object to update or delete does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// An object with the same key already exists
    #[error("object already exists: {0}")]
    Conflict(String),

    /// Network, session or authentication failure
    #[error("transport error: {0}")]
    Transport(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Remote operations on device configuration objects
///
/// `mkey` is the object key; it is `None` for singleton objects, which are
/// addressed by their path parameters alone.
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Create an object; returns the object as stored when the API echoes it
    async fn create(
        &self,
        request: &ApiRequest,
        object: ConfigObject,
    ) -> ApiResult<Option<ConfigObject>>;

    /// Read an object; `Ok(None)` when it does not exist
    async fn read(
        &self,
        request: &ApiRequest,
        mkey: Option<&str>,
    ) -> ApiResult<Option<ConfigObject>>;

    /// Update the fields present in `object`, leaving the others untouched
    async fn update(
        &self,
        request: &ApiRequest,
        mkey: Option<&str>,
        object: ConfigObject,
    ) -> ApiResult<Option<ConfigObject>>;

    async fn delete(&self, request: &ApiRequest, mkey: Option<&str>) -> ApiResult<()>;
}

/// DeviceApi implementation for Box<dyn DeviceApi>
/// This enables dynamic dispatch for clients
#[async_trait]
impl DeviceApi for Box<dyn DeviceApi> {
    async fn create(
        &self,
        request: &ApiRequest,
        object: ConfigObject,
    ) -> ApiResult<Option<ConfigObject>> {
        (**self).create(request, object).await
    }

    async fn read(
        &self,
        request: &ApiRequest,
        mkey: Option<&str>,
    ) -> ApiResult<Option<ConfigObject>> {
        (**self).read(request, mkey).await
    }

    async fn update(
        &self,
        request: &ApiRequest,
        mkey: Option<&str>,
        object: ConfigObject,
    ) -> ApiResult<Option<ConfigObject>> {
        (**self).update(request, mkey, object).await
    }

    async fn delete(&self, request: &ApiRequest, mkey: Option<&str>) -> ApiResult<()> {
        (**self).delete(request, mkey).await
    }
}
