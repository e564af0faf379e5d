//! In-memory device API
//!
//! Stores configuration objects in a map keyed by resource type, path
//! parameters and object key. Records every call it receives and can be told
//! to fail the next one. Used by tests and offline tooling.

use std::collections::HashMap;

use async_trait::async_trait;
use fmgdevice_core::{
    ApiError, ApiRequest, ApiResult, CallOptions, ConfigObject, DeviceApi, Identity, PathParams,
    ResourceSchema,
};
use serde_json::Value as JsonValue;
use tokio::sync::Mutex;

/// Device API method names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Create,
    Read,
    Update,
    Delete,
}

/// One call received by the in-memory client
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub resource_type: String,
    pub params: PathParams,
    pub mkey: Option<String>,
    pub object: Option<ConfigObject>,
    pub options: CallOptions,
}

type ObjectKey = (String, PathParams, Option<String>);

#[derive(Default)]
struct Store {
    objects: HashMap<ObjectKey, ConfigObject>,
    calls: Vec<RecordedCall>,
    fail_next: Option<ApiError>,
}

/// DeviceApi backed by a map
#[derive(Default)]
pub struct InMemoryDeviceApi {
    /// Wire key holding the object key, per resource type
    key_fields: HashMap<String, String>,
    store: Mutex<Store>,
}

impl InMemoryDeviceApi {
    /// Key wire field used for resource types not registered with `with_key`
    pub const DEFAULT_KEY: &'static str = "name";

    pub fn new() -> Self {
        Self::default()
    }

    /// Register the key field of every keyed schema
    pub fn for_schemas(schemas: &[ResourceSchema]) -> Self {
        schemas.iter().fold(Self::new(), |api, schema| {
            match &schema.identity {
                Identity::NaturalKey(key) => match schema.field(key) {
                    Some(field) => api.with_key(&schema.resource_type, &field.wire_key),
                    None => api,
                },
                Identity::Singleton => api,
            }
        })
    }

    pub fn with_key(mut self, resource_type: &str, wire_key: &str) -> Self {
        self.key_fields
            .insert(resource_type.to_string(), wire_key.to_string());
        self
    }

    /// Store an object directly, bypassing call recording
    pub async fn insert(
        &self,
        resource_type: &str,
        params: PathParams,
        mkey: Option<&str>,
        object: ConfigObject,
    ) {
        let key = (resource_type.to_string(), params, mkey.map(String::from));
        self.store.lock().await.objects.insert(key, object);
    }

    /// Current stored object, if any
    pub async fn get(
        &self,
        resource_type: &str,
        params: &PathParams,
        mkey: Option<&str>,
    ) -> Option<ConfigObject> {
        let key = (resource_type.to_string(), params.clone(), mkey.map(String::from));
        self.store.lock().await.objects.get(&key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.objects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.objects.is_empty()
    }

    /// Make the next call fail with `error`
    pub async fn fail_next(&self, error: ApiError) {
        self.store.lock().await.fail_next = Some(error);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.store.lock().await.calls.clone()
    }

    fn key_field(&self, resource_type: &str) -> &str {
        self.key_fields
            .get(resource_type)
            .map(String::as_str)
            .unwrap_or(Self::DEFAULT_KEY)
    }

    fn object_key(&self, request: &ApiRequest, object: &ConfigObject) -> Option<String> {
        match object.get(self.key_field(&request.resource_type))? {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl Store {
    /// Record a call and take the injected failure, if any
    fn begin(
        &mut self,
        method: Method,
        request: &ApiRequest,
        mkey: Option<&str>,
        object: Option<&ConfigObject>,
    ) -> ApiResult<()> {
        self.calls.push(RecordedCall {
            method,
            resource_type: request.resource_type.clone(),
            params: request.params.clone(),
            mkey: mkey.map(String::from),
            object: object.cloned(),
            options: request.options.clone(),
        });
        match self.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn describe(request: &ApiRequest, mkey: Option<&str>) -> String {
    match mkey {
        Some(key) => format!("{} {}", request.resource_type, key),
        None => request.resource_type.clone(),
    }
}

/// Apply a partial update: `null` removes the key, anything else replaces it
fn apply_update(stored: &mut ConfigObject, update: ConfigObject) {
    for (key, value) in update.into_inner() {
        if value.is_null() {
            stored.remove(&key);
        } else {
            stored.insert(key, value);
        }
    }
}

#[async_trait]
impl DeviceApi for InMemoryDeviceApi {
    async fn create(
        &self,
        request: &ApiRequest,
        object: ConfigObject,
    ) -> ApiResult<Option<ConfigObject>> {
        let mkey = self.object_key(request, &object);
        let mut store = self.store.lock().await;
        store.begin(Method::Create, request, mkey.as_deref(), Some(&object))?;

        let key = (
            request.resource_type.clone(),
            request.params.clone(),
            mkey.clone(),
        );
        if store.objects.contains_key(&key) {
            return Err(ApiError::Conflict(describe(request, mkey.as_deref())));
        }
        let mut stored = ConfigObject::new();
        apply_update(&mut stored, object);
        store.objects.insert(key, stored.clone());
        Ok(Some(stored))
    }

    async fn read(
        &self,
        request: &ApiRequest,
        mkey: Option<&str>,
    ) -> ApiResult<Option<ConfigObject>> {
        let mut store = self.store.lock().await;
        store.begin(Method::Read, request, mkey, None)?;

        let key = (
            request.resource_type.clone(),
            request.params.clone(),
            mkey.map(String::from),
        );
        Ok(store.objects.get(&key).cloned())
    }

    async fn update(
        &self,
        request: &ApiRequest,
        mkey: Option<&str>,
        object: ConfigObject,
    ) -> ApiResult<Option<ConfigObject>> {
        let renamed = self.object_key(request, &object);
        let mut store = self.store.lock().await;
        store.begin(Method::Update, request, mkey, Some(&object))?;

        let key = (
            request.resource_type.clone(),
            request.params.clone(),
            mkey.map(String::from),
        );
        // singletons always exist on the device
        let mut stored = match (store.objects.remove(&key), mkey) {
            (Some(stored), _) => stored,
            (None, None) => ConfigObject::new(),
            (None, Some(_)) => return Err(ApiError::NotFound(describe(request, mkey))),
        };
        apply_update(&mut stored, object);

        let key = match (mkey, renamed) {
            (Some(_), Some(new_key)) => (key.0, key.1, Some(new_key)),
            _ => key,
        };
        store.objects.insert(key, stored.clone());
        Ok(Some(stored))
    }

    async fn delete(&self, request: &ApiRequest, mkey: Option<&str>) -> ApiResult<()> {
        let mut store = self.store.lock().await;
        store.begin(Method::Delete, request, mkey, None)?;

        let key = (
            request.resource_type.clone(),
            request.params.clone(),
            mkey.map(String::from),
        );
        match store.objects.remove(&key) {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound(describe(request, mkey))),
        }
    }
}
