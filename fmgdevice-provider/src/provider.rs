//! FortiManager device provider implementation
//!
//! Drives the four CRUD operations for every shipped resource type: resolve
//! path parameters, expand or flatten through the schema table, call the
//! device API, then set or clear the resource identifier.

use fmgdevice_core::differ::{self, Diff};
use fmgdevice_core::{
    ApiError, ApiRequest, DeviceApi, Flattener, Identity, PatchTable, PathParams, ResourceData,
    ResourceSchema, Value, expand_object,
};
use heck::ToUpperCamelCase;
use log::{debug, warn};

use crate::config::ProviderConfig;
use crate::error::{Operation, ProviderError, ProviderResult};
use crate::params::{Resolution, resolve_path_params};
use crate::patches::builtin_patches;
use crate::schemas::get_schema;

/// Identifier of a singleton resource (e.g., "LogSetting")
pub fn singleton_id(resource_type: &str) -> String {
    resource_type.to_upper_camel_case()
}

/// FortiManager device provider
pub struct FmgDeviceProvider<C: DeviceApi> {
    client: C,
    config: ProviderConfig,
    patches: PatchTable,
}

impl<C: DeviceApi> FmgDeviceProvider<C> {
    pub fn new(client: C, config: ProviderConfig) -> Self {
        Self {
            client,
            config,
            patches: builtin_patches(),
        }
    }

    /// Replace the built-in patch table
    pub fn with_patches(mut self, patches: PatchTable) -> Self {
        self.patches = patches;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn schema(&self, resource_type: &str) -> ProviderResult<ResourceSchema> {
        get_schema(resource_type)
            .ok_or_else(|| ProviderError::UnknownResourceType(resource_type.to_string()))
    }

    fn request(&self, schema: &ResourceSchema, params: PathParams) -> ApiRequest {
        ApiRequest::new(&schema.resource_type, params)
            .with_options(self.config.call_options(schema.workspace))
    }

    /// Identifier the resource will have once written
    fn identifier(&self, schema: &ResourceSchema, data: &ResourceData) -> ProviderResult<String> {
        match &schema.identity {
            Identity::Singleton => Ok(singleton_id(&schema.resource_type)),
            Identity::NaturalKey(key) => data
                .get(key)
                .and_then(Value::key_string)
                .filter(|k| !k.is_empty())
                .ok_or_else(|| ProviderError::MissingKey {
                    resource_type: schema.resource_type.clone(),
                    field: key.clone(),
                }),
        }
    }

    fn mkey<'a>(schema: &ResourceSchema, id: &'a str) -> Option<&'a str> {
        match schema.identity {
            Identity::Singleton => None,
            Identity::NaturalKey(_) => Some(id),
        }
    }

    fn validate(schema: &ResourceSchema, data: &ResourceData) -> ProviderResult<()> {
        schema
            .validate(data.attributes())
            .map_err(|errors| ProviderError::InvalidAttributes {
                resource_type: schema.resource_type.clone(),
                errors,
            })
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Create the object, set the identifier and read back computed fields
    ///
    /// Singleton objects always exist on the device, so they are written with
    /// an update call.
    pub async fn create_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let schema = self.schema(&data.resource_type)?;
        let params = resolve_path_params(&schema, data, &self.config, Resolution::Write)?;
        Self::validate(&schema, data)?;
        let id = self.identifier(&schema, data)?;

        let object = expand_object(&schema, data)
            .map_err(|e| ProviderError::marshal(&schema.resource_type, e))?;
        let request = self.request(&schema, params);
        debug!(
            "create {} {}: {}",
            schema.resource_type,
            id,
            object.redacted(&schema).to_json()
        );

        let result = match schema.identity {
            Identity::Singleton => self.client.update(&request, None, object).await,
            Identity::NaturalKey(_) => self.client.create(&request, object).await,
        };
        result.map_err(|e| ProviderError::remote(&schema.resource_type, Operation::Create, e))?;

        data.set_id(id);
        data.clear_changes();
        self.read_resource(data).await
    }

    /// Refresh local state from the device
    ///
    /// A missing object clears the identifier and is not an error. Path
    /// parameters are resolved even when there is no identifier.
    pub async fn read_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let schema = self.schema(&data.resource_type)?;
        let params = resolve_path_params(&schema, data, &self.config, Resolution::Read)?;
        let Some(id) = data.id().map(String::from) else {
            return Ok(());
        };
        let request = self.request(&schema, params);
        debug!("read {} {}", schema.resource_type, id);

        let object = match self
            .client
            .read(&request, Self::mkey(&schema, &id))
            .await
        {
            Ok(object) => object,
            Err(ApiError::NotFound(_)) => None,
            Err(e) => {
                return Err(ProviderError::remote(
                    &schema.resource_type,
                    Operation::Read,
                    e,
                ));
            }
        };

        let Some(object) = object else {
            warn!(
                "{} {} not found on the device, removing it from state",
                schema.resource_type, id
            );
            data.clear_id();
            return Ok(());
        };
        debug!(
            "read {} {}: {}",
            schema.resource_type,
            id,
            object.redacted(&schema).to_json()
        );

        let attributes = Flattener::new(&schema.resource_type, &self.patches)
            .flatten_object(&schema, &object)
            .map_err(|e| ProviderError::marshal(&schema.resource_type, e))?;
        let keep: Vec<&str> = schema.path_params().map(|f| f.name.as_str()).collect();
        data.replace_attributes(attributes, &keep);
        Ok(())
    }

    /// Send the set and changed fields, then read back
    ///
    /// Fields neither set nor marked changed are left untouched on the device.
    pub async fn update_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let schema = self.schema(&data.resource_type)?;
        let id = data
            .id()
            .map(String::from)
            .ok_or_else(|| ProviderError::MissingIdentifier {
                resource_type: schema.resource_type.clone(),
            })?;
        let params = resolve_path_params(&schema, data, &self.config, Resolution::Write)?;
        Self::validate(&schema, data)?;

        let object = expand_object(&schema, data)
            .map_err(|e| ProviderError::marshal(&schema.resource_type, e))?;
        let request = self.request(&schema, params);
        debug!(
            "update {} {}: {}",
            schema.resource_type,
            id,
            object.redacted(&schema).to_json()
        );

        self.client
            .update(&request, Self::mkey(&schema, &id), object)
            .await
            .map_err(|e| ProviderError::remote(&schema.resource_type, Operation::Update, e))?;

        let new_id = self.identifier(&schema, data).unwrap_or(id);
        data.set_id(new_id);
        data.clear_changes();
        self.read_resource(data).await
    }

    /// Delete the object and clear the identifier
    ///
    /// An object already gone from the device counts as deleted.
    pub async fn delete_resource(&self, data: &mut ResourceData) -> ProviderResult<()> {
        let schema = self.schema(&data.resource_type)?;
        let params = resolve_path_params(&schema, data, &self.config, Resolution::Write)?;
        let Some(id) = data.id().map(String::from) else {
            return Ok(());
        };
        let request = self.request(&schema, params);
        debug!("delete {} {}", schema.resource_type, id);

        match self.client.delete(&request, Self::mkey(&schema, &id)).await {
            Ok(()) => {}
            Err(ApiError::NotFound(_)) => {
                warn!("{} {} was already deleted", schema.resource_type, id);
            }
            Err(e) => {
                return Err(ProviderError::remote(
                    &schema.resource_type,
                    Operation::Delete,
                    e,
                ));
            }
        }

        data.clear_id();
        Ok(())
    }

    /// Adopt an existing object by identifier
    ///
    /// Path parameters come from the provider settings and import options and
    /// are recorded in the returned state.
    pub async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> ProviderResult<ResourceData> {
        let schema = self.schema(resource_type)?;
        let mut data = ResourceData::new(resource_type).with_id(id);
        let params = resolve_path_params(&schema, &data, &self.config, Resolution::Read)?;
        for field in schema.path_params() {
            if let Some(value) = field
                .path_param
                .as_ref()
                .and_then(|p| params.get(&p.wire_name))
            {
                data.set(field.name.clone(), Value::string(value));
            }
        }

        self.read_resource(&mut data).await?;
        if data.id().is_none() {
            return Err(ProviderError::remote(
                resource_type,
                Operation::Read,
                ApiError::NotFound(id.to_string()),
            ));
        }
        Ok(data)
    }

    /// Bring the device in line with `desired`
    ///
    /// Creates, updates in place, or replaces (delete then create) depending on
    /// what changed since `prior`. Returns the refreshed state.
    pub async fn apply(
        &self,
        prior: Option<&ResourceData>,
        desired: &ResourceData,
    ) -> ProviderResult<ResourceData> {
        let schema = self.schema(&desired.resource_type)?;
        match differ::diff(&schema, prior, desired) {
            Diff::Create => {
                let mut data = desired.clone();
                data.clear_id();
                self.create_resource(&mut data).await?;
                Ok(data)
            }
            Diff::Update { changed } => {
                debug!("{}: updating {}", schema.resource_type, changed.join(", "));
                let mut data = match prior {
                    Some(prior) => differ::with_changes(&schema, prior, desired),
                    None => desired.clone(),
                };
                self.update_resource(&mut data).await?;
                Ok(data)
            }
            Diff::Replace { forced_by, .. } => {
                debug!(
                    "{}: replacing, forced by {}",
                    schema.resource_type,
                    forced_by.join(", ")
                );
                if let Some(prior) = prior {
                    self.delete_resource(&mut prior.clone()).await?;
                }
                let mut data = desired.clone();
                data.clear_id();
                self.create_resource(&mut data).await?;
                Ok(data)
            }
            Diff::NoChange => {
                let mut data = match prior {
                    Some(prior) => prior.clone(),
                    None => desired.clone(),
                };
                self.read_resource(&mut data).await?;
                Ok(data)
            }
        }
    }
}
