//! Schema - Field descriptor tables for device resources
//!
//! Each resource type declares an ordered table of fields. The flattener and
//! expander walk these tables instead of per-resource conversion code.

use std::collections::HashMap;
use std::fmt;

use crate::naming::{self, NamingError};
use crate::resource::Value;

/// Primitive type of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    String,
    Int,
    Bool,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::String => write!(f, "String"),
            ScalarType::Int => write!(f, "Int"),
            ScalarType::Bool => write!(f, "Bool"),
        }
    }
}

/// Shape of a field
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Passed through unchanged
    Scalar(ScalarType),
    /// Unordered set of strings; a list of strings on the wire
    StringSet,
    /// Single nested object; a one-element list of maps locally
    Block(Vec<FieldDescriptor>),
    /// Ordered list of nested objects (e.g., `md5_keys`, `policy`)
    List(Vec<FieldDescriptor>),
}

impl FieldKind {
    fn type_name(&self) -> String {
        match self {
            FieldKind::Scalar(t) => t.to_string(),
            FieldKind::StringSet => "Set<String>".to_string(),
            FieldKind::Block(_) => "Block".to_string(),
            FieldKind::List(_) => "List<Block>".to_string(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Access flags of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    /// Changing the field replaces the resource
    pub force_new: bool,
}

impl Default for Access {
    fn default() -> Self {
        Self {
            optional: true,
            computed: false,
            sensitive: false,
            force_new: false,
        }
    }
}

/// Provider-level setting a path parameter falls back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSetting {
    DeviceName,
    DeviceVdom,
}

/// Marks a field as a path parameter rather than object configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    /// Key in the path parameter map sent to the API (e.g., "device")
    pub wire_name: String,
    /// Provider setting used when the resource does not set the field
    pub fallback: Option<ProviderSetting>,
}

/// One property of a configuration object
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    /// Local field name (e.g., "bandwidth_limit")
    pub name: String,
    /// Wire key (e.g., "bandwidth-limit")
    pub wire_key: String,
    pub kind: FieldKind,
    pub access: Access,
    pub description: Option<String>,
    pub path_param: Option<PathParam>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            wire_key: naming::to_wire_key(&name),
            name,
            kind,
            access: Access::default(),
            description: None,
            path_param: None,
        }
    }

    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self::new(name, FieldKind::Scalar(ty))
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::scalar(name, ScalarType::Int)
    }

    pub fn string_set(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::StringSet)
    }

    pub fn block(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, FieldKind::Block(fields))
    }

    pub fn list(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, FieldKind::List(fields))
    }

    /// A path parameter placeholder: force-new, optional and computed
    pub fn path_param(
        name: impl Into<String>,
        wire_name: impl Into<String>,
        fallback: Option<ProviderSetting>,
    ) -> Self {
        let mut field = Self::string(name).computed().force_new();
        field.path_param = Some(PathParam {
            wire_name: wire_name.into(),
            fallback,
        });
        field
    }

    /// Override the wire key for a field that cannot follow the naming rule
    pub fn with_wire_key(mut self, key: impl Into<String>) -> Self {
        self.wire_key = key.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.access.optional = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.access.computed = true;
        self
    }

    /// Computed and not settable by the caller
    pub fn read_only(mut self) -> Self {
        self.access.computed = true;
        self.access.optional = false;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.access.sensitive = true;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.access.force_new = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn is_path_param(&self) -> bool {
        self.path_param.is_some()
    }

    /// Wire key does not follow the hyphen/underscore rule
    pub fn is_irregular(&self) -> bool {
        self.wire_key != naming::to_wire_key(&self.name)
    }

    /// Computed without being settable; never sent to the device
    pub fn is_read_only(&self) -> bool {
        self.access.computed && !self.access.optional
    }

    /// Nested field table for block and list kinds
    pub fn sub_fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            FieldKind::Block(fields) | FieldKind::List(fields) => Some(fields),
            _ => None,
        }
    }

    /// Check that a local value has the shape this field declares
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        match (&self.kind, value) {
            (FieldKind::Scalar(ScalarType::String), Value::String(_)) => Ok(()),
            (FieldKind::Scalar(ScalarType::Int), Value::Int(_)) => Ok(()),
            (FieldKind::Scalar(ScalarType::Bool), Value::Bool(_)) => Ok(()),

            (FieldKind::StringSet, Value::Set(_)) => Ok(()),
            (FieldKind::StringSet, Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if !matches!(item, Value::String(_)) {
                        return Err(TypeError::ListItemError {
                            index: i,
                            inner: Box::new(TypeError::TypeMismatch {
                                expected: "String".to_string(),
                                got: item.type_name(),
                            }),
                        });
                    }
                }
                Ok(())
            }

            (FieldKind::Block(fields), Value::Map(map)) => validate_map(fields, map),
            (FieldKind::Block(fields), Value::List(items)) => match items.as_slice() {
                [] => Ok(()),
                [Value::Map(map)] => validate_map(fields, map),
                [other] => Err(TypeError::TypeMismatch {
                    expected: "Map".to_string(),
                    got: other.type_name(),
                }),
                _ => Err(TypeError::TooManyBlocks { got: items.len() }),
            },

            (FieldKind::List(fields), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let result = match item {
                        Value::Map(map) => validate_map(fields, map),
                        other => Err(TypeError::TypeMismatch {
                            expected: "Map".to_string(),
                            got: other.type_name(),
                        }),
                    };
                    result.map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.kind.type_name(),
                got: value.type_name(),
            }),
        }
    }
}

fn validate_map(fields: &[FieldDescriptor], map: &HashMap<String, Value>) -> Result<(), TypeError> {
    for (k, v) in map {
        let field = fields
            .iter()
            .find(|f| &f.name == k)
            .ok_or_else(|| TypeError::UnknownAttribute { name: k.clone() })?;
        field.validate(v).map_err(|e| TypeError::MapValueError {
            key: k.clone(),
            inner: Box::new(e),
        })?;
    }
    Ok(())
}

/// Type error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("Block allows at most one element, got {got}")]
    TooManyBlocks { got: usize },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

/// How a resource instance is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The value of the named field is the object key (e.g., "name")
    NaturalKey(String),
    /// One object per path; identified by a constant derived from the type
    Singleton,
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    /// Ordered field table, path parameters included
    pub fields: Vec<FieldDescriptor>,
    pub identity: Identity,
    /// Writes carry the ADOM workspace context
    pub workspace: bool,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            fields: Vec::new(),
            identity: Identity::Singleton,
            workspace: false,
            description: None,
        }
    }

    pub fn attribute(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_key(mut self, field: impl Into<String>) -> Self {
        self.identity = Identity::NaturalKey(field.into());
        self
    }

    pub fn with_workspace(mut self) -> Self {
        self.workspace = true;
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn is_singleton(&self) -> bool {
        self.identity == Identity::Singleton
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Find a configuration field by its wire key
    pub fn field_by_wire_key(&self, key: &str) -> Option<&FieldDescriptor> {
        self.config_fields().find(|f| f.wire_key == key)
    }

    pub fn path_params(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_path_param())
    }

    pub fn config_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| !f.is_path_param())
    }

    /// Validate resource attributes
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        // Check required attributes
        for field in &self.fields {
            if !field.access.optional
                && !field.access.computed
                && !attributes.contains_key(&field.name)
            {
                errors.push(TypeError::MissingRequired {
                    name: field.name.clone(),
                });
            }
        }

        // Type check each attribute
        for (name, value) in attributes {
            match self.field(name) {
                Some(field) => {
                    if let Err(e) = field.validate(value) {
                        errors.push(TypeError::MapValueError {
                            key: name.clone(),
                            inner: Box::new(e),
                        });
                    }
                }
                None => errors.push(TypeError::UnknownAttribute { name: name.clone() }),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Check the naming transform is bijective over this schema
    pub fn check_naming(&self) -> Result<(), Vec<NamingError>> {
        let errors = naming::check_fields(&self.fields);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
