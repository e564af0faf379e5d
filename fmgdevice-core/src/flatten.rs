//! Flattener - configuration objects to local resource state
//!
//! Walks a resource schema and converts each wire field into its local shape:
//! scalars pass through, string lists become sets, nested objects become
//! one-element lists of maps, nested lists keep their wire order.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::marshal::{FieldPath, MarshalError, json_type_name};
use crate::object::ConfigObject;
use crate::patch::PatchTable;
use crate::resource::Value;
use crate::schema::{FieldDescriptor, FieldKind, ResourceSchema, ScalarType};

/// Flatten one field of a wire object without any patch fallback
pub fn flatten(
    object: &ConfigObject,
    field: &FieldDescriptor,
) -> Result<Option<Value>, MarshalError> {
    let patches = PatchTable::new();
    Flattener::new("", &patches).flatten_field(object, field)
}

/// Converts wire objects of one resource type into local values
pub struct Flattener<'a> {
    resource_type: &'a str,
    patches: &'a PatchTable,
}

impl<'a> Flattener<'a> {
    pub fn new(resource_type: &'a str, patches: &'a PatchTable) -> Self {
        Self {
            resource_type,
            patches,
        }
    }

    /// Flatten every configuration field of `object`
    ///
    /// Fields absent on the wire are absent in the result, except nested lists
    /// which flatten to an empty list.
    pub fn flatten_object(
        &self,
        schema: &ResourceSchema,
        object: &ConfigObject,
    ) -> Result<HashMap<String, Value>, MarshalError> {
        let unknown = object.unknown_keys(schema);
        if !unknown.is_empty() {
            log::debug!(
                "{}: ignoring undeclared wire keys: {}",
                self.resource_type,
                unknown.join(", ")
            );
        }

        let mut attributes = HashMap::new();
        for field in schema.config_fields() {
            let path = FieldPath::root().field(&field.name);
            if let Some(value) = self.flatten_value(&path, field, object.get(&field.wire_key))? {
                attributes.insert(field.name.clone(), value);
            }
        }
        Ok(attributes)
    }

    /// Flatten a single top-level field of `object`
    pub fn flatten_field(
        &self,
        object: &ConfigObject,
        field: &FieldDescriptor,
    ) -> Result<Option<Value>, MarshalError> {
        let path = FieldPath::root().field(&field.name);
        self.flatten_value(&path, field, object.get(&field.wire_key))
    }

    fn flatten_value(
        &self,
        path: &FieldPath,
        field: &FieldDescriptor,
        wire: Option<&JsonValue>,
    ) -> Result<Option<Value>, MarshalError> {
        let wire = match wire {
            None | Some(JsonValue::Null) => {
                return Ok(match field.kind {
                    FieldKind::List(_) => Some(Value::List(Vec::new())),
                    _ => None,
                });
            }
            Some(w) => w,
        };

        let flattened = match &field.kind {
            FieldKind::Scalar(ty) => flatten_scalar(*ty, wire),
            FieldKind::StringSet => flatten_string_set(wire),
            FieldKind::Block(fields) => match wire {
                JsonValue::Object(map) => Some(self.flatten_block(path, fields, map)?),
                // Some endpoints wrap single blocks in a list
                JsonValue::Array(items) => match items.as_slice() {
                    [] => return Ok(None),
                    [JsonValue::Object(map)] => Some(self.flatten_block(path, fields, map)?),
                    _ => None,
                },
                _ => None,
            },
            FieldKind::List(fields) => match wire {
                JsonValue::Array(items) => Some(self.flatten_list(path, field, fields, items)?),
                _ => None,
            },
        };

        match flattened {
            Some(value) => Ok(Some(value)),
            None => self.patch(path, field, wire).map(Some),
        }
    }

    fn flatten_map(
        &self,
        path: &FieldPath,
        fields: &[FieldDescriptor],
        map: &serde_json::Map<String, JsonValue>,
    ) -> Result<HashMap<String, Value>, MarshalError> {
        let mut result = HashMap::new();
        for field in fields {
            let field_path = path.field(&field.name);
            if let Some(value) = self.flatten_value(&field_path, field, map.get(&field.wire_key))? {
                result.insert(field.name.clone(), value);
            }
        }
        Ok(result)
    }

    fn flatten_block(
        &self,
        path: &FieldPath,
        fields: &[FieldDescriptor],
        map: &serde_json::Map<String, JsonValue>,
    ) -> Result<Value, MarshalError> {
        Ok(Value::block(self.flatten_map(path, fields, map)?))
    }

    fn flatten_list(
        &self,
        path: &FieldPath,
        field: &FieldDescriptor,
        fields: &[FieldDescriptor],
        items: &[JsonValue],
    ) -> Result<Value, MarshalError> {
        let mut result = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            let JsonValue::Object(map) = item else {
                return Err(MarshalError::TypeMismatch {
                    field: item_path,
                    expected: format!("{} element", field.kind),
                    got: json_type_name(item).to_string(),
                });
            };
            let element = self.flatten_map(&item_path, fields, map)?;
            if !element.is_empty() {
                result.push(Value::Map(element));
            }
        }
        Ok(Value::List(result))
    }

    /// Fall back to the patch table for a value that does not fit its field
    fn patch(
        &self,
        path: &FieldPath,
        field: &FieldDescriptor,
        wire: &JsonValue,
    ) -> Result<Value, MarshalError> {
        let mismatch = || MarshalError::TypeMismatch {
            field: path.clone(),
            expected: field.kind.to_string(),
            got: json_type_name(wire).to_string(),
        };

        let rule = self
            .patches
            .lookup(self.resource_type, &path.patch_key())
            .ok_or_else(mismatch)?;

        match rule.apply(wire) {
            Some(value) if field.validate(&value).is_ok() => {
                log::info!(
                    "{}: patched {} ({} returned for {})",
                    self.resource_type,
                    path,
                    json_type_name(wire),
                    field.kind
                );
                Ok(value)
            }
            _ => Err(mismatch()),
        }
    }
}

fn flatten_scalar(ty: ScalarType, wire: &JsonValue) -> Option<Value> {
    match (ty, wire) {
        (ScalarType::String, JsonValue::String(s)) => Some(Value::String(s.clone())),
        (ScalarType::Int, JsonValue::Number(n)) => n.as_i64().map(Value::Int),
        (ScalarType::Bool, JsonValue::Bool(b)) => Some(Value::Bool(*b)),
        _ => None,
    }
}

fn flatten_string_set(wire: &JsonValue) -> Option<Value> {
    let JsonValue::Array(items) = wire else {
        return None;
    };
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .map(Value::Set)
}
