//! Expander - local resource state to configuration objects
//!
//! A field is sent only when it is set in local state or marked changed in the
//! current operation, so an update never overwrites remote fields the caller
//! did not touch. A changed field that is no longer set is sent as its cleared
//! form: an empty list for sets and lists, `null` otherwise.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::marshal::{FieldPath, MarshalError};
use crate::object::ConfigObject;
use crate::resource::{ResourceData, Value};
use crate::schema::{FieldDescriptor, FieldKind, ResourceSchema};

/// Expand every configuration field of `data` that is set or changed
///
/// Path parameters and read-only fields are never sent.
pub fn expand_object(
    schema: &ResourceSchema,
    data: &ResourceData,
) -> Result<ConfigObject, MarshalError> {
    let mut object = ConfigObject::new();

    for field in schema.config_fields() {
        if field.is_read_only() {
            continue;
        }
        let path = FieldPath::root().field(&field.name);

        if let Some(value) = data.get_ok(&field.name) {
            object.insert(field.wire_key.clone(), expand_checked(&path, value, field)?);
        } else if data.has_change(&field.name) {
            object.insert(field.wire_key.clone(), cleared(field));
        }
    }

    Ok(object)
}

/// Expand a single local value into its wire form
pub fn expand(value: &Value, field: &FieldDescriptor) -> Result<JsonValue, MarshalError> {
    expand_checked(&FieldPath::root().field(&field.name), value, field)
}

fn expand_checked(
    path: &FieldPath,
    value: &Value,
    field: &FieldDescriptor,
) -> Result<JsonValue, MarshalError> {
    field.validate(value).map_err(|source| MarshalError::Invalid {
        field: path.clone(),
        source,
    })?;
    Ok(expand_value(value, field))
}

/// Wire form of a value already validated against `field`
fn expand_value(value: &Value, field: &FieldDescriptor) -> JsonValue {
    match (&field.kind, value) {
        (FieldKind::Block(fields), Value::List(items)) => match items.first() {
            Some(Value::Map(map)) => JsonValue::Object(expand_map(fields, map)),
            _ => JsonValue::Object(serde_json::Map::new()),
        },
        (FieldKind::Block(fields), Value::Map(map)) => JsonValue::Object(expand_map(fields, map)),
        (FieldKind::List(fields), Value::List(items)) => JsonValue::Array(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Map(map) => Some(JsonValue::Object(expand_map(fields, map))),
                    _ => None,
                })
                .collect(),
        ),
        (_, scalar) => scalar_to_json(scalar),
    }
}

fn expand_map(
    fields: &[FieldDescriptor],
    map: &HashMap<String, Value>,
) -> serde_json::Map<String, JsonValue> {
    let mut result = serde_json::Map::new();
    for field in fields {
        if field.is_read_only() {
            continue;
        }
        if let Some(value) = map.get(&field.name)
            && !value.is_empty_collection()
        {
            result.insert(field.wire_key.clone(), expand_value(value, field));
        }
    }
    result
}

fn scalar_to_json(value: &Value) -> JsonValue {
    match value {
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Int(i) => JsonValue::from(*i),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Set(items) => {
            JsonValue::Array(items.iter().map(|s| JsonValue::String(s.clone())).collect())
        }
        Value::List(items) => JsonValue::Array(items.iter().map(scalar_to_json).collect()),
        Value::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), scalar_to_json(v)))
                .collect(),
        ),
    }
}

fn cleared(field: &FieldDescriptor) -> JsonValue {
    match field.kind {
        FieldKind::StringSet | FieldKind::List(_) => JsonValue::Array(Vec::new()),
        FieldKind::Scalar(_) | FieldKind::Block(_) => JsonValue::Null,
    }
}
