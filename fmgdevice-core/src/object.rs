//! Configuration objects as exchanged with the device API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::schema::{FieldDescriptor, FieldKind, ResourceSchema};

const REDACTED: &str = "<sensitive>";

/// A configuration object keyed by wire key (hyphenated names)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigObject(Map<String, JsonValue>);

impl ConfigObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value; `None` unless it is an object
    pub fn from_json(value: JsonValue) -> Option<Self> {
        match value {
            JsonValue::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: JsonValue) -> Option<JsonValue> {
        self.0.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another object into this one, keys in `other` win
    pub fn merge(&mut self, other: ConfigObject) {
        self.0.extend(other.0);
    }

    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(self.0.clone())
    }

    pub fn into_inner(self) -> Map<String, JsonValue> {
        self.0
    }

    /// Top-level keys the schema does not declare
    pub fn unknown_keys(&self, schema: &ResourceSchema) -> Vec<String> {
        self.0
            .keys()
            .filter(|k| schema.field_by_wire_key(k).is_none())
            .cloned()
            .collect()
    }

    /// Copy with every sensitive field replaced by a placeholder
    pub fn redacted(&self, schema: &ResourceSchema) -> ConfigObject {
        let fields: Vec<&FieldDescriptor> = schema.config_fields().collect();
        ConfigObject(redact_map(&self.0, &fields))
    }
}

impl From<Map<String, JsonValue>> for ConfigObject {
    fn from(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }
}

fn redact_map(map: &Map<String, JsonValue>, fields: &[&FieldDescriptor]) -> Map<String, JsonValue> {
    map.iter()
        .map(|(k, v)| {
            let value = match fields.iter().find(|f| &f.wire_key == k) {
                Some(field) => redact_value(v, field),
                None => v.clone(),
            };
            (k.clone(), value)
        })
        .collect()
}

fn redact_value(value: &JsonValue, field: &FieldDescriptor) -> JsonValue {
    if field.access.sensitive {
        return JsonValue::String(REDACTED.to_string());
    }
    let sub: Vec<&FieldDescriptor> = match &field.kind {
        FieldKind::Block(fields) | FieldKind::List(fields) => fields.iter().collect(),
        _ => return value.clone(),
    };
    match value {
        JsonValue::Object(map) => JsonValue::Object(redact_map(map, &sub)),
        JsonValue::Array(items) => JsonValue::Array(
            items
                .iter()
                .map(|item| match item {
                    JsonValue::Object(map) => JsonValue::Object(redact_map(map, &sub)),
                    other => other.clone(),
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
