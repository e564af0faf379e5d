//! Resource - Local values and per-resource state

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

/// A JSON number with no exact `i64` form
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0} is not an integer")]
pub struct NotAnInteger(pub String);

/// Error building local state from JSON
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateJsonError {
    #[error("expected a JSON object")]
    NotAnObject,

    #[error("{field}: {source}")]
    Number { field: String, source: NotAnInteger },
}

/// Exact integer value of a JSON number
///
/// Floats are accepted only when they have no fractional part and fit in `i64`.
pub(crate) fn integer_from_number(n: &serde_json::Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Attribute value held in local resource state
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Bool(bool),
    /// Unordered set of strings (e.g., `allowaccess`)
    Set(BTreeSet<String>),
    /// Ordered list; nested blocks are lists of maps
    List(Vec<Value>),
    Map(HashMap<String, Value>),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    /// A single-element list wrapping a map, the local shape of a nested block
    pub fn block(fields: HashMap<String, Value>) -> Self {
        Value::List(vec![Value::Map(fields)])
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns true for empty sets, lists and maps
    ///
    /// Empty collections count as "not set" when deciding which fields to send.
    pub fn is_empty_collection(&self) -> bool {
        match self {
            Value::Set(s) => s.is_empty(),
            Value::List(l) => l.is_empty(),
            Value::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// String form of a key value (object keys may be strings or integers)
    pub fn key_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Int(i) => Some(i.to_string()),
            _ => None,
        }
    }

    /// Convert to the JSON shape of local state (sets become sorted arrays)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Set(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|s| serde_json::Value::String(s.clone()))
                    .collect(),
            ),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Untyped conversion from JSON; `null` yields `None`
    ///
    /// Arrays become lists. The expander accepts a list of strings wherever a
    /// string set is declared, so no schema is needed here. Numbers must be
    /// integers.
    pub fn from_json(value: &serde_json::Value) -> Result<Option<Value>, NotAnInteger> {
        let value = match value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Int(
                integer_from_number(n).ok_or_else(|| NotAnInteger(n.to_string()))?,
            ),
            serde_json::Value::Array(arr) => {
                let mut items = Vec::with_capacity(arr.len());
                for item in arr {
                    items.extend(Value::from_json(item)?);
                }
                Value::List(items)
            }
            serde_json::Value::Object(map) => {
                let mut fields = HashMap::new();
                for (k, v) in map {
                    if let Some(v) = Value::from_json(v)? {
                        fields.insert(k.clone(), v);
                    }
                }
                Value::Map(fields)
            }
        };
        Ok(Some(value))
    }

    pub(crate) fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::Set(_) => "Set".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
        }
    }
}

/// Local state of one resource instance, as held by the host tool
///
/// Besides the attribute values this tracks the resource identifier and which
/// fields were changed in the current operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    /// Resource type (e.g., "system_interface")
    pub resource_type: String,
    id: Option<String>,
    attributes: HashMap<String, Value>,
    changed: HashSet<String>,
}

impl ResourceData {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Resource identifier; `None` once the resource is gone
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn clear_id(&mut self) {
        self.id = None;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// The value if it is explicitly set: present and not an empty collection
    pub fn get_ok(&self, name: &str) -> Option<&Value> {
        self.attributes
            .get(name)
            .filter(|v| !v.is_empty_collection())
    }

    /// A non-empty string attribute
    pub fn get_string(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.attributes.remove(name)
    }

    pub fn attributes(&self) -> &HashMap<String, Value> {
        &self.attributes
    }

    /// Mark a field as changed in the current operation
    pub fn mark_changed(&mut self, name: impl Into<String>) {
        self.changed.insert(name.into());
    }

    pub fn has_change(&self, name: &str) -> bool {
        self.changed.contains(name)
    }

    pub fn changed_fields(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().map(String::as_str)
    }

    pub fn clear_changes(&mut self) {
        self.changed.clear();
    }

    /// Replace every attribute except the ones named in `keep`
    ///
    /// Used when a read refreshes configuration fields while path parameters
    /// stay as the caller set them.
    pub fn replace_attributes(&mut self, fresh: HashMap<String, Value>, keep: &[&str]) {
        self.attributes.retain(|k, _| keep.contains(&k.as_str()));
        self.attributes.extend(fresh);
    }

    /// Build local state from a JSON object with underscored keys
    pub fn from_json(
        resource_type: impl Into<String>,
        json: &serde_json::Value,
    ) -> Result<Self, StateJsonError> {
        let map = json.as_object().ok_or(StateJsonError::NotAnObject)?;
        let mut data = Self::new(resource_type);
        for (k, v) in map {
            let value = Value::from_json(v).map_err(|source| StateJsonError::Number {
                field: k.clone(),
                source,
            })?;
            if let Some(value) = value {
                data.attributes.insert(k.clone(), value);
            }
        }
        Ok(data)
    }

    /// Attributes as a JSON object with underscored keys
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }
}
