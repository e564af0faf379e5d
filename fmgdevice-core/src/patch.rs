//! Patch table - corrections for fields the device API returns in the wrong shape
//!
//! FortiManager does not always answer with the type its own schema declares:
//! object references come back as one-element lists (`["root"]` for a string
//! field), some integers come back as strings. The flattener consults this
//! table only after a field fails to match its declared kind.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::resource::{Value, integer_from_number};

/// Correction applied to a mismatched wire value
#[derive(Debug, Clone)]
pub enum PatchRule {
    /// Use a fixed value regardless of what the device returned
    Replace(Value),
    /// Take the first element of a list (`["root"]` -> `"root"`)
    FirstElement,
    /// Parse a numeric string (`"100"` -> `100`)
    ParseInt,
    /// Split a whitespace separated string into a set (`"ping https"`)
    SplitWords,
    /// Arbitrary conversion
    Convert(fn(&JsonValue) -> Option<Value>),
}

impl PatchRule {
    /// Corrected local value, or `None` if the rule does not apply
    pub fn apply(&self, wire: &JsonValue) -> Option<Value> {
        match self {
            PatchRule::Replace(value) => Some(value.clone()),
            PatchRule::FirstElement => match wire {
                JsonValue::Array(items) => items.first().and_then(scalar_from_json),
                _ => None,
            },
            PatchRule::ParseInt => match wire {
                JsonValue::String(s) => s.trim().parse::<i64>().ok().map(Value::Int),
                JsonValue::Number(n) => integer_from_number(n).map(Value::Int),
                _ => None,
            },
            PatchRule::SplitWords => match wire {
                JsonValue::String(s) => Some(Value::set(s.split_whitespace())),
                _ => None,
            },
            PatchRule::Convert(convert) => convert(wire),
        }
    }
}

fn scalar_from_json(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::String(s) => Some(Value::String(s.clone())),
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Number(n) => integer_from_number(n).map(Value::Int),
        _ => None,
    }
}

/// Side table mapping (resource type, field path) to a correction
///
/// Field paths are dotted and index free (`md5_keys.key_string`).
#[derive(Debug, Clone, Default)]
pub struct PatchTable {
    rules: HashMap<(String, String), PatchRule>,
}

impl PatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(
        mut self,
        resource_type: impl Into<String>,
        field_path: impl Into<String>,
        rule: PatchRule,
    ) -> Self {
        self.insert(resource_type, field_path, rule);
        self
    }

    pub fn insert(
        &mut self,
        resource_type: impl Into<String>,
        field_path: impl Into<String>,
        rule: PatchRule,
    ) {
        self.rules
            .insert((resource_type.into(), field_path.into()), rule);
    }

    pub fn lookup(&self, resource_type: &str, field_path: &str) -> Option<&PatchRule> {
        self.rules
            .get(&(resource_type.to_string(), field_path.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
