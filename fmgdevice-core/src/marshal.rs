//! Errors and field paths shared by the flattener and expander

use std::fmt;

use thiserror::Error;

use crate::schema::TypeError;

/// Location of a field inside a configuration object
///
/// Displayed Terraform style (`md5_keys.1.key_string`). List indexes are
/// dropped from the patch key so one correction covers every element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Field(String),
    Index(usize),
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Field(name.to_string()));
        path
    }

    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(Segment::Index(index));
        path
    }

    /// Index-free dotted path used to look up patch rules
    pub fn patch_key(&self) -> String {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Field(name) => Some(name.as_str()),
                Segment::Index(_) => None,
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                Segment::Field(name) => write!(f, "{}", name)?,
                Segment::Index(index) => write!(f, "{}", index)?,
            }
        }
        Ok(())
    }
}

/// Conversion error for a single field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarshalError {
    /// The device returned a value the schema cannot hold and no patch applies
    #[error("Error reading {field}: expected {expected}, got {got}")]
    TypeMismatch {
        field: FieldPath,
        expected: String,
        got: String,
    },

    /// Local state does not match the schema
    #[error("Error expanding {field}: {source}")]
    Invalid {
        field: FieldPath,
        #[source]
        source: TypeError,
    },
}

impl MarshalError {
    pub fn field(&self) -> &FieldPath {
        match self {
            MarshalError::TypeMismatch { field, .. } | MarshalError::Invalid { field, .. } => {
                field
            }
        }
    }
}

/// JSON type name used in error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "Null",
        serde_json::Value::Bool(_) => "Bool",
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => "Int",
        serde_json::Value::Number(_) => "Float",
        serde_json::Value::String(_) => "String",
        serde_json::Value::Array(_) => "Array",
        serde_json::Value::Object(_) => "Object",
    }
}
