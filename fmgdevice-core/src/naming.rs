//! Naming transform between local field names and FortiManager wire keys
//!
//! Local state uses underscores (e.g., `bandwidth_limit`)
//! The device API uses hyphens (e.g., `bandwidth-limit`)
//!
//! A few fields cannot follow the rule (`fosid` is sent as `id` because `id`
//! is reserved locally); those declare their wire key explicitly and are
//! reported as irregular.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::schema::{FieldDescriptor, FieldKind};

static LOCAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").expect("valid regex"));

/// Convert a local field name to its wire key
/// e.g., "bandwidth_limit" -> "bandwidth-limit"
pub fn to_wire_key(name: &str) -> String {
    name.replace('_', "-")
}

/// Convert a wire key to its local field name
/// e.g., "bandwidth-limit" -> "bandwidth_limit"
pub fn to_local_name(key: &str) -> String {
    key.replace('-', "_")
}

/// Check that a local field name is lowercase, underscore separated
pub fn is_valid_local_name(name: &str) -> bool {
    LOCAL_NAME.is_match(name)
}

/// A naming rule broken by a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("Invalid field name '{path}'")]
    InvalidName { path: String },

    #[error("Duplicate field name '{path}'")]
    DuplicateName { path: String },

    #[error("Wire key '{wire_key}' of '{path}' collides with another field")]
    DuplicateWireKey { path: String, wire_key: String },

    #[error("Field '{path}' uses wire key '{wire_key}', which does not map back to it")]
    NotInvertible { path: String, wire_key: String },
}

/// Check naming rules for one level of fields and every nested level below it
///
/// Path parameters are local-only and take part in the name check only.
pub fn check_fields(fields: &[FieldDescriptor]) -> Vec<NamingError> {
    let mut errors = Vec::new();
    check_level(fields, "", &mut errors);
    errors
}

fn check_level(fields: &[FieldDescriptor], prefix: &str, errors: &mut Vec<NamingError>) {
    let mut names = HashSet::new();
    let mut wire_keys = HashSet::new();

    for field in fields {
        let path = format!("{}{}", prefix, field.name);

        if !is_valid_local_name(&field.name) {
            errors.push(NamingError::InvalidName { path: path.clone() });
        }
        if !names.insert(field.name.as_str()) {
            errors.push(NamingError::DuplicateName { path: path.clone() });
        }

        if field.path_param.is_none() {
            if !wire_keys.insert(field.wire_key.as_str()) {
                errors.push(NamingError::DuplicateWireKey {
                    path: path.clone(),
                    wire_key: field.wire_key.clone(),
                });
            }
            if !field.is_irregular() && to_local_name(&field.wire_key) != field.name {
                errors.push(NamingError::NotInvertible {
                    path: path.clone(),
                    wire_key: field.wire_key.clone(),
                });
            }
        }

        if let FieldKind::Block(sub) | FieldKind::List(sub) = &field.kind {
            check_level(sub, &format!("{}.", path), errors);
        }
    }
}
