//! Differ - Compare prior local state with desired local state
//!
//! Produces the set of changed fields that drives partial updates, and decides
//! whether a change can be applied in place or needs the resource replaced
//! (a force-new field changed).

use std::collections::HashMap;

use crate::resource::{ResourceData, Value};
use crate::schema::{FieldDescriptor, FieldKind, ResourceSchema};

/// Result of a diff operation
#[derive(Debug, Clone, PartialEq)]
pub enum Diff {
    /// No prior state -> needs creation
    Create,
    /// Changed fields can be updated in place
    Update { changed: Vec<String> },
    /// A force-new field changed -> delete and create again
    Replace {
        changed: Vec<String>,
        forced_by: Vec<String>,
    },
    /// Nothing to do
    NoChange,
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange)
    }
}

/// Compare desired state with prior state
pub fn diff(schema: &ResourceSchema, prior: Option<&ResourceData>, desired: &ResourceData) -> Diff {
    let Some(prior) = prior.filter(|p| p.id().is_some()) else {
        return Diff::Create;
    };

    let changed = changed_fields(schema, prior.attributes(), desired.attributes());
    if changed.is_empty() {
        return Diff::NoChange;
    }

    let forced_by: Vec<String> = changed
        .iter()
        .filter(|name| {
            schema
                .field(name)
                .map(|f| f.access.force_new)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    if forced_by.is_empty() {
        Diff::Update { changed }
    } else {
        Diff::Replace { changed, forced_by }
    }
}

/// Fields whose value differs between prior and desired, sorted by name
///
/// A field present in prior but dropped from desired counts as changed so the
/// expander can clear it remotely, unless the field is computed: computed
/// fields left out of the desired state keep their remote value. An empty
/// collection equals an absent one. Values are compared in the shape a read
/// produces, so a string set given as a list and a block given as a bare map
/// compare equal to their flattened forms.
pub fn changed_fields(
    schema: &ResourceSchema,
    prior: &HashMap<String, Value>,
    desired: &HashMap<String, Value>,
) -> Vec<String> {
    let mut changed: Vec<String> = prior
        .keys()
        .chain(desired.keys())
        .filter(|key| {
            let field = schema.field(key);
            let before = normalized(field, prior.get(*key));
            let after = normalized(field, desired.get(*key));
            if before == after {
                return false;
            }
            let computed = field.map(|f| f.access.computed).unwrap_or(false);
            !(after.is_none() && computed)
        })
        .cloned()
        .collect();
    changed.sort();
    changed.dedup();
    changed
}

fn normalized(field: Option<&FieldDescriptor>, value: Option<&Value>) -> Option<Value> {
    let value = match field {
        Some(field) => canonical(&field.kind, value?),
        None => value?.clone(),
    };
    (!value.is_empty_collection()).then_some(value)
}

/// Rewrite a value into the shape the flattener produces for `kind`
fn canonical(kind: &FieldKind, value: &Value) -> Value {
    match (kind, value) {
        (FieldKind::StringSet, Value::List(items)) => {
            match items.iter().map(Value::as_str).collect::<Option<Vec<_>>>() {
                Some(words) => Value::set(words),
                None => value.clone(),
            }
        }
        (FieldKind::Block(fields), Value::Map(map)) => {
            let element = canonical_element(fields, map);
            if element.is_empty() {
                Value::List(Vec::new())
            } else {
                Value::block(element)
            }
        }
        (FieldKind::Block(fields) | FieldKind::List(fields), Value::List(items)) => Value::List(
            items
                .iter()
                .map(|item| match item {
                    Value::Map(map) => Value::Map(canonical_element(fields, map)),
                    other => other.clone(),
                })
                .filter(|item| !item.is_empty_collection())
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Canonical form of one nested element; unset members are dropped
fn canonical_element(
    fields: &[FieldDescriptor],
    map: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    map.iter()
        .filter_map(|(name, value)| {
            let field = fields.iter().find(|f| f.name == *name);
            normalized(field, Some(value)).map(|v| (name.clone(), v))
        })
        .collect()
}

/// Copy of `desired` with every field changed since `prior` marked
pub fn with_changes(
    schema: &ResourceSchema,
    prior: &ResourceData,
    desired: &ResourceData,
) -> ResourceData {
    let mut data = desired.clone();
    for name in changed_fields(schema, prior.attributes(), desired.attributes()) {
        data.mark_changed(name);
    }
    if data.id().is_none()
        && let Some(id) = prior.id()
    {
        data.set_id(id);
    }
    data
}
