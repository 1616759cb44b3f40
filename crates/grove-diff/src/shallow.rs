//! Shallow record diff: compare two flat field maps.
//!
//! Records are represented as `BTreeMap<String, serde_json::Value>`.
//! Equality is structural (nested values are compared deeply), but the diff
//! itself is shallow: one entry per changed top-level field, with both sides
//! coerced to display strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The result of shallow-diffing two records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShallowDiff {
    /// One entry per changed field.
    pub entries: Vec<DiffEntry>,
}

impl ShallowDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no fields changed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of changed fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Names of the changed fields, in entry order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.field.as_str()).collect()
    }
}

/// A single changed field with its old and new display values.
///
/// An absent field renders as the empty string, so an entry with
/// `old_value == ""` means the field was introduced by the edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// The field name.
    pub field: String,
    /// Display string of the value before the edit ("" if absent).
    pub old_value: String,
    /// Display string of the value after the edit ("" if absent).
    pub new_value: String,
}

/// Compute the shallow diff between two records.
///
/// Takes the union of field names across both records and emits one entry
/// per field whose values are not structurally equal. Entries come out in
/// deterministic order: `new`'s fields first (map order), then fields
/// present only in `old`. Fields absent from both sides never appear.
pub fn shallow_diff(
    new: &BTreeMap<String, Value>,
    old: &BTreeMap<String, Value>,
) -> ShallowDiff {
    let mut entries = Vec::new();

    for (field, new_val) in new {
        let old_val = old.get(field);
        if old_val != Some(new_val) {
            entries.push(DiffEntry {
                field: field.clone(),
                old_value: display_string(old_val),
                new_value: display_string(Some(new_val)),
            });
        }
    }

    for (field, old_val) in old {
        if !new.contains_key(field) {
            entries.push(DiffEntry {
                field: field.clone(),
                old_value: display_string(Some(old_val)),
                new_value: String::new(),
            });
        }
    }

    ShallowDiff { entries }
}

/// Coerce an optional field value to its display string.
///
/// Absent fields and nulls render as `""`. Strings render unquoted, scalars
/// via their canonical form, arrays as comma-joined element strings, and
/// objects as compact JSON.
pub fn display_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| display_string(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}
