//! Flat node records: the input to hierarchy construction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier for a node within a flat record set.
///
/// Entity identifiers in the catalogue are numeric database ids; the newtype
/// keeps them from being confused with other integers at call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A flat node record as fetched from a backend entity list.
///
/// `id` must be unique within the input collection. `parent_id` may be
/// absent, or may reference an id that is not in the collection at all; in
/// both cases the node becomes a root. Any extra columns travel in `fields`
/// untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier of this record.
    pub id: NodeId,
    /// Declared parent, if any.
    pub parent_id: Option<NodeId>,
    /// Arbitrary additional columns carried along verbatim.
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

impl NodeRecord {
    /// Create a root-level record with no extra fields.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            fields: BTreeMap::new(),
        }
    }

    /// Create a record with a declared parent.
    pub fn with_parent(id: impl Into<NodeId>, parent_id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Attach an extra column (builder style).
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}
