//! The arena-backed forest structure and its construction algorithm.
//!
//! [`Forest`] owns every [`HierarchyNode`] in an id-keyed map and records
//! parent/child linkage as identifiers, never as live references. Roots
//! (nodes with no resolvable parent) are tracked separately for fast
//! enumeration, and the first-seen input order is preserved so that callers
//! get deterministic output.
//!
//! # Invariants
//!
//! - Node ids are unique within the forest (duplicates are rejected).
//! - Resolved parent links are acyclic (cycles are rejected at build time).
//! - `parent` and `children` bookkeeping always agree both ways.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{HierarchyError, HierarchyResult};
use crate::record::{NodeId, NodeRecord};

/// A node owned by a [`Forest`]: the flat record's data annotated with
/// resolved parent and child links.
///
/// `parent` is a lookup key into the owning forest, not a reference; it is
/// `None` for roots, including nodes whose declared `parent_id` did not
/// resolve to any known node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Unique identifier of this node.
    pub id: NodeId,
    /// The parent declared on the input record, resolvable or not.
    pub parent_id: Option<NodeId>,
    /// The resolved parent, or `None` if this node is a root.
    pub parent: Option<NodeId>,
    /// Child ids in attachment order (= input order of the children).
    pub children: Vec<NodeId>,
    /// Extra columns carried over from the input record.
    pub fields: BTreeMap<String, Value>,
}

impl HierarchyNode {
    /// Returns `true` if this node has no resolved parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A materialized nested subtree, for callers that want to walk children
/// structurally (e.g. tree rendering) rather than through the arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique identifier of this node.
    pub id: NodeId,
    /// The resolved parent id, or `None` for roots.
    pub parent: Option<NodeId>,
    /// Extra columns carried over from the input record.
    pub fields: BTreeMap<String, Value>,
    /// Nested children, in attachment order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Total number of nodes in this subtree, including the node itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}

/// The forest: an id-keyed arena of hierarchy nodes built from a flat
/// record list.
///
/// Construction is two linear passes (copy + index, then link), O(n) time
/// and O(n) auxiliary space, followed by an ancestor-chain scan that rejects
/// cyclic parent links.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Forest {
    /// All nodes, keyed by id.
    nodes: HashMap<NodeId, HierarchyNode>,
    /// First-seen input order of ids.
    order: Vec<NodeId>,
    /// Ids of nodes with no resolved parent.
    roots: Vec<NodeId>,
}

impl Forest {
    /// Create an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest from a flat record list.
    ///
    /// Each record is copied into the arena and linked to its parent when
    /// the declared `parent_id` resolves to a known id; otherwise the node
    /// stays a root. Duplicate ids are rejected with
    /// [`HierarchyError::DuplicateId`] rather than silently letting the last
    /// record win, and parent chains that revisit a node (self-parenting
    /// included) are rejected with [`HierarchyError::CycleDetected`].
    pub fn from_records(records: &[NodeRecord]) -> HierarchyResult<Self> {
        let mut nodes: HashMap<NodeId, HierarchyNode> = HashMap::with_capacity(records.len());
        let mut order = Vec::with_capacity(records.len());

        // Pass 1: copy and index.
        for record in records {
            if nodes.contains_key(&record.id) {
                return Err(HierarchyError::DuplicateId(record.id));
            }
            nodes.insert(
                record.id,
                HierarchyNode {
                    id: record.id,
                    parent_id: record.parent_id,
                    parent: None,
                    children: Vec::new(),
                    fields: record.fields.clone(),
                },
            );
            order.push(record.id);
        }

        // Pass 2: link children to resolvable parents, in input order.
        for id in &order {
            let declared = nodes.get(id).and_then(|n| n.parent_id);
            let Some(parent_id) = declared else {
                continue;
            };
            if parent_id == *id {
                return Err(HierarchyError::CycleDetected(*id));
            }
            if let Some(parent) = nodes.get_mut(&parent_id) {
                parent.children.push(*id);
                if let Some(node) = nodes.get_mut(id) {
                    node.parent = Some(parent_id);
                }
            }
        }

        let roots: Vec<NodeId> = order
            .iter()
            .copied()
            .filter(|id| nodes.get(id).is_some_and(|n| n.is_root()))
            .collect();

        let forest = Self { nodes, order, roots };
        forest.reject_cycles()?;

        debug!(nodes = forest.len(), roots = forest.roots.len(), "built forest");
        Ok(forest)
    }

    /// Walk every ancestor chain once, failing on the first revisited node.
    ///
    /// Chains that reach a node already cleared by an earlier walk stop
    /// immediately, so the scan stays linear overall.
    fn reject_cycles(&self) -> HierarchyResult<()> {
        let mut cleared: HashSet<NodeId> = HashSet::new();

        for &start in self.nodes.keys() {
            let mut walked: Vec<NodeId> = Vec::new();
            let mut on_chain: HashSet<NodeId> = HashSet::new();
            let mut current = start;

            loop {
                if cleared.contains(&current) {
                    break;
                }
                if !on_chain.insert(current) {
                    return Err(HierarchyError::CycleDetected(current));
                }
                walked.push(current);
                match self.nodes.get(&current).and_then(|n| n.parent) {
                    Some(parent_id) => current = parent_id,
                    None => break,
                }
            }
            cleared.extend(walked);
        }

        Ok(())
    }

    /// Total number of nodes in the forest.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the forest has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ---------------------------------------------------------------
    // Enumeration
    // ---------------------------------------------------------------

    /// All nodes, in first-seen input order.
    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// All root nodes (nodes with no resolved parent), in input order.
    pub fn roots(&self) -> Vec<&HierarchyNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id)).collect()
    }

    /// Retrieve a node by id.
    pub fn get(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(&id)
    }

    // ---------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------

    /// The resolved parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes
            .get(&id)
            .and_then(|n| n.parent)
            .and_then(|pid| self.nodes.get(&pid))
    }

    /// Direct children of a node, in attachment order.
    ///
    /// Returns an empty vec if the node is not found.
    pub fn children(&self, id: NodeId) -> Vec<&HierarchyNode> {
        match self.nodes.get(&id) {
            Some(node) => node
                .children
                .iter()
                .filter_map(|cid| self.nodes.get(cid))
                .collect(),
            None => Vec::new(),
        }
    }

    /// All ancestors of a node, nearest first (walk up the parent keys).
    ///
    /// Returns an empty vec if the node is not found. The node itself is
    /// **not** included in the result.
    pub fn ancestors(&self, id: NodeId) -> Vec<&HierarchyNode> {
        let mut result = Vec::new();
        let mut current = self.nodes.get(&id).and_then(|n| n.parent);

        while let Some(parent_id) = current {
            match self.nodes.get(&parent_id) {
                Some(parent) => {
                    result.push(parent);
                    current = parent.parent;
                }
                None => break,
            }
        }

        result
    }

    /// All descendants of a node (BFS downward through child lists).
    ///
    /// Returns an empty vec if the node is not found. The node itself is
    /// **not** included in the result.
    pub fn descendants(&self, id: NodeId) -> Vec<&HierarchyNode> {
        let Some(start) = self.nodes.get(&id) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        let mut queue: VecDeque<NodeId> = start.children.iter().copied().collect();

        while let Some(current_id) = queue.pop_front() {
            if let Some(node) = self.nodes.get(&current_id) {
                result.push(node);
                queue.extend(node.children.iter().copied());
            }
        }

        result
    }

    /// Preorder traversal over all subtrees, roots first.
    pub fn flatten(&self) -> Vec<&HierarchyNode> {
        let mut result = Vec::with_capacity(self.len());
        for root_id in &self.roots {
            if let Some(root) = self.nodes.get(root_id) {
                result.push(root);
                result.extend(self.descendants_preorder(root));
            }
        }
        result
    }

    fn descendants_preorder<'a>(&'a self, node: &'a HierarchyNode) -> Vec<&'a HierarchyNode> {
        let mut result = Vec::new();
        for child_id in &node.children {
            if let Some(child) = self.nodes.get(child_id) {
                result.push(child);
                result.extend(self.descendants_preorder(child));
            }
        }
        result
    }

    // ---------------------------------------------------------------
    // Materialization
    // ---------------------------------------------------------------

    /// Materialize the subtree rooted at `id` as a nested [`TreeNode`].
    ///
    /// Returns `None` if the node is not found. Terminates because cyclic
    /// parent links are rejected at construction.
    pub fn tree(&self, id: NodeId) -> Option<TreeNode> {
        let node = self.nodes.get(&id)?;
        let children = node
            .children
            .iter()
            .filter_map(|cid| self.tree(*cid))
            .collect();
        Some(TreeNode {
            id: node.id,
            parent: node.parent,
            fields: node.fields.clone(),
            children,
        })
    }

    /// Materialize every root subtree, in input order.
    pub fn trees(&self) -> Vec<TreeNode> {
        self.roots.iter().filter_map(|id| self.tree(*id)).collect()
    }

    // ---------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------

    /// Validate the forest's structural integrity.
    ///
    /// Checks that:
    /// - Every resolved parent link has a matching child entry, and vice versa.
    /// - Root tracking matches the set of parentless nodes, in both directions.
    /// - Resolved parent links are acyclic.
    pub fn validate(&self) -> HierarchyResult<()> {
        for node in self.nodes.values() {
            if let Some(parent_id) = node.parent {
                let linked = self
                    .nodes
                    .get(&parent_id)
                    .is_some_and(|p| p.children.contains(&node.id));
                if !linked {
                    return Err(HierarchyError::Inconsistent {
                        node: node.id,
                        detail: format!("parent {parent_id} does not list it as a child"),
                    });
                }
            }
            for child_id in &node.children {
                let linked = self
                    .nodes
                    .get(child_id)
                    .is_some_and(|c| c.parent == Some(node.id));
                if !linked {
                    return Err(HierarchyError::Inconsistent {
                        node: node.id,
                        detail: format!("child {child_id} does not point back to it"),
                    });
                }
            }
        }

        for root_id in &self.roots {
            if self.nodes.get(root_id).is_some_and(|n| !n.is_root()) {
                return Err(HierarchyError::Inconsistent {
                    node: *root_id,
                    detail: "tracked as root but has a parent".to_string(),
                });
            }
        }

        for node in self.nodes.values() {
            if node.is_root() && !self.roots.contains(&node.id) {
                return Err(HierarchyError::Inconsistent {
                    node: node.id,
                    detail: "parentless but not tracked as a root".to_string(),
                });
            }
        }

        self.reject_cycles()
    }

    // ---------------------------------------------------------------
    // Serialization helpers
    // ---------------------------------------------------------------

    /// Serialize the forest to JSON bytes.
    ///
    /// JSON rather than a compact binary format: the dynamic `fields`
    /// values need a self-describing encoding to round-trip.
    pub fn to_bytes(&self) -> HierarchyResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| HierarchyError::Serialization(e.to_string()))
    }

    /// Deserialize a forest from JSON bytes.
    ///
    /// The decoded structure is validated before being returned, so bytes
    /// encoding a cyclic or inconsistent forest are rejected just like the
    /// records that would produce one. Traversals can therefore keep
    /// trusting the construction-time invariants.
    pub fn from_bytes(data: &[u8]) -> HierarchyResult<Self> {
        let forest: Self = serde_json::from_slice(data)
            .map_err(|e| HierarchyError::Serialization(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }
}

/// Annotate a flat record list with parent/child links.
///
/// Returns the forest holding every node (roots and non-roots alike),
/// enumerable in first-seen input order via [`Forest::nodes`].
pub fn populate_parents(records: &[NodeRecord]) -> HierarchyResult<Forest> {
    Forest::from_records(records)
}

/// Build nested hierarchies from a flat record list.
///
/// Only the top-level (root) nodes come back, each with its full subtree
/// nested inside, in input order.
pub fn build_hierarchies(records: &[NodeRecord]) -> HierarchyResult<Vec<TreeNode>> {
    Ok(Forest::from_records(records)?.trees())
}
