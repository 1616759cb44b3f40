//! Hierarchy construction for flat entity lists.
//!
//! Backend services hand the UI flat lists of records where each record
//! carries an `id` and an optional `parent_id`. This crate turns such a list
//! into an arena-backed [`Forest`]: every node is owned by the forest and
//! linked to its parent and children by identifier, so the ownership graph
//! is always acyclic even though nodes reference each other both ways.
//!
//! # Key Types
//!
//! - [`NodeId`] / [`NodeRecord`] — Flat input records
//! - [`HierarchyNode`] — A record annotated with resolved parent and child links
//! - [`Forest`] — The id-keyed arena owning all nodes
//! - [`TreeNode`] — A materialized nested subtree for rendering
//! - [`HierarchyError`] — Duplicate-id and cycle rejection

pub mod error;
pub mod forest;
pub mod record;

pub use error::{HierarchyError, HierarchyResult};
pub use forest::{build_hierarchies, populate_parents, Forest, HierarchyNode, TreeNode};
pub use record::{NodeId, NodeRecord};
