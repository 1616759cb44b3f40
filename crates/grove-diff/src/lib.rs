//! Shallow diff engine for flat key/value records.
//!
//! Compares two snapshots of a record field by field, producing a list of
//! changed fields with their old and new values as display strings. UI
//! components use this to render a change summary ("before you submit, here
//! is what you edited") from a before/after pair of snapshots.
//!
//! # Key Types
//!
//! - [`ShallowDiff`] / [`DiffEntry`] -- Field-level diff of two flat records

pub mod shallow;

pub use shallow::{display_string, shallow_diff, DiffEntry, ShallowDiff};
