//! Merge engine
//!
//! - `split_finder`: latest common ancestor of two branch heads
//! - `resolution`: per-path classification of a three-way merge
//! - `conflict`: working-tree content of conflicted paths

pub mod conflict;
pub mod resolution;
pub mod split_finder;
