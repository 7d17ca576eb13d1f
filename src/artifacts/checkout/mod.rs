//! Checkout safety
//!
//! Checkout, reset and merge rewrite the working tree. Before any file is
//! touched, `guard` checks that no untracked file and no unstaged edit would
//! be overwritten or deleted; a blocked operation leaves the tree and the repository alone.

pub mod guard;
