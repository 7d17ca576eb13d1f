//! Command implementations
//!
//! Every user-facing command is an `impl Repository` block under
//! `porcelain`. Commands change the loaded state only after all of their
//! preconditions hold, so a failing command leaves nothing to save.

pub mod porcelain;
