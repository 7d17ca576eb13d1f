//! Working tree status inspection
//!
//! ## Components
//!
//! - `file_change`: kinds of unstaged modification
//! - `inspector`: compares the working tree with the head and the stage
//! - `status_info`: the collected report and its rendering

pub mod file_change;
pub mod inspector;
pub mod status_info;
