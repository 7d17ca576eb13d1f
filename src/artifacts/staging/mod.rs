//! Staging area
//!
//! Each branch owns one [`stage::Stage`]: the paths to add and the paths to
//! remove in its next commit, relative to the branch head.

pub mod stage;
