//! Snapshot objects
//!
//! Two kinds of content are identified by SHA-1 hashes:
//!
//! - **Blob**: file content (raw bytes), hashed on its own
//! - **Commit**: an immutable snapshot mapping tracked paths to blob hashes,
//!   identified by a hash over its staged paths, parent, message and timestamp

pub mod blob;
pub mod commit;
pub mod object_id;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the prefixes kept in the abbreviation index
pub const ABBREVIATED_ID_LENGTH: usize = 8;

/// Length of the ids printed for merge parents
pub const SHORT_ID_LENGTH: usize = 7;
