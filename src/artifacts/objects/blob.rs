//! Blob (file content)
//!
//! Blobs hold the raw bytes of a tracked file. They carry no name or
//! permissions; the commit snapshot maps paths to blob hashes.

use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;

/// File content with its content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    oid: ObjectId,
    content: Bytes,
}

impl Blob {
    pub fn new(content: Bytes) -> Self {
        Blob {
            oid: ObjectId::of_bytes(&content),
            content,
        }
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }
}
