//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings representing SHA-1 hashes.
//! They identify both commits and blob contents.
//!
//! ## Format
//!
//! - Full: 40 hex characters (e.g., "abc123...def")
//! - Abbreviated: first 8 characters, indexed by the repository for lookups
//! - Short: first 7 characters, used when printing merge parents

use crate::artifacts::objects::{ABBREVIATED_ID_LENGTH, OBJECT_ID_LENGTH, SHORT_ID_LENGTH};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// SHA-1 based identifier
///
/// Serialized as its hex string; deserialization re-validates it so a
/// tampered state file is rejected instead of silently accepted.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// # Arguments
    ///
    /// * `id` - 40-character hexadecimal string
    ///
    /// # Returns
    ///
    /// Validated ObjectId or error if invalid length/characters
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// Hash raw bytes (file contents)
    pub fn of_bytes(data: &[u8]) -> Self {
        Self::of_parts(&[data])
    }

    /// Hash several byte sequences as if they were concatenated in order
    pub fn of_parts(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha1::new();
        for part in parts {
            hasher.update(part);
        }

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Prefix stored in the repository's abbreviation index
    pub fn abbreviation(&self) -> &str {
        &self.0[..ABBREVIATED_ID_LENGTH]
    }

    /// Get abbreviated form of the object ID
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash (standard Git abbreviation)
    pub fn to_short_oid(&self) -> String {
        self.0[..SHORT_ID_LENGTH].to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_parse(value)
    }
}

impl From<ObjectId> for String {
    fn from(value: ObjectId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "da39a3ee5e6b4b0d3255bfef95601890afd80709")]
    #[case("x", "11f6ad8ec52a2984abaafd7c3b516503785c2072")]
    fn hashes_bytes_with_sha1(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(ObjectId::of_bytes(content.as_bytes()).as_ref(), expected);
    }

    #[test]
    fn parts_hash_like_their_concatenation() {
        let joined = ObjectId::of_bytes(b"parent message");
        let parts = ObjectId::of_parts(&[b"parent", b" ", b"message"]);

        assert_eq!(joined, parts);
    }

    #[rstest]
    #[case("abc")]
    #[case("zz39a3ee5e6b4b0d3255bfef95601890afd80709")]
    fn rejects_malformed_ids(#[case] id: &str) {
        assert!(ObjectId::try_parse(id.to_string()).is_err());
    }

    #[test]
    fn abbreviations_are_prefixes() {
        let oid = ObjectId::of_bytes(b"content");

        assert_eq!(oid.abbreviation().len(), ABBREVIATED_ID_LENGTH);
        assert_eq!(oid.to_short_oid().len(), SHORT_ID_LENGTH);
        assert!(oid.as_ref().starts_with(oid.abbreviation()));
    }

    #[test]
    fn survives_json_round_trip_as_plain_string() -> anyhow::Result<()> {
        let oid = ObjectId::of_bytes(b"content");
        let json = serde_json::to_string(&oid)?;

        assert_eq!(json, format!("\"{}\"", oid));
        assert_eq!(serde_json::from_str::<ObjectId>(&json)?, oid);
        assert!(serde_json::from_str::<ObjectId>("\"not-an-id\"").is_err());

        Ok(())
    }

    proptest! {
        #[test]
        fn hashing_is_deterministic(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(ObjectId::of_bytes(&data), ObjectId::of_bytes(&data));
        }
    }
}
