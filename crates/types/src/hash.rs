//! Blake3 digests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a digest in bytes.
const DIGEST_LEN: usize = 32;

/// A Blake3 digest.
///
/// Commitments in the validator-selection beacon are digests of the salt
/// and the committed value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(#[serde(with = "hex_bytes")] [u8; DIGEST_LEN]);

impl Hash {
    /// Digest of `parts` fed to the hasher in order. Equal to the digest of
    /// their concatenation.
    pub fn from_parts(parts: &[&[u8]]) -> Self {
        let digest = parts
            .iter()
            .fold(blake3::Hasher::new(), |mut hasher, part| {
                hasher.update(part);
                hasher
            })
            .finalize();
        Self(digest.into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hash(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("..)")
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Serde adapter encoding fixed-size byte arrays as lowercase hex.
pub(crate) mod hex_bytes {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S, const N: usize>(bytes: &[u8; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u8; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let mut out = [0u8; N];
        hex::decode_to_slice(&s, &mut out).map_err(D::Error::custom)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_stable() {
        assert_eq!(Hash::from_parts(&[b"commit"]), Hash::from_parts(&[b"commit"]));
        assert_ne!(Hash::from_parts(&[b"commit"]), Hash::from_parts(&[b"reveal"]));
    }

    #[test]
    fn test_from_parts_matches_concatenation() {
        let joined = Hash::from_parts(&[b"salt|42"]);
        let parts = Hash::from_parts(&[b"salt", b"|", b"42"]);
        assert_eq!(joined, parts);
    }

    #[test]
    fn test_display_is_full_hex() {
        let digest = Hash::from_parts(&[b"block"]);
        assert_eq!(digest.to_string(), digest.to_hex());
        assert_eq!(digest.to_hex().len(), 64);
    }

    #[test]
    fn test_serde_uses_hex() {
        let digest = Hash::from_parts(&[b"x"]);
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest.to_hex()));
    }

    #[test]
    fn test_debug_is_abbreviated() {
        let debug = format!("{:?}", Hash::from_parts(&[b"x"]));
        assert!(debug.starts_with("Hash("));
        assert!(debug.len() < 20);
    }
}
