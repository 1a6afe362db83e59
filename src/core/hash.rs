//! Keccak-256 Hashing
//!
//! Digest type and hashing rules shared by the tree builder and any external
//! verifier. These rules are part of the wire format:
//! - leaf: `keccak256(keccak256(abi_encoded_leaf))`
//! - inner node: `keccak256(min(a, b) || max(a, b))`
//!
//! Changing any of them changes every published root.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

/// Digest length in bytes.
pub const HASH_LEN: usize = 32;

/// 256-bit Keccak digest.
///
/// Ordering is bytewise, which equals numeric ordering of the big-endian
/// value. The sorted-pair rule and leaf sorting both rely on it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeHash(pub [u8; HASH_LEN]);

impl NodeHash {
    /// Create from raw bytes.
    pub const fn new(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse hex with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, HashParseError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits)?;
        let array: [u8; HASH_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HashParseError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeHash({})", self.to_hex())
    }
}

impl FromStr for NodeHash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for NodeHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for NodeHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Errors parsing a hex digest.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HashParseError {
    /// Not valid hex.
    #[error("invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Decoded to the wrong number of bytes.
    #[error("digest must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Plain Keccak-256 of arbitrary data.
pub fn keccak256(data: &[u8]) -> NodeHash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    NodeHash(hasher.finalize().into())
}

/// Hash an ABI-encoded leaf.
///
/// Double hashing keeps a 64-byte leaf preimage from ever being mistaken for
/// an inner node.
pub fn hash_leaf(encoded: &[u8]) -> NodeHash {
    let inner = keccak256(encoded);
    keccak256(inner.as_bytes())
}

/// Hash two child nodes, smaller digest first.
pub fn hash_pair(a: &NodeHash, b: &NodeHash) -> NodeHash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(lo.as_bytes());
    hasher.update(hi.as_bytes());
    NodeHash(hasher.finalize().into())
}

/// Fold a sibling path onto a leaf hash, yielding the implied root.
pub fn process_proof(leaf: NodeHash, proof: &[NodeHash]) -> NodeHash {
    proof.iter().fold(leaf, |acc, sibling| hash_pair(&acc, sibling))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty_vector() {
        assert_eq!(
            keccak256(b"").to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_hash_pair_is_order_independent() {
        let a = keccak256(b"a");
        let b = keccak256(b"b");
        assert_eq!(hash_pair(&a, &b), hash_pair(&b, &a));
        assert_ne!(hash_pair(&a, &b), hash_pair(&a, &a));
    }

    #[test]
    fn test_leaf_hash_differs_from_single_hash() {
        let data = b"leaf";
        assert_ne!(hash_leaf(data), keccak256(data));
        assert_eq!(hash_leaf(data), keccak256(keccak256(data).as_bytes()));
    }

    #[test]
    fn test_process_proof_empty_is_identity() {
        let leaf = keccak256(b"only");
        assert_eq!(process_proof(leaf, &[]), leaf);
    }

    #[test]
    fn test_hex_round_trip() {
        let hash = keccak256(b"round");
        let parsed: NodeHash = hash.to_hex().parse().unwrap();
        assert_eq!(parsed, hash);

        // Prefix is optional on input
        let bare = hex::encode(hash.as_bytes());
        assert_eq!(NodeHash::from_hex(&bare).unwrap(), hash);
    }

    #[test]
    fn test_hex_rejects_wrong_length() {
        assert_eq!(
            NodeHash::from_hex("0xabcd"),
            Err(HashParseError::InvalidLength(2))
        );
        assert!(matches!(
            NodeHash::from_hex("0xzz"),
            Err(HashParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let hash = keccak256(b"serde");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));

        let back: NodeHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let mut low = [0u8; HASH_LEN];
        let mut high = [0u8; HASH_LEN];
        low[31] = 0xff;
        high[0] = 0x01;
        assert!(NodeHash(low) < NodeHash(high));
    }
}
