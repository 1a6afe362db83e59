//! Solidity ABI Encoding
//!
//! Minimal `abi.encode` for the value kinds a board leaf uses. Output is
//! byte-identical to `ethers`/`viem` `defaultAbiCoder.encode` for the same
//! types, which is what the on-chain verifier recomputes.

/// ABI word size in bytes.
pub const WORD: usize = 32;

/// A single ABI value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbiValue<'a> {
    /// `bool`
    Bool(bool),
    /// `uint256` (values above `u64::MAX` are never needed here)
    Uint(u64),
    /// `string`
    String(&'a str),
}

impl AbiValue<'_> {
    /// Solidity type name, as written in a tree dump's `leafEncoding`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Uint(_) => "uint256",
            Self::String(_) => "string",
        }
    }
}

/// Encode a single `uint256` word (big-endian, left-padded).
#[inline]
pub fn encode_uint(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Encode a `bool` word.
#[inline]
pub fn encode_bool(value: bool) -> [u8; WORD] {
    encode_uint(value as u64)
}

/// `abi.encode(values...)` as a tuple.
///
/// Static values sit in the head. Each dynamic value puts its byte offset in
/// the head and its length word plus right-padded payload in the tail.
pub fn encode(values: &[AbiValue<'_>]) -> Vec<u8> {
    let head_len = values.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for value in values {
        match value {
            AbiValue::Bool(b) => head.extend_from_slice(&encode_bool(*b)),
            AbiValue::Uint(n) => head.extend_from_slice(&encode_uint(*n)),
            AbiValue::String(s) => {
                let offset = (head_len + tail.len()) as u64;
                head.extend_from_slice(&encode_uint(offset));

                let bytes = s.as_bytes();
                tail.extend_from_slice(&encode_uint(bytes.len() as u64));
                tail.extend_from_slice(bytes);
                let padding = (WORD - bytes.len() % WORD) % WORD;
                tail.resize(tail.len() + padding, 0);
            }
        }
    }

    head.extend_from_slice(&tail);
    head
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint_word_layout() {
        let word = encode_uint(0x0102);
        assert!(word[..30].iter().all(|b| *b == 0));
        assert_eq!(word[30], 0x01);
        assert_eq!(word[31], 0x02);
    }

    #[test]
    fn test_bool_word_layout() {
        assert_eq!(encode_bool(false), [0u8; WORD]);
        assert_eq!(encode_bool(true)[31], 1);
    }

    #[test]
    fn test_leaf_tuple_layout() {
        let encoded = encode(&[
            AbiValue::Bool(true),
            AbiValue::Uint(7),
            AbiValue::String("C"),
        ]);

        // 3 head words + length word + one padded payload word
        assert_eq!(encoded.len(), 5 * WORD);
        assert_eq!(encoded[31], 1);
        assert_eq!(encoded[63], 7);
        assert_eq!(encoded[95], 0x60);
        assert_eq!(encoded[127], 1);
        assert_eq!(encoded[128], b'C');
        assert!(encoded[129..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_string_exact_word_not_padded() {
        let label = "ABCDEFGHIJKLMNOPQRSTUVWXYZ012345";
        assert_eq!(label.len(), WORD);

        let encoded = encode(&[AbiValue::String(label)]);
        // offset + length + one payload word
        assert_eq!(encoded.len(), 3 * WORD);
        assert_eq!(encoded[31], 0x20);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(AbiValue::Bool(true).type_name(), "bool");
        assert_eq!(AbiValue::Uint(0).type_name(), "uint256");
        assert_eq!(AbiValue::String("").type_name(), "string");
    }
}
