//! Fixed-size MD5 digest value.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a digest from its hex representation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestParseError {
    /// The string was not 32 hex characters long.
    #[error("MD5 digest must be {expected} hex characters, got {actual}")]
    InvalidLength {
        /// Expected number of characters
        expected: usize,
        /// Number of characters provided
        actual: usize,
    },

    /// The string contained a non-hex character.
    #[error("Invalid hex in MD5 digest: {0}")]
    InvalidHex(String),
}

/// A 128-bit MD5 digest.
///
/// Digests are plain values: cheap to copy, compared byte for byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Md5Digest([u8; Md5Digest::LEN]);

impl Md5Digest {
    /// Number of bytes in a digest.
    pub const LEN: usize = 16;

    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// The raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Lower-case hex rendering (32 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Md5Digest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != Self::LEN * 2 {
            return Err(DigestParseError::InvalidLength {
                expected: Self::LEN * 2,
                actual: s.len(),
            });
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| DigestParseError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Md5Digest({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_and_render_hex() {
        let hex = "f1d3ff8443297732862df21dc4e57262";
        let digest: Md5Digest = hex.parse().unwrap();
        assert_eq!(digest.to_hex(), hex);
        assert_eq!(digest.to_string(), hex);
        assert_eq!(digest.as_bytes()[0], 0xf1);
    }

    #[test]
    fn test_parse_accepts_upper_case_and_whitespace() {
        let digest: Md5Digest = "  F1D3FF8443297732862DF21DC4E57262\n".parse().unwrap();
        assert_eq!(digest.to_hex(), "f1d3ff8443297732862df21dc4e57262");
    }

    #[rstest]
    #[case("", 0)]
    #[case("abcd", 4)]
    #[case("f1d3ff8443297732862df21dc4e5726200", 34)]
    fn test_parse_rejects_wrong_length(#[case] input: &str, #[case] actual: usize) {
        let err = input.parse::<Md5Digest>().unwrap_err();
        assert_eq!(err, DigestParseError::InvalidLength { expected: 32, actual });
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let err = "zzd3ff8443297732862df21dc4e57262".parse::<Md5Digest>().unwrap_err();
        assert!(matches!(err, DigestParseError::InvalidHex(_)));
    }

    #[test]
    fn test_debug_includes_hex() {
        let digest = Md5Digest::from_bytes([0xab; 16]);
        assert_eq!(format!("{digest:?}"), format!("Md5Digest({})", "ab".repeat(16)));
    }
}
