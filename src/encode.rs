//! Value Encoder - raw bytes to a hex blob literal
//!
//! The stored value is always the exact byte sequence the user supplied:
//! the UTF-8 bytes of a literal, or a file's contents read without decoding.

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Lowercase hex digit pairs, one pair per stored byte.
///
/// Only constructed by encoding bytes or by [`HexBlob::parse`], so the text
/// is always safe to splice into an `X'...'` blob literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexBlob(String);

impl HexBlob {
    /// Validate a caller-supplied hex string
    pub fn parse(text: &str) -> Result<Self> {
        if text.len() % 2 != 0 {
            return Err(Error::InvalidBlob(format!("odd number of digits ({})", text.len())));
        }
        if let Some(c) = text.chars().find(|c| !matches!(c, '0'..='9' | 'a'..='f')) {
            return Err(Error::InvalidBlob(format!("unexpected character {c:?}")));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bytes the blob expands to
    pub fn byte_len(&self) -> usize {
        self.0.len() / 2
    }

    /// Collapse back to the raw bytes
    pub fn decode(&self) -> Vec<u8> {
        // Validated on construction
        hex::decode(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for HexBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn encode_bytes(bytes: &[u8]) -> HexBlob {
    HexBlob(hex::encode(bytes))
}

/// Encode the UTF-8 bytes of a literal value
pub fn encode_str(value: &str) -> HexBlob {
    encode_bytes(value.as_bytes())
}

/// Encode a file's raw contents.
///
/// Callers pre-check existence so users get a clean not-found error.
pub fn encode_file(path: &Path) -> Result<HexBlob> {
    let bytes = std::fs::read(path)?;
    Ok(encode_bytes(&bytes))
}

/// Where a value to be stored comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    Literal(String),
    File(PathBuf),
}

impl ValueSource {
    pub fn encode(&self) -> Result<HexBlob> {
        match self {
            ValueSource::Literal(value) => Ok(encode_str(value)),
            ValueSource::File(path) => encode_file(path),
        }
    }

    /// Fail with `FileNotFound` when a value file is missing
    pub fn check_exists(&self) -> Result<()> {
        match self {
            ValueSource::File(path) if !path.is_file() => Err(Error::FileNotFound {
                what: "Value file",
                path: path.clone(),
            }),
            _ => Ok(()),
        }
    }
}
