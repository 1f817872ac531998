//! # Identity Newtypes
//!
//! Newtype wrappers for execution-right identifiers and 160-bit addresses.
//! You cannot pass an `ErtId` where an amount is expected, and an
//! `Address` cannot exist without passing validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EncodingError;

/// Identifier of an execution right in the external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErtId(pub u64);

impl ErtId {
    /// Access the inner numeric identifier.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ErtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERT #{}", self.0)
    }
}

/// Number of hex digits in a 160-bit address.
const ADDRESS_HEX_LEN: usize = 40;

/// A 160-bit account or contract address.
///
/// Parsing is case-insensitive and accepts an optional `0x` prefix. Inputs
/// shorter than 40 hex digits are treated as integers and left-padded,
/// matching the unsigned-integer reading of an address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// Parse a hex address.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidAddress`] if the input is empty after
    /// stripping the prefix, longer than 40 hex digits, or contains a
    /// non-hex character.
    pub fn parse(input: &str) -> Result<Self, EncodingError> {
        let reject = |reason: &str| EncodingError::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() {
            return Err(reject("no hex digits"));
        }
        if digits.len() > ADDRESS_HEX_LEN {
            return Err(reject("wider than 160 bits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(reject("non-hex digit"));
        }

        let padded = format!("{:0>width$}", digits.to_ascii_lowercase(), width = ADDRESS_HEX_LEN);
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(&padded, &mut bytes).map_err(|e| reject(&e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Build an address from raw big-endian bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// The raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Render as `0x` followed by 40 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl FromStr for Address {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_hex()
    }
}
