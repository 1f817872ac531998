//! # Field Elements
//!
//! A `FieldElement` is a 256-bit unsigned integer held as 32 big-endian
//! bytes. Every value that enters a hash, a commitment, a Merkle leaf, or a
//! public signal is first encoded as one of these.
//!
//! ## Encodings
//!
//! - Addresses: the 160-bit address read as an unsigned integer
//!   ([`address_to_field`]).
//! - Unsigned integers: zero-extended big-endian.
//! - Booleans: `0` or `1`.
//! - Signed integers: two's complement over 256 bits, so a negative PnL is
//!   representable without a separate sign signal.
//!
//! Values are not reduced modulo a prime; the full 256-bit range is kept.

use std::fmt;

use ert_core::{Address, EncodingError};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A 256-bit big-endian field word.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Zeroize, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// The zero element. Also the Merkle padding leaf.
    pub const ZERO: FieldElement = FieldElement([0u8; 32]);

    /// The element `1`.
    pub const ONE: FieldElement = {
        let mut b = [0u8; 32];
        b[31] = 1;
        FieldElement(b)
    };

    /// Wrap raw big-endian bytes.
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Borrow the raw big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Encode an unsigned 64-bit integer.
    pub fn from_u64(v: u64) -> Self {
        let mut b = [0u8; 32];
        b[24..].copy_from_slice(&v.to_be_bytes());
        Self(b)
    }

    /// Encode an unsigned 128-bit integer.
    pub fn from_u128(v: u128) -> Self {
        let mut b = [0u8; 32];
        b[16..].copy_from_slice(&v.to_be_bytes());
        Self(b)
    }

    /// Encode a signed 128-bit integer in 256-bit two's complement.
    pub fn from_i128(v: i128) -> Self {
        let mut b = if v < 0 { [0xffu8; 32] } else { [0u8; 32] };
        b[16..].copy_from_slice(&v.to_be_bytes());
        Self(b)
    }

    /// Encode a boolean as `0` or `1`.
    pub fn from_bool(v: bool) -> Self {
        if v {
            Self::ONE
        } else {
            Self::ZERO
        }
    }

    /// Encode a validated address.
    pub fn from_address(addr: &Address) -> Self {
        let mut b = [0u8; 32];
        b[12..].copy_from_slice(addr.as_bytes());
        Self(b)
    }

    /// Decode as `u128` if the value fits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.0[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut lo = [0u8; 16];
        lo.copy_from_slice(&self.0[16..]);
        Some(u128::from_be_bytes(lo))
    }

    /// Decode as `u64` if the value fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.0[..24].iter().any(|b| *b != 0) {
            return None;
        }
        let mut lo = [0u8; 8];
        lo.copy_from_slice(&self.0[24..]);
        Some(u64::from_be_bytes(lo))
    }

    /// Decode a two's-complement value if it is a sign-extended `i128`.
    pub fn to_i128(&self) -> Option<i128> {
        let negative = self.0[16] & 0x80 != 0;
        let fill = if negative { 0xff } else { 0x00 };
        if self.0[..16].iter().any(|b| *b != fill) {
            return None;
        }
        let mut lo = [0u8; 16];
        lo.copy_from_slice(&self.0[16..]);
        Some(i128::from_be_bytes(lo))
    }

    /// Decode a 0/1 flag. Any other value is `None`.
    pub fn to_bool(&self) -> Option<bool> {
        if *self == Self::ZERO {
            Some(false)
        } else if *self == Self::ONE {
            Some(true)
        } else {
            None
        }
    }

    /// Whether this is the zero element.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Render as `0x` followed by 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse `0x`-prefixed hex of at most 64 digits.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError::InvalidFieldElement`] for a missing prefix,
    /// empty digits, more than 64 digits, or non-hex characters.
    pub fn from_hex(input: &str) -> Result<Self, EncodingError> {
        let reject = |reason: &str| EncodingError::InvalidFieldElement {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let digits = input
            .strip_prefix("0x")
            .ok_or_else(|| reject("missing 0x prefix"))?;
        if digits.is_empty() || digits.len() > 64 {
            return Err(reject("expected 1..=64 hex digits"));
        }
        let padded = format!("{digits:0>64}");
        let mut b = [0u8; 32];
        hex::decode_to_slice(&padded, &mut b).map_err(|e| reject(&e.to_string()))?;
        Ok(Self(b))
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self.to_hex())
    }
}

impl TryFrom<String> for FieldElement {
    type Error = EncodingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<FieldElement> for String {
    fn from(value: FieldElement) -> Self {
        value.to_hex()
    }
}

/// Encode a raw address string as a field element.
///
/// Strips an optional `0x`, lowercases, and reads the digits as an unsigned
/// 160-bit integer. Pure and case-insensitive.
///
/// # Errors
///
/// Returns [`EncodingError::InvalidAddress`] for anything that is not a
/// hex integer of at most 160 bits. Malformed input is never coerced to zero.
pub fn address_to_field(addr: &str) -> Result<FieldElement, EncodingError> {
    Address::parse(addr).map(|a| FieldElement::from_address(&a))
}
