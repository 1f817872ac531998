//! # Error Types — Structured Error Hierarchy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`.
//!
//! ## Design
//!
//! - Encoding errors abort proof generation. They carry the offending
//!   parameter name and input so the caller can report exactly what failed.
//! - Compliance failures are not errors. A non-compliant action still
//!   yields a complete proof with false attestation bits.
//! - State machine errors include the current state and the attempted
//!   target state.

use thiserror::Error;

/// A value failed field encoding.
///
/// Raised before any commitment is computed. Generation never substitutes
/// a zero for a value it could not encode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// The input is not a valid 160-bit hex address.
    #[error("invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input, verbatim.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A field element string is not 0x-prefixed 64-char hex.
    #[error("invalid field element {input:?}: {reason}")]
    InvalidFieldElement {
        /// The rejected input, verbatim.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A numeric parameter does not fit the arithmetic it feeds.
    #[error("value out of range for {parameter}: {reason}")]
    ValueOutOfRange {
        /// Name of the parameter.
        parameter: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Merkle tree construction or proof generation failed.
    #[error("merkle error: {0}")]
    Merkle(String),
}

/// Error in state machine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Attempted an invalid state transition.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current state name.
        from: String,
        /// Attempted target state name.
        to: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_error_names_the_input() {
        let err = EncodingError::InvalidAddress {
            input: "0xzz".into(),
            reason: "non-hex digit".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("0xzz"));
        assert!(msg.contains("non-hex digit"));
    }

    #[test]
    fn state_error_display() {
        let err = StateError::InvalidTransition {
            from: "IDLE".into(),
            to: "EXECUTING".into(),
        };
        assert_eq!(err.to_string(), "invalid transition from IDLE to EXECUTING");
    }
}
