//! # Attestation Backend Policy
//!
//! Decides whether proofs from a given attestation backend may be accepted
//! in the current deployment.
//!
//! The hash-mix backend produces envelopes anyone holding the public hash
//! function can forge. A production verifier must therefore refuse them
//! and only accept a constraint-system backend.
//!
//! ## Configuration
//!
//! The mode is chosen, in order, by:
//! 1. `ERT_PROOF_POLICY` (`production` / `prod`, `development` / `dev`)
//! 2. the build profile: release defaults to `Production`, debug to
//!    `Development`
//!
//! Unknown values of `ERT_PROOF_POLICY` fall through to the build default
//! here; `ert-executor`'s config layer rejects them instead.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable selecting the policy mode.
pub const PROOF_POLICY_ENV: &str = "ERT_PROOF_POLICY";

/// Errors from policy enforcement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// A forgeable backend was presented to a production verifier.
    #[error("{backend} proof rejected: production mode requires a constraint-system backend")]
    BackendRejected {
        /// Name of the rejected backend.
        backend: String,
    },
    /// A policy mode string was not recognized.
    #[error("unknown proof policy mode {0:?}")]
    UnknownMode(String),
}

/// The backend that produced a proof. Its name is the proof's protocol label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProofBackend {
    /// SHA-256 hash mixing over commitments and public signals.
    HashMix,
    /// Groth16 SNARK. Recognized but not compiled into this build.
    Groth16,
}

impl ProofBackend {
    /// Whether the backend is sound against a prover without a witness.
    pub fn is_sound(self) -> bool {
        matches!(self, ProofBackend::Groth16)
    }

    /// Protocol label written into every proof.
    pub fn name(self) -> &'static str {
        match self {
            ProofBackend::HashMix => "hash-mix-sha256",
            ProofBackend::Groth16 => "groth16",
        }
    }

    /// Look a backend up by its protocol label.
    pub fn from_name(label: &str) -> Option<Self> {
        [ProofBackend::HashMix, ProofBackend::Groth16]
            .into_iter()
            .find(|b| b.name() == label)
    }
}

impl std::fmt::Display for ProofBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Reject unsound backends.
    Production,
    /// Accept every known backend (local runs and tests only).
    Development,
}

impl FromStr for PolicyMode {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(PolicyMode::Production),
            "development" | "dev" => Ok(PolicyMode::Development),
            other => Err(PolicyError::UnknownMode(other.to_string())),
        }
    }
}

/// Runtime policy consulted by the verifier before any other check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofPolicy {
    mode: PolicyMode,
}

impl ProofPolicy {
    /// Policy with an explicit mode.
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    /// Reject unsound backends.
    pub fn production() -> Self {
        Self::new(PolicyMode::Production)
    }

    /// Accept the hash-mix backend.
    pub fn development() -> Self {
        Self::new(PolicyMode::Development)
    }

    /// Policy from `ERT_PROOF_POLICY`, else the build-profile default.
    pub fn from_environment() -> Self {
        if let Ok(val) = std::env::var(PROOF_POLICY_ENV) {
            if let Ok(mode) = val.parse() {
                return Self::new(mode);
            }
        }
        Self::build_default()
    }

    /// Release builds are production, debug builds development.
    pub fn build_default() -> Self {
        if cfg!(not(debug_assertions)) {
            Self::production()
        } else {
            Self::development()
        }
    }

    /// Check a backend against this policy.
    ///
    /// # Errors
    ///
    /// [`PolicyError::BackendRejected`] for an unsound backend in production.
    pub fn validate(&self, backend: ProofBackend) -> Result<(), PolicyError> {
        match self.mode {
            PolicyMode::Production if !backend.is_sound() => Err(PolicyError::BackendRejected {
                backend: backend.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Current mode.
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }
}

impl Default for ProofPolicy {
    fn default() -> Self {
        Self::build_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_rejects_hash_mix() {
        let err = ProofPolicy::production()
            .validate(ProofBackend::HashMix)
            .unwrap_err();
        assert!(err.to_string().contains("hash-mix-sha256"));
    }

    #[test]
    fn production_accepts_groth16() {
        assert!(ProofPolicy::production().validate(ProofBackend::Groth16).is_ok());
    }

    #[test]
    fn development_accepts_everything() {
        let policy = ProofPolicy::development();
        assert!(policy.validate(ProofBackend::HashMix).is_ok());
        assert!(policy.validate(ProofBackend::Groth16).is_ok());
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("PROD".parse::<PolicyMode>().unwrap(), PolicyMode::Production);
        assert_eq!(" dev ".parse::<PolicyMode>().unwrap(), PolicyMode::Development);
        assert!(matches!(
            "staging".parse::<PolicyMode>(),
            Err(PolicyError::UnknownMode(_))
        ));
    }

    #[test]
    fn backend_labels_roundtrip() {
        for b in [ProofBackend::HashMix, ProofBackend::Groth16] {
            assert_eq!(ProofBackend::from_name(b.name()), Some(b));
        }
        assert_eq!(ProofBackend::from_name("plonk"), None);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn debug_build_defaults_to_development() {
        assert_eq!(ProofPolicy::build_default().mode(), PolicyMode::Development);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn release_build_defaults_to_production() {
        assert_eq!(ProofPolicy::build_default().mode(), PolicyMode::Production);
    }
}
