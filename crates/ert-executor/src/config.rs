//! Executor configuration.
//!
//! Loaded from environment variables, each with a default. Values that are
//! present but invalid are errors rather than silently defaulted.

use std::time::Duration;

use ert_state::DEFAULT_HISTORY_CAPACITY;
use ert_zkp::policy::PROOF_POLICY_ENV;
use ert_zkp::{PolicyMode, ProofPolicy};

/// Configuration for an [`ExecutionOrchestrator`](crate::ExecutionOrchestrator)
/// and its simulated gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// History ring-buffer capacity.
    pub history_capacity: usize,
    /// Minimum simulated gateway latency.
    pub sim_latency_min: Duration,
    /// Maximum simulated gateway latency.
    pub sim_latency_max: Duration,
    /// Policy the orchestrator's verifier enforces.
    pub proof_policy: ProofPolicy,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            sim_latency_min: Duration::from_millis(200),
            sim_latency_max: Duration::from_millis(800),
            proof_policy: ProofPolicy::build_default(),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ERT_HISTORY_CAPACITY` (default: 1000)
    /// - `ERT_SIM_LATENCY_MIN_MS` (default: 200)
    /// - `ERT_SIM_LATENCY_MAX_MS` (default: 800)
    /// - `ERT_PROOF_POLICY` (`production` or `development`; default by
    ///   build profile)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let number = |var: &str, default: u64| -> Result<u64, ConfigError> {
            match lookup(var) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw)),
            }
        };

        let history_capacity = number("ERT_HISTORY_CAPACITY", defaults.history_capacity as u64)?;
        if history_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "ERT_HISTORY_CAPACITY".to_string(),
                "0".to_string(),
            ));
        }
        let min_ms = number("ERT_SIM_LATENCY_MIN_MS", 200)?;
        let max_ms = number("ERT_SIM_LATENCY_MAX_MS", 800)?;
        if min_ms > max_ms {
            return Err(ConfigError::LatencyRange { min_ms, max_ms });
        }
        let proof_policy = match lookup(PROOF_POLICY_ENV) {
            None => defaults.proof_policy,
            Some(raw) => raw
                .parse::<PolicyMode>()
                .map(ProofPolicy::new)
                .map_err(|_| ConfigError::InvalidValue(PROOF_POLICY_ENV.to_string(), raw))?,
        };

        Ok(Self {
            history_capacity: usize::try_from(history_capacity).map_err(|_| {
                ConfigError::InvalidValue(
                    "ERT_HISTORY_CAPACITY".to_string(),
                    history_capacity.to_string(),
                )
            })?,
            sim_latency_min: Duration::from_millis(min_ms),
            sim_latency_max: Duration::from_millis(max_ms),
            proof_policy,
        })
    }

    /// Zero-latency configuration accepting hash-mix proofs (for tests).
    pub fn local_test() -> Self {
        Self {
            sim_latency_min: Duration::ZERO,
            sim_latency_max: Duration::ZERO,
            proof_policy: ProofPolicy::development(),
            ..Self::default()
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held an unparseable value: `(name, value)`.
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
    /// Minimum simulated latency exceeds the maximum.
    #[error("simulated latency range is empty: min {min_ms} ms > max {max_ms} ms")]
    LatencyRange {
        /// Configured minimum, in milliseconds.
        min_ms: u64,
        /// Configured maximum, in milliseconds.
        max_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ExecutorConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.history_capacity, 1_000);
        assert_eq!(cfg.sim_latency_min, Duration::from_millis(200));
        assert_eq!(cfg.sim_latency_max, Duration::from_millis(800));
        assert_eq!(cfg.proof_policy, ProofPolicy::build_default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = ExecutorConfig::from_lookup(lookup(&[
            ("ERT_HISTORY_CAPACITY", "50"),
            ("ERT_SIM_LATENCY_MIN_MS", "0"),
            ("ERT_SIM_LATENCY_MAX_MS", "10"),
            ("ERT_PROOF_POLICY", "production"),
        ]))
        .unwrap();
        assert_eq!(cfg.history_capacity, 50);
        assert_eq!(cfg.sim_latency_max, Duration::from_millis(10));
        assert_eq!(cfg.proof_policy, ProofPolicy::production());
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(
            ExecutorConfig::from_lookup(lookup(&[("ERT_HISTORY_CAPACITY", "lots")])),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(ExecutorConfig::from_lookup(lookup(&[("ERT_HISTORY_CAPACITY", "0")])).is_err());
        assert!(ExecutorConfig::from_lookup(lookup(&[("ERT_PROOF_POLICY", "staging")])).is_err());
    }

    #[test]
    fn inverted_latency_range_is_rejected() {
        let err = ExecutorConfig::from_lookup(lookup(&[
            ("ERT_SIM_LATENCY_MIN_MS", "900"),
            ("ERT_SIM_LATENCY_MAX_MS", "100"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::LatencyRange {
                min_ms: 900,
                max_ms: 100
            }
        );
    }
}
