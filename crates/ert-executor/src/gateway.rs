//! Downstream execution gateway.
//!
//! The orchestrator hands a verified proof to a gateway, which executes
//! the action and returns a transaction hash. Real network submission is
//! outside this workspace; [`SimulatedGateway`] stands in for it.

use std::time::Duration;

use ert_crypto::FieldElement;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// What a gateway receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Proof triple as calldata.
    pub proof_bytes: Vec<u8>,
    /// Public signals, in layout order.
    pub public_inputs: Vec<FieldElement>,
}

/// Gateway failures. The orchestrator records the message in history.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The gateway refused the submitted action.
    #[error("submission rejected: {0}")]
    Rejected(String),
    /// The gateway could not be reached or failed internally.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Executes verified actions.
#[async_trait::async_trait]
pub trait ExecutionGateway: Send + Sync {
    /// Submit a verified proof. Returns the transaction hash.
    async fn submit(&self, request: SubmissionRequest) -> Result<String, GatewayError>;
}

/// Gateway that sleeps for a random latency and returns a random
/// `0x`-prefixed 32-byte transaction hash.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    min_latency: Duration,
    max_latency: Duration,
}

impl SimulatedGateway {
    /// Latency drawn uniformly from `[min, max]`. Bounds are swapped if
    /// given in the wrong order.
    pub fn new(min_latency: Duration, max_latency: Duration) -> Self {
        Self {
            min_latency: min_latency.min(max_latency),
            max_latency: max_latency.max(min_latency),
        }
    }

    fn latency(&self) -> Duration {
        if self.min_latency == self.max_latency {
            return self.min_latency;
        }
        rand::thread_rng().gen_range(self.min_latency..=self.max_latency)
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new(Duration::from_millis(200), Duration::from_millis(800))
    }
}

#[async_trait::async_trait]
impl ExecutionGateway for SimulatedGateway {
    async fn submit(&self, request: SubmissionRequest) -> Result<String, GatewayError> {
        if request.public_inputs.is_empty() {
            return Err(GatewayError::Rejected("no public inputs".into()));
        }
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let tx: [u8; 32] = rand::thread_rng().gen();
        Ok(format!("0x{}", hex::encode(tx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_tx_hash_is_32_bytes() {
        let gw = SimulatedGateway::new(Duration::ZERO, Duration::ZERO);
        let tx = gw
            .submit(SubmissionRequest {
                proof_bytes: vec![0; 256],
                public_inputs: vec![FieldElement::ONE],
            })
            .await
            .unwrap();
        assert!(tx.starts_with("0x"));
        assert_eq!(tx.len(), 66);
    }

    #[tokio::test]
    async fn empty_inputs_rejected() {
        let gw = SimulatedGateway::new(Duration::ZERO, Duration::ZERO);
        let err = gw
            .submit(SubmissionRequest {
                proof_bytes: vec![],
                public_inputs: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Rejected(_)));
    }

    #[test]
    fn latency_stays_in_range() {
        let gw = SimulatedGateway::new(Duration::from_millis(50), Duration::from_millis(10));
        for _ in 0..20 {
            let d = gw.latency();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(50));
        }
    }
}
