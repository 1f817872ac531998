//! # Execution Lifecycle
//!
//! One request moves through:
//!
//! ```text
//! Idle ──▶ GeneratingProof ──▶ Verifying ──▶ Executing ──▶ Completed
//!              │                   │             │
//!              └───────────────────┴─────────────┴──────▶ Failed
//! ```
//!
//! Any non-terminal state may fall to `Failed`, including `Idle` (a request
//! rejected before generation starts). `Completed` and `Failed` are
//! terminal. Transitions are checked at runtime and logged.

use ert_core::{StateError, Timestamp};
use serde::{Deserialize, Serialize};

/// Phase of one execution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    /// Accepted, nothing started.
    Idle,
    /// Proof engine running.
    GeneratingProof,
    /// Verifier running.
    Verifying,
    /// Submitted to the execution gateway.
    Executing,
    /// Gateway accepted the action.
    Completed,
    /// Stopped; see the history entry for why.
    Failed,
}

impl ExecutionPhase {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::GeneratingProof => "generating_proof",
            Self::Verifying => "verifying",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether `self -> to` is an edge of the lifecycle.
    pub fn can_transition_to(&self, to: ExecutionPhase) -> bool {
        matches!(
            (*self, to),
            (Self::Idle, Self::GeneratingProof)
                | (Self::GeneratingProof, Self::Verifying)
                | (Self::Verifying, Self::Executing)
                | (Self::Executing, Self::Completed)
        ) || (!self.is_terminal() && to == Self::Failed)
    }
}

impl std::fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One logged transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Phase left.
    pub from: ExecutionPhase,
    /// Phase entered.
    pub to: ExecutionPhase,
    /// When (UTC).
    pub at: Timestamp,
}

/// Runtime-checked lifecycle of one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLifecycle {
    phase: ExecutionPhase,
    transitions: Vec<PhaseTransition>,
}

impl ExecutionLifecycle {
    /// Start in `Idle`.
    pub fn new() -> Self {
        Self {
            phase: ExecutionPhase::Idle,
            transitions: Vec::new(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Every transition so far, oldest first.
    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    /// Move to `to` if the lifecycle allows it.
    ///
    /// # Errors
    ///
    /// [`StateError::InvalidTransition`]; the phase is left unchanged.
    pub fn try_transition(&mut self, to: ExecutionPhase) -> Result<(), StateError> {
        if !self.phase.can_transition_to(to) {
            return Err(StateError::InvalidTransition {
                from: self.phase.name().to_string(),
                to: to.name().to_string(),
            });
        }
        self.transitions.push(PhaseTransition {
            from: self.phase,
            to,
            at: Timestamp::now(),
        });
        self.phase = to;
        Ok(())
    }

    /// Whether the request has finished.
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

impl Default for ExecutionLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExecutionPhase::*;

    #[test]
    fn happy_path() {
        let mut lc = ExecutionLifecycle::new();
        for to in [GeneratingProof, Verifying, Executing, Completed] {
            lc.try_transition(to).unwrap();
        }
        assert!(lc.is_terminal());
        assert_eq!(lc.transitions().len(), 4);
        assert_eq!(lc.transitions()[0].from, Idle);
    }

    #[test]
    fn every_non_terminal_phase_can_fail() {
        for from in [Idle, GeneratingProof, Verifying, Executing] {
            assert!(from.can_transition_to(Failed), "{from}");
        }
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Failed));
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        let mut lc = ExecutionLifecycle::new();
        let err = lc.try_transition(Executing).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid transition from idle to executing"
        );
        assert_eq!(lc.phase(), Idle);
        assert!(lc.transitions().is_empty());
    }

    #[test]
    fn terminal_is_final() {
        let mut lc = ExecutionLifecycle::new();
        lc.try_transition(GeneratingProof).unwrap();
        lc.try_transition(Failed).unwrap();
        assert!(lc.try_transition(Verifying).is_err());
        assert!(lc.try_transition(Completed).is_err());
    }

    #[test]
    fn phase_serializes_snake_case() {
        let json = serde_json::to_string(&GeneratingProof).unwrap();
        assert_eq!(json, "\"generating_proof\"");
    }
}
