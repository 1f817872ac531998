//! # Action Taxonomy
//!
//! The four action kinds a proof can bind to an execution right. The
//! integer tag of each kind is committed inside the action commitment, so
//! the tags are part of the proof format and must not be renumbered.

use serde::{Deserialize, Serialize};

/// Kind of pending action a proof is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Token swap through an adapter.
    Swap,
    /// Deposit into or withdrawal from a yield adapter.
    Yield,
    /// Leveraged perpetual position.
    Perpetual,
    /// Settlement of a right's final capital.
    Settlement,
}

impl ActionType {
    /// All action types, in tag order.
    pub const ALL: [ActionType; 4] = [Self::Swap, Self::Yield, Self::Perpetual, Self::Settlement];

    /// The integer tag committed inside the action commitment.
    pub fn tag(&self) -> u64 {
        match self {
            Self::Swap => 1,
            Self::Yield => 2,
            Self::Perpetual => 3,
            Self::Settlement => 4,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Yield => "yield",
            Self::Perpetual => "perpetual",
            Self::Settlement => "settlement",
        }
    }

    /// Whether proofs of this kind attest compliance with allow-lists and
    /// limits, as opposed to arithmetic correctness.
    pub fn is_compliance(&self) -> bool {
        !matches!(self, Self::Settlement)
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_distinct_and_nonzero() {
        let mut tags: Vec<u64> = ActionType::ALL.iter().map(|a| a.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 4);
        assert!(tags.iter().all(|t| *t > 0));
    }

    #[test]
    fn serde_snake_case() {
        assert_eq!(serde_json::to_string(&ActionType::Perpetual).unwrap(), "\"perpetual\"");
    }

    #[test]
    fn settlement_is_not_compliance() {
        assert!(ActionType::Swap.is_compliance());
        assert!(!ActionType::Settlement.is_compliance());
    }
}
