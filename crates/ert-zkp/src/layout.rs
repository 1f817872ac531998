//! # Public Signal Layouts
//!
//! Every proof publishes its signals in a fixed order:
//!
//! ```text
//! [ert_id, timestamp, ownership_commitment, action_commitment,
//!  roots..., public values..., attestation bits...]
//! ```
//!
//! | Action     | roots | public values | bits | total |
//! |------------|-------|---------------|------|-------|
//! | swap       | 2     | 0             | 3    | 9     |
//! | yield      | 2     | 0             | 3    | 9     |
//! | perpetual  | 1     | 2             | 3    | 10    |
//! | settlement | 0     | 5             | 2    | 11    |
//!
//! The verifier reads attestation bits and bound public inputs back out
//! of these positions, so the engine and verifier must agree on them.

use ert_core::ActionType;

/// Index of the right identifier.
pub const ERT_ID: usize = 0;
/// Index of the proof timestamp (epoch seconds).
pub const TIMESTAMP: usize = 1;
/// Index of the ownership commitment.
pub const OWNERSHIP_COMMITMENT: usize = 2;
/// Index of the action commitment.
pub const ACTION_COMMITMENT: usize = 3;
/// Number of header signals shared by every layout.
pub const HEADER_LEN: usize = 4;

/// Shape of one action's public signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalLayout {
    /// Allow-list roots following the header.
    pub roots: usize,
    /// Action-specific public values following the roots.
    pub public_values: usize,
    /// 0/1 attestation signals closing the layout.
    pub attestations: usize,
}

impl SignalLayout {
    /// Layout for an action type.
    pub const fn for_action(action: ActionType) -> Self {
        match action {
            ActionType::Swap | ActionType::Yield => Self {
                roots: 2,
                public_values: 0,
                attestations: 3,
            },
            ActionType::Perpetual => Self {
                roots: 1,
                public_values: 2,
                attestations: 3,
            },
            ActionType::Settlement => Self {
                roots: 0,
                public_values: 5,
                attestations: 2,
            },
        }
    }

    /// First root index.
    pub const fn roots_offset(&self) -> usize {
        HEADER_LEN
    }

    /// First public value index.
    pub const fn public_values_offset(&self) -> usize {
        HEADER_LEN + self.roots
    }

    /// First attestation bit index.
    pub const fn attestation_offset(&self) -> usize {
        HEADER_LEN + self.roots + self.public_values
    }

    /// Total number of signals.
    pub const fn signal_count(&self) -> usize {
        self.attestation_offset() + self.attestations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_and_totals() {
        let cases = [
            (ActionType::Swap, 6, 9),
            (ActionType::Yield, 6, 9),
            (ActionType::Perpetual, 7, 10),
            (ActionType::Settlement, 9, 11),
        ];
        for (action, offset, total) in cases {
            let layout = SignalLayout::for_action(action);
            assert_eq!(layout.attestation_offset(), offset, "{action}");
            assert_eq!(layout.signal_count(), total, "{action}");
        }
    }
}
