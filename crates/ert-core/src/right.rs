//! # Execution Rights
//!
//! An execution right is a capital-allocation permission: it names the
//! adapters and assets an executor may touch and caps position size and
//! leverage. Rights are minted and mutated by an external registry; this
//! workspace only reads them.
//!
//! The allow-lists are ordered. Their Merkle commitment depends on that
//! order, so two rights with the same members in a different order commit
//! to different roots.

use serde::{Deserialize, Serialize};

use crate::identity::{Address, ErtId};
use crate::temporal::Timestamp;

/// Lifecycle status of an execution right, as reported by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RightStatus {
    /// The right can be exercised.
    Active,
    /// The right passed its expiry without settlement.
    Expired,
    /// The right has been settled and closed.
    Settled,
}

/// A capital-allocation permission with allow-lists and limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRight {
    /// Registry identifier.
    pub id: ErtId,
    /// Executor address the right was issued to.
    pub executor: Address,
    /// Capital currently available to the executor.
    pub available_capital: u128,
    /// Adapters (counterparty contracts) the executor may route through.
    pub allowed_adapters: Vec<Address>,
    /// Assets the executor may hold or trade.
    pub allowed_assets: Vec<Address>,
    /// Maximum size of a single position or trade.
    pub max_position_size: u128,
    /// Maximum leverage multiple for perpetual positions.
    pub max_leverage: u32,
    /// Registry-reported status.
    pub status: RightStatus,
    /// Instant after which the right can no longer be exercised.
    pub expires_at: Timestamp,
}

impl ExecutionRight {
    /// Whether the right can be exercised at `now`.
    ///
    /// Requires an `Active` status and `now` strictly before expiry.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.status == RightStatus::Active && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right(status: RightStatus, expires_at: &str) -> ExecutionRight {
        ExecutionRight {
            id: ErtId(1),
            executor: Address::parse("0x01").unwrap(),
            available_capital: 10_000,
            allowed_adapters: vec![Address::parse("0xa1").unwrap()],
            allowed_assets: vec![Address::parse("0xb1").unwrap()],
            max_position_size: 1_000,
            max_leverage: 5,
            status,
            expires_at: Timestamp::parse(expires_at).unwrap(),
        }
    }

    #[test]
    fn live_requires_active_and_unexpired() {
        let now = Timestamp::parse("2026-03-01T00:00:00Z").unwrap();
        assert!(right(RightStatus::Active, "2026-04-01T00:00:00Z").is_live(now));
        assert!(!right(RightStatus::Active, "2026-02-01T00:00:00Z").is_live(now));
        assert!(!right(RightStatus::Active, "2026-03-01T00:00:00Z").is_live(now));
        assert!(!right(RightStatus::Settled, "2026-04-01T00:00:00Z").is_live(now));
        assert!(!right(RightStatus::Expired, "2026-04-01T00:00:00Z").is_live(now));
    }

    #[test]
    fn serde_roundtrip_preserves_list_order() {
        let mut r = right(RightStatus::Active, "2026-04-01T00:00:00Z");
        r.allowed_assets = vec![
            Address::parse("0xb2").unwrap(),
            Address::parse("0xb1").unwrap(),
        ];
        let json = serde_json::to_string(&r).unwrap();
        let back: ExecutionRight = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.allowed_assets[0], Address::parse("0xb2").unwrap());
    }
}
