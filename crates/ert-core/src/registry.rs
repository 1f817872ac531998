//! # Rights Registry Interface
//!
//! Read-only view of the external execution-rights registry. Lookups that
//! cannot be served return `None`; an unavailable registry is an expected,
//! recoverable condition rather than an error.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::identity::ErtId;
use crate::right::ExecutionRight;

/// Read-only access to execution rights.
pub trait RightsRegistry: Send + Sync {
    /// Fetch the current state of a right, or `None` if unavailable.
    fn right(&self, id: ErtId) -> Option<ExecutionRight>;
}

/// In-process registry snapshot, cloneable and shareable across tasks.
///
/// Used by the CLI to serve rights loaded from files and by tests. The
/// `upsert` path stands in for the external registry publishing a change;
/// consumers only ever see it through [`RightsRegistry`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    rights: Arc<RwLock<HashMap<ErtId, ExecutionRight>>>,
}

impl InMemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a right.
    pub fn upsert(&self, right: ExecutionRight) {
        self.rights.write().insert(right.id, right);
    }

    /// Number of rights held.
    pub fn len(&self) -> usize {
        self.rights.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RightsRegistry for InMemoryRegistry {
    fn right(&self, id: ErtId) -> Option<ExecutionRight> {
        self.rights.read().get(&id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Address, RightStatus, Timestamp};

    fn sample(id: u64, cap: u128) -> ExecutionRight {
        ExecutionRight {
            id: ErtId(id),
            executor: Address::parse("0x01").unwrap(),
            available_capital: cap,
            allowed_adapters: vec![],
            allowed_assets: vec![],
            max_position_size: 0,
            max_leverage: 1,
            status: RightStatus::Active,
            expires_at: Timestamp::parse("2030-01-01T00:00:00Z").unwrap(),
        }
    }

    #[test]
    fn missing_right_is_none() {
        let reg = InMemoryRegistry::new();
        assert!(reg.right(ErtId(9)).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn upsert_replaces_and_clones_share_state() {
        let reg = InMemoryRegistry::new();
        let view = reg.clone();
        reg.upsert(sample(1, 100));
        reg.upsert(sample(1, 250));
        assert_eq!(view.right(ErtId(1)).unwrap().available_capital, 250);
        assert_eq!(view.len(), 1);
    }
}
