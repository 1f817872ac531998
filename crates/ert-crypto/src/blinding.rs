//! # Blinding Factors
//!
//! Every proof draws fresh blinding factors so its commitments cannot be
//! opened by guessing the committed values. The source is injected into
//! the proof engine so tests can substitute a deterministic one.
//!
//! ## Security Invariant
//!
//! Both implementations are cryptographically secure. `OsBlindingSource`
//! reads the operating system CSPRNG; `SeededBlindingSource` wraps the
//! ChaCha-based `StdRng` and is deterministic only because its seed is
//! known. Neither may be replaced by a non-cryptographic generator.

use parking_lot::Mutex;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::field::FieldElement;

/// Source of blinding factors, safe for concurrent use.
pub trait BlindingSource: Send + Sync + std::fmt::Debug {
    /// Draw 32 fresh random bytes as a field element.
    fn next_element(&self) -> FieldElement;
}

/// Operating-system CSPRNG. Stateless, so concurrent draws need no lock.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsBlindingSource;

impl BlindingSource for OsBlindingSource {
    fn next_element(&self) -> FieldElement {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        FieldElement::from_be_bytes(bytes)
    }
}

/// Deterministic CSPRNG for reproducible tests.
#[derive(Debug)]
pub struct SeededBlindingSource {
    rng: Mutex<StdRng>,
}

impl SeededBlindingSource {
    /// Seed the generator.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl BlindingSource for SeededBlindingSource {
    fn next_element(&self) -> FieldElement {
        let mut bytes = [0u8; 32];
        self.rng.lock().fill_bytes(&mut bytes);
        FieldElement::from_be_bytes(bytes)
    }
}

/// Draw one blinding factor from the operating-system CSPRNG.
pub fn random_field_element() -> FieldElement {
    OsBlindingSource.next_element()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_source_draws_distinct_values() {
        let a = random_field_element();
        let b = random_field_element();
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let s1 = SeededBlindingSource::new(7);
        let s2 = SeededBlindingSource::new(7);
        let a: Vec<_> = (0..4).map(|_| s1.next_element()).collect();
        let b: Vec<_> = (0..4).map(|_| s2.next_element()).collect();
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = SeededBlindingSource::new(1).next_element();
        let b = SeededBlindingSource::new(2).next_element();
        assert_ne!(a, b);
    }
}
