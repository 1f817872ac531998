//! Perpetual position proofs.
//!
//! Private order: `[market, size, leverage, side_tag]`. Markets are drawn
//! from the right's asset allow-list.

use ert_core::{ActionType, ErtId, ExecutionRight, RightsRegistry, Timestamp};
use ert_crypto::{address_to_field, prove_membership, FieldElement};

use super::{encode_allow_list, fetch_right, inclusion_paths, Draft, ProofEngine};
use crate::params::PerpetualParams;
use crate::proof::{
    AttestationSet, PerpetualAttestations, PerpetualProof, PerpetualPublicInputs, Proof,
};
use crate::traits::ProofError;

impl ProofEngine {
    /// Prove a perpetual position against `right` at the current time.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if the market address is malformed.
    pub fn prove_perpetual(
        &self,
        right: &ExecutionRight,
        params: &PerpetualParams,
    ) -> Result<PerpetualProof, ProofError> {
        self.prove_perpetual_at(right, params, Timestamp::now())
    }

    /// Prove a perpetual position against `right` as of `now`.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if the market address is malformed.
    pub fn prove_perpetual_at(
        &self,
        right: &ExecutionRight,
        params: &PerpetualParams,
        now: Timestamp,
    ) -> Result<PerpetualProof, ProofError> {
        let market = address_to_field(&params.market)?;
        let private_values = vec![
            market,
            FieldElement::from_u128(params.size),
            FieldElement::from_u64(u64::from(params.leverage)),
            FieldElement::from_u64(params.side.tag()),
        ];

        let market_check = prove_membership(market, &encode_allow_list(&right.allowed_assets));

        let live = right.is_live(now);
        let attestations = PerpetualAttestations {
            leverage_within_limit: live
                && params.leverage >= 1
                && params.leverage <= right.max_leverage,
            size_within_limit: live && params.size <= right.max_position_size,
            market_allowed: live && market_check.included,
        };
        let public_inputs = PerpetualPublicInputs {
            ert_id: right.id,
            timestamp: now,
            market_root: market_check.root,
            max_leverage: right.max_leverage,
            max_position_size: right.max_position_size,
        };

        let proof = self.seal(Draft {
            action: ActionType::Perpetual,
            ert_id: right.id,
            timestamp: now,
            private_values,
            inclusions: inclusion_paths([&market_check]),
            roots: vec![market_check.root],
            public_values: vec![
                FieldElement::from_u64(u64::from(right.max_leverage)),
                FieldElement::from_u128(right.max_position_size),
            ],
            bits: attestations.bits(),
        })?;

        Ok(Proof {
            proof,
            public_inputs,
            attestations,
        })
    }

    /// Fetch the right from `registry` and prove a perpetual position.
    ///
    /// `Ok(None)` when the registry cannot supply the right.
    ///
    /// # Errors
    ///
    /// As [`ProofEngine::prove_perpetual`].
    pub fn prove_perpetual_from_registry(
        &self,
        registry: &dyn RightsRegistry,
        id: ErtId,
        params: &PerpetualParams,
    ) -> Result<Option<PerpetualProof>, ProofError> {
        fetch_right(registry, id)
            .map(|right| self.prove_perpetual(&right, params))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::params::PositionSide;

    fn params(leverage: u32, size: u128) -> PerpetualParams {
        PerpetualParams {
            market: "0xb3".into(),
            size,
            leverage,
            side: PositionSide::Short,
        }
    }

    fn prove(p: &PerpetualParams) -> PerpetualProof {
        ProofEngine::default().prove_perpetual_at(&right(), p, now()).unwrap()
    }

    #[test]
    fn leverage_bounds_are_inclusive() {
        assert!(prove(&params(1, 100)).attestations.leverage_within_limit);
        assert!(prove(&params(5, 100)).attestations.leverage_within_limit);
        assert!(!prove(&params(0, 100)).attestations.leverage_within_limit);
        assert!(!prove(&params(6, 100)).attestations.leverage_within_limit);
    }

    #[test]
    fn size_cap() {
        assert!(prove(&params(2, 1_000)).attestations.size_within_limit);
        assert!(!prove(&params(2, 1_001)).attestations.size_within_limit);
    }

    #[test]
    fn limits_are_public() {
        let proof = prove(&params(2, 100));
        assert_eq!(proof.proof.public_signals.len(), 10);
        assert_eq!(proof.proof.signal(5), Some(FieldElement::from_u64(5)));
        assert_eq!(proof.proof.signal(6), Some(FieldElement::from_u128(1_000)));
        assert!(proof.attestations.all_true());
    }

    #[test]
    fn market_outside_assets() {
        let mut p = params(2, 100);
        p.market = "0xa1".into();
        assert!(!prove(&p).attestations.market_allowed);
    }
}
