//! Swap proofs.
//!
//! Private order: `[adapter, token_in, token_out, amount_in, min_amount_out]`.

use ert_core::{ActionType, ErtId, ExecutionRight, RightsRegistry, Timestamp};
use ert_crypto::{address_to_field, prove_membership, FieldElement};

use super::{amount_within_limits, encode_allow_list, fetch_right, inclusion_paths, Draft, ProofEngine};
use crate::params::SwapParams;
use crate::proof::{AttestationSet, Proof, SwapAttestations, SwapProof, SwapPublicInputs};
use crate::traits::ProofError;

impl ProofEngine {
    /// Prove a swap against `right` at the current time.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if an address parameter is malformed.
    pub fn prove_swap(&self, right: &ExecutionRight, params: &SwapParams) -> Result<SwapProof, ProofError> {
        self.prove_swap_at(right, params, Timestamp::now())
    }

    /// Prove a swap against `right` as of `now`.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if an address parameter is malformed.
    pub fn prove_swap_at(
        &self,
        right: &ExecutionRight,
        params: &SwapParams,
        now: Timestamp,
    ) -> Result<SwapProof, ProofError> {
        let adapter = address_to_field(&params.adapter)?;
        let token_in = address_to_field(&params.token_in)?;
        let token_out = address_to_field(&params.token_out)?;
        let private_values = vec![
            adapter,
            token_in,
            token_out,
            FieldElement::from_u128(params.amount_in),
            FieldElement::from_u128(params.min_amount_out),
        ];

        let adapters = encode_allow_list(&right.allowed_adapters);
        let assets = encode_allow_list(&right.allowed_assets);
        let adapter_check = prove_membership(adapter, &adapters);
        let in_check = prove_membership(token_in, &assets);
        let out_check = prove_membership(token_out, &assets);

        let live = right.is_live(now);
        let attestations = SwapAttestations {
            adapter_allowed: live && adapter_check.included,
            assets_allowed: live && in_check.included && out_check.included,
            amount_within_limit: live && amount_within_limits(right, params.amount_in),
        };
        let public_inputs = SwapPublicInputs {
            ert_id: right.id,
            timestamp: now,
            adapter_root: adapter_check.root,
            asset_root: in_check.root,
        };

        let proof = self.seal(Draft {
            action: ActionType::Swap,
            ert_id: right.id,
            timestamp: now,
            private_values,
            inclusions: inclusion_paths([&adapter_check, &in_check, &out_check]),
            roots: vec![adapter_check.root, in_check.root],
            public_values: Vec::new(),
            bits: attestations.bits(),
        })?;

        Ok(Proof {
            proof,
            public_inputs,
            attestations,
        })
    }

    /// Fetch the right from `registry` and prove a swap against it.
    ///
    /// `Ok(None)` when the registry cannot supply the right.
    ///
    /// # Errors
    ///
    /// As [`ProofEngine::prove_swap`].
    pub fn prove_swap_from_registry(
        &self,
        registry: &dyn RightsRegistry,
        id: ErtId,
        params: &SwapParams,
    ) -> Result<Option<SwapProof>, ProofError> {
        fetch_right(registry, id)
            .map(|right| self.prove_swap(&right, params))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::layout::SignalLayout;
    use ert_core::RightStatus;

    fn params(adapter: &str, amount_in: u128) -> SwapParams {
        SwapParams {
            adapter: adapter.into(),
            token_in: "0xb1".into(),
            token_out: "0xB3".into(),
            amount_in,
            min_amount_out: 1,
        }
    }

    fn prove(right: &ExecutionRight, p: &SwapParams) -> SwapProof {
        ProofEngine::default().prove_swap_at(right, p, now()).unwrap()
    }

    #[test]
    fn compliant_swap_attests_everything() {
        let proof = prove(&right(), &params("0xa2", 500));
        assert!(proof.attestations.all_true());
        assert_eq!(proof.proof.public_signals.len(), 9);
    }

    #[test]
    fn signal_bits_mirror_attestations() {
        for adapter in ["0xa1", "0xc9"] {
            for amount in [10, 5_000] {
                let proof = prove(&right(), &params(adapter, amount));
                let decoded: Vec<bool> = proof
                    .proof
                    .attestation_signals()
                    .into_iter()
                    .map(Option::unwrap)
                    .collect();
                assert_eq!(decoded, proof.attestations.bits());
            }
        }
    }

    #[test]
    fn unknown_adapter_is_not_an_error() {
        let proof = prove(&right(), &params("0xc9", 500));
        assert!(!proof.attestations.adapter_allowed);
        assert!(proof.attestations.assets_allowed);
    }

    #[test]
    fn token_out_must_be_allowed() {
        let mut p = params("0xa1", 500);
        p.token_out = "0xdd".into();
        assert!(!prove(&right(), &p).attestations.assets_allowed);
    }

    #[test]
    fn amount_bounded_by_position_and_capital() {
        assert!(prove(&right(), &params("0xa1", 1_000)).attestations.amount_within_limit);
        assert!(!prove(&right(), &params("0xa1", 1_001)).attestations.amount_within_limit);

        let mut poor = right();
        poor.available_capital = 300;
        assert!(!prove(&poor, &params("0xa1", 500)).attestations.amount_within_limit);
    }

    #[test]
    fn dead_right_attests_nothing() {
        let mut expired = right();
        expired.status = RightStatus::Expired;
        let proof = prove(&expired, &params("0xa1", 10));
        assert!(proof.attestations.bits().iter().all(|b| !b));

        let mut lapsed = right();
        lapsed.expires_at = now();
        assert!(!prove(&lapsed, &params("0xa1", 10)).attestations.adapter_allowed);
    }

    #[test]
    fn malformed_address_aborts() {
        let err = ProofEngine::default()
            .prove_swap_at(&right(), &params("0xnot-hex", 10), now())
            .unwrap_err();
        assert!(matches!(err, ProofError::Encoding(_)));
    }

    #[test]
    fn roots_sit_after_the_header() {
        let proof = prove(&right(), &params("0xa1", 10));
        let layout = SignalLayout::for_action(ActionType::Swap);
        assert_eq!(
            proof.proof.signal(layout.roots_offset()),
            Some(proof.public_inputs.adapter_root)
        );
        assert_eq!(proof.proof.roots().unwrap().len(), 2);
    }
}
