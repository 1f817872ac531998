//! Yield deposit and withdrawal proofs.
//!
//! Private order: `[adapter, asset, amount, direction_tag]`.

use ert_core::{ActionType, ErtId, ExecutionRight, RightsRegistry, Timestamp};
use ert_crypto::{address_to_field, prove_membership, FieldElement};

use super::{amount_within_limits, encode_allow_list, fetch_right, inclusion_paths, Draft, ProofEngine};
use crate::params::YieldParams;
use crate::proof::{AttestationSet, Proof, YieldAttestations, YieldProof, YieldPublicInputs};
use crate::traits::ProofError;

impl ProofEngine {
    /// Prove a yield action against `right` at the current time.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if an address parameter is malformed.
    pub fn prove_yield(&self, right: &ExecutionRight, params: &YieldParams) -> Result<YieldProof, ProofError> {
        self.prove_yield_at(right, params, Timestamp::now())
    }

    /// Prove a yield action against `right` as of `now`.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if an address parameter is malformed.
    pub fn prove_yield_at(
        &self,
        right: &ExecutionRight,
        params: &YieldParams,
        now: Timestamp,
    ) -> Result<YieldProof, ProofError> {
        let adapter = address_to_field(&params.adapter)?;
        let asset = address_to_field(&params.asset)?;
        let private_values = vec![
            adapter,
            asset,
            FieldElement::from_u128(params.amount),
            FieldElement::from_u64(params.direction.tag()),
        ];

        let adapter_check = prove_membership(adapter, &encode_allow_list(&right.allowed_adapters));
        let asset_check = prove_membership(asset, &encode_allow_list(&right.allowed_assets));

        let live = right.is_live(now);
        let attestations = YieldAttestations {
            adapter_allowed: live && adapter_check.included,
            asset_allowed: live && asset_check.included,
            amount_within_limit: live && amount_within_limits(right, params.amount),
        };
        let public_inputs = YieldPublicInputs {
            ert_id: right.id,
            timestamp: now,
            adapter_root: adapter_check.root,
            asset_root: asset_check.root,
        };

        let proof = self.seal(Draft {
            action: ActionType::Yield,
            ert_id: right.id,
            timestamp: now,
            private_values,
            inclusions: inclusion_paths([&adapter_check, &asset_check]),
            roots: vec![adapter_check.root, asset_check.root],
            public_values: Vec::new(),
            bits: attestations.bits(),
        })?;

        Ok(Proof {
            proof,
            public_inputs,
            attestations,
        })
    }

    /// Fetch the right from `registry` and prove a yield action against it.
    ///
    /// `Ok(None)` when the registry cannot supply the right.
    ///
    /// # Errors
    ///
    /// As [`ProofEngine::prove_yield`].
    pub fn prove_yield_from_registry(
        &self,
        registry: &dyn RightsRegistry,
        id: ErtId,
        params: &YieldParams,
    ) -> Result<Option<YieldProof>, ProofError> {
        fetch_right(registry, id)
            .map(|right| self.prove_yield(&right, params))
            .transpose()
    }
}
