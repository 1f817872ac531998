//! Settlement proofs.
//!
//! A settlement proof attests arithmetic, not compliance:
//!
//! ```text
//! pnl             = ending - starting
//! base_fee        = starting * 200 / 10_000
//! performance_fee = pnl * 2_000 / 10_000   if pnl > 0, else 0
//! lp_share        = base_fee + performance_fee
//! executor_share  = ending - lp_share
//! ```
//!
//! Division floors. All arithmetic is checked; a capital figure too large
//! for signed 128-bit arithmetic is an encoding error.
//!
//! Private order: `[starting, ending, pnl, lp_share, executor_share]`.

use ert_core::{ActionType, EncodingError, ErtId, ExecutionRight, RightsRegistry, Timestamp};
use ert_crypto::FieldElement;
use serde::{Deserialize, Serialize};

use super::{fetch_right, Draft, ProofEngine};
use crate::params::SettlementParams;
use crate::proof::{
    AttestationSet, Proof, SettlementAttestations, SettlementProof, SettlementPublicInputs,
};
use crate::traits::ProofError;

/// Base fee on starting capital, in basis points.
pub const BASE_FEE_BPS: i128 = 200;
/// Performance fee on positive PnL, in basis points.
pub const PERFORMANCE_FEE_BPS: i128 = 2_000;
/// Basis-point denominator.
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Every figure of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    /// Capital the right started with.
    pub starting_capital: u128,
    /// Capital at settlement.
    pub ending_capital: u128,
    /// `ending - starting`.
    pub pnl: i128,
    /// 200 bps of starting capital.
    pub base_fee: i128,
    /// 2000 bps of positive PnL.
    pub performance_fee: i128,
    /// Paid to liquidity providers.
    pub lp_share: i128,
    /// Left to the executor.
    pub executor_share: i128,
}

fn signed(parameter: &str, v: u128) -> Result<i128, EncodingError> {
    i128::try_from(v).map_err(|_| EncodingError::ValueOutOfRange {
        parameter: parameter.to_string(),
        reason: format!("{v} exceeds signed 128-bit range"),
    })
}

fn overflow(parameter: &str) -> EncodingError {
    EncodingError::ValueOutOfRange {
        parameter: parameter.to_string(),
        reason: "arithmetic overflow".to_string(),
    }
}

/// `(base_fee, performance_fee)` for a starting capital and PnL.
fn fees(starting: i128, pnl: i128) -> Option<(i128, i128)> {
    let base = starting.checked_mul(BASE_FEE_BPS)? / BPS_DENOMINATOR;
    let performance = if pnl > 0 {
        pnl.checked_mul(PERFORMANCE_FEE_BPS)? / BPS_DENOMINATOR
    } else {
        0
    };
    Some((base, performance))
}

impl SettlementBreakdown {
    /// Derive every figure from the two capital values.
    ///
    /// # Errors
    ///
    /// [`EncodingError::ValueOutOfRange`] on overflow.
    pub fn compute(starting_capital: u128, ending_capital: u128) -> Result<Self, EncodingError> {
        let starting = signed("starting_capital", starting_capital)?;
        let ending = signed("ending_capital", ending_capital)?;
        let pnl = ending.checked_sub(starting).ok_or_else(|| overflow("pnl"))?;
        let (base_fee, performance_fee) = fees(starting, pnl).ok_or_else(|| overflow("fees"))?;
        let lp_share = base_fee
            .checked_add(performance_fee)
            .ok_or_else(|| overflow("lp_share"))?;
        let executor_share = ending
            .checked_sub(lp_share)
            .ok_or_else(|| overflow("executor_share"))?;
        Ok(Self {
            starting_capital,
            ending_capital,
            pnl,
            base_fee,
            performance_fee,
            lp_share,
            executor_share,
        })
    }
}

/// `ending - starting == pnl`.
pub fn pnl_balances(starting: u128, ending: u128, pnl: i128) -> bool {
    let (Ok(s), Ok(e)) = (i128::try_from(starting), i128::try_from(ending)) else {
        return false;
    };
    e.checked_sub(s) == Some(pnl)
}

/// `lp_share` equals the fees owed on `starting` and `pnl`, and
/// `lp_share + executor_share == ending`.
pub fn fees_balance(starting: u128, ending: u128, pnl: i128, lp_share: i128, executor_share: i128) -> bool {
    let (Ok(s), Ok(e)) = (i128::try_from(starting), i128::try_from(ending)) else {
        return false;
    };
    let owed = fees(s, pnl).and_then(|(base, perf)| base.checked_add(perf));
    owed == Some(lp_share) && lp_share.checked_add(executor_share) == Some(e)
}

impl ProofEngine {
    /// Prove a settlement for `right` at the current time.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if the capital figures overflow.
    pub fn prove_settlement(
        &self,
        right: &ExecutionRight,
        params: &SettlementParams,
    ) -> Result<SettlementProof, ProofError> {
        self.prove_settlement_at(right, params, Timestamp::now())
    }

    /// Prove a settlement for `right` as of `now`.
    ///
    /// # Errors
    ///
    /// [`ProofError::Encoding`] if the capital figures overflow.
    pub fn prove_settlement_at(
        &self,
        right: &ExecutionRight,
        params: &SettlementParams,
        now: Timestamp,
    ) -> Result<SettlementProof, ProofError> {
        let b = SettlementBreakdown::compute(params.starting_capital, params.ending_capital)?;
        let values = vec![
            FieldElement::from_u128(b.starting_capital),
            FieldElement::from_u128(b.ending_capital),
            FieldElement::from_i128(b.pnl),
            FieldElement::from_i128(b.lp_share),
            FieldElement::from_i128(b.executor_share),
        ];

        let attestations = SettlementAttestations {
            pnl_calculated_correctly: pnl_balances(b.starting_capital, b.ending_capital, b.pnl),
            fee_distribution_correct: fees_balance(
                b.starting_capital,
                b.ending_capital,
                b.pnl,
                b.lp_share,
                b.executor_share,
            ),
        };
        let public_inputs = SettlementPublicInputs {
            ert_id: right.id,
            timestamp: now,
            starting_capital: b.starting_capital,
            ending_capital: b.ending_capital,
            pnl: b.pnl,
            lp_share: b.lp_share,
            executor_share: b.executor_share,
        };

        let proof = self.seal(Draft {
            action: ActionType::Settlement,
            ert_id: right.id,
            timestamp: now,
            private_values: values.clone(),
            inclusions: Vec::new(),
            roots: Vec::new(),
            public_values: values,
            bits: attestations.bits(),
        })?;

        Ok(Proof {
            proof,
            public_inputs,
            attestations,
        })
    }

    /// Fetch the right from `registry` and prove a settlement for it.
    ///
    /// `Ok(None)` when the registry cannot supply the right.
    ///
    /// # Errors
    ///
    /// As [`ProofEngine::prove_settlement`].
    pub fn prove_settlement_from_registry(
        &self,
        registry: &dyn RightsRegistry,
        id: ErtId,
        params: &SettlementParams,
    ) -> Result<Option<SettlementProof>, ProofError> {
        fetch_right(registry, id)
            .map(|right| self.prove_settlement(&right, params))
            .transpose()
    }
}
