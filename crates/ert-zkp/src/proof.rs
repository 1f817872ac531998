//! # Proof Data Model
//!
//! What a `prove_*` call returns and a verifier consumes:
//!
//! - [`ProofData`]: protocol label, commitments, the proof triple, the
//!   ordered public signals, and a digest over triple and signals.
//! - Typed public inputs per action, each bound to fixed signal positions.
//! - Attestation records per action, each mirrored by one 0/1 signal.
//! - [`Proof`]: the three together, aliased per action.
//!
//! All of it is public. Private parameters never appear here.

use ert_core::{ActionType, ErtId, Timestamp};
use ert_crypto::{hash_fields, FieldElement};
use serde::{Deserialize, Serialize};

use crate::layout::{SignalLayout, ERT_ID, TIMESTAMP};
use crate::traits::{PseudoProof, VerifyError};

// ---------------------------------------------------------------------------
// Proof envelope
// ---------------------------------------------------------------------------

/// The public proof envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofData {
    /// Name of the backend that produced the triple.
    pub protocol: String,
    /// Action the proof attests.
    pub action: ActionType,
    /// Commitment to the right identifier.
    pub ownership_commitment: FieldElement,
    /// Commitment to the action's private parameters.
    pub action_commitment: FieldElement,
    /// Two elements.
    pub pi_a: Vec<FieldElement>,
    /// Two by two.
    pub pi_b: Vec<Vec<FieldElement>>,
    /// Two elements.
    pub pi_c: Vec<FieldElement>,
    /// Ordered public signals.
    pub public_signals: Vec<FieldElement>,
    /// `0x` + 64 lowercase hex digits over the triple and the signals.
    pub proof_hash: String,
}

/// Digest binding a triple to its public signals.
pub fn compute_proof_hash(
    pi_a: &[FieldElement],
    pi_b: &[Vec<FieldElement>],
    pi_c: &[FieldElement],
    public_signals: &[FieldElement],
) -> String {
    let words: Vec<FieldElement> = pi_a
        .iter()
        .chain(pi_b.iter().flatten())
        .chain(pi_c)
        .chain(public_signals)
        .copied()
        .collect();
    hash_fields(&words).to_hex()
}

/// Whether `s` is `0x` followed by exactly 64 lowercase hex digits.
pub fn is_well_formed_hash(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(|d| {
        d.len() == 64 && d.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    })
}

impl ProofData {
    /// Wrap a backend triple and compute the digest.
    pub fn new(
        protocol: &str,
        action: ActionType,
        ownership_commitment: FieldElement,
        action_commitment: FieldElement,
        triple: &PseudoProof,
        public_signals: Vec<FieldElement>,
    ) -> Self {
        let pi_a = triple.pi_a.to_vec();
        let pi_b: Vec<Vec<FieldElement>> = triple.pi_b.iter().map(|row| row.to_vec()).collect();
        let pi_c = triple.pi_c.to_vec();
        let proof_hash = compute_proof_hash(&pi_a, &pi_b, &pi_c, &public_signals);
        Self {
            protocol: protocol.to_string(),
            action,
            ownership_commitment,
            action_commitment,
            pi_a,
            pi_b,
            pi_c,
            public_signals,
            proof_hash,
        }
    }

    /// Recompute the digest from the current triple and signals.
    pub fn recompute_hash(&self) -> String {
        compute_proof_hash(&self.pi_a, &self.pi_b, &self.pi_c, &self.public_signals)
    }

    /// The triple with fixed arities.
    ///
    /// # Errors
    ///
    /// [`VerifyError::MalformedProof`] if any component has the wrong shape.
    pub fn triple(&self) -> Result<PseudoProof, VerifyError> {
        fn pair(v: &[FieldElement], name: &str) -> Result<[FieldElement; 2], VerifyError> {
            <[FieldElement; 2]>::try_from(v).map_err(|_| {
                VerifyError::MalformedProof(format!("{name} has {} elements, expected 2", v.len()))
            })
        }
        if self.pi_b.len() != 2 {
            return Err(VerifyError::MalformedProof(format!(
                "pi_b has {} rows, expected 2",
                self.pi_b.len()
            )));
        }
        Ok(PseudoProof {
            pi_a: pair(&self.pi_a, "pi_a")?,
            pi_b: [pair(&self.pi_b[0], "pi_b[0]")?, pair(&self.pi_b[1], "pi_b[1]")?],
            pi_c: pair(&self.pi_c, "pi_c")?,
        })
    }

    /// Signal at `index`, if present.
    pub fn signal(&self, index: usize) -> Option<FieldElement> {
        self.public_signals.get(index).copied()
    }

    /// Allow-list roots, if the signals have the action's layout.
    pub fn roots(&self) -> Option<&[FieldElement]> {
        let layout = SignalLayout::for_action(self.action);
        let start = layout.roots_offset();
        self.public_signals.get(start..start + layout.roots)
    }

    /// Decoded attestation bits. `None` at a position holding anything
    /// other than 0 or 1.
    pub fn attestation_signals(&self) -> Vec<Option<bool>> {
        let layout = SignalLayout::for_action(self.action);
        (0..layout.attestations)
            .map(|i| {
                self.signal(layout.attestation_offset() + i)
                    .and_then(|f| f.to_bool())
            })
            .collect()
    }

    /// Bytes handed to a downstream executor: the triple's words, in
    /// `pi_a, pi_b, pi_c` order.
    pub fn to_calldata(&self) -> Vec<u8> {
        self.pi_a
            .iter()
            .chain(self.pi_b.iter().flatten())
            .chain(&self.pi_c)
            .flat_map(|f| f.to_be_bytes())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Typed public inputs
// ---------------------------------------------------------------------------

/// Public inputs shared by every layout's header.
pub trait PublicInputs {
    /// Right identifier.
    fn ert_id(&self) -> ErtId;
    /// Proof timestamp.
    fn timestamp(&self) -> Timestamp;
    /// Values bound to signals after the header, as `(index, value)`.
    fn bound_values(&self, layout: &SignalLayout) -> Vec<(usize, FieldElement)>;

    /// Every bound `(index, value)`, header included.
    fn bindings(&self, layout: &SignalLayout) -> Vec<(usize, FieldElement)> {
        let mut out = vec![
            (ERT_ID, FieldElement::from_u64(self.ert_id().value())),
            (TIMESTAMP, timestamp_to_field(self.timestamp())),
        ];
        out.extend(self.bound_values(layout));
        out
    }
}

/// Epoch seconds as a two's-complement field element.
pub fn timestamp_to_field(ts: Timestamp) -> FieldElement {
    FieldElement::from_i128(i128::from(ts.epoch_secs()))
}

/// 128-bit amounts as decimal strings. Tagged enums buffer numbers as
/// 64-bit values, so wider integers cannot travel as JSON numbers.
mod decimal {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(D::Error::custom)
    }
}

/// Public inputs of a swap or yield proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterPublicInputs {
    /// Right identifier.
    pub ert_id: ErtId,
    /// Proof timestamp.
    pub timestamp: Timestamp,
    /// Root over the right's adapters.
    pub adapter_root: FieldElement,
    /// Root over the right's assets.
    pub asset_root: FieldElement,
}

impl PublicInputs for AdapterPublicInputs {
    fn ert_id(&self) -> ErtId {
        self.ert_id
    }
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
    fn bound_values(&self, layout: &SignalLayout) -> Vec<(usize, FieldElement)> {
        let r = layout.roots_offset();
        vec![(r, self.adapter_root), (r + 1, self.asset_root)]
    }
}

/// Public inputs of a swap proof.
pub type SwapPublicInputs = AdapterPublicInputs;
/// Public inputs of a yield proof.
pub type YieldPublicInputs = AdapterPublicInputs;

/// Public inputs of a perpetual proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpetualPublicInputs {
    /// Right identifier.
    pub ert_id: ErtId,
    /// Proof timestamp.
    pub timestamp: Timestamp,
    /// Root over the right's assets (markets).
    pub market_root: FieldElement,
    /// Right's leverage cap.
    pub max_leverage: u32,
    /// Right's position size cap.
    #[serde(with = "decimal")]
    pub max_position_size: u128,
}

impl PublicInputs for PerpetualPublicInputs {
    fn ert_id(&self) -> ErtId {
        self.ert_id
    }
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
    fn bound_values(&self, layout: &SignalLayout) -> Vec<(usize, FieldElement)> {
        let p = layout.public_values_offset();
        vec![
            (layout.roots_offset(), self.market_root),
            (p, FieldElement::from_u64(u64::from(self.max_leverage))),
            (p + 1, FieldElement::from_u128(self.max_position_size)),
        ]
    }
}

/// Public inputs of a settlement proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPublicInputs {
    /// Right identifier.
    pub ert_id: ErtId,
    /// Proof timestamp.
    pub timestamp: Timestamp,
    /// Capital the right started with.
    #[serde(with = "decimal")]
    pub starting_capital: u128,
    /// Capital at settlement.
    #[serde(with = "decimal")]
    pub ending_capital: u128,
    /// `ending - starting`; negative on a loss.
    #[serde(with = "decimal")]
    pub pnl: i128,
    /// Base fee plus performance fee.
    #[serde(with = "decimal")]
    pub lp_share: i128,
    /// `ending - lp_share`.
    #[serde(with = "decimal")]
    pub executor_share: i128,
}

impl PublicInputs for SettlementPublicInputs {
    fn ert_id(&self) -> ErtId {
        self.ert_id
    }
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
    fn bound_values(&self, layout: &SignalLayout) -> Vec<(usize, FieldElement)> {
        let p = layout.public_values_offset();
        vec![
            (p, FieldElement::from_u128(self.starting_capital)),
            (p + 1, FieldElement::from_u128(self.ending_capital)),
            (p + 2, FieldElement::from_i128(self.pnl)),
            (p + 3, FieldElement::from_i128(self.lp_share)),
            (p + 4, FieldElement::from_i128(self.executor_share)),
        ]
    }
}

// ---------------------------------------------------------------------------
// Attestations
// ---------------------------------------------------------------------------

/// A set of attestation flags, in signal order.
pub trait AttestationSet {
    /// Flag names, in signal order.
    const LABELS: &'static [&'static str];

    /// Flag values, in signal order.
    fn bits(&self) -> Vec<bool>;

    /// Whether every flag holds.
    fn all_true(&self) -> bool {
        self.bits().iter().all(|b| *b)
    }
}

/// Swap attestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapAttestations {
    /// Adapter is in the right's adapter allow-list.
    pub adapter_allowed: bool,
    /// Both tokens are in the right's asset allow-list.
    pub assets_allowed: bool,
    /// Amount is within the position cap and the available capital.
    pub amount_within_limit: bool,
}

impl AttestationSet for SwapAttestations {
    const LABELS: &'static [&'static str] =
        &["adapter_allowed", "assets_allowed", "amount_within_limit"];

    fn bits(&self) -> Vec<bool> {
        vec![self.adapter_allowed, self.assets_allowed, self.amount_within_limit]
    }
}

/// Yield attestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldAttestations {
    /// Adapter is in the right's adapter allow-list.
    pub adapter_allowed: bool,
    /// Asset is in the right's asset allow-list.
    pub asset_allowed: bool,
    /// Amount is within the position cap and the available capital.
    pub amount_within_limit: bool,
}

impl AttestationSet for YieldAttestations {
    const LABELS: &'static [&'static str] =
        &["adapter_allowed", "asset_allowed", "amount_within_limit"];

    fn bits(&self) -> Vec<bool> {
        vec![self.adapter_allowed, self.asset_allowed, self.amount_within_limit]
    }
}

/// Perpetual attestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpetualAttestations {
    /// `1 <= leverage <= max_leverage`.
    pub leverage_within_limit: bool,
    /// `size <= max_position_size`.
    pub size_within_limit: bool,
    /// Market is in the right's asset allow-list.
    pub market_allowed: bool,
}

impl AttestationSet for PerpetualAttestations {
    const LABELS: &'static [&'static str] =
        &["leverage_within_limit", "size_within_limit", "market_allowed"];

    fn bits(&self) -> Vec<bool> {
        vec![self.leverage_within_limit, self.size_within_limit, self.market_allowed]
    }
}

/// Settlement attestations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementAttestations {
    /// `ending - starting == pnl`.
    pub pnl_calculated_correctly: bool,
    /// `lp_share + executor_share == ending`.
    pub fee_distribution_correct: bool,
}

impl AttestationSet for SettlementAttestations {
    const LABELS: &'static [&'static str] =
        &["pnl_calculated_correctly", "fee_distribution_correct"];

    fn bits(&self) -> Vec<bool> {
        vec![self.pnl_calculated_correctly, self.fee_distribution_correct]
    }
}

// ---------------------------------------------------------------------------
// Proofs
// ---------------------------------------------------------------------------

/// A proof with typed public inputs and attestations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof<P, A> {
    /// Public envelope.
    pub proof: ProofData,
    /// Typed public inputs.
    pub public_inputs: P,
    /// Attestation records.
    pub attestations: A,
}

/// Swap proof.
pub type SwapProof = Proof<SwapPublicInputs, SwapAttestations>;
/// Yield proof.
pub type YieldProof = Proof<YieldPublicInputs, YieldAttestations>;
/// Perpetual proof.
pub type PerpetualProof = Proof<PerpetualPublicInputs, PerpetualAttestations>;
/// Settlement proof.
pub type SettlementProof = Proof<SettlementPublicInputs, SettlementAttestations>;

/// Any proof, tagged by action for storage and transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionProof {
    /// Swap.
    Swap(SwapProof),
    /// Yield deposit or withdrawal.
    Yield(YieldProof),
    /// Perpetual position.
    Perpetual(PerpetualProof),
    /// Settlement.
    Settlement(SettlementProof),
}

impl ActionProof {
    /// The action the variant represents.
    pub fn action(&self) -> ActionType {
        match self {
            Self::Swap(_) => ActionType::Swap,
            Self::Yield(_) => ActionType::Yield,
            Self::Perpetual(_) => ActionType::Perpetual,
            Self::Settlement(_) => ActionType::Settlement,
        }
    }

    /// The public envelope.
    pub fn data(&self) -> &ProofData {
        match self {
            Self::Swap(p) => &p.proof,
            Self::Yield(p) => &p.proof,
            Self::Perpetual(p) => &p.proof,
            Self::Settlement(p) => &p.proof,
        }
    }

    /// Mutable envelope, for tests that tamper with signals.
    pub fn data_mut(&mut self) -> &mut ProofData {
        match self {
            Self::Swap(p) => &mut p.proof,
            Self::Yield(p) => &mut p.proof,
            Self::Perpetual(p) => &mut p.proof,
            Self::Settlement(p) => &mut p.proof,
        }
    }

    /// Right identifier from the typed public inputs.
    pub fn ert_id(&self) -> ErtId {
        match self {
            Self::Swap(p) => p.public_inputs.ert_id,
            Self::Yield(p) => p.public_inputs.ert_id,
            Self::Perpetual(p) => p.public_inputs.ert_id,
            Self::Settlement(p) => p.public_inputs.ert_id,
        }
    }

    /// `(label, value)` for every attestation record.
    pub fn attestation_records(&self) -> Vec<(&'static str, bool)> {
        fn zip<A: AttestationSet>(a: &A) -> Vec<(&'static str, bool)> {
            A::LABELS.iter().copied().zip(a.bits()).collect()
        }
        match self {
            Self::Swap(p) => zip(&p.attestations),
            Self::Yield(p) => zip(&p.attestations),
            Self::Perpetual(p) => zip(&p.attestations),
            Self::Settlement(p) => zip(&p.attestations),
        }
    }

    /// Signal bindings of the typed public inputs.
    pub fn public_bindings(&self) -> Vec<(usize, FieldElement)> {
        let layout = SignalLayout::for_action(self.action());
        match self {
            Self::Swap(p) => p.public_inputs.bindings(&layout),
            Self::Yield(p) => p.public_inputs.bindings(&layout),
            Self::Perpetual(p) => p.public_inputs.bindings(&layout),
            Self::Settlement(p) => p.public_inputs.bindings(&layout),
        }
    }

    /// Digest of the envelope.
    pub fn proof_hash(&self) -> &str {
        &self.data().proof_hash
    }
}

impl From<SwapProof> for ActionProof {
    fn from(p: SwapProof) -> Self {
        Self::Swap(p)
    }
}

impl From<YieldProof> for ActionProof {
    fn from(p: YieldProof) -> Self {
        Self::Yield(p)
    }
}

impl From<PerpetualProof> for ActionProof {
    fn from(p: PerpetualProof) -> Self {
        Self::Perpetual(p)
    }
}

impl From<SettlementProof> for ActionProof {
    fn from(p: SettlementProof) -> Self {
        Self::Settlement(p)
    }
}
