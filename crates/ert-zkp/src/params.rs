//! # Action Parameters
//!
//! The private inputs a caller supplies for each action. Addresses stay as
//! raw strings here; the proof engine encodes them, and a malformed one
//! aborts generation with an `EncodingError`.
//!
//! Enum parameters are committed as small integers: deposit 0, withdraw 1;
//! long 0, short 1.

use serde::{Deserialize, Serialize};

/// Token swap through an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParams {
    /// Adapter (router) contract.
    pub adapter: String,
    /// Token sold.
    pub token_in: String,
    /// Token bought.
    pub token_out: String,
    /// Amount sold.
    pub amount_in: u128,
    /// Slippage floor on the amount bought.
    pub min_amount_out: u128,
}

/// Direction of a yield action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldDirection {
    /// Move capital into the adapter.
    Deposit,
    /// Move capital out of the adapter.
    Withdraw,
}

impl YieldDirection {
    /// Committed integer tag.
    pub fn tag(self) -> u64 {
        match self {
            Self::Deposit => 0,
            Self::Withdraw => 1,
        }
    }
}

/// Deposit into or withdrawal from a yield adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldParams {
    /// Yield adapter (vault) contract.
    pub adapter: String,
    /// Asset moved.
    pub asset: String,
    /// Amount moved.
    pub amount: u128,
    /// Deposit or withdraw.
    pub direction: YieldDirection,
}

/// Side of a perpetual position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    /// Profit when the market rises.
    Long,
    /// Profit when the market falls.
    Short,
}

impl PositionSide {
    /// Committed integer tag.
    pub fn tag(self) -> u64 {
        match self {
            Self::Long => 0,
            Self::Short => 1,
        }
    }
}

/// Leveraged perpetual position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerpetualParams {
    /// Market (underlying asset) traded.
    pub market: String,
    /// Position size.
    pub size: u128,
    /// Leverage multiple.
    pub leverage: u32,
    /// Long or short.
    pub side: PositionSide,
}

/// Final capital figures for a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementParams {
    /// Capital the right started with.
    pub starting_capital: u128,
    /// Capital at settlement.
    pub ending_capital: u128,
}
