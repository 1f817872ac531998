//! # ert-cli — CLI for the ERT Attestation Stack
//!
//! Provides the `ert` command-line interface.
//!
//! ## Subcommands
//!
//! - `ert prove`: Generate a proof for one action against a right.
//! - `ert verify`: Verify a proof document.
//! - `ert run`: Generate, verify, and execute through the simulated gateway.
//!
//! Rights and parameters are read from JSON or YAML (chosen by file
//! extension). Proofs are always written as JSON:
//!
//! ```bash
//! ert prove swap --right right.yaml --params swap.json --out proof.json
//! ert verify --proof proof.json
//! ert --json run settle --right right.yaml --params settle.yaml
//! ```

pub mod execute;
pub mod prove;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use ert_core::ActionType;
use serde::de::DeserializeOwned;

/// Exit code for a proof or execution that was processed but rejected.
pub const EXIT_REJECTED: u8 = 2;

/// Action selector shared by `prove` and `run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ActionArg {
    /// Token swap through an adapter.
    Swap,
    /// Yield deposit or withdrawal.
    Yield,
    /// Leveraged perpetual position.
    #[value(alias = "perpetual")]
    Perp,
    /// Settlement of the right's final capital.
    #[value(alias = "settlement")]
    Settle,
}

impl ActionArg {
    /// The corresponding action type.
    pub fn action_type(self) -> ActionType {
        match self {
            ActionArg::Swap => ActionType::Swap,
            ActionArg::Yield => ActionType::Yield,
            ActionArg::Perp => ActionType::Perpetual,
            ActionArg::Settle => ActionType::Settlement,
        }
    }
}

/// Read a JSON or YAML document. Files ending in `.yaml` or `.yml` are
/// parsed as YAML, everything else as JSON.
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}

/// Write `body` to `out`, or to stdout when no path is given.
pub fn emit(out: Option<&Path>, body: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, body)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{body}");
            Ok(())
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    pub const RIGHT_JSON: &str = r#"{
        "id": 42,
        "executor": "0x00000000000000000000000000000000000000e0",
        "available_capital": 10000,
        "allowed_adapters": ["0x00000000000000000000000000000000000000a1"],
        "allowed_assets": [
            "0x00000000000000000000000000000000000000b1",
            "0x00000000000000000000000000000000000000b2"
        ],
        "max_position_size": 1000,
        "max_leverage": 10,
        "status": "active",
        "expires_at": "2099-01-01T00:00:00Z"
    }"#;

    pub const SWAP_JSON: &str = r#"{
        "adapter": "0x00000000000000000000000000000000000000a1",
        "token_in": "0x00000000000000000000000000000000000000b1",
        "token_out": "0x00000000000000000000000000000000000000b2",
        "amount_in": 500,
        "min_amount_out": 1
    }"#;

    pub fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }
}
