//! # ert-executor — Execution Orchestration
//!
//! Ties the attestation layer to execution:
//!
//! - **Config** (`config.rs`): `ExecutorConfig::from_env()`.
//! - **Gateway** (`gateway.rs`): the async [`ExecutionGateway`] trait and
//!   the [`SimulatedGateway`] stand-in for on-chain submission.
//! - **Orchestrator** (`orchestrator.rs`): generate, verify, execute, and
//!   record history.

pub mod config;
pub mod gateway;
pub mod orchestrator;

pub use config::{ConfigError, ExecutorConfig};
pub use gateway::{ExecutionGateway, GatewayError, SimulatedGateway, SubmissionRequest};
pub use orchestrator::{ExecutionError, ExecutionOrchestrator, ExecutionResult};
