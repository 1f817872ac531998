//! # ert-state — Execution State
//!
//! - **Lifecycle** (`lifecycle.rs`): the runtime-checked phases a single
//!   execution request moves through, with a transition log.
//! - **History** (`history.rs`): the bounded most-recent-first store of
//!   finished requests.
//!
//! Neither holds private action parameters.

pub mod history;
pub mod lifecycle;

pub use history::{HistoryEntry, HistoryStatus, HistoryStore, DEFAULT_HISTORY_CAPACITY};
pub use lifecycle::{ExecutionLifecycle, ExecutionPhase, PhaseTransition};
