#![deny(missing_docs)]

//! # ert-core — Foundational Types for the ERT Attestation Stack
//!
//! This crate is the leaf of the workspace DAG. It defines the types every
//! other layer agrees on: the execution right itself, the address and
//! identifier newtypes, the action taxonomy, UTC timestamps, the read-only
//! registry interface, and the error hierarchy.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtypes.** `Address` can only be built through
//!    [`Address::parse()`], so a right's allow-lists are always well-formed.
//!    Raw action parameters stay as strings until the proof engine encodes
//!    them, which is where malformed input must fail.
//!
//! 2. **Rights are read-only.** `ExecutionRight` is owned by an external
//!    registry. Nothing in this workspace mutates one; the
//!    [`RightsRegistry`] trait exposes lookups only.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] carries seconds precision so the
//!    value committed in a proof equals the value published in its signals.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ert-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod action;
pub mod error;
pub mod identity;
pub mod registry;
pub mod right;
pub mod temporal;

pub use action::ActionType;
pub use error::{CryptoError, EncodingError, StateError};
pub use identity::{Address, ErtId};
pub use registry::{InMemoryRegistry, RightsRegistry};
pub use right::{ExecutionRight, RightStatus};
pub use temporal::Timestamp;
