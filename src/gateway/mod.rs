//! Ledger gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TransactionRequest
//!     → submit.rs (pipeline: connect → submit → release)
//!     → channel.rs (TLS gRPC channel, hostname override)
//!     → client.rs (session: endorse → submit → commit status)
//!     → transaction.rs (proposal build / result extraction)
//!     → proto.rs (wire messages)
//! ```
//!
//! # Design Decisions
//! - One session per submission; no pooling, caching, or retry
//! - Phase budgets (evaluate 5s, endorse 15s, submit 5s, commit 60s) are
//!   startup configuration, never per-call
//! - The connector/session traits keep the pipeline testable without a
//!   running ledger

pub mod channel;
pub mod client;
pub mod proto;
pub mod submit;
pub mod transaction;
pub mod types;

pub use client::Gateway;
pub use submit::{
    FabricConnector, GatewayConnector, GatewaySession, Submitter, TransactionRequest,
    TransactionResult,
};
pub use types::{GatewayError, GatewayResult};
