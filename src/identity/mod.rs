//! Identity and credential loading subsystem.
//!
//! # Data Flow
//! ```text
//! organization domain (lower-cased by caller)
//!     → layout.rs (derive cert / keystore / TLS paths)
//!     → credentials.rs (Identity: MSP id + cert bytes)
//!     → signer.rs (TransactionSigner from first keystore entry)
//!     → consumed by one gateway session, then dropped
//! ```
//!
//! # Design Decisions
//! - Credentials are loaded fresh per submission; no cache, no pooling
//! - No check that certificate and key belong together; the ledger rejects
//!   mismatches at endorsement time

pub mod credentials;
pub mod layout;
pub mod signer;

pub use credentials::{CredentialError, Identity};
pub use layout::CryptoLayout;
pub use signer::TransactionSigner;
