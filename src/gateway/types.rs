//! Gateway error definitions.

use thiserror::Error;

use crate::identity::CredentialError;

/// Errors that can occur during a gateway submission or evaluation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The inbound request was malformed before any network work started.
    #[error("invalid transaction request: {0}")]
    InvalidRequest(String),

    /// Credential material could not be loaded.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// The configured gateway endpoint does not form a valid URI.
    #[error("invalid gateway endpoint: {0}")]
    InvalidEndpoint(String),

    /// The gRPC channel could not be established.
    #[error("gateway transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// A gateway call failed with a gRPC status.
    #[error("{phase} failed: {status}")]
    Rpc {
        phase: &'static str,
        #[source]
        status: tonic::Status,
    },

    /// A gateway call exceeded its phase budget.
    #[error("{phase} timed out after {secs}s")]
    PhaseTimeout { phase: &'static str, secs: u64 },

    /// The transaction was committed to a block but marked invalid.
    #[error("transaction {tx_id} invalidated with code {code}")]
    Invalidated { tx_id: String, code: i32 },

    /// A gateway response could not be decoded.
    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

impl From<prost::DecodeError> for GatewayError {
    fn from(e: prost::DecodeError) -> Self {
        GatewayError::Malformed(e.to_string())
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_errors_name_the_phase() {
        let err = GatewayError::PhaseTimeout {
            phase: "commit status",
            secs: 60,
        };
        assert_eq!(err.to_string(), "commit status timed out after 60s");

        let err = GatewayError::Invalidated {
            tx_id: "abc".to_string(),
            code: 11,
        };
        assert!(err.to_string().contains("code 11"));
    }
}
