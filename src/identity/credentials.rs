//! Client identity loading.
//!
//! An identity is an MSP id plus the raw bytes of an enrollment certificate.
//! It is read fresh for every submission and discarded afterwards; nothing is
//! cached across calls.

use std::fs;
use std::path::PathBuf;

use prost::Message;
use thiserror::Error;

use crate::gateway::proto::msp::SerializedIdentity;
use crate::identity::layout::CryptoLayout;

/// Errors raised while loading certificates or private keys from disk.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// A credential file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The keystore directory exists but contains no entries.
    #[error("keystore {0} contains no private key")]
    EmptyKeystore(PathBuf),

    /// The private key file was found but could not be parsed.
    #[error("invalid private key in {path}: {reason}")]
    InvalidKey { path: PathBuf, reason: String },
}

/// A client identity: membership namespace plus certificate bytes.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Membership Service Provider id naming the organizational namespace.
    pub msp_id: String,
    /// Raw PEM bytes of the enrollment certificate.
    pub credentials: Vec<u8>,
}

impl Identity {
    /// Load the organization user's certificate from the crypto layout.
    ///
    /// The certificate is not validated against the private key; the ledger
    /// rejects mismatched signatures at endorsement time.
    pub fn load(layout: &CryptoLayout, msp_id: &str) -> Result<Self, CredentialError> {
        let path = layout.sign_cert_path();
        let credentials = fs::read(&path).map_err(|source| CredentialError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(msp_id = %msp_id, cert = %path.display(), "identity loaded");

        Ok(Self {
            msp_id: msp_id.to_string(),
            credentials,
        })
    }

    /// Serialize to the ledger's wire form, used as the transaction creator
    /// and as the requestor identity on commit-status calls.
    pub fn to_wire(&self) -> Vec<u8> {
        SerializedIdentity {
            mspid: self.msp_id.clone(),
            id_bytes: self.credentials.clone(),
        }
        .encode_to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn scratch_layout(domain: &str) -> (PathBuf, CryptoLayout) {
        let root = std::env::temp_dir().join(format!("bridge-identity-{}", uuid::Uuid::new_v4()));
        let layout = CryptoLayout::new(&root, domain);
        (root, layout)
    }

    #[test]
    fn loads_msp_id_and_exact_cert_bytes() {
        let (root, layout) = scratch_layout("agency.example.com");
        let cert_path = layout.sign_cert_path();
        fs::create_dir_all(cert_path.parent().unwrap()).unwrap();
        fs::write(&cert_path, b"-----BEGIN CERTIFICATE-----\nabc\n").unwrap();

        let identity = Identity::load(&layout, "AgencyMSP").unwrap();
        assert_eq!(identity.msp_id, "AgencyMSP");
        assert_eq!(identity.credentials, b"-----BEGIN CERTIFICATE-----\nabc\n");

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn missing_cert_reports_path() {
        let layout = CryptoLayout::new(Path::new("/nonexistent"), "agency.example.com");
        let err = Identity::load(&layout, "AgencyMSP").unwrap_err();
        assert!(err.to_string().contains("signcerts"));
    }

    #[test]
    fn wire_form_round_trips() {
        let identity = Identity {
            msp_id: "AgencyMSP".to_string(),
            credentials: b"cert".to_vec(),
        };
        let decoded = SerializedIdentity::decode(identity.to_wire().as_slice()).unwrap();
        assert_eq!(decoded.mspid, "AgencyMSP");
        assert_eq!(decoded.id_bytes, b"cert");
    }
}
