//! Crypto material path derivation.
//!
//! The ledger's test-network tooling generates one directory per organization
//! domain with a fixed internal shape. All paths the bridge reads are derived
//! from that shape; nothing is discovered or configured per file.

use std::path::{Path, PathBuf};

/// Resolves crypto material paths for one organization domain.
///
/// The caller is responsible for lower-casing the organization name before
/// constructing a layout; directory names on disk are lower-case domains.
#[derive(Debug, Clone)]
pub struct CryptoLayout {
    org_dir: PathBuf,
    domain: String,
}

impl CryptoLayout {
    /// Create a layout rooted at `root` for the given organization domain.
    pub fn new(root: &Path, domain: &str) -> Self {
        Self {
            org_dir: root.join(domain),
            domain: domain.to_string(),
        }
    }

    /// TLS root certificate of the organization's gateway peer:
    /// `<root>/<org>/peers/peer0.<org>/tls/ca.crt`
    pub fn tls_cert_path(&self) -> PathBuf {
        self.org_dir
            .join("peers")
            .join(format!("peer0.{}", self.domain))
            .join("tls")
            .join("ca.crt")
    }

    /// Enrollment certificate of the organization's application user:
    /// `<root>/<org>/users/User1@<org>/msp/signcerts/User1@<org>-cert.pem`
    pub fn sign_cert_path(&self) -> PathBuf {
        self.user_msp_dir()
            .join("signcerts")
            .join(format!("User1@{}-cert.pem", self.domain))
    }

    /// Keystore directory holding the user's private key:
    /// `<root>/<org>/users/User1@<org>/msp/keystore`
    pub fn keystore_dir(&self) -> PathBuf {
        self.user_msp_dir().join("keystore")
    }

    /// Hostname the gateway peer's TLS certificate is issued for. Used to
    /// override TLS name verification when dialing a fixed address.
    pub fn peer_host_alias(&self) -> String {
        format!("peer0.{}", self.domain)
    }

    fn user_msp_dir(&self) -> PathBuf {
        self.org_dir
            .join("users")
            .join(format!("User1@{}", self.domain))
            .join("msp")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_test_network_paths() {
        let layout = CryptoLayout::new(Path::new("/crypto"), "agency.quotation.com");

        assert_eq!(
            layout.tls_cert_path(),
            Path::new("/crypto/agency.quotation.com/peers/peer0.agency.quotation.com/tls/ca.crt")
        );
        assert_eq!(
            layout.sign_cert_path(),
            Path::new(
                "/crypto/agency.quotation.com/users/User1@agency.quotation.com/msp/signcerts/User1@agency.quotation.com-cert.pem"
            )
        );
        assert_eq!(
            layout.keystore_dir(),
            Path::new("/crypto/agency.quotation.com/users/User1@agency.quotation.com/msp/keystore")
        );
        assert_eq!(layout.peer_host_alias(), "peer0.agency.quotation.com");
    }
}
