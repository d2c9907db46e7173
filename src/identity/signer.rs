//! Transaction signing.
//!
//! The ledger expects ECDSA P-256 signatures over a SHA-256 digest, DER
//! encoded, with the `s` component normalized to the low half of the curve
//! order. Peers reject high-S signatures, so normalization is not optional.

use std::fs;
use std::path::Path;

use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use p256::pkcs8::DecodePrivateKey;

use crate::identity::credentials::CredentialError;
use crate::identity::layout::CryptoLayout;

/// Signing capability derived from a private key file. Built once per
/// submission and discarded with the session.
pub struct TransactionSigner {
    key: SigningKey,
}

impl TransactionSigner {
    /// Load the private key from the layout's keystore directory.
    ///
    /// The first directory entry is used, matching the key material the
    /// ledger tooling writes there (a single PKCS#8 PEM file with a
    /// generated name). Fails if the directory is empty.
    pub fn from_keystore(layout: &CryptoLayout) -> Result<Self, CredentialError> {
        let dir = layout.keystore_dir();
        let entries = fs::read_dir(&dir).map_err(|source| CredentialError::Io {
            path: dir.clone(),
            source,
        })?;

        let first = entries
            .filter_map(|entry| entry.ok())
            .next()
            .ok_or_else(|| CredentialError::EmptyKeystore(dir.clone()))?;

        Self::from_pem_file(&first.path())
    }

    /// Load a signer from a single PKCS#8 PEM file.
    pub fn from_pem_file(path: &Path) -> Result<Self, CredentialError> {
        let pem = fs::read_to_string(path).map_err(|source| CredentialError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let key =
            SigningKey::from_pkcs8_pem(&pem).map_err(|e| CredentialError::InvalidKey {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(Self { key })
    }

    /// Sign a message: SHA-256 digest, ECDSA P-256, low-S, DER.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.key.sign(message);
        let signature = signature.normalize_s().unwrap_or(signature);
        signature.to_der().as_bytes().to_vec()
    }
}

impl std::fmt::Debug for TransactionSigner {
    // Key material must never appear in logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionSigner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::ecdsa::signature::Verifier;
    use p256::ecdsa::VerifyingKey;
    use p256::pkcs8::{EncodePrivateKey, LineEnding};
    use p256::SecretKey;
    use std::path::PathBuf;

    fn scratch_keystore() -> (PathBuf, CryptoLayout) {
        let root = std::env::temp_dir().join(format!("bridge-signer-{}", uuid::Uuid::new_v4()));
        let layout = CryptoLayout::new(&root, "agency.example.com");
        fs::create_dir_all(layout.keystore_dir()).unwrap();
        (root, layout)
    }

    fn write_key(layout: &CryptoLayout, name: &str) -> SecretKey {
        let secret = SecretKey::random(&mut rand::thread_rng());
        let pem = secret.to_pkcs8_pem(LineEnding::LF).unwrap();
        fs::write(layout.keystore_dir().join(name), pem.as_bytes()).unwrap();
        secret
    }

    #[test]
    fn signs_verifiably_with_low_s() {
        let (root, layout) = scratch_keystore();
        let secret = write_key(&layout, "priv_sk");

        let signer = TransactionSigner::from_keystore(&layout).unwrap();
        let message = b"proposal bytes";
        let der = signer.sign(message);

        let signature = Signature::from_der(&der).unwrap();
        assert!(signature.normalize_s().is_none(), "signature must be low-S");

        let verifying = VerifyingKey::from(secret.public_key());
        verifying.verify(message, &signature).unwrap();

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn empty_keystore_is_an_error() {
        let (root, layout) = scratch_keystore();
        let err = TransactionSigner::from_keystore(&layout).unwrap_err();
        assert!(matches!(err, CredentialError::EmptyKeystore(_)));
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn malformed_key_is_an_error() {
        let (root, layout) = scratch_keystore();
        fs::write(layout.keystore_dir().join("priv_sk"), "not a key").unwrap();
        let err = TransactionSigner::from_keystore(&layout).unwrap_err();
        assert!(matches!(err, CredentialError::InvalidKey { .. }));
        fs::remove_dir_all(&root).unwrap();
    }
}
