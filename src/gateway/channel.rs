//! Gateway channel establishment.
//!
//! # Responsibilities
//! - Read the organization's peer TLS root certificate
//! - Open a TLS gRPC channel to the configured gateway endpoint
//! - Override the TLS server name with the peer's certificate hostname
//!
//! The channel is created per submission and dropped with the session;
//! nothing is pooled or reused across requests.

use std::fs;
use std::time::Duration;

use tonic::transport::{Certificate, Channel, ClientTlsConfig};

use crate::config::GatewayConfig;
use crate::identity::{CredentialError, CryptoLayout};
use crate::gateway::types::{GatewayError, GatewayResult};

/// Open a TLS channel to the gateway peer for one organization.
///
/// The endpoint is a fixed address from configuration; the peer's hostname
/// from the crypto layout is substituted for TLS name verification, matching
/// how the test network exposes peers on localhost ports.
pub async fn open_channel(
    config: &GatewayConfig,
    layout: &CryptoLayout,
) -> GatewayResult<Channel> {
    let tls_cert_path = layout.tls_cert_path();
    let tls_root = fs::read(&tls_cert_path).map_err(|source| {
        GatewayError::Credentials(CredentialError::Io {
            path: tls_cert_path.clone(),
            source,
        })
    })?;

    let host_alias = layout.peer_host_alias();
    let tls = ClientTlsConfig::new()
        .ca_certificate(Certificate::from_pem(tls_root))
        .domain_name(&host_alias);

    let channel = Channel::from_shared(format!("https://{}", config.endpoint))
        .map_err(|e| GatewayError::InvalidEndpoint(e.to_string()))?
        .tls_config(tls)?
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect()
        .await?;

    tracing::info!(
        endpoint = %config.endpoint,
        host_alias = %host_alias,
        "gateway channel established"
    );

    Ok(channel)
}
