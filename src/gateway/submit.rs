//! The transaction submission pipeline.
//!
//! One submission is one sequential unit of work: connect, load credentials,
//! endorse/submit/wait for commit, decode, release. Nothing is shared between
//! concurrent submissions and nothing survives the call, so each request pays
//! full connection and credential-load cost.
//!
//! The connector/session trait pair is the seam between the pipeline and the
//! real network. Production uses [`FabricConnector`]; tests substitute mocks
//! to observe calls and release behavior.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::BridgeConfig;
use crate::gateway::channel::open_channel;
use crate::gateway::client::Gateway;
use crate::gateway::types::{GatewayError, GatewayResult};
use crate::identity::{CryptoLayout, Identity, TransactionSigner};

/// An inbound transaction submission, as posted to the HTTP endpoint.
///
/// Wire field names match the original JSON contract.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionRequest {
    /// Organization name; lower-cased to pick the credential directory.
    pub organization: String,
    /// Ledger channel (network) name.
    pub channel: String,
    /// Deployed chaincode (contract) name.
    pub chaincode: String,
    /// MSP id of the submitting identity.
    pub msp: String,
    /// Transaction name to invoke.
    #[serde(rename = "txName")]
    pub tx_name: String,
    /// Positional string arguments; may be absent or empty.
    #[serde(rename = "txParams", default)]
    pub tx_params: Vec<String>,
}

/// Raw response bytes from the ledger with lazy text/JSON views.
#[derive(Debug, Clone)]
pub struct TransactionResult {
    payload: Vec<u8>,
}

impl TransactionResult {
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// The response decoded as UTF-8 text, lossily.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// The response parsed as JSON, when well-formed. A parse failure is
    /// not an error; non-JSON payloads are returned as text.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.payload).ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }
}

/// An open session against the ledger gateway, scoped to one submission.
#[async_trait]
pub trait GatewaySession: Send {
    /// Submit a transaction and wait for commit, returning the raw result.
    async fn submit(
        &mut self,
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>>;

    /// Evaluate a transaction without committing, returning the raw result.
    async fn evaluate(
        &mut self,
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>>;

    /// Release the session and its transport resources.
    async fn close(&mut self);
}

/// Opens gateway sessions for an organization.
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    /// Open a channel and load credentials for one submission.
    async fn connect(
        &self,
        organization: &str,
        msp_id: &str,
    ) -> GatewayResult<Box<dyn GatewaySession>>;
}

/// Production connector: credentials from disk, TLS gRPC channel to the
/// configured gateway peer.
pub struct FabricConnector {
    config: BridgeConfig,
}

impl FabricConnector {
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl GatewayConnector for FabricConnector {
    async fn connect(
        &self,
        organization: &str,
        msp_id: &str,
    ) -> GatewayResult<Box<dyn GatewaySession>> {
        let domain = organization.to_lowercase();
        let layout = CryptoLayout::new(Path::new(&self.config.credentials.root_path), &domain);

        let channel = open_channel(&self.config.gateway, &layout).await?;
        let identity = Identity::load(&layout, msp_id)?;
        let signer = TransactionSigner::from_keystore(&layout)?;

        Ok(Box::new(FabricSession {
            gateway: Some(Gateway::new(channel, identity, signer, self.config.timeouts)),
        }))
    }
}

struct FabricSession {
    // Taken on close so the channel drops deterministically.
    gateway: Option<Gateway>,
}

impl FabricSession {
    fn gateway(&self) -> GatewayResult<&Gateway> {
        self.gateway
            .as_ref()
            .ok_or_else(|| GatewayError::Malformed("session already closed".into()))
    }
}

#[async_trait]
impl GatewaySession for FabricSession {
    async fn submit(
        &mut self,
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        self.gateway()?
            .network(channel)
            .contract(chaincode)
            .submit(transaction_name, args)
            .await
    }

    async fn evaluate(
        &mut self,
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        self.gateway()?
            .network(channel)
            .contract(chaincode)
            .evaluate(transaction_name, args)
            .await
    }

    async fn close(&mut self) {
        if self.gateway.take().is_some() {
            tracing::debug!("gateway session released");
        }
    }
}

/// Drives the submission pipeline end to end.
pub struct Submitter {
    connector: Arc<dyn GatewayConnector>,
}

impl Submitter {
    pub fn new(connector: Arc<dyn GatewayConnector>) -> Self {
        Self { connector }
    }

    /// Submit a transaction and wait for commit.
    ///
    /// The session opened for this call is released exactly once, whether
    /// the submission succeeds or fails. A connect failure opens no session,
    /// so there is nothing to release on that path.
    pub async fn submit(&self, request: &TransactionRequest) -> GatewayResult<TransactionResult> {
        validate(request)?;

        let mut session = self
            .connector
            .connect(&request.organization, &request.msp)
            .await?;

        let outcome = session
            .submit(
                &request.channel,
                &request.chaincode,
                &request.tx_name,
                &request.tx_params,
            )
            .await;

        session.close().await;

        let result = TransactionResult::new(outcome?);
        log_result(&request.tx_name, &result);
        Ok(result)
    }

    /// Evaluate a transaction without committing it.
    pub async fn evaluate(&self, request: &TransactionRequest) -> GatewayResult<TransactionResult> {
        validate(request)?;

        let mut session = self
            .connector
            .connect(&request.organization, &request.msp)
            .await?;

        let outcome = session
            .evaluate(
                &request.channel,
                &request.chaincode,
                &request.tx_name,
                &request.tx_params,
            )
            .await;

        session.close().await;

        let result = TransactionResult::new(outcome?);
        log_result(&request.tx_name, &result);
        Ok(result)
    }
}

fn validate(request: &TransactionRequest) -> GatewayResult<()> {
    if request.tx_name.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "txName must not be empty".into(),
        ));
    }
    Ok(())
}

fn log_result(transaction_name: &str, result: &TransactionResult) {
    match result.json() {
        Some(json) => tracing::debug!(transaction = %transaction_name, %json, "ledger result"),
        // Not JSON; log the text form and carry on.
        None => {
            tracing::debug!(transaction = %transaction_name, text = %result.text(), "ledger result")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_params_default_to_empty() {
        let request: TransactionRequest = serde_json::from_str(
            r#"{
                "organization": "Agency",
                "channel": "q1channel",
                "chaincode": "quotation",
                "msp": "AgencyMSP",
                "txName": "GetAllQuotations"
            }"#,
        )
        .unwrap();
        assert!(request.tx_params.is_empty());
    }

    #[test]
    fn result_views_tolerate_non_json() {
        let result = TransactionResult::new(b"plain text".to_vec());
        assert_eq!(result.text(), "plain text");
        assert!(result.json().is_none());

        let result = TransactionResult::new(br#"{"id":"Q-001"}"#.to_vec());
        assert_eq!(result.json().unwrap()["id"], "Q-001");
    }
}
