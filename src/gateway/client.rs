//! Gateway session client.
//!
//! # Responsibilities
//! - Drive the Gateway service RPCs (Endorse, Submit, CommitStatus, Evaluate)
//! - Enforce the per-phase timeout budgets
//! - Resolve channel (network) and contract names into submission targets
//! - Decode commit status and surface invalidated transactions as errors
//!
//! The Gateway service has no generated bindings in this tree; calls go
//! through `tonic::client::Grpc` directly with the prost codec and the
//! method paths from the service definition.

use std::future::Future;
use std::time::Duration;

use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tonic::{Request, Status};

use crate::config::TimeoutConfig;
use crate::gateway::proto::{common, gateway as pb, peer};
use crate::gateway::transaction::{extract_result, ProposedTransaction};
use crate::gateway::types::{GatewayError, GatewayResult};
use crate::identity::{Identity, TransactionSigner};

/// A gateway session bound to one channel, identity, and signer.
///
/// Sessions are created per submission and dropped afterwards; dropping the
/// session releases the underlying transport channel.
pub struct Gateway {
    channel: Channel,
    identity: Identity,
    signer: TransactionSigner,
    timeouts: TimeoutConfig,
}

impl Gateway {
    /// Bind a session to an open channel and loaded credentials.
    pub fn new(
        channel: Channel,
        identity: Identity,
        signer: TransactionSigner,
        timeouts: TimeoutConfig,
    ) -> Self {
        Self {
            channel,
            identity,
            signer,
            timeouts,
        }
    }

    /// Resolve a named channel (network) on the ledger.
    pub fn network(&self, channel_name: &str) -> Network<'_> {
        Network {
            gateway: self,
            channel_name: channel_name.to_string(),
        }
    }
}

/// A named channel on the ledger, resolved within a gateway session.
pub struct Network<'a> {
    gateway: &'a Gateway,
    channel_name: String,
}

impl Network<'_> {
    /// Resolve a named contract within this channel.
    pub fn contract(&self, chaincode_name: &str) -> Contract<'_> {
        Contract {
            gateway: self.gateway,
            channel_name: self.channel_name.clone(),
            chaincode_name: chaincode_name.to_string(),
        }
    }
}

/// A deployed contract, the target of submit and evaluate calls.
pub struct Contract<'a> {
    gateway: &'a Gateway,
    channel_name: String,
    chaincode_name: String,
}

impl Contract<'_> {
    /// Submit a transaction and block until it is committed to the ledger.
    ///
    /// Runs the endorse (15s), submit (5s), and commit-status (60s) phases
    /// under their configured budgets and returns the chaincode response
    /// payload once the ledger reports the transaction valid.
    pub async fn submit(
        &self,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        let gateway = self.gateway;
        let timeouts = &gateway.timeouts;
        let creator = gateway.identity.to_wire();

        let proposed = ProposedTransaction::new(
            &self.channel_name,
            &self.chaincode_name,
            transaction_name,
            args,
            &creator,
        )?;
        let transaction_id = proposed.transaction_id.clone();

        tracing::info!(
            channel = %self.channel_name,
            chaincode = %self.chaincode_name,
            transaction = %transaction_name,
            tx_id = %transaction_id,
            "endorsing transaction"
        );

        let mut grpc = GatewayGrpc::new(gateway.channel.clone());

        let endorse = pb::EndorseRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            proposed_transaction: Some(proposed.sign(&gateway.signer)),
            endorsing_organizations: Vec::new(),
        };
        let endorsed = with_phase_budget("endorse", timeouts.endorse_secs, grpc.endorse(endorse))
            .await?;

        let prepared = endorsed.prepared_transaction.ok_or_else(|| {
            GatewayError::Malformed("endorse response carries no prepared transaction".into())
        })?;
        let result = extract_result(&prepared.payload)?;

        let envelope = common::Envelope {
            signature: gateway.signer.sign(&prepared.payload),
            payload: prepared.payload,
        };
        let submit = pb::SubmitRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            prepared_transaction: Some(envelope),
        };
        with_phase_budget("submit", timeouts.submit_secs, grpc.submit(submit)).await?;

        let status_request = pb::CommitStatusRequest {
            transaction_id: transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            identity: creator,
        };
        let request_bytes = prost::Message::encode_to_vec(&status_request);
        let signed_status = pb::SignedCommitStatusRequest {
            signature: gateway.signer.sign(&request_bytes),
            request: request_bytes,
        };
        let status = with_phase_budget(
            "commit status",
            timeouts.commit_status_secs,
            grpc.commit_status(signed_status),
        )
        .await?;

        if status.result != peer::TX_VALIDATION_CODE_VALID {
            return Err(GatewayError::Invalidated {
                tx_id: transaction_id,
                code: status.result,
            });
        }

        tracing::info!(
            tx_id = %transaction_id,
            block = status.block_number,
            "transaction committed"
        );

        Ok(result)
    }

    /// Evaluate a transaction without submitting it for ordering.
    ///
    /// Runs only the evaluate phase (5s) and returns the query result.
    pub async fn evaluate(
        &self,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        let gateway = self.gateway;
        let creator = gateway.identity.to_wire();

        let proposed = ProposedTransaction::new(
            &self.channel_name,
            &self.chaincode_name,
            transaction_name,
            args,
            &creator,
        )?;

        tracing::info!(
            channel = %self.channel_name,
            chaincode = %self.chaincode_name,
            transaction = %transaction_name,
            tx_id = %proposed.transaction_id,
            "evaluating transaction"
        );

        let mut grpc = GatewayGrpc::new(gateway.channel.clone());
        let request = pb::EvaluateRequest {
            transaction_id: proposed.transaction_id.clone(),
            channel_id: self.channel_name.clone(),
            proposed_transaction: Some(proposed.sign(&gateway.signer)),
            target_organizations: Vec::new(),
        };

        let response = with_phase_budget(
            "evaluate",
            gateway.timeouts.evaluate_secs,
            grpc.evaluate(request),
        )
        .await?;

        let result = response
            .result
            .ok_or_else(|| GatewayError::Malformed("evaluate response carries no result".into()))?;
        Ok(result.payload)
    }
}

/// Run one gateway call under its phase budget.
async fn with_phase_budget<T>(
    phase: &'static str,
    secs: u64,
    call: impl Future<Output = Result<T, Status>>,
) -> GatewayResult<T> {
    match tokio::time::timeout(Duration::from_secs(secs), call).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(status)) => Err(GatewayError::Rpc { phase, status }),
        Err(_) => Err(GatewayError::PhaseTimeout { phase, secs }),
    }
}

/// Raw Gateway service client over a tonic channel.
struct GatewayGrpc {
    inner: Grpc<Channel>,
}

impl GatewayGrpc {
    fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    async fn endorse(&mut self, request: pb::EndorseRequest) -> Result<pb::EndorseResponse, Status> {
        self.unary(request, "/gateway.Gateway/Endorse").await
    }

    async fn submit(&mut self, request: pb::SubmitRequest) -> Result<pb::SubmitResponse, Status> {
        self.unary(request, "/gateway.Gateway/Submit").await
    }

    async fn commit_status(
        &mut self,
        request: pb::SignedCommitStatusRequest,
    ) -> Result<pb::CommitStatusResponse, Status> {
        self.unary(request, "/gateway.Gateway/CommitStatus").await
    }

    async fn evaluate(
        &mut self,
        request: pb::EvaluateRequest,
    ) -> Result<pb::EvaluateResponse, Status> {
        self.unary(request, "/gateway.Gateway/Evaluate").await
    }

    async fn unary<M1, M2>(&mut self, request: M1, path: &'static str) -> Result<M2, Status>
    where
        M1: prost::Message + Send + Sync + 'static,
        M2: prost::Message + Default + Send + Sync + 'static,
    {
        self.inner
            .ready()
            .await
            .map_err(|e| Status::unknown(format!("gateway service not ready: {e}")))?;

        let codec: ProstCodec<M1, M2> = ProstCodec::default();
        let response = self
            .inner
            .unary(Request::new(request), PathAndQuery::from_static(path), codec)
            .await?;
        Ok(response.into_inner())
    }
}
