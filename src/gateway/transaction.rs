//! Endorser-transaction proposal construction and result extraction.
//!
//! A proposal carries the transaction name and its positional arguments as an
//! untyped list of strings. The transaction id binds the proposal, the
//! prepared envelope, and the commit-status request together; it is derived
//! from a fresh nonce and the creator identity, never reused.

use std::time::{SystemTime, UNIX_EPOCH};

use prost::Message;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::gateway::proto::{common, peer};
use crate::gateway::types::{GatewayError, GatewayResult};
use crate::identity::TransactionSigner;

/// A built proposal, ready for signing and endorsement.
pub struct ProposedTransaction {
    /// Hex transaction id: sha256(nonce || creator).
    pub transaction_id: String,
    proposal_bytes: Vec<u8>,
}

impl ProposedTransaction {
    /// Build a chaincode invocation proposal.
    ///
    /// `args` are forwarded positionally after the transaction name, all in
    /// string form; an empty slice invokes the transaction name alone.
    pub fn new(
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
        creator: &[u8],
    ) -> GatewayResult<Self> {
        let nonce: [u8; 24] = rand::thread_rng().gen();
        let transaction_id = derive_transaction_id(&nonce, creator);

        let mut invocation_args = Vec::with_capacity(1 + args.len());
        invocation_args.push(transaction_name.as_bytes().to_vec());
        invocation_args.extend(args.iter().map(|a| a.as_bytes().to_vec()));

        let invocation = peer::ChaincodeInvocationSpec {
            chaincode_spec: Some(peer::ChaincodeSpec {
                r#type: 0,
                chaincode_id: Some(peer::ChaincodeId {
                    name: chaincode.to_string(),
                    ..Default::default()
                }),
                input: Some(peer::ChaincodeInput {
                    args: invocation_args,
                    ..Default::default()
                }),
                timeout: 0,
            }),
        };

        let extension = peer::ChaincodeHeaderExtension {
            chaincode_id: Some(peer::ChaincodeId {
                name: chaincode.to_string(),
                ..Default::default()
            }),
        };

        let channel_header = common::ChannelHeader {
            r#type: common::HEADER_TYPE_ENDORSER_TRANSACTION,
            version: 0,
            timestamp: Some(now_timestamp()),
            channel_id: channel.to_string(),
            tx_id: transaction_id.clone(),
            epoch: 0,
            extension: extension.encode_to_vec(),
            tls_cert_hash: Vec::new(),
        };

        let signature_header = common::SignatureHeader {
            creator: creator.to_vec(),
            nonce: nonce.to_vec(),
        };

        let proposal = peer::Proposal {
            header: common::Header {
                channel_header: channel_header.encode_to_vec(),
                signature_header: signature_header.encode_to_vec(),
            }
            .encode_to_vec(),
            payload: peer::ChaincodeProposalPayload {
                input: invocation.encode_to_vec(),
                ..Default::default()
            }
            .encode_to_vec(),
            extension: Vec::new(),
        };

        Ok(Self {
            transaction_id,
            proposal_bytes: proposal.encode_to_vec(),
        })
    }

    /// Sign the proposal bytes, producing the wire form the gateway endorses.
    pub fn sign(&self, signer: &TransactionSigner) -> peer::SignedProposal {
        peer::SignedProposal {
            proposal_bytes: self.proposal_bytes.clone(),
            signature: signer.sign(&self.proposal_bytes),
        }
    }
}

/// Extract the chaincode response payload from a prepared transaction
/// envelope returned by the endorse phase.
pub fn extract_result(prepared_payload: &[u8]) -> GatewayResult<Vec<u8>> {
    let payload = common::Payload::decode(prepared_payload)?;
    let transaction = peer::Transaction::decode(payload.data.as_slice())?;

    let action = transaction
        .actions
        .first()
        .ok_or_else(|| GatewayError::Malformed("prepared transaction has no actions".into()))?;

    let action_payload = peer::ChaincodeActionPayload::decode(action.payload.as_slice())?;
    let endorsed = action_payload
        .action
        .ok_or_else(|| GatewayError::Malformed("transaction action is not endorsed".into()))?;

    let response_payload =
        peer::ProposalResponsePayload::decode(endorsed.proposal_response_payload.as_slice())?;
    let chaincode_action = peer::ChaincodeAction::decode(response_payload.extension.as_slice())?;

    let response = chaincode_action
        .response
        .ok_or_else(|| GatewayError::Malformed("endorsed action carries no response".into()))?;

    Ok(response.payload)
}

fn derive_transaction_id(nonce: &[u8], creator: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator);
    hex::encode(hasher.finalize())
}

fn now_timestamp() -> prost_types::Timestamp {
    // System clock predates the epoch only on a badly broken host.
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    prost_types::Timestamp {
        seconds: now.as_secs() as i64,
        nanos: now.subsec_nanos() as i32,
    }
}
