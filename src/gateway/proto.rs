//! Hand-maintained prost bindings for the subset of the Fabric protocol the
//! bridge speaks.
//!
//! Field numbers follow the upstream `fabric-protos` definitions. Only the
//! messages on the submit/evaluate path are bound; anything the bridge never
//! sends or inspects is left out.

/// `common/common.proto`: envelope and header messages.
pub mod common {
    /// Header type for chaincode endorser transactions.
    pub const HEADER_TYPE_ENDORSER_TRANSACTION: i32 = 3;

    /// A payload with a signature over it.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Envelope {
        /// Marshaled `Payload`.
        #[prost(bytes = "vec", tag = "1")]
        pub payload: Vec<u8>,
        /// Creator's signature over the payload bytes.
        #[prost(bytes = "vec", tag = "2")]
        pub signature: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Payload {
        #[prost(message, optional, tag = "1")]
        pub header: Option<Header>,
        #[prost(bytes = "vec", tag = "2")]
        pub data: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Header {
        /// Marshaled `ChannelHeader`.
        #[prost(bytes = "vec", tag = "1")]
        pub channel_header: Vec<u8>,
        /// Marshaled `SignatureHeader`.
        #[prost(bytes = "vec", tag = "2")]
        pub signature_header: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChannelHeader {
        #[prost(int32, tag = "1")]
        pub r#type: i32,
        #[prost(int32, tag = "2")]
        pub version: i32,
        #[prost(message, optional, tag = "3")]
        pub timestamp: Option<::prost_types::Timestamp>,
        #[prost(string, tag = "4")]
        pub channel_id: String,
        #[prost(string, tag = "5")]
        pub tx_id: String,
        #[prost(uint64, tag = "6")]
        pub epoch: u64,
        /// Marshaled `ChaincodeHeaderExtension` for endorser transactions.
        #[prost(bytes = "vec", tag = "7")]
        pub extension: Vec<u8>,
        #[prost(bytes = "vec", tag = "8")]
        pub tls_cert_hash: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SignatureHeader {
        /// Marshaled `msp::SerializedIdentity` of the creator.
        #[prost(bytes = "vec", tag = "1")]
        pub creator: Vec<u8>,
        /// Arbitrary number used once per transaction.
        #[prost(bytes = "vec", tag = "2")]
        pub nonce: Vec<u8>,
    }
}

/// `msp/identities.proto`.
pub mod msp {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SerializedIdentity {
        #[prost(string, tag = "1")]
        pub mspid: String,
        /// Enrollment certificate, PEM.
        #[prost(bytes = "vec", tag = "2")]
        pub id_bytes: Vec<u8>,
    }
}

/// `peer/proposal.proto`, `peer/chaincode.proto`, `peer/transaction.proto`,
/// `peer/proposal_response.proto`: the endorser-transaction message chain.
pub mod peer {
    use std::collections::HashMap;

    /// Validation code reported for a committed transaction.
    pub const TX_VALIDATION_CODE_VALID: i32 = 0;

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Proposal {
        /// Marshaled `common::Header`.
        #[prost(bytes = "vec", tag = "1")]
        pub header: Vec<u8>,
        /// Marshaled `ChaincodeProposalPayload`.
        #[prost(bytes = "vec", tag = "2")]
        pub payload: Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub extension: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SignedProposal {
        #[prost(bytes = "vec", tag = "1")]
        pub proposal_bytes: Vec<u8>,
        /// Creator's signature over `proposal_bytes`.
        #[prost(bytes = "vec", tag = "2")]
        pub signature: Vec<u8>,
    }

    /// Channel header extension for endorser transactions. Field 1 is
    /// reserved upstream (removed payload visibility field).
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeHeaderExtension {
        #[prost(message, optional, tag = "2")]
        pub chaincode_id: Option<ChaincodeId>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeProposalPayload {
        /// Marshaled `ChaincodeInvocationSpec`.
        #[prost(bytes = "vec", tag = "1")]
        pub input: Vec<u8>,
        #[prost(map = "string, bytes", tag = "2")]
        pub transient_map: HashMap<String, Vec<u8>>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeId {
        #[prost(string, tag = "1")]
        pub path: String,
        #[prost(string, tag = "2")]
        pub name: String,
        #[prost(string, tag = "3")]
        pub version: String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeInput {
        /// Transaction name followed by its positional arguments, all as
        /// raw bytes of their string form.
        #[prost(bytes = "vec", repeated, tag = "1")]
        pub args: Vec<Vec<u8>>,
        #[prost(map = "string, bytes", tag = "2")]
        pub decorations: HashMap<String, Vec<u8>>,
        #[prost(bool, tag = "3")]
        pub is_init: bool,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeSpec {
        #[prost(int32, tag = "1")]
        pub r#type: i32,
        #[prost(message, optional, tag = "2")]
        pub chaincode_id: Option<ChaincodeId>,
        #[prost(message, optional, tag = "3")]
        pub input: Option<ChaincodeInput>,
        #[prost(int32, tag = "4")]
        pub timeout: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeInvocationSpec {
        #[prost(message, optional, tag = "1")]
        pub chaincode_spec: Option<ChaincodeSpec>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Transaction {
        #[prost(message, repeated, tag = "1")]
        pub actions: Vec<TransactionAction>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct TransactionAction {
        #[prost(bytes = "vec", tag = "1")]
        pub header: Vec<u8>,
        /// Marshaled `ChaincodeActionPayload`.
        #[prost(bytes = "vec", tag = "2")]
        pub payload: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeActionPayload {
        #[prost(bytes = "vec", tag = "1")]
        pub chaincode_proposal_payload: Vec<u8>,
        #[prost(message, optional, tag = "2")]
        pub action: Option<ChaincodeEndorsedAction>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeEndorsedAction {
        /// Marshaled `ProposalResponsePayload`.
        #[prost(bytes = "vec", tag = "1")]
        pub proposal_response_payload: Vec<u8>,
        #[prost(message, repeated, tag = "2")]
        pub endorsements: Vec<Endorsement>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Endorsement {
        #[prost(bytes = "vec", tag = "1")]
        pub endorser: Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub signature: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ProposalResponsePayload {
        #[prost(bytes = "vec", tag = "1")]
        pub proposal_hash: Vec<u8>,
        /// Marshaled `ChaincodeAction`.
        #[prost(bytes = "vec", tag = "2")]
        pub extension: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ChaincodeAction {
        #[prost(bytes = "vec", tag = "1")]
        pub results: Vec<u8>,
        #[prost(bytes = "vec", tag = "2")]
        pub events: Vec<u8>,
        #[prost(message, optional, tag = "3")]
        pub response: Option<Response>,
        #[prost(message, optional, tag = "4")]
        pub chaincode_id: Option<ChaincodeId>,
    }

    /// A chaincode response, HTTP-style status plus payload.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Response {
        #[prost(int32, tag = "1")]
        pub status: i32,
        #[prost(string, tag = "2")]
        pub message: String,
        #[prost(bytes = "vec", tag = "3")]
        pub payload: Vec<u8>,
    }
}

/// `gateway/gateway.proto`: the Gateway service request/response pairs.
pub mod gateway {
    use super::{common, peer};

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct EndorseRequest {
        #[prost(string, tag = "1")]
        pub transaction_id: String,
        #[prost(string, tag = "2")]
        pub channel_id: String,
        #[prost(message, optional, tag = "3")]
        pub proposed_transaction: Option<peer::SignedProposal>,
        #[prost(string, repeated, tag = "4")]
        pub endorsing_organizations: Vec<String>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct EndorseResponse {
        /// Unsigned transaction envelope, ready for client signing.
        #[prost(message, optional, tag = "1")]
        pub prepared_transaction: Option<common::Envelope>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SubmitRequest {
        #[prost(string, tag = "1")]
        pub transaction_id: String,
        #[prost(string, tag = "2")]
        pub channel_id: String,
        #[prost(message, optional, tag = "3")]
        pub prepared_transaction: Option<common::Envelope>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SubmitResponse {}

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SignedCommitStatusRequest {
        /// Marshaled `CommitStatusRequest`.
        #[prost(bytes = "vec", tag = "1")]
        pub request: Vec<u8>,
        /// Requestor's signature over the request bytes.
        #[prost(bytes = "vec", tag = "2")]
        pub signature: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CommitStatusRequest {
        #[prost(string, tag = "1")]
        pub transaction_id: String,
        #[prost(string, tag = "2")]
        pub channel_id: String,
        /// Marshaled `msp::SerializedIdentity` of the requestor.
        #[prost(bytes = "vec", tag = "3")]
        pub identity: Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CommitStatusResponse {
        /// `peer::TX_VALIDATION_CODE_*` value.
        #[prost(int32, tag = "1")]
        pub result: i32,
        #[prost(uint64, tag = "2")]
        pub block_number: u64,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct EvaluateRequest {
        #[prost(string, tag = "1")]
        pub transaction_id: String,
        #[prost(string, tag = "2")]
        pub channel_id: String,
        #[prost(message, optional, tag = "3")]
        pub proposed_transaction: Option<peer::SignedProposal>,
        #[prost(string, repeated, tag = "4")]
        pub target_organizations: Vec<String>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct EvaluateResponse {
        #[prost(message, optional, tag = "1")]
        pub result: Option<peer::Response>,
    }
}
