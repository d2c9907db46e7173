//! Shared mock connector for integration tests.
//!
//! Records every gateway call and counts session opens/releases so tests can
//! assert the release-exactly-once pipeline contract.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fabric_bridge::gateway::{GatewayConnector, GatewayError, GatewayResult, GatewaySession};
use fabric_bridge::identity::CredentialError;

/// One recorded submit/evaluate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub organization: String,
    pub msp: String,
    pub channel: String,
    pub chaincode: String,
    pub transaction_name: String,
    pub args: Vec<String>,
}

/// Shared observation state for a [`MockConnector`].
#[derive(Default)]
pub struct MockState {
    pub opened: AtomicU32,
    pub closed: AtomicU32,
    pub calls: Mutex<Vec<RecordedCall>>,
}

impl MockState {
    pub fn opened(&self) -> u32 {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> u32 {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

/// What a mock session should do when asked to submit.
pub enum MockBehavior {
    /// Return these bytes as the ledger result.
    Respond(Vec<u8>),
    /// Fail the submit phase with a commit-status timeout.
    TimeOut,
}

/// Connector whose sessions replay a scripted behavior.
pub struct MockConnector {
    pub state: Arc<MockState>,
    behavior: MockBehavior,
    fail_connect: bool,
}

impl MockConnector {
    pub fn responding(payload: &[u8]) -> Self {
        Self {
            state: Arc::new(MockState::default()),
            behavior: MockBehavior::Respond(payload.to_vec()),
            fail_connect: false,
        }
    }

    pub fn timing_out() -> Self {
        Self {
            state: Arc::new(MockState::default()),
            behavior: MockBehavior::TimeOut,
            fail_connect: false,
        }
    }

    pub fn refusing_connections() -> Self {
        Self {
            state: Arc::new(MockState::default()),
            behavior: MockBehavior::Respond(Vec::new()),
            fail_connect: true,
        }
    }
}

#[async_trait]
impl GatewayConnector for MockConnector {
    async fn connect(
        &self,
        organization: &str,
        msp_id: &str,
    ) -> GatewayResult<Box<dyn GatewaySession>> {
        if self.fail_connect {
            // Mirrors the missing-TLS-certificate path: fails before any
            // session or channel exists.
            return Err(GatewayError::Credentials(CredentialError::Io {
                path: std::path::PathBuf::from("/crypto/peers/peer0/tls/ca.crt"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            }));
        }

        self.state.opened.fetch_add(1, Ordering::SeqCst);
        let outcome = match &self.behavior {
            MockBehavior::Respond(payload) => Ok(payload.clone()),
            MockBehavior::TimeOut => Err(()),
        };

        Ok(Box::new(MockSession {
            state: self.state.clone(),
            organization: organization.to_string(),
            msp: msp_id.to_string(),
            outcome,
        }))
    }
}

struct MockSession {
    state: Arc<MockState>,
    organization: String,
    msp: String,
    outcome: Result<Vec<u8>, ()>,
}

impl MockSession {
    fn record(&self, channel: &str, chaincode: &str, transaction_name: &str, args: &[String]) {
        self.state.calls.lock().unwrap().push(RecordedCall {
            organization: self.organization.clone(),
            msp: self.msp.clone(),
            channel: channel.to_string(),
            chaincode: chaincode.to_string(),
            transaction_name: transaction_name.to_string(),
            args: args.to_vec(),
        });
    }

    fn outcome(&self) -> GatewayResult<Vec<u8>> {
        match &self.outcome {
            Ok(payload) => Ok(payload.clone()),
            Err(()) => Err(GatewayError::PhaseTimeout {
                phase: "commit status",
                secs: 60,
            }),
        }
    }
}

#[async_trait]
impl GatewaySession for MockSession {
    async fn submit(
        &mut self,
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        self.record(channel, chaincode, transaction_name, args);
        self.outcome()
    }

    async fn evaluate(
        &mut self,
        channel: &str,
        chaincode: &str,
        transaction_name: &str,
        args: &[String],
    ) -> GatewayResult<Vec<u8>> {
        self.record(channel, chaincode, transaction_name, args);
        self.outcome()
    }

    async fn close(&mut self) {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
    }
}
