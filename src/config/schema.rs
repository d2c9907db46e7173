//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway bridge.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BridgeConfig {
    /// HTTP listener configuration (bind address, static files).
    pub listener: ListenerConfig,

    /// Gateway peer endpoint configuration.
    pub gateway: GatewayConfig,

    /// Crypto material location.
    pub credentials: CredentialConfig,

    /// Per-phase timeout budgets.
    pub timeouts: TimeoutConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Directory served as static content alongside the API.
    pub static_dir: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            static_dir: "public".to_string(),
        }
    }
}

/// Gateway peer endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway peer address as "host:port". The channel is always TLS,
    /// verified against the organization's peer CA certificate.
    pub endpoint: String,

    /// Transport connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: "localhost:11051".to_string(),
            connect_timeout_secs: 5,
        }
    }
}

/// Location of the per-organization crypto material tree.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Root directory containing one subdirectory per organization domain,
    /// laid out the way the ledger's test network generates it.
    pub root_path: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            root_path: "organizations/peerOrganizations".to_string(),
        }
    }
}

/// Timeout budgets for the four gateway call phases, plus the overall HTTP
/// request budget. Fixed at startup; not configurable per call.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Evaluate (read-only query) budget in seconds.
    pub evaluate_secs: u64,

    /// Endorsement collection budget in seconds.
    pub endorse_secs: u64,

    /// Ordering-service submission budget in seconds.
    pub submit_secs: u64,

    /// Commit-status wait budget in seconds.
    pub commit_status_secs: u64,

    /// Whole-request HTTP timeout in seconds. Must exceed the commit budget.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            evaluate_secs: 5,
            endorse_secs: 15,
            submit_secs: 5,
            commit_status_secs: 60,
            request_secs: 90,
        }
    }
}
