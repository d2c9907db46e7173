//! Fabric Gateway Bridge
//!
//! An HTTP bridge that submits named transactions to smart contracts on a
//! permissioned ledger through a Fabric gateway peer.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────┐
//!                 │                  FABRIC BRIDGE                    │
//!                 │                                                   │
//!  POST /submitTX │  ┌─────────┐   ┌───────────┐   ┌──────────────┐  │
//!  ───────────────┼─▶│  http   │──▶│ gateway   │──▶│   gateway    │  │    Gateway
//!                 │  │ server  │   │ submitter │   │   session    │──┼──▶ peer
//!                 │  └─────────┘   └─────┬─────┘   └──────────────┘  │   (gRPC/TLS)
//!                 │                      │                           │
//!                 │                      ▼                           │
//!                 │              ┌──────────────┐                    │
//!                 │              │   identity   │                    │
//!                 │              │ cert + key   │                    │
//!                 │              └──────────────┘                    │
//!                 │                                                   │
//!                 │  ┌────────────────────────────────────────────┐  │
//!                 │  │       Cross-Cutting: config, lifecycle      │  │
//!                 │  └────────────────────────────────────────────┘  │
//!                 └──────────────────────────────────────────────────┘
//! ```
//!
//! Every submission is an independent sequential pipeline: open a TLS gRPC
//! channel, load the organization's certificate and private key, endorse,
//! submit, wait for commit, decode, release. No state is shared or cached
//! across requests.

// Core subsystems
pub mod config;
pub mod gateway;
pub mod http;
pub mod identity;

// Cross-cutting concerns
pub mod lifecycle;

pub use config::BridgeConfig;
pub use gateway::{FabricConnector, GatewayConnector, Submitter, TransactionRequest};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
