//! HTTP surface of the bridge.
//!
//! # Data Flow
//! ```text
//! POST /submitTX | /evaluateTX (JSON body)
//!     → server.rs (deserialize, log, dispatch)
//!     → gateway::Submitter (one pipeline per request)
//!     → JSON or text response (opaque 502 envelope on failure)
//! anything else → static files from the configured directory
//! ```

pub mod server;

pub use server::HttpServer;
