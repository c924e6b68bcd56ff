//! Operational HTTP surface for the rotation subsystem
//!
//! A small REST API the back office uses to inspect and drive the
//! rotation without shell access:
//!
//! ```text
//! GET  /api/health           server liveness + uptime
//! GET  /api/rotation/state   derived ring position and next category
//! POST /api/rotation/run     execute one rotation run now
//! GET  /api/rotation/stats   automation post counts and recent list
//! POST /api/rotation/clear   delete all automation posts
//! ```
//!
//! GETs never mutate state. `run` and `clear` are non-idempotent and
//! carry the concurrent-run caveat documented on the rotation module.

pub mod api;
pub mod config;
pub mod server;

pub use api::{ApiResponse, ClearResponse, ErrorBody, HealthResponse, RotationStateResponse};
pub use config::{ConfigError, OpsConfig};
pub use server::{AppState, OpsServer, ServerError};
