//! # HTTP API
//!
//! The thin external-facing surface over the cache store and refresh
//! scheduler:
//!
//! - `GET /v1/info`: version and auth kind
//! - `POST /v1/auth`: delegated to the authentication layer
//! - `GET /v1/cache`: current snapshot, soonest expiry first (authenticated)
//! - `POST /v1/cache/refresh`: fire-and-forget manual refresh (authenticated)

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use routes::{build_router, ApiState};
pub use server::start_api_server;
