//! # Frontend Authentication
//!
//! The cache endpoints are wrapped by an [`Authorizer`] that either admits a
//! request or rejects it before any core logic runs; core code never sees
//! credentials. Token issuance and validation mechanisms are external to this
//! crate. The trait is the fixed contract they plug into, and the built-in
//! [`DisabledAuthorizer`] (`type: none`) admits everything.

pub mod middleware;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Kind of authorizer wrapping the API, reported by `/v1/info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthKind {
    /// No authentication; every request is admitted
    #[default]
    #[serde(rename = "none")]
    Disabled,
}

impl AuthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "none",
        }
    }
}

impl fmt::Display for AuthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors produced by the authentication layer.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("authentication is disabled")]
    Disabled,
    #[error("missing bearer token")]
    MissingBearer,
    #[error("malformed bearer token")]
    MalformedBearer,
    #[error("token is invalid or expired")]
    InvalidToken,
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Credentials submitted to `POST /v1/auth`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSuccess {
    pub token: String,
}

/// Contract between the HTTP surface and the authentication layer.
///
/// `authorize` runs on every request to a protected endpoint; `login` backs
/// `POST /v1/auth` and is delegated to entirely.
#[async_trait]
pub trait Authorizer: Send + Sync + fmt::Debug {
    /// The kind identifier clients use to pick a login flow.
    fn kind(&self) -> AuthKind;

    /// Admit or reject a request based on its headers.
    async fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError>;

    /// Exchange credentials for a token.
    async fn login(&self, request: LoginRequest) -> Result<LoginSuccess, AuthError>;
}

/// Authorizer for `type: none`: admits every request, has no login flow.
#[derive(Debug, Default)]
pub struct DisabledAuthorizer;

#[async_trait]
impl Authorizer for DisabledAuthorizer {
    fn kind(&self) -> AuthKind {
        AuthKind::Disabled
    }

    async fn authorize(&self, _headers: &HeaderMap) -> Result<(), AuthError> {
        Ok(())
    }

    async fn login(&self, _request: LoginRequest) -> Result<LoginSuccess, AuthError> {
        Err(AuthError::Disabled)
    }
}

/// Build the configured authorizer.
pub fn build_authorizer(config: &AuthConfig) -> Arc<dyn Authorizer> {
    match config.kind {
        AuthKind::Disabled => Arc::new(DisabledAuthorizer),
    }
}
