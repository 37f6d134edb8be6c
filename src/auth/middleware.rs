//! Axum middleware for request authentication.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, warn};

use super::Authorizer;
use crate::api::error::ApiError;

pub type AuthorizerState = Arc<dyn Authorizer>;

/// Middleware entry point that authenticates requests using the configured
/// [`Authorizer`] before any handler runs.
pub async fn authenticate(
    State(authorizer): State<AuthorizerState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!(
        "auth_middleware.authenticate",
        http.method = %method,
        http.path = %path,
        auth.kind = %authorizer.kind()
    );
    let _guard = span.enter();

    match authorizer.authorize(request.headers()).await {
        Ok(()) => Ok(next.run(request).await),
        Err(err) => {
            warn!(error = %err, "authentication failed");
            Err(ApiError::from(err))
        }
    }
}
