use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::middleware::{authenticate, AuthorizerState};
use crate::auth::Authorizer;
use crate::cache::CacheStore;
use crate::observability::track_http_requests;
use crate::refresh::RefreshHandle;

use super::handlers::{
    get_cache_handler, get_info_handler, login_handler, refresh_cache_handler,
};

/// Shared state behind the HTTP handlers, assembled once at startup.
#[derive(Debug)]
pub struct ApiState {
    pub store: Arc<CacheStore>,
    pub refresh: RefreshHandle,
    pub authorizer: Arc<dyn Authorizer>,
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    let auth_layer = {
        let authorizer: AuthorizerState = state.authorizer.clone();
        middleware::from_fn_with_state(authorizer, authenticate)
    };

    let protected = Router::new()
        .route("/v1/cache", get(get_cache_handler))
        .route("/v1/cache/refresh", post(refresh_cache_handler))
        .layer(auth_layer);

    Router::new()
        .route("/v1/info", get(get_info_handler))
        .route("/v1/auth", post(login_handler))
        .merge(protected)
        .layer(middleware::from_fn(track_http_requests))
        .with_state(state)
}
