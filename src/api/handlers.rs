use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::{LoginRequest, LoginSuccess};
use crate::cache::CacheItem;

use super::error::ApiError;
use super::routes::ApiState;

/// Static server metadata served on `/v1/info`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub version: String,
    pub auth_type: String,
}

/// Response body of `/v1/cache`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetCacheResponse {
    pub content: Vec<CacheItem>,
}

pub async fn get_info_handler(State(state): State<Arc<ApiState>>) -> Json<InfoResponse> {
    Json(InfoResponse {
        version: crate::VERSION.to_string(),
        auth_type: state.authorizer.kind().as_str().to_string(),
    })
}

/// The current snapshot, sorted soonest-expiring first.
pub async fn get_cache_handler(State(state): State<Arc<ApiState>>) -> Json<GetCacheResponse> {
    let snapshot = state.store.get().await;
    Json(GetCacheResponse { content: snapshot.items_by_expiry() })
}

/// Fire the manual refresh trigger and return immediately.
///
/// Always responds 204: refresh outcomes are observable through logs and the
/// cache contents, never through this endpoint.
pub async fn refresh_cache_handler(State(state): State<Arc<ApiState>>) -> StatusCode {
    if !state.refresh.trigger_now() {
        debug!("Refresh already pending; manual trigger coalesced");
    }
    StatusCode::NO_CONTENT
}

pub async fn login_handler(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginSuccess>, ApiError> {
    let success = state.authorizer.login(payload).await?;
    Ok(Json(success))
}
