//! Permission Check API
//!
//! 权限校验接口：对任意形态的 payload 运行规范化评估。
//! 客户端缓存的 payload 与新拉取的 payload 走同一条路径。

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::PermissionSet;

/// Permission check router
pub fn router() -> Router<ServerState> {
    Router::new().route("/api/permissions/check", post(check))
}

/// Permission check request
///
/// `permissions` accepts every legacy shape; anything unrecognized
/// degrades to deny rather than erroring.
#[derive(Debug, Deserialize)]
pub struct PermissionCheck {
    #[serde(default)]
    pub permissions: serde_json::Value,
    pub resource: String,
    pub action: String,
}

/// Permission check result
#[derive(Debug, Serialize)]
pub struct PermissionCheckResult {
    pub allowed: bool,
}

/// POST /api/permissions/check - Evaluate a payload
pub async fn check(
    State(_state): State<ServerState>,
    Json(payload): Json<PermissionCheck>,
) -> AppResult<Json<PermissionCheckResult>> {
    let allowed =
        PermissionSet::from_value(&payload.permissions).allows(&payload.resource, &payload.action);

    Ok(Json(PermissionCheckResult { allowed }))
}
