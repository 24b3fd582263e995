//! Role API Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{
    PermissionPayload, Role, RoleCreate, RoleHierarchy, RoleNode, RoleUpdate, build_forest,
    has_direct_reports,
};

/// GET /api/roles - Get all roles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    Ok(Json(state.roles.find_all()))
}

/// GET /api/roles/{id} - Get role by ID
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Role>> {
    let role = state
        .roles
        .find_by_id(&id)
        .ok_or_else(|| AppError::not_found(format!("Role {} not found", id)))?;

    Ok(Json(role))
}

/// POST /api/roles - Create a new role
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<Role>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Role name must not be empty"));
    }

    tracing::info!(role_name = %payload.name, "Creating role");

    let role = state.roles.create(payload)?;
    Ok(Json(role))
}

/// PUT /api/roles/{id} - Update a role
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    if let Some(ref name) = payload.name
        && name.trim().is_empty()
    {
        return Err(AppError::validation("Role name must not be empty"));
    }

    tracing::info!(role_id = %id, "Updating role");

    let role = state.roles.update(&id, payload)?;
    Ok(Json(role))
}

/// DELETE /api/roles/{id} - Delete a role
///
/// The snapshot pre-check produces the descriptive rejection; the store
/// re-checks under its write lock, so a concurrent edit cannot slip a
/// dependent past this handler.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    tracing::info!(role_id = %id, "Deleting role");

    let snapshot = state.roles.find_all();
    if has_direct_reports(&id, &snapshot) {
        return Err(AppError::business_rule(format!(
            "Role {} has direct reports and cannot be deleted",
            id
        )));
    }

    let result = state.roles.delete(&id)?;
    Ok(Json(result))
}

/// GET /api/roles/hierarchy - Get the role forest
pub async fn hierarchy(State(state): State<ServerState>) -> AppResult<Json<Vec<RoleNode>>> {
    let snapshot = state.roles.find_all();
    Ok(Json(build_forest(&snapshot)))
}

/// Query filter for the subordinates listing
#[derive(Debug, Deserialize)]
pub struct SubordinatesQuery {
    /// If true, super-admin roles are counted as team members too
    include_super_admin: Option<bool>,
}

/// GET /api/roles/{id}/subordinates - Transitive subordinates
///
/// Super-admin roles head teams but are not counted as members unless
/// explicitly requested.
pub async fn subordinates(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(query): Query<SubordinatesQuery>,
) -> AppResult<Json<Vec<Role>>> {
    let snapshot = state.roles.find_all();
    if !snapshot.iter().any(|r| r.id == id) {
        return Err(AppError::not_found(format!("Role {} not found", id)));
    }

    let hierarchy = RoleHierarchy::build(&snapshot);
    let exclude = |role: &Role| role.is_super_admin();
    let subs = if query.include_super_admin.unwrap_or(false) {
        hierarchy.subordinates_of(&id, None)
    } else {
        hierarchy.subordinates_of(&id, Some(&exclude))
    };

    Ok(Json(subs))
}

/// GET /api/roles/{id}/permissions - Get role permissions
pub async fn get_role_permissions(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Option<PermissionPayload>>> {
    let role = state
        .roles
        .find_by_id(&id)
        .ok_or_else(|| AppError::not_found(format!("Role {} not found", id)))?;

    Ok(Json(role.permissions))
}

/// PUT /api/roles/{id}/permissions - Update role permissions
pub async fn update_role_permissions(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(permissions): Json<PermissionPayload>,
) -> AppResult<Json<Role>> {
    tracing::info!(role_id = %id, "Updating role permissions");

    let update = RoleUpdate {
        name: None,
        description: None,
        department_id: None,
        reporting_ids: None,
        permissions: Some(permissions),
    };

    let role = state.roles.update(&id, update)?;
    Ok(Json(role))
}
