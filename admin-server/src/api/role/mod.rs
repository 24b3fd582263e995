//! Role API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Role router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/roles", roles_routes())
}

fn roles_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/hierarchy", get(handler::hierarchy))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/permissions",
            get(handler::get_role_permissions).put(handler::update_role_permissions),
        )
        .route("/{id}/subordinates", get(handler::subordinates))
}
