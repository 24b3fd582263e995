//! Shared types for the CRM admin backend
//!
//! Wire-compatible role and permission models plus the two pure cores:
//! permission evaluation ([`models::permission`]) and role-hierarchy
//! construction ([`models::hierarchy`]). Both are synchronous, deterministic
//! and never mutate caller-supplied snapshots.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    PermissionPayload, PermissionSet, Role, RoleCreate, RoleHierarchy, RoleNode, RoleUpdate,
    build_forest, has_direct_reports,
};
