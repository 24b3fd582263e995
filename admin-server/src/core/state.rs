use std::sync::Arc;

use shared::models::{Grant, GrantActions, PermissionPayload, Role};

use crate::core::Config;
use crate::db::RoleStore;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
#[derive(Debug, Clone)]
pub struct ServerState {
    pub config: Config,
    pub roles: Arc<RoleStore>,
}

impl ServerState {
    pub fn new(config: Config, roles: Arc<RoleStore>) -> Self {
        Self { config, roles }
    }

    /// Build the state and seed the default Super Admin role.
    ///
    /// The sentinel grant `(*, *)` marks it; every other role starts from
    /// an explicit grant list.
    pub fn initialize(config: &Config) -> Self {
        let store = RoleStore::new();
        store.seed(vec![super_admin_role()]);
        tracing::info!("Role store seeded with default Super Admin role");
        Self::new(config.clone(), Arc::new(store))
    }
}

fn super_admin_role() -> Role {
    let permissions = PermissionPayload::Grants(vec![Grant {
        page: "*".to_string(),
        actions: GrantActions::One("*".to_string()),
    }]);
    Role {
        id: "super-admin".to_string(),
        name: "Super Admin".to_string(),
        description: Some("Unrestricted access to every module".to_string()),
        department_id: None,
        reporting_ids: Vec::new(),
        reporting_id: None,
        permissions: Some(permissions),
    }
}
