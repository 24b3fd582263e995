//! Role Store
//!
//! In-process role storage. Roles are kept in insertion order so every
//! snapshot read yields a deterministic hierarchy; all reads hand out
//! cloned snapshots, never references into the store.

use std::sync::RwLock;

use shared::models::{Role, RoleCreate, RoleUpdate, has_direct_reports};
use uuid::Uuid;

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Role {0} not found")]
    NotFound(String),

    #[error("Role name '{0}' already exists")]
    NameExists(String),

    #[error("Role {0} has direct reports and cannot be deleted")]
    HasDirectReports(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ordered role storage behind a single lock
#[derive(Debug, Default)]
pub struct RoleStore {
    roles: RwLock<Vec<Role>>,
}

impl RoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (startup seeding, tests)
    pub fn seed(&self, roles: Vec<Role>) {
        let mut guard = self.roles.write().expect("Failed to lock role store");
        *guard = roles;
    }

    /// Snapshot of all roles in insertion order
    pub fn find_all(&self) -> Vec<Role> {
        self.roles
            .read()
            .expect("Failed to lock role store")
            .clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<Role> {
        self.roles
            .read()
            .expect("Failed to lock role store")
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Role> {
        self.roles
            .read()
            .expect("Failed to lock role store")
            .iter()
            .find(|r| r.name == name)
            .cloned()
    }

    pub fn create(&self, data: RoleCreate) -> StoreResult<Role> {
        let mut guard = self.roles.write().expect("Failed to lock role store");
        if guard.iter().any(|r| r.name == data.name) {
            return Err(StoreError::NameExists(data.name));
        }

        let role = Role {
            id: Uuid::new_v4().to_string(),
            name: data.name,
            description: data.description,
            department_id: data.department_id,
            reporting_ids: data.reporting_ids,
            reporting_id: data.reporting_id,
            permissions: data.permissions,
        };
        guard.push(role.clone());
        Ok(role)
    }

    pub fn update(&self, id: &str, data: RoleUpdate) -> StoreResult<Role> {
        let mut guard = self.roles.write().expect("Failed to lock role store");

        if let Some(ref name) = data.name
            && guard.iter().any(|r| r.name == *name && r.id != id)
        {
            return Err(StoreError::NameExists(name.clone()));
        }

        let role = guard
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        if let Some(name) = data.name {
            role.name = name;
        }
        if let Some(description) = data.description {
            role.description = Some(description);
        }
        if let Some(department_id) = data.department_id {
            role.department_id = Some(department_id);
        }
        if let Some(reporting_ids) = data.reporting_ids {
            role.reporting_ids = reporting_ids;
            // The sequence supersedes the legacy singular field
            role.reporting_id = None;
        }
        if let Some(permissions) = data.permissions {
            role.permissions = Some(permissions);
        }

        Ok(role.clone())
    }

    /// Delete a role.
    ///
    /// The dependent check runs under the write lock, so a reference added
    /// between a caller's pre-check and this call still blocks the delete.
    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut guard = self.roles.write().expect("Failed to lock role store");

        if !guard.iter().any(|r| r.id == id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if has_direct_reports(id, &guard) {
            return Err(StoreError::HasDirectReports(id.to_string()));
        }

        guard.retain(|r| r.id != id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, reporting_ids: &[&str]) -> RoleCreate {
        RoleCreate {
            name: name.to_string(),
            description: None,
            department_id: None,
            reporting_ids: reporting_ids.iter().map(|s| s.to_string()).collect(),
            reporting_id: None,
            permissions: None,
        }
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let store = RoleStore::new();

        let a = store.create(create("Manager", &[])).expect("Failed to create role");
        let b = store.create(create("Agent", &[a.id.as_str()])).expect("Failed to create role");

        assert_ne!(a.id, b.id);
        assert_eq!(store.find_all().len(), 2);
    }

    #[test]
    fn test_create_rejects_duplicate_name() {
        let store = RoleStore::new();
        store.create(create("Manager", &[])).expect("Failed to create role");

        let err = store.create(create("Manager", &[])).unwrap_err();

        assert!(matches!(err, StoreError::NameExists(_)));
    }

    #[test]
    fn test_delete_blocked_by_dependents() {
        let store = RoleStore::new();
        let head = store.create(create("Head", &[])).expect("Failed to create role");
        store
            .create(create("Agent", &[head.id.as_str()]))
            .expect("Failed to create role");

        let err = store.delete(&head.id).unwrap_err();

        assert!(matches!(err, StoreError::HasDirectReports(_)));
        assert!(store.find_by_id(&head.id).is_some());
    }

    #[test]
    fn test_delete_leaf_role() {
        let store = RoleStore::new();
        let head = store.create(create("Head", &[])).expect("Failed to create role");
        let agent = store
            .create(create("Agent", &[head.id.as_str()]))
            .expect("Failed to create role");

        assert!(store.delete(&agent.id).expect("Failed to delete role"));
        assert!(store.find_by_id(&agent.id).is_none());
        // Now unreferenced, head can go too
        assert!(store.delete(&head.id).expect("Failed to delete role"));
    }

    #[test]
    fn test_update_reporting_ids_clears_legacy_field() {
        let store = RoleStore::new();
        let mut data = create("Agent", &[]);
        data.reporting_id = Some("legacy-head".to_string());
        let agent = store.create(data).expect("Failed to create role");
        assert_eq!(agent.primary_parent_id(), Some("legacy-head"));

        let updated = store
            .update(
                &agent.id,
                RoleUpdate {
                    name: None,
                    description: None,
                    department_id: None,
                    reporting_ids: Some(vec!["new-head".to_string()]),
                    permissions: None,
                },
            )
            .expect("Failed to update role");

        assert_eq!(updated.primary_parent_id(), Some("new-head"));
        assert_eq!(updated.reporting_id, None);
    }

    #[test]
    fn test_delete_missing_role() {
        let store = RoleStore::new();

        assert!(matches!(store.delete("ghost"), Err(StoreError::NotFound(_))));
    }
}
