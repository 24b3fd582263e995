//! Role Model

use serde::{Deserialize, Serialize};

use super::permission::PermissionPayload;

/// Role entity (RBAC 角色)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Department reference (String ID, opaque)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    /// Roles this role reports to. Index 0 is the primary parent and the
    /// only entry used for tree placement; later entries are informational
    /// but still count for deletion safety.
    #[serde(default)]
    pub reporting_ids: Vec<String>,
    /// Legacy singular field, read as a one-element `reporting_ids`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_id: Option<String>,
    /// Permission payload in any of the accepted wire shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionPayload>,
}

impl Role {
    /// Primary parent for hierarchy placement.
    ///
    /// `reporting_ids[0]` is authoritative; the legacy `reporting_id` field
    /// is only consulted when the sequence is empty.
    pub fn primary_parent_id(&self) -> Option<&str> {
        self.reporting_ids
            .first()
            .map(String::as_str)
            .or(self.reporting_id.as_deref())
    }

    /// True when `role_id` appears at any reporting position, legacy field
    /// included. Broader than tree placement: any reference makes the
    /// target a dependency for deletion safety.
    pub fn reports_to(&self, role_id: &str) -> bool {
        self.reporting_ids.iter().any(|id| id == role_id)
            || self.reporting_id.as_deref() == Some(role_id)
    }

    /// Whether this role carries the `(*, *)` sentinel grant
    pub fn is_super_admin(&self) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(PermissionPayload::is_super_admin)
    }
}

/// Create role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
    #[serde(default)]
    pub reporting_ids: Vec<String>,
    #[serde(default)]
    pub reporting_id: Option<String>,
    #[serde(default)]
    pub permissions: Option<PermissionPayload>,
}

/// Update role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub department_id: Option<String>,
    pub reporting_ids: Option<Vec<String>>,
    pub permissions: Option<PermissionPayload>,
}
