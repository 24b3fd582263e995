//! Permission Payload Model
//!
//! RBAC permission evaluation (权限评估).
//!
//! The backend and older client caches ship permissions in several shapes:
//! a map of page keys, an array of `{page, actions}` grants, or a top-level
//! `{pages: "*", actions: "*"}` super-admin pair. All of them funnel through
//! one normalization step into [`PermissionSet`]; every check downstream
//! consumes only the canonical form.
//!
//! ## 规则
//!
//! 1. 无 payload 一律拒绝 (fail closed)
//! 2. 超级管理员哨兵 `(*, *)` 优先于其它判定
//! 3. 多条授权之间是逻辑 OR，不存在 deny 类型

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page names that match every resource when they appear in a grant
const GLOBAL_PAGES: &[&str] = &["*", "any", "global"];

/// Actions of one grant on the wire: `"*"`, a bare action, or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantActions {
    One(String),
    Many(Vec<String>),
}

/// A single `(page, actions)` pair (array-form payload entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub page: String,
    pub actions: GrantActions,
}

/// Access recorded for one page key in the map-form payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageAccess {
    /// `"*"` means full access; any other bare string grants nothing
    Wildcard(String),
    Actions(Vec<String>),
    Flags(BTreeMap<String, bool>),
}

/// Permission payload as stored on a role or cached by a client.
///
/// Variant order matters for untagged deserialization: the top-level
/// `{pages, actions}` pair must win over the generic page map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PermissionPayload {
    /// Top-level `{pages: "*", actions: "*"}` super-admin form
    Global { pages: String, actions: String },
    /// Array of grants
    Grants(Vec<Grant>),
    /// Map of page key to access
    Pages(BTreeMap<String, PageAccess>),
}

impl PermissionPayload {
    /// Super-admin sentinel check, evaluated before any other path.
    ///
    /// Array form: a grant with `page == "*"` and `actions == "*"`.
    /// Object form: `pages == "*"` and `actions == "*"` at the top level.
    pub fn is_super_admin(&self) -> bool {
        match self {
            Self::Global { pages, actions } => pages == "*" && actions == "*",
            Self::Grants(grants) => grants.iter().any(|g| {
                g.page == "*" && matches!(&g.actions, GrantActions::One(a) if a == "*")
            }),
            Self::Pages(_) => false,
        }
    }

    /// Normalize into the canonical form
    pub fn normalize(&self) -> PermissionSet {
        if self.is_super_admin() {
            return PermissionSet::Wildcard;
        }
        match self {
            // Non-wildcard top-level pair grants nothing
            Self::Global { .. } => PermissionSet::Grants(Vec::new()),
            Self::Grants(grants) => PermissionSet::Grants(
                grants
                    .iter()
                    .map(|g| NormalizedGrant {
                        page: g.page.to_ascii_lowercase(),
                        actions: g.actions.to_action_set(),
                    })
                    .collect(),
            ),
            Self::Pages(pages) => PermissionSet::Grants(
                pages
                    .iter()
                    .map(|(page, access)| NormalizedGrant {
                        page: page.to_ascii_lowercase(),
                        actions: access.to_action_set(),
                    })
                    .collect(),
            ),
        }
    }

    /// Convenience check without holding on to the canonical form
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        self.normalize().allows(resource, action)
    }
}

impl GrantActions {
    fn to_action_set(&self) -> ActionSet {
        match self {
            Self::One(a) if a == "*" => ActionSet::Any,
            Self::One(a) => ActionSet::List(vec![a.clone()]),
            Self::Many(list) if list.iter().any(|a| a == "*") => ActionSet::Any,
            Self::Many(list) => ActionSet::List(list.clone()),
        }
    }
}

impl PageAccess {
    fn to_action_set(&self) -> ActionSet {
        match self {
            Self::Wildcard(s) if s == "*" => ActionSet::Any,
            // Unknown bare string: page stays visible, grants nothing
            Self::Wildcard(_) => ActionSet::List(Vec::new()),
            Self::Actions(list) if list.iter().any(|a| a == "*") => ActionSet::Any,
            Self::Actions(list) => ActionSet::List(list.clone()),
            Self::Flags(flags) => ActionSet::List(
                flags
                    .iter()
                    .filter(|(_, enabled)| **enabled)
                    .map(|(action, _)| action.clone())
                    .collect(),
            ),
        }
    }
}

/// Canonical permission representation.
///
/// An empty action list is distinct from an absent page: the page was
/// explicitly touched (visible as a module key) but currently grants
/// nothing. [`PermissionSet::has_page`] exposes the difference.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionSet {
    /// Super-admin: every resource/action pair allowed
    Wildcard,
    Grants(Vec<NormalizedGrant>),
}

/// One canonical grant; the page key is lower-cased (matching is
/// case-insensitive)
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedGrant {
    pub page: String,
    pub actions: ActionSet,
}

/// Canonical action set of one grant
#[derive(Debug, Clone, PartialEq)]
pub enum ActionSet {
    Any,
    List(Vec<String>),
}

impl ActionSet {
    fn permits(&self, action: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(actions) => actions.iter().any(|a| a == action),
        }
    }
}

impl PermissionSet {
    /// Normalize a raw JSON payload (e.g. a cached copy of unknown vintage).
    ///
    /// Never fails: entries that do not fit any accepted shape are dropped,
    /// unexpected top-level types degrade to an empty grant list. A cached
    /// payload gets no special casing over a fresh one.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(entries) => {
                let grants: Vec<Grant> = entries
                    .iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect();
                PermissionPayload::Grants(grants).normalize()
            }
            Value::Object(map) => {
                if map.get("pages").and_then(Value::as_str) == Some("*")
                    && map.get("actions").and_then(Value::as_str) == Some("*")
                {
                    return Self::Wildcard;
                }
                let mut grants = Vec::new();
                for (page, access) in map {
                    if let Ok(access) = serde_json::from_value::<PageAccess>(access.clone()) {
                        grants.push(NormalizedGrant {
                            page: page.to_ascii_lowercase(),
                            actions: access.to_action_set(),
                        });
                    }
                }
                Self::Grants(grants)
            }
            _ => Self::Grants(Vec::new()),
        }
    }

    /// Can the actor perform `action` on `resource`?
    ///
    /// A match on any grant is sufficient (logical OR); a grant whose page
    /// is one of the global names (`*`, `any`, `Global`) matches every
    /// resource.
    pub fn allows(&self, resource: &str, action: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Grants(grants) => {
                let resource = resource.to_ascii_lowercase();
                grants.iter().any(|g| {
                    (g.page == resource || GLOBAL_PAGES.contains(&g.page.as_str()))
                        && g.actions.permits(action)
                })
            }
        }
    }

    /// Whether `resource` was explicitly touched as a page key.
    ///
    /// True for an empty action list (explicitly revoked, key still
    /// visible), false when the key was never present.
    pub fn has_page(&self, resource: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Grants(grants) => {
                let resource = resource.to_ascii_lowercase();
                grants.iter().any(|g| g.page == resource)
            }
        }
    }
}

/// Top-level decision helper: absent payload denies everything
pub fn allows(payload: Option<&PermissionPayload>, resource: &str, action: &str) -> bool {
    payload.is_some_and(|p| p.allows(resource, action))
}
