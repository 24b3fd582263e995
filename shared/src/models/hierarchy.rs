//! Role Hierarchy Model
//!
//! Derived org-chart view (组织架构树) over a flat role snapshot.
//!
//! Placement rules:
//! - only the primary parent (`reporting_ids[0]`, legacy `reporting_id`
//!   fallback) creates a tree edge; secondary entries are metadata
//! - unresolved parents promote the role to a forest root (fail open)
//! - children keep input order, no sorting here (display sorting is the
//!   caller's concern)
//! - traversal is guarded by a visited set, so cyclic reporting chains
//!   terminate instead of looping; roles trapped in a cycle are simply
//!   unreachable from any root

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::role::Role;

/// A role placed in the org chart with its direct reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleNode {
    pub role: Role,
    pub children: Vec<RoleNode>,
}

/// Index over one role snapshot.
///
/// Built once per snapshot and queried many times; the input slice is never
/// mutated and all query results are fresh clones.
pub struct RoleHierarchy<'a> {
    roles: &'a [Role],
    index: HashMap<&'a str, usize>,
    /// Parent position -> child positions, in input order
    children: HashMap<usize, Vec<usize>>,
    /// Forest roots, in input order
    roots: Vec<usize>,
}

impl<'a> RoleHierarchy<'a> {
    pub fn build(roles: &'a [Role]) -> Self {
        let index: HashMap<&str, usize> = roles
            .iter()
            .enumerate()
            .map(|(pos, role)| (role.id.as_str(), pos))
            .collect();

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut roots = Vec::new();
        for (pos, role) in roles.iter().enumerate() {
            match role.primary_parent_id() {
                Some(parent_id) => match index.get(parent_id) {
                    Some(&parent) => children.entry(parent).or_default().push(pos),
                    None => {
                        // Fail open: unresolved references promote to root
                        tracing::warn!(
                            role_id = %role.id,
                            parent_id = %parent_id,
                            "Unresolved reporting reference, treating role as root"
                        );
                        roots.push(pos);
                    }
                },
                None => roots.push(pos),
            }
        }

        Self {
            roles,
            index,
            children,
            roots,
        }
    }

    /// Children of `parent` that have not been visited yet.
    ///
    /// Single traversal guard shared by every descent in this module; a
    /// revisited position is silently dropped, which bounds any walk to one
    /// visit per role even on cyclic input.
    fn guarded_children(&self, parent: usize, visited: &mut HashSet<usize>) -> Vec<usize> {
        self.children
            .get(&parent)
            .map(|kids| kids.iter().copied().filter(|&k| visited.insert(k)).collect())
            .unwrap_or_default()
    }

    /// Materialize the forest. Role records are cloned; the snapshot stays
    /// untouched.
    pub fn forest(&self) -> Vec<RoleNode> {
        let mut visited = HashSet::new();
        let mut forest = Vec::with_capacity(self.roots.len());
        for &root in &self.roots {
            if visited.insert(root) {
                forest.push(self.expand(root, &mut visited));
            }
        }
        forest
    }

    fn expand(&self, pos: usize, visited: &mut HashSet<usize>) -> RoleNode {
        let children = self
            .guarded_children(pos, visited)
            .into_iter()
            .map(|child| self.expand(child, visited))
            .collect();
        RoleNode {
            role: self.roles[pos].clone(),
            children,
        }
    }

    /// Transitive subordinates of `role_id` over primary-parent edges, in
    /// depth-first pre-order.
    ///
    /// `exclude` prunes a role and its whole subtree from the result; used
    /// to keep a designated category (e.g. super admin) out of team-member
    /// counts while it can still head a team elsewhere.
    pub fn subordinates_of(
        &self,
        role_id: &str,
        exclude: Option<&dyn Fn(&Role) -> bool>,
    ) -> Vec<Role> {
        let Some(&start) = self.index.get(role_id) else {
            return Vec::new();
        };
        let mut visited = HashSet::from([start]);
        let mut out = Vec::new();
        self.collect_subordinates(start, &mut visited, exclude, &mut out);
        out
    }

    fn collect_subordinates(
        &self,
        pos: usize,
        visited: &mut HashSet<usize>,
        exclude: Option<&dyn Fn(&Role) -> bool>,
        out: &mut Vec<Role>,
    ) {
        for child in self.guarded_children(pos, visited) {
            let role = &self.roles[child];
            if exclude.is_some_and(|f| f(role)) {
                continue;
            }
            out.push(role.clone());
            self.collect_subordinates(child, visited, exclude, out);
        }
    }

    /// Deletion-safety predicate, see [`has_direct_reports`]
    pub fn has_direct_reports(&self, role_id: &str) -> bool {
        has_direct_reports(role_id, self.roles)
    }
}

/// Build the forest for one snapshot
pub fn build_forest(roles: &[Role]) -> Vec<RoleNode> {
    RoleHierarchy::build(roles).forest()
}

/// True iff any role references `role_id` at any reporting position.
///
/// Wider than tree placement on purpose: a secondary (non-primary) reference
/// still blocks deletion of the target.
pub fn has_direct_reports(role_id: &str, roles: &[Role]) -> bool {
    roles.iter().any(|role| role.reports_to(role_id))
}
