use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Roles granted to a single subject (a user or a group).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub id: String,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
}

impl Permission {
    pub fn new(id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id: id.into(),
            roles: roles.into_iter().collect(),
        }
    }
}

/// User and group grants on one resource.
///
/// Each partition holds at most one entry per subject id, updating a subject
/// replaces its previous entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PermissionsRepr")]
pub struct Permissions {
    users: Vec<Permission>,
    groups: Vec<Permission>,
}

#[derive(Deserialize)]
struct PermissionsRepr {
    #[serde(default)]
    users: Vec<Permission>,
    #[serde(default)]
    groups: Vec<Permission>,
}

impl From<PermissionsRepr> for Permissions {
    fn from(repr: PermissionsRepr) -> Self {
        let mut permissions = Permissions::default();
        for permission in repr.users {
            permissions.update_user_permissions(permission);
        }
        for permission in repr.groups {
            permissions.update_group_permissions(permission);
        }
        permissions
    }
}

fn upsert(partition: &mut Vec<Permission>, permission: Permission) {
    match partition.iter_mut().find(|p| p.id == permission.id) {
        Some(existing) => *existing = permission,
        None => partition.push(permission),
    }
}

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_permissions(&self) -> &[Permission] {
        &self.users
    }

    pub fn group_permissions(&self) -> &[Permission] {
        &self.groups
    }

    pub fn update_user_permissions(&mut self, permission: Permission) {
        upsert(&mut self.users, permission);
    }

    pub fn update_group_permissions(&mut self, permission: Permission) {
        upsert(&mut self.groups, permission);
    }

    pub fn remove_user_permission(&mut self, user_id: &str) {
        self.users.retain(|p| p.id != user_id);
    }

    pub fn remove_group_permission(&mut self, group_id: &str) {
        self.groups.retain(|p| p.id != group_id);
    }

    pub fn user_roles(&self, user_id: &str) -> Option<&BTreeSet<Role>> {
        self.users.iter().find(|p| p.id == user_id).map(|p| &p.roles)
    }

    pub fn group_roles(&self, group_id: &str) -> Option<&BTreeSet<Role>> {
        self.groups.iter().find(|p| p.id == group_id).map(|p| &p.roles)
    }

    pub fn clear(&mut self) {
        self.users.clear();
        self.groups.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.groups.is_empty()
    }
}
