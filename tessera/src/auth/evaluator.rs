use model::{AuthorizationContext, Permissions, Role};
use std::collections::BTreeSet;

/// Union of the roles granted to the user directly and to each of the user's
/// groups.
pub fn roles_of(permissions: &Permissions, context: &AuthorizationContext) -> BTreeSet<Role> {
    let mut roles = permissions
        .user_roles(context.user_id())
        .cloned()
        .unwrap_or_default();

    for group in context.group_ids() {
        if let Some(group_roles) = permissions.group_roles(group) {
            roles.extend(group_roles.iter().copied());
        }
    }

    roles
}

/// Whether `role` is in the union of the user's direct and group roles. Roles
/// are not expanded: `Manage` does not imply `Read` here.
pub fn has_role(permissions: &Permissions, context: &AuthorizationContext, role: Role) -> bool {
    if permissions
        .user_roles(context.user_id())
        .map_or(false, |roles| roles.contains(&role))
    {
        return true;
    }

    context.group_ids().iter().any(|group| {
        permissions
            .group_roles(group)
            .map_or(false, |roles| roles.contains(&role))
    })
}
