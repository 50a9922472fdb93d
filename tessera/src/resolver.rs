//! Builds store filters that push visibility and reference checks into the
//! storage layer. Nothing here touches a store.

use model::{AuthorizationContext, LinkType, Role};
use resource_store::Filter;

/// Matches resources on which `role` is granted to the caller directly or to
/// any of the caller's groups. Agrees with [`crate::auth::has_role`] on
/// every resource.
pub fn build_read_filter(context: &AuthorizationContext, role: Role) -> Filter {
    let user = Filter::elem_match(
        "permissions.users",
        Filter::And(vec![
            Filter::eq("id", context.user_id()),
            Filter::eq("roles", role.as_str()),
        ]),
    );

    if context.group_ids().is_empty() {
        return user;
    }

    let groups = Filter::elem_match(
        "permissions.groups",
        Filter::And(vec![
            Filter::is_in("id", context.group_ids().iter().map(String::as_str)),
            Filter::eq("roles", role.as_str()),
        ]),
    );

    Filter::Or(vec![user, groups])
}

/// Readable resources whose name contains `text`, ignoring case.
pub fn build_suggestion_filter(context: &AuthorizationContext, text: &str) -> Filter {
    build_read_filter(context, Role::Read).and(build_name_filter(text))
}

pub fn build_name_filter(text: &str) -> Filter {
    Filter::contains_text("name", text)
}

/// Views whose query uses `collection_id` as a stem root, or follows a link
/// type connecting it. `link_types` may contain unrelated link types, only
/// those connecting the collection are used.
pub fn build_collection_reference_filter(collection_id: &str, link_types: &[LinkType]) -> Filter {
    let direct = Filter::eq("query.stems.collectionId", collection_id);

    let connecting: Vec<&str> = link_types
        .iter()
        .filter(|lt| lt.connects(collection_id))
        .filter_map(|lt| lt.id.as_deref())
        .collect();

    if connecting.is_empty() {
        return direct;
    }

    Filter::Or(vec![
        direct,
        Filter::is_in("query.stems.linkTypeIds", connecting),
    ])
}

/// Link types with `collection_id` on either end.
pub fn build_link_types_by_collection_filter(collection_id: &str) -> Filter {
    Filter::eq("collectionIds", collection_id)
}
