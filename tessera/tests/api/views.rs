use model::{LinkType, Query, QueryStem, ResourceType, Role, View, ViewUpdate};
use resource_store::{Filter, MemoryStore, Pagination, ResourceStore};
use std::{
    collections::BTreeSet,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tessera::{facade::ViewFacade, workspace::Workspace, Error};

use crate::{context, names, Server, MANAGER, OUTSIDER};

#[tokio::test]
async fn create_view_generates_code() {
    let server = Server::setup();

    let view = server.create_view("u1", "Test view").await;

    assert!(view.id.is_some());
    assert_eq!(view.code, "TESTV");
    assert_eq!(view.author_id.as_deref(), Some("u1"));
    assert!(view.creation_date.is_some());

    let roles = view.permissions.user_roles("u1").unwrap();
    for role in ResourceType::View.roles() {
        assert!(roles.contains(role));
    }

    let second = server.create_view("u1", "Test view").await;
    assert_eq!(second.code, "TESTV2");
}

#[tokio::test]
async fn create_view_ignores_supplied_permissions() {
    let server = Server::setup();
    let mut view = View {
        name: "Mine".to_string(),
        ..Default::default()
    };
    view.permissions
        .update_user_permissions(model::Permission::new("u2", [Role::Manage]));

    let view = server.facade.create_view(&context("u1"), view).await.unwrap();

    assert!(view.permissions.user_roles("u2").is_none());
    assert!(view.permissions.user_roles("u1").is_some());
}

#[tokio::test]
async fn create_view_duplicate_code() {
    let server = Server::setup();
    let view = View {
        code: "TV".to_string(),
        name: "Test view".to_string(),
        ..Default::default()
    };

    server
        .facade
        .create_view(&context("u1"), view.clone())
        .await
        .unwrap();
    let err = server
        .facade
        .create_view(&context("u2"), view)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateKey { resource_type: ResourceType::View, key } if key == "TV"));
}

/// Hides the stored codes from the first `stale` code lookups, as if another
/// create had stored its view in between.
struct StaleCodes {
    inner: MemoryStore<View>,
    stale: AtomicUsize,
}

#[async_trait::async_trait]
impl ResourceStore<View> for StaleCodes {
    async fn create(&self, view: View) -> resource_store::Result<View> {
        self.inner.create(view).await
    }

    async fn update(&self, id: &str, view: View) -> resource_store::Result<View> {
        self.inner.update(id, view).await
    }

    async fn delete(&self, id: &str) -> resource_store::Result<()> {
        self.inner.delete(id).await
    }

    async fn get(&self, id: &str) -> resource_store::Result<Option<View>> {
        self.inner.get(id).await
    }

    async fn find(
        &self,
        filter: &Filter,
        pagination: Option<Pagination>,
    ) -> resource_store::Result<Pin<Box<dyn futures::Stream<Item = View> + '_ + Send>>> {
        self.inner.find(filter, pagination).await
    }

    async fn find_all_codes(&self) -> resource_store::Result<BTreeSet<String>> {
        let stale = self
            .stale
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(BTreeSet::new());
        }
        self.inner.find_all_codes().await
    }
}

fn facade_with_stale_codes(stale: usize) -> (ViewFacade, MemoryStore<View>) {
    let inner = MemoryStore::<View>::new();
    let Workspace {
        organization,
        project,
        ..
    } = Server::setup().workspace().clone();
    let workspace = Workspace {
        views: Arc::new(StaleCodes {
            inner: inner.clone(),
            stale: AtomicUsize::new(stale),
        }),
        ..Workspace::in_memory(organization, project)
    };

    (ViewFacade::new(Arc::new(workspace)), inner)
}

#[tokio::test]
async fn create_view_regenerates_taken_code() {
    let (facade, store) = facade_with_stale_codes(1);
    store
        .create(View {
            code: "TESTV".to_string(),
            name: "Taken".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let view = facade
        .create_view(
            &context("u1"),
            View {
                name: "Test view".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(view.code, "TESTV2");
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn create_view_gives_up_on_taken_code() {
    let (facade, store) = facade_with_stale_codes(usize::MAX);
    store
        .create(View {
            code: "TESTV".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let err = facade
        .create_view(
            &context("u1"),
            View {
                name: "Test view".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateKey { key, .. } if key == "TESTV"));
}

#[tokio::test]
async fn create_view_unsafe_code() {
    let server = Server::setup();
    let view = View {
        code: "T V".to_string(),
        name: "Test view".to_string(),
        ..Default::default()
    };

    let err = server
        .facade
        .create_view(&context("u1"), view)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::BadFormat { .. }));
}

#[tokio::test]
async fn create_view_needs_project_write() {
    let server = Server::setup();

    let err = server
        .facade
        .create_view(&context(OUTSIDER), View::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Unauthorized {
            resource_type: ResourceType::Project,
            role: Role::Write,
        }
    ));
}

#[tokio::test]
async fn get_view_hides_unreadable() {
    let server = Server::setup();
    let view = server.create_view("u1", "Private").await;
    let id = view.id.clone().unwrap();

    assert_eq!(
        server.facade.get_view(&context("u1"), &id).await.unwrap(),
        view
    );
    assert!(matches!(
        server.facade.get_view(&context("u2"), &id).await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        server.facade.get_view_by_code(&context("u2"), &view.code).await,
        Err(Error::NotFound { .. })
    ));

    // project managers read everything
    assert_eq!(
        server
            .facade
            .get_view_by_code(&context(MANAGER), &view.code)
            .await
            .unwrap()
            .id,
        view.id
    );
}

#[tokio::test]
async fn get_views_is_read_filtered() {
    let server = Server::setup();
    server.create_view("u1", "First").await;
    server.create_view("u1", "Second").await;

    let own = server.facade.get_views(&context("u1"), None).await.unwrap();
    assert_eq!(names(&own), vec!["First", "Second"]);

    let other = server.facade.get_views(&context("u2"), None).await.unwrap();
    assert!(other.is_empty());

    let all = server
        .facade
        .get_views(&context(MANAGER), None)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn get_views_paginated() {
    let server = Server::setup();
    for name in ["First", "Second", "Third"] {
        server.create_view("u1", name).await;
    }

    let page = server
        .facade
        .get_views(&context("u1"), Some(Pagination::new(1, 1)))
        .await
        .unwrap();
    assert_eq!(names(&page), vec!["Second"]);

    let rest = server
        .facade
        .get_views(&context("u1"), Some(Pagination::new(1, 2)))
        .await
        .unwrap();
    assert_eq!(names(&rest), vec!["Third"]);

    let beyond = server
        .facade
        .get_views(&context("u1"), Some(Pagination::new(5, 2)))
        .await
        .unwrap();
    assert!(beyond.is_empty());
}

#[tokio::test]
async fn get_views_by_suggestion() {
    let server = Server::setup();
    for name in ["Test view", "Testing fulltext view", "Just FULLTEXT view"] {
        server.create_view("u1", name).await;
    }
    server.create_view("u2", "Test of someone else").await;

    let found = server
        .facade
        .get_views_by_suggestion(&context("u1"), "test")
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Test view", "Testing fulltext view"]);

    let found = server
        .facade
        .get_views_by_suggestion(&context("u1"), "fulltext")
        .await
        .unwrap();
    assert_eq!(names(&found), vec!["Testing fulltext view", "Just FULLTEXT view"]);

    let found = server
        .facade
        .get_views_by_suggestion(&context(MANAGER), "test")
        .await
        .unwrap();
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn get_views_by_collection() {
    let server = Server::setup();
    let link_type = server
        .workspace()
        .link_types
        .create(LinkType::new("c2-c3", "c2", "c3"))
        .await
        .unwrap();
    let link_type_id = link_type.id.unwrap();

    let ctx = context("u1");
    let with_query = |name: &str, stem: QueryStem| View {
        name: name.to_string(),
        query: Query::new(vec![stem]),
        ..Default::default()
    };

    for view in [
        with_query("direct", QueryStem::new("c1")),
        with_query("linked", QueryStem::new("c4").with_link_types([link_type_id.as_str()])),
        with_query("rooted", QueryStem::new("c3")),
    ] {
        server.facade.create_view(&ctx, view).await.unwrap();
    }

    assert_eq!(by_collection(&server, "c1").await, vec!["direct"]);
    assert_eq!(by_collection(&server, "c2").await, vec!["linked"]);
    assert_eq!(by_collection(&server, "c3").await, vec!["linked", "rooted"]);
    assert!(by_collection(&server, "c5").await.is_empty());

    // still scoped to what the caller can read
    assert!(server
        .facade
        .get_views_by_collection(&context("u2"), "c1")
        .await
        .unwrap()
        .is_empty());
}

async fn by_collection(server: &Server, collection_id: &str) -> Vec<String> {
    server
        .facade
        .get_views_by_collection(&context("u1"), collection_id)
        .await
        .unwrap()
        .into_iter()
        .map(|view| view.name)
        .collect()
}

#[tokio::test]
async fn update_view() {
    let server = Server::setup();
    let view = server.create_view("u1", "Before").await;
    let id = view.id.clone().unwrap();

    let updated = server
        .facade
        .update_view(
            &context("u1"),
            &id,
            vec![
                ViewUpdate::Name("After".to_string()),
                ViewUpdate::Code("AFTER".to_string()),
                ViewUpdate::Description(Some("changed".to_string())),
            ],
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "After");
    assert_eq!(updated.code, "AFTER");
    assert_eq!(updated.description.as_deref(), Some("changed"));
    assert_eq!(updated.author_id.as_deref(), Some("u1"));
    assert_eq!(updated.updated_by.as_deref(), Some("u1"));
    assert!(updated.update_date.is_some());
    assert_eq!(updated.permissions, view.permissions);
}

#[tokio::test]
async fn update_view_code_needs_manage() {
    let server = Server::setup();
    let view = server.create_view("u1", "Shared").await;
    let id = view.id.clone().unwrap();
    server
        .facade
        .update_user_permissions(
            &context("u1"),
            &id,
            vec![model::Permission::new("u2", [Role::Read, Role::Write])],
        )
        .await
        .unwrap();

    let renamed = server
        .facade
        .update_view(&context("u2"), &id, vec![ViewUpdate::Name("Renamed".to_string())])
        .await
        .unwrap();
    assert_eq!(renamed.name, "Renamed");

    let err = server
        .facade
        .update_view(&context("u2"), &id, vec![ViewUpdate::Code("NEW".to_string())])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Unauthorized {
            resource_type: ResourceType::View,
            role: Role::Manage,
        }
    ));

    let err = server
        .facade
        .update_view(&context("u1"), &id, vec![ViewUpdate::Code(String::new())])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadFormat { .. }));

    let unchanged = server.facade.get_view(&context("u1"), &id).await.unwrap();
    assert_eq!(unchanged.code, view.code);
    assert_eq!(unchanged.name, "Renamed");
}

#[tokio::test]
async fn update_view_code_collision() {
    let server = Server::setup();
    let first = server.create_view("u1", "First").await;
    let second = server.create_view("u1", "Second").await;

    let err = server
        .facade
        .update_view(
            &context("u1"),
            second.id.as_deref().unwrap(),
            vec![ViewUpdate::Code(first.code.clone())],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateKey { .. }));
}

#[tokio::test]
async fn copy_view() {
    let server = Server::setup();
    let source = server
        .facade
        .create_view(
            &context("u1"),
            View {
                name: "Source".to_string(),
                perspective: "table".to_string(),
                query: Query::new(vec![QueryStem::new("c1")]),
                config: serde_json::json!({ "table": { "width": 3 } }).into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let source_id = source.id.clone().unwrap();

    assert!(matches!(
        server.facade.copy_view(&context("u2"), &source_id, "Copy").await,
        Err(Error::NotFound { .. })
    ));

    server
        .facade
        .update_user_permissions(
            &context("u1"),
            &source_id,
            vec![model::Permission::new("u2", [Role::Read, Role::Clone])],
        )
        .await
        .unwrap();

    let copy = server
        .facade
        .copy_view(&context("u2"), &source_id, "Copy")
        .await
        .unwrap();

    assert_ne!(copy.id, source.id);
    assert_ne!(copy.code, source.code);
    assert_eq!(copy.name, "Copy");
    assert_eq!(copy.query, source.query);
    assert_eq!(copy.config, source.config);
    assert_eq!(copy.perspective, source.perspective);
    assert_eq!(copy.author_id.as_deref(), Some("u2"));
    assert!(copy.permissions.user_roles("u1").is_none());
    assert!(copy
        .permissions
        .user_roles("u2")
        .unwrap()
        .contains(&Role::Manage));
}

#[tokio::test]
async fn delete_view() {
    let server = Server::setup();
    let view = server.create_view("u1", "Doomed").await;
    let id = view.id.clone().unwrap();
    server
        .facade
        .update_user_permissions(
            &context("u1"),
            &id,
            vec![model::Permission::new("u2", [Role::Read])],
        )
        .await
        .unwrap();

    assert!(matches!(
        server.facade.delete_view(&context("u2"), &id).await,
        Err(Error::Unauthorized {
            role: Role::Manage,
            ..
        })
    ));

    server.facade.delete_view(&context("u1"), &id).await.unwrap();

    assert!(matches!(
        server.facade.get_view(&context("u1"), &id).await,
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        server.facade.delete_view(&context("u1"), &id).await,
        Err(Error::NotFound {
            resource_type: ResourceType::View,
            ..
        })
    ));
}

#[tokio::test]
async fn get_all_view_codes() {
    let server = Server::setup();
    server.create_view("u1", "Alpha").await;
    server.create_view("u2", "Beta").await;

    let codes = server.facade.get_all_view_codes().await.unwrap();

    assert_eq!(
        codes.into_iter().collect::<Vec<_>>(),
        vec!["ALPHA".to_string(), "BETA".to_string()]
    );
}
