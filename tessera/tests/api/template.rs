use chrono::{TimeZone, Utc};
use futures::StreamExt;
use model::{ConfigValue, ResourceType, Role, View};
use resource_store::{Filter, ResourceStore};
use serde_json::{json, Value};
use std::io::Write;
use tessera::{
    errors::output::ErrorOutput,
    template::{
        FileTemplate, JsonTemplate, ResourceKind, TemplateError, TemplateOptions, TemplateParser,
    },
    Error,
};

use crate::{context, Server, OUTSIDER};

const TASKS: &str = "5c6f3f7b8f0e4a1b2c3d4e01";
const PEOPLE: &str = "5c6f3f7b8f0e4a1b2c3d4e02";
const ASSIGNEE: &str = "5c6f3f7b8f0e4a1b2c3d4e03";
const TASK: &str = "5c6f3f7b8f0e4a1b2c3d4e04";
const ALICE: &str = "5c6f3f7b8f0e4a1b2c3d4e05";
const ASSIGNMENT: &str = "5c6f3f7b8f0e4a1b2c3d4e06";
const BOARD: &str = "5c6f3f7b8f0e4a1b2c3d4e07";

fn project_template() -> Value {
    json!({
        "collections": [
            { "_id": TASKS, "name": "Tasks", "attributes": [{ "id": "a1", "name": "Title" }] },
            { "_id": PEOPLE, "name": "People" },
        ],
        "linkTypes": [
            { "_id": ASSIGNEE, "name": "Assignee", "collectionIds": [TASKS, PEOPLE] },
        ],
        "documents": [
            {
                "_id": TASK,
                "collectionId": TASKS,
                "data": { "a1": "Write docs", "a2": "42", "a3": "2020-01-02T03:04:05Z" },
            },
            { "_id": ALICE, "collectionId": PEOPLE, "data": { "a1": "Alice" } },
        ],
        "linkInstances": [
            { "_id": ASSIGNMENT, "linkTypeId": ASSIGNEE, "documentIds": [TASK, ALICE] },
        ],
        "views": [
            {
                "_id": BOARD,
                "name": "Task board",
                "perspective": "table",
                "query": {
                    "stems": [{
                        "collectionId": TASKS,
                        "linkTypeIds": [ASSIGNEE, "notInTemplate"],
                        "documentIds": [TASK],
                        "filters": [{
                            "collectionId": TASKS,
                            "attributeId": "a1",
                            "condition": "eq",
                            "conditionValues": [{ "value": "Write docs" }],
                        }, {
                            "collectionId": "notInTemplate",
                            "attributeId": "a2",
                            "condition": "gt",
                            "conditionValues": [{ "value": 3 }],
                        }],
                    }],
                },
                "config": {
                    "table": { "collection": TASKS, "width": "120", "since": "2020-01-02T03:04:05Z", "label": "Tasks" },
                    PEOPLE: { "hidden": true },
                },
            },
        ],
    })
}

async fn all<R: model::Resource>(store: &dyn ResourceStore<R>) -> Vec<R> {
    store.find(&Filter::All, None).await.unwrap().collect().await
}

#[tokio::test]
async fn instantiate_project_template() {
    let server = Server::setup();
    let mut parser = TemplateParser::new(project_template(), TemplateOptions::default()).unwrap();

    let report = parser
        .instantiate(&server.facade, &context("u1"))
        .await
        .unwrap();

    assert_eq!(
        (
            report.collections,
            report.link_types,
            report.documents,
            report.link_instances,
            report.views
        ),
        (2, 1, 2, 1, 1)
    );

    let dictionary = parser.dictionary();
    let real = |kind: ResourceKind, placeholder: &str| {
        dictionary.get(kind, placeholder).unwrap().to_string()
    };
    let tasks = real(ResourceKind::Collection, TASKS);
    let people = real(ResourceKind::Collection, PEOPLE);
    let assignee = real(ResourceKind::LinkType, ASSIGNEE);
    let task = real(ResourceKind::Document, TASK);
    let alice = real(ResourceKind::Document, ALICE);
    let board = real(ResourceKind::View, BOARD);
    assert_ne!(tasks, TASKS);

    let workspace = server.workspace();

    let collection = workspace.collections.get(&tasks).await.unwrap().unwrap();
    assert_eq!(collection.name, "Tasks");
    assert!(collection
        .permissions
        .user_roles("u1")
        .unwrap()
        .contains(&Role::Manage));

    let link_type = workspace.link_types.get(&assignee).await.unwrap().unwrap();
    assert_eq!(link_type.collection_ids, vec![tasks.clone(), people.clone()]);

    let document = workspace.documents.get(&task).await.unwrap().unwrap();
    assert_eq!(document.collection_id, tasks);
    assert_eq!(document.created_by.as_deref(), Some("u1"));
    assert_eq!(document.data_version, 1);
    assert_eq!(document.data["a1"], ConfigValue::from("Write docs"));
    assert_eq!(document.data["a2"], ConfigValue::Int(42));
    assert_eq!(
        document.data["a3"],
        ConfigValue::Date(Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap())
    );

    let link_instances = all(workspace.link_instances.as_ref()).await;
    assert_eq!(link_instances.len(), 1);
    assert_eq!(link_instances[0].link_type_id, assignee);
    assert_eq!(link_instances[0].document_ids, vec![task.clone(), alice]);

    let view = server.facade.get_view(&context("u1"), &board).await.unwrap();
    assert_eq!(view.code, "TASKB");
    assert_eq!(view.author_id.as_deref(), Some("u1"));

    let stem = &view.query.stems[0];
    assert_eq!(stem.collection_id.as_deref(), Some(tasks.as_str()));
    // unmapped references stay in place as null
    assert_eq!(stem.link_type_ids, Some(vec![Some(assignee), None]));
    assert_eq!(
        stem.document_ids.as_ref().unwrap().iter().collect::<Vec<_>>(),
        vec![&Some(task.clone())]
    );
    let filters = stem.filters.as_ref().unwrap();
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[0].collection_id.as_deref(), Some(tasks.as_str()));
    assert_eq!(filters[1].collection_id, None);
    assert_eq!(filters[1].attribute_id, "a2");
    assert_eq!(filters[1].condition, "gt");

    assert_eq!(
        view.config.get_path(&["table", "collection"]),
        Some(&ConfigValue::String(tasks.clone()))
    );
    assert_eq!(
        view.config.get_path(&["table", "width"]),
        Some(&ConfigValue::Int(120))
    );
    assert!(matches!(
        view.config.get_path(&["table", "since"]),
        Some(ConfigValue::Date(_))
    ));
    assert_eq!(
        view.config.get_path(&["table", "label"]),
        Some(&ConfigValue::from("Tasks"))
    );
    assert_eq!(
        view.config.get_path(&[people.as_str(), "hidden"]),
        Some(&ConfigValue::Bool(true))
    );
    assert!(view.config.get_path(&[PEOPLE]).is_none());

    // the listed views are the caller's only
    assert_eq!(
        server
            .facade
            .get_views_by_collection(&context("u1"), &tasks)
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(server
        .facade
        .get_views(&context("u2"), None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn instantiate_keeps_placeholder_ids() {
    let server = Server::setup();
    let template = project_template();
    let mut parser = TemplateParser::new(template.clone(), TemplateOptions::default()).unwrap();

    parser
        .instantiate(&server.facade, &context("u1"))
        .await
        .unwrap();

    assert_eq!(parser.template(), &template);
}

#[tokio::test]
async fn unresolved_view_root_stops_instantiation() {
    let server = Server::setup();
    let template = json!({
        "collections": [{ "_id": TASKS, "name": "Tasks" }],
        "views": [
            { "_id": "first", "name": "First", "query": { "stems": [{ "collectionId": TASKS }] } },
            { "_id": "second", "name": "Second", "query": { "stems": [{ "collectionId": "elsewhere" }] } },
            { "_id": "third", "name": "Third" },
        ],
    });
    let mut parser = TemplateParser::new(template.clone(), TemplateOptions::default()).unwrap();

    let err = parser
        .instantiate(&server.facade, &context("u1"))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        Error::TemplateNotAvailable(TemplateError::UnresolvedReference {
            kind: ResourceKind::Collection,
            placeholder,
        }) if placeholder == "elsewhere"
    ));

    let output = serde_json::to_value(ErrorOutput::from(&err)).unwrap();
    assert_eq!(output["error"]["code"], json!("failed-precondition"));
    assert_eq!(
        output["error"]["reason"],
        json!("template/unresolved-reference")
    );

    // what was created before the failure stays
    let workspace = server.workspace();
    assert_eq!(all(workspace.collections.as_ref()).await.len(), 1);
    let views: Vec<View> = all(workspace.views.as_ref()).await;
    assert_eq!(
        views.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        vec!["First"]
    );

    assert!(parser.dictionary().get(ResourceKind::View, "first").is_some());
    assert_eq!(parser.template(), &template);
}

#[tokio::test]
async fn unresolved_document_collection() {
    let server = Server::setup();
    let mut parser = TemplateParser::new(
        json!({ "documents": [{ "_id": TASK, "collectionId": TASKS }] }),
        TemplateOptions::default(),
    )
    .unwrap();

    let err = parser
        .instantiate(&server.facade, &context("u1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::TemplateNotAvailable(TemplateError::UnresolvedReference {
            kind: ResourceKind::Collection,
            ..
        })
    ));
    assert!(all(server.workspace().documents.as_ref()).await.is_empty());
}

#[tokio::test]
async fn instantiate_needs_project_write() {
    let server = Server::setup();
    let mut parser = TemplateParser::new(project_template(), TemplateOptions::default()).unwrap();

    let err = parser
        .instantiate(&server.facade, &context(OUTSIDER))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Unauthorized {
            resource_type: ResourceType::Project,
            role: Role::Write,
        }
    ));
    assert!(all(server.workspace().collections.as_ref()).await.is_empty());
}

#[tokio::test]
async fn malformed_templates() {
    let server = Server::setup();

    let mut parser =
        TemplateParser::new(json!({ "views": {} }), TemplateOptions::default()).unwrap();
    assert!(matches!(
        parser.instantiate(&server.facade, &context("u1")).await,
        Err(Error::TemplateNotAvailable(TemplateError::MalformedSource { .. }))
    ));

    let mut parser = TemplateParser::new(
        json!({ "collections": [{ "name": "No placeholder" }] }),
        TemplateOptions::default(),
    )
    .unwrap();
    assert!(matches!(
        parser.instantiate(&server.facade, &context("u1")).await,
        Err(Error::TemplateNotAvailable(
            TemplateError::MissingPlaceholderId { .. }
        ))
    ));
}

#[tokio::test]
async fn template_view_code_collision() {
    let server = Server::setup();
    server
        .facade
        .create_view(
            &context("u2"),
            View {
                code: "BOARD".to_string(),
                name: "Existing".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut parser = TemplateParser::new(
        json!({ "views": [{ "_id": BOARD, "code": "BOARD", "name": "Board" }] }),
        TemplateOptions::default(),
    )
    .unwrap();

    assert!(matches!(
        parser.instantiate(&server.facade, &context("u1")).await,
        Err(Error::DuplicateKey {
            resource_type: ResourceType::View,
            ..
        })
    ));
}

#[tokio::test]
async fn custom_date_format() {
    let server = Server::setup();
    let mut parser = TemplateParser::new(
        json!({
            "collections": [{ "_id": TASKS, "name": "Tasks" }],
            "documents": [{ "_id": TASK, "collectionId": TASKS, "data": { "due": "02.01.2020" } }],
        }),
        TemplateOptions::with_date_format(Some("%d.%m.%Y")),
    )
    .unwrap();

    parser
        .instantiate(&server.facade, &context("u1"))
        .await
        .unwrap();

    let task = parser
        .dictionary()
        .get(ResourceKind::Document, TASK)
        .unwrap();
    let document = server
        .workspace()
        .documents
        .get(task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        document.data["due"],
        ConfigValue::Date(Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn load_from_sources() {
    let server = Server::setup();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(project_template().to_string().as_bytes())
        .unwrap();

    let mut parser = TemplateParser::load(
        &FileTemplate::new(file.path()),
        TemplateOptions::default(),
    )
    .await
    .unwrap();
    let report = parser
        .instantiate(&server.facade, &context("u1"))
        .await
        .unwrap();
    assert_eq!(report.views, 1);

    let parser = TemplateParser::load(
        &JsonTemplate::new(json!({ "views": [] })),
        TemplateOptions::default(),
    )
    .await
    .unwrap();
    assert!(parser.dictionary().is_empty());

    assert!(matches!(
        TemplateParser::load(
            &FileTemplate::new(file.path().with_extension("missing")),
            TemplateOptions::default(),
        )
        .await,
        Err(Error::TemplateNotAvailable(TemplateError::Io(_)))
    ));
}
