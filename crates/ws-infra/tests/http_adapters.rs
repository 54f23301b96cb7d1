use mockito::{Matcher, Server};
use serde_json::json;
use ws_core::config::ApiConfig;
use ws_core::entity::{ActionMethod, ActionSpec, CollectionQuery, FilterState};
use ws_core::ids::{EntityId, ListId, MembershipId};
use ws_core::list::{ListKind, NewList};
use ws_core::ports::{ApiError, EntityApiPort, ListApiPort, ModuleSourcePort};
use ws_infra::{HttpEntityApi, HttpListApi, HttpModuleSource, RestClient};

fn client(server: &Server) -> RestClient {
    RestClient::from_config(&ApiConfig {
        base_url: server.url(),
        session_cookie: Some("sid=abc".to_string()),
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn collection_read_sends_search_page_and_skips_empty_filters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/contacts")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "john".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("limit".into(), "10".into()),
        ]))
        .match_header("cookie", "sid=abc")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"contacts":[{"id":1,"name":"John"}]}"#)
        .create_async()
        .await;

    let mut filters = FilterState::new();
    filters.set("status", "");
    filters.set_search("john");
    let query = CollectionQuery::build(1, 10, &filters, None);

    let body = HttpEntityApi::new(client(&server))
        .fetch_collection("contacts", &query)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(body["contacts"][0]["name"], "John");
}

#[tokio::test]
async fn error_status_carries_server_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/contacts")
        .with_status(422)
        .with_body(r#"{"message":"Email already taken"}"#)
        .create_async()
        .await;

    let err = HttpEntityApi::new(client(&server))
        .create("contacts", &json!({"email": "a@b.c"}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 422,
            message: Some("Email already taken".to_string()),
        }
    );
}

#[tokio::test]
async fn delete_returns_optional_deleted_item() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/api/tasks/7")
        .with_status(200)
        .with_body(r#"{"deletedItem":{"id":7,"title":"Call"}}"#)
        .create_async()
        .await;
    server
        .mock("DELETE", "/api/tasks/8")
        .with_status(204)
        .create_async()
        .await;

    let api = HttpEntityApi::new(client(&server));
    let body = api.delete("tasks", &EntityId::from("7")).await.unwrap();
    assert_eq!(body.unwrap()["deletedItem"]["title"], "Call");
    assert!(api.delete("tasks", &EntityId::from("8")).await.unwrap().is_none());
}

#[tokio::test]
async fn undo_posts_deleted_item() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tasks/7/undo")
        .match_body(Matcher::Json(json!({"deletedItem": {"id": 7}})))
        .with_status(200)
        .create_async()
        .await;

    HttpEntityApi::new(client(&server))
        .undo_delete("tasks", &EntityId::from("7"), &json!({"id": 7}))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn custom_action_uses_declared_method_and_path() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/api/leads/35/convert")
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let action = ActionSpec {
        key: "convert".to_string(),
        label: "Convert".to_string(),
        path: "convert".to_string(),
        method: ActionMethod::Put,
        confirm: None,
    };
    HttpEntityApi::new(client(&server))
        .invoke_action("leads", &EntityId::from("35"), &action)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn list_endpoints_round_trip() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/lists")
        .match_query(Matcher::UrlEncoded("entityType".into(), "contacts".into()))
        .with_status(200)
        .with_body(r#"[{"id":3,"name":"VIPs","entityType":"contacts","type":"static","memberCount":2}]"#)
        .create_async()
        .await;
    server
        .mock("POST", "/api/lists")
        .match_body(Matcher::PartialJson(json!({"name": "Hot", "type": "smart"})))
        .with_status(201)
        .with_body(r#"{"list":{"id":4,"name":"Hot","entityType":"contacts","type":"smart"}}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/api/lists/3/members")
        .with_status(200)
        .with_body(r#"[{"id":"m1","entityId":1},{"id":"m2","entityId":2}]"#)
        .create_async()
        .await;
    let add = server
        .mock("POST", "/api/lists/3/members")
        .match_body(Matcher::Json(json!({"entityIds": ["5", "6"]})))
        .with_status(200)
        .create_async()
        .await;
    let remove = server
        .mock("DELETE", "/api/lists/3/members/m1")
        .with_status(204)
        .create_async()
        .await;

    let api = HttpListApi::new(client(&server));
    let lists = api.lists("contacts").await.unwrap();
    assert_eq!(lists[0].member_count, Some(2));

    let created = api
        .create_list(&NewList {
            name: "Hot".to_string(),
            entity_type: "contacts".to_string(),
            kind: ListKind::Smart,
        })
        .await
        .unwrap();
    assert_eq!(created.id, ListId::from("4"));

    let list_id = ListId::from("3");
    let members = api.members(&list_id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1].entity_id, EntityId::from("2"));

    api.add_members(&list_id, &[EntityId::from("5"), EntityId::from("6")])
        .await
        .unwrap();
    api.remove_member(&list_id, &MembershipId::from("m1"))
        .await
        .unwrap();

    add.assert_async().await;
    remove.assert_async().await;
}

#[tokio::test]
async fn module_source_maps_non_success_to_status() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/widgets/chart.js")
        .with_status(200)
        .with_body("export default {}")
        .create_async()
        .await;
    server
        .mock("GET", "/widgets/missing.js")
        .with_status(404)
        .create_async()
        .await;

    let source = HttpModuleSource::new(client(&server));
    assert_eq!(
        source.fetch_module("/widgets/chart.js").await.unwrap(),
        "export default {}"
    );
    let err = source.fetch_module("/widgets/missing.js").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}
