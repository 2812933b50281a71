//! Unit tests for ConvexWorkspaceRepository
//!
//! These tests use mockito to mock the Convex function API.

#![cfg(feature = "convex")]

use mockito::{Matcher, Server};
use serde_json::json;
use techwiser_repository::{ConvexWorkspaceRepository, RepositoryError, WorkspaceRepository};

fn success(value: serde_json::Value) -> String {
    json!({"status": "success", "value": value}).to_string()
}

fn repo(server: &Server) -> ConvexWorkspaceRepository {
    ConvexWorkspaceRepository::new(server.url(), None::<String>).unwrap()
}

#[tokio::test]
async fn test_create_workspace() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/mutation")
        .match_header("authorization", "Convex deploy-key")
        .match_body(Matcher::Json(json!({
            "path": "workspace:CreateWorkspace",
            "args": {"messages": [{"role": "user", "content": "hi"}], "userToken": "tok"},
            "format": "json"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(success(json!("jd7abc")))
        .create_async()
        .await;

    let repo = ConvexWorkspaceRepository::new(server.url(), Some("deploy-key")).unwrap();
    let id = repo
        .create_workspace(json!([{"role": "user", "content": "hi"}]), Some("tok".to_string()))
        .await
        .unwrap();

    assert_eq!(id, "jd7abc");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_workspace_omits_missing_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/mutation")
        .match_body(Matcher::Json(json!({
            "path": "workspace:CreateWorkspace",
            "args": {"messages": []},
            "format": "json"
        })))
        .with_status(200)
        .with_body(success(json!("id1")))
        .create_async()
        .await;

    repo(&server).create_workspace(json!([]), None).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_without_token_skips_backend() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/query")
        .expect(0)
        .create_async()
        .await;

    let workspaces = repo(&server).list_workspaces(None).await.unwrap();
    assert!(workspaces.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_list_workspaces() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/query")
        .match_body(Matcher::PartialJson(json!({
            "path": "workspace:GetAllWorkspaces",
            "args": {"userToken": "tok"}
        })))
        .with_status(200)
        .with_body(success(json!([
            {"_id": "a", "_creationTime": 1.0, "messages": [], "userToken": "tok"},
            {"_id": "b", "_creationTime": 2.0, "messages": [], "fileData": {"x": 1}, "userToken": "tok"}
        ])))
        .create_async()
        .await;

    let workspaces = repo(&server).list_workspaces(Some("tok")).await.unwrap();
    assert_eq!(workspaces.len(), 2);
    assert_eq!(workspaces[1].file_data, Some(json!({"x": 1})));
}

#[tokio::test]
async fn test_get_missing_workspace() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(success(serde_json::Value::Null))
        .create_async()
        .await;

    assert!(repo(&server).get_workspace("gone").await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_messages_checks_existence() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(success(json!({"_id": "a", "messages": []})))
        .create_async()
        .await;
    let update = server
        .mock("POST", "/api/mutation")
        .match_body(Matcher::PartialJson(json!({
            "path": "workspace:UpdateWorkspace",
            "args": {"workspaceId": "a", "messages": ["m"]}
        })))
        .with_status(200)
        .with_body(success(serde_json::Value::Null))
        .create_async()
        .await;

    assert!(repo(&server).update_messages("a", json!(["m"])).await.unwrap());
    update.assert_async().await;
}

#[tokio::test]
async fn test_update_files_on_missing_workspace() {
    let mut server = Server::new_async().await;
    let _get = server
        .mock("POST", "/api/query")
        .with_status(200)
        .with_body(success(serde_json::Value::Null))
        .create_async()
        .await;
    let update = server
        .mock("POST", "/api/mutation")
        .expect(0)
        .create_async()
        .await;

    assert!(!repo(&server).update_files("a", json!({})).await.unwrap());
    update.assert_async().await;
}

#[tokio::test]
async fn test_function_error_is_backend_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/query")
        .with_status(400)
        .with_body(r#"{"status": "error", "errorMessage": "ArgumentValidationError: Value does not match validator."}"#)
        .create_async()
        .await;

    let err = repo(&server).get_workspace("not-an-id").await.unwrap_err();
    match err {
        RepositoryError::Backend(msg) => assert!(msg.contains("ArgumentValidationError")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_http_failure_is_api_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/query")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let err = repo(&server).get_workspace("a").await.unwrap_err();
    assert!(matches!(err, RepositoryError::ApiError(_)));
}

#[tokio::test]
async fn test_delete_reports_failure_in_outcome() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/api/mutation")
        .with_status(200)
        .with_body(success(json!({"success": false, "error": "Delete on nonexistent document"})))
        .create_async()
        .await;

    let outcome = repo(&server).delete_workspace("a").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("Delete on nonexistent document"));
}
