//! Integration tests for REST API endpoints
//!
//! These tests build the real router over in-memory repositories, a mock
//! generation provider and mockito stand-ins for GitHub.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::sync::Arc;
use techwiser_llm::{
    AppGenerator, MockProvider, ModelCatalog, ProviderRouter, ProviderSettings, StaticResolver,
};
use techwiser_repository::{InMemoryProjectRepository, InMemoryWorkspaceRepository};
use techwiser_server::api::{create_router, AppState};
use techwiser_server::config::GitHubConfig;
use techwiser_server::github::GitHubClient;
use tower::ServiceExt;

const PUBLIC_URL: &str = "http://localhost:3000";

fn mock_generator() -> AppGenerator {
    AppGenerator::with_defaults(Arc::new(StaticResolver::new(Arc::new(MockProvider::new()))))
}

fn test_state(generator: AppGenerator, github: GitHubConfig) -> AppState {
    AppState {
        projects: Arc::new(InMemoryProjectRepository::new()),
        workspaces: Arc::new(InMemoryWorkspaceRepository::new()),
        generator: Arc::new(generator),
        // Nothing listens on the discard port, so the fallback list is served
        catalog: Arc::new(ModelCatalog::with_base_url("http://127.0.0.1:9")),
        github: Arc::new(GitHubClient::new(github, PUBLIC_URL).unwrap()),
    }
}

fn test_router() -> Router {
    create_router(test_state(mock_generator(), GitHubConfig::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>, axum::http::HeaderMap) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body, headers)
}

async fn send_json(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let (status, bytes, _) = send(app, request).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router();
    let (status, body) = send_json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_project_crud() {
    let app = test_router();

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/projects",
        Some(json!({
            "title": "Todo",
            "date": "10:30",
            "files": [{"path": "App.tsx", "content": "x"}],
            "lastPrompt": "a todo app",
            "pinned": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(created["createdAt"].is_string());
    assert!(created["expiresAt"].is_string());
    assert_eq!(created["pinned"], true);

    let (status, list) = send_json(&app, "GET", "/api/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = send_json(
        &app,
        "PATCH",
        &format!("/api/projects/{}", id),
        Some(json!({"title": "Renamed", "color": "blue"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Renamed");
    assert_eq!(updated["color"], "blue");
    assert_eq!(updated["lastPrompt"], "a todo app");

    let (status, deleted) = send_json(&app, "DELETE", &format!("/api/projects/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({"success": true}));

    let (_, list) = send_json(&app, "GET", "/api/projects", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_patch_missing_project() {
    let app = test_router();
    let (status, body) = send_json(
        &app,
        "PATCH",
        "/api/projects/does-not-exist",
        Some(json!({"title": "x"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn test_patch_expired_project() {
    let mut state = test_state(mock_generator(), GitHubConfig::default());
    state.projects = Arc::new(InMemoryProjectRepository::new().with_ttl(Duration::zero()));
    let app = create_router(state);

    let (status, project) =
        send_json(&app, "POST", "/api/projects", Some(json!({"title": "Old"}))).await;
    assert_eq!(status, StatusCode::OK);
    let id = project["id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "PATCH",
        &format!("/api/projects/{}", id),
        Some(json!({"title": "revived"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn test_delete_missing_project_succeeds() {
    let app = test_router();
    let (status, body) = send_json(&app, "DELETE", "/api/projects/nope", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/api/projects")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();

    let (status, bytes, _) = send(&app, request).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap().contains("JSON"));
}

#[tokio::test]
async fn test_generate_creates_then_continues_project() {
    let app = test_router();

    let (status, project) = send_json(
        &app,
        "POST",
        "/api/generate",
        Some(json!({"prompt": "Build a habit tracker with streaks", "language": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(project["title"], "[Respond in Hindi] Build a hab...");
    assert_eq!(project["lastPrompt"], "[Respond in Hindi] Build a habit tracker with streaks");
    assert_eq!(project["files"][0]["path"], "App.tsx");
    assert_eq!(project["chatHistory"].as_array().unwrap().len(), 2);
    assert_eq!(project["chatHistory"][1]["role"], "model");
    assert_eq!(project["chatHistory"][1]["content"], "Mock app");

    let id = project["id"].as_str().unwrap().to_string();
    let (status, follow_up) = send_json(
        &app,
        "POST",
        "/api/generate",
        Some(json!({"prompt": "add a dark theme", "projectId": id})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(follow_up["id"], project["id"]);
    assert_eq!(follow_up["title"], project["title"]);
    assert_eq!(follow_up["chatHistory"].as_array().unwrap().len(), 4);

    let (status, regenerated) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{}/regenerate", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regenerated["lastPrompt"], "add a dark theme");
    assert_eq!(regenerated["chatHistory"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_regenerate_without_last_prompt() {
    let app = test_router();
    let (_, project) = send_json(
        &app,
        "POST",
        "/api/projects",
        Some(json!({"title": "Draft", "files": [{"path": "App.tsx", "content": "x"}]})),
    )
    .await;
    let id = project["id"].as_str().unwrap();

    let (status, body) = send_json(
        &app,
        "POST",
        &format!("/api/projects/{}/regenerate", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Project has no prompt to regenerate");

    let (_, unchanged) = send_json(&app, "GET", "/api/projects", None).await;
    assert_eq!(unchanged[0]["chatHistory"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_generate_validation_errors() {
    let app = test_router();

    let (status, body) = send_json(&app, "POST", "/api/generate", Some(json!({"prompt": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Prompt is required");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/generate",
        Some(json!({"prompt": "hi", "projectId": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");
}

#[tokio::test]
async fn test_generate_without_key_is_unauthorized() {
    let router = ProviderRouter::new(ProviderSettings::default()).unwrap();
    let app = create_router(test_state(
        AppGenerator::with_defaults(Arc::new(router)),
        GitHubConfig::default(),
    ));

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/generate",
        Some(json!({"prompt": "a todo app"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);

    let (status, _) = send_json(
        &app,
        "POST",
        "/api/generate",
        Some(json!({"prompt": "a todo app", "model": "arcee-ai/trinity-large-preview:free"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_generate_unparseable_response_is_bad_gateway() {
    let provider = MockProvider::with_response("Sorry, I cannot help with that.".to_string());
    let app = create_router(test_state(
        AppGenerator::with_defaults(Arc::new(StaticResolver::new(Arc::new(provider)))),
        GitHubConfig::default(),
    ));

    let (status, body) = send_json(&app, "POST", "/api/generate", Some(json!({"prompt": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        body["error"],
        "The AI returned an invalid response format. Please try again."
    );
}

#[tokio::test]
async fn test_export_and_bundle() {
    let app = test_router();

    let (_, project) = send_json(
        &app,
        "POST",
        "/api/projects",
        Some(json!({
            "title": "Two files",
            "files": [
                {"path": "App.tsx", "content": "export default App;"},
                {"path": "components/Button.tsx", "content": "export const Button = 1;"}
            ]
        })),
    )
    .await;
    let id = project["id"].as_str().unwrap();

    let request = Request::builder()
        .uri(format!("/api/projects/{}/export", id))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, headers) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/zip");
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"techwiser-project-"));
    assert!(disposition.ends_with(".zip\""));
    assert_eq!(&bytes[..2], b"PK");

    let request = Request::builder()
        .uri(format!("/api/projects/{}/bundle", id))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, headers) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "// App.tsx\nexport default App;\n\n// components/Button.tsx\nexport const Button = 1;"
    );
}

#[tokio::test]
async fn test_export_empty_project() {
    let app = test_router();
    let (_, project) = send_json(&app, "POST", "/api/projects", Some(json!({"title": "Empty"}))).await;
    let id = project["id"].as_str().unwrap();

    let (status, body) = send_json(&app, "GET", &format!("/api/projects/{}/export", id), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Project has no files to export");

    let request = Request::builder()
        .uri(format!("/api/projects/{}/bundle", id))
        .body(Body::empty())
        .unwrap();
    let (status, bytes, headers) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/plain"));
    assert!(bytes.is_empty());

    let (status, _) = send_json(&app, "GET", "/api/projects/missing/export", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_models_endpoint_falls_back() {
    let app = test_router();
    let (status, body) = send_json(&app, "GET", "/api/models", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gemini"][0]["id"], "gemini-2.5-flash");
    assert_eq!(body["gemini"][0]["isGemini"], true);

    let openrouter = body["openrouter"].as_array().unwrap();
    assert_eq!(openrouter.len(), 3);
    assert_eq!(openrouter[0]["id"], "stepfun/step-3.5-flash:free");
}

#[tokio::test]
async fn test_github_login() {
    let app = test_router();
    let (status, body) = send_json(&app, "GET", "/api/github/login", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Client ID"));

    let app = create_router(test_state(
        mock_generator(),
        GitHubConfig {
            client_id: Some("Iv1.abc".to_string()),
            ..Default::default()
        },
    ));
    let request = Request::builder()
        .uri("/api/github/login")
        .body(Body::empty())
        .unwrap();
    let (status, _, headers) = send(&app, request).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    let location = headers[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://github.com/login/oauth/authorize?client_id=Iv1.abc"));
    assert!(location.contains("scope=repo+workflow"));
}

#[tokio::test]
async fn test_github_callback_token_exchange() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/login/oauth/access_token")
        .match_header("accept", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "client_id": "cid",
            "client_secret": "secret",
            "code": "abc"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "gho_123", "token_type": "bearer"}"#)
        .create_async()
        .await;

    let app = create_router(test_state(
        mock_generator(),
        GitHubConfig {
            client_id: Some("cid".to_string()),
            client_secret: Some("secret".to_string()),
            oauth_base_url: server.url(),
            ..Default::default()
        },
    ));

    let request = Request::builder()
        .uri("/api/github/callback?code=abc&state=xyz")
        .body(Body::empty())
        .unwrap();
    let (status, _, headers) = send(&app, request).await;

    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers[header::LOCATION], "http://localhost:3000/?github_token=gho_123");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_github_callback_error_from_token_endpoint() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/login/oauth/access_token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "bad_verification_code"}"#)
        .create_async()
        .await;

    let app = create_router(test_state(
        mock_generator(),
        GitHubConfig {
            client_id: Some("cid".to_string()),
            client_secret: Some("secret".to_string()),
            oauth_base_url: server.url(),
            ..Default::default()
        },
    ));

    let request = Request::builder()
        .uri("/api/github/callback?code=stale")
        .body(Body::empty())
        .unwrap();
    let (_, _, headers) = send(&app, request).await;
    assert_eq!(
        headers[header::LOCATION],
        "http://localhost:3000/?github_error=bad_verification_code"
    );
}

async fn router_with_github_api(api_base_url: String) -> Router {
    create_router(test_state(
        mock_generator(),
        GitHubConfig {
            api_base_url,
            ..Default::default()
        },
    ))
}

#[tokio::test]
async fn test_github_push() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/user/repos")
        .match_header("authorization", "Bearer gho_123")
        .match_body(Matcher::PartialJson(json!({"name": "habit-app", "private": true})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "name": "habit-app",
                "html_url": "https://github.com/octo/habit-app",
                "owner": {"login": "octo"}
            })
            .to_string(),
        )
        .create_async()
        .await;
    let upload = server
        .mock("PUT", "/repos/octo/habit-app/contents/src/App.tsx")
        .match_body(Matcher::PartialJson(json!({
            "message": "Add src/App.tsx",
            "content": "aGVsbG8="
        })))
        .with_status(201)
        .with_body("{}")
        .create_async()
        .await;

    let app = router_with_github_api(server.url()).await;
    let (_, project) = send_json(
        &app,
        "POST",
        "/api/projects",
        Some(json!({"files": [{"path": "./src/App.tsx", "content": "hello"}]})),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/github/push",
        Some(json!({
            "token": "gho_123",
            "repoName": "habit-app",
            "private": true,
            "projectId": project["id"]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://github.com/octo/habit-app");
    assert_eq!(body["filesPushed"], 1);
    create.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn test_github_push_existing_repository() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/user/repos")
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Repository creation failed."}"#)
        .create_async()
        .await;

    let app = router_with_github_api(server.url()).await;
    let (_, project) = send_json(
        &app,
        "POST",
        "/api/projects",
        Some(json!({"files": [{"path": "App.tsx", "content": "x"}]})),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/github/push",
        Some(json!({"token": "gho_1", "repoName": "taken", "projectId": project["id"]})),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Repository already exists");
}

#[tokio::test]
async fn test_github_push_bad_credentials() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/user/repos")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Bad credentials"}"#)
        .create_async()
        .await;

    let app = router_with_github_api(server.url()).await;
    let (_, project) = send_json(
        &app,
        "POST",
        "/api/projects",
        Some(json!({"files": [{"path": "App.tsx", "content": "x"}]})),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/github/push",
        Some(json!({"token": "expired", "repoName": "demo", "projectId": project["id"]})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Bad credentials");
}

#[tokio::test]
async fn test_workspace_lifecycle() {
    let app = test_router();

    let (status, created) = send_json(
        &app,
        "POST",
        "/api/workspaces",
        Some(json!({"messages": [{"role": "user", "content": "hi"}], "userToken": "tok-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, listed) = send_json(&app, "GET", "/api/workspaces?userToken=tok-1", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["_id"], id.as_str());

    let (_, anonymous) = send_json(&app, "GET", "/api/workspaces", None).await;
    assert!(anonymous.as_array().unwrap().is_empty());

    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/workspaces/{}/files", id),
        Some(json!({"files": {"App.tsx": {"code": "x"}}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, workspace) = send_json(&app, "GET", &format!("/api/workspaces/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(workspace["fileData"]["App.tsx"]["code"], "x");
    assert_eq!(workspace["userToken"], "tok-1");

    let (status, outcome) = send_json(&app, "DELETE", &format!("/api/workspaces/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["success"], true);

    let (status, _) = send_json(&app, "GET", &format!("/api/workspaces/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_workspace_missing_updates() {
    let app = test_router();

    let (status, body) = send_json(
        &app,
        "PUT",
        "/api/workspaces/ghost/messages",
        Some(json!({"messages": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Workspace not found");

    let (status, outcome) = send_json(&app, "DELETE", "/api/workspaces/ghost", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["success"], false);
    assert!(outcome["error"].is_string());
}
