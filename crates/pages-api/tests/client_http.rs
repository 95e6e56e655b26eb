//! HTTP-level tests for `CloudflareClient` against a wiremock server.

use pages_api::{ApiError, ClientConfig, CloudflareClient, DeploymentApi, Environment, StageStatus};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DEPLOYMENTS_PATH: &str = "/accounts/acct-1/pages/projects/site/deployments";

fn client_for(server: &MockServer) -> CloudflareClient {
    let config = ClientConfig::new("test-token", "acct-1", "site")
        .with_base_url(&server.uri())
        .with_per_page(2);
    CloudflareClient::new(config).expect("client")
}

fn deployment_json(id: &str, created_on: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "short_id": &id[..4.min(id.len())],
        "created_on": created_on,
        "url": format!("https://{}.site.pages.dev", id),
        "environment": "production",
        "latest_stage": { "name": "deploy", "status": status }
    })
}

#[tokio::test]
async fn list_sends_filters_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .and(query_param("env", "preview"))
        .and(query_param("page", "3"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": [
                deployment_json("aaaa-1", "2024-01-01T00:00:00Z", "success"),
                deployment_json("bbbb-2", "2024-01-02T00:00:00.5Z", "failure"),
            ],
            "result_info": { "page": 3, "per_page": 2, "count": 2, "total_count": 6, "total_pages": 3 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_deployments(Environment::Preview, 3)
        .await
        .expect("list");

    assert_eq!(page.deployments.len(), 2);
    assert_eq!(page.deployments[0].id, "aaaa-1");
    assert_eq!(page.deployments[0].stage_status, StageStatus::Success);
    assert_eq!(page.deployments[1].stage_status, StageStatus::Failure);
    let info = page.info.expect("result_info");
    assert_eq!(info.page, 3);
    assert_eq!(info.total_pages, Some(3));
    assert_eq!(info.total_count, Some(6));
}

#[tokio::test]
async fn list_without_result_info_has_no_page_info() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": []
        })))
        .mount(&server)
        .await;

    let page = client_for(&server)
        .list_deployments(Environment::Production, 1)
        .await
        .expect("list");

    assert!(page.deployments.is_empty());
    assert!(page.info.is_none());
}

#[tokio::test]
async fn list_auth_failure_surfaces_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 10000, "message": "Authentication error" }],
            "messages": [],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_deployments(Environment::Production, 1)
        .await
        .unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("Authentication error"));
            assert!(message.contains("10000"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_success_false_with_ok_status_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 8000007, "message": "Project not found" }],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_deployments(Environment::Production, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Api { status: 200, .. }));
}

#[tokio::test]
async fn list_non_json_error_body_uses_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_deployments(Environment::Production, 1)
        .await
        .unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn list_malformed_success_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(DEPLOYMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_deployments(Environment::Production, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn delete_hits_deployment_url() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/dep-42", DEPLOYMENTS_PATH)))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "messages": [],
            "result": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_deployment("dep-42")
        .await
        .expect("delete");
}

#[tokio::test]
async fn delete_missing_deployment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/gone", DEPLOYMENTS_PATH)))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 8000009, "message": "Deployment not found" }],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_deployment("gone").await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound { ref id } if id == "gone"));
}

#[tokio::test]
async fn delete_active_alias_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/live", DEPLOYMENTS_PATH)))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [{ "code": 8000034, "message": "Cannot delete an aliased deployment" }],
            "result": null
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_deployment("live").await.unwrap_err();

    assert!(matches!(err, ApiError::Api { status: 400, .. }));
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
    let config = ClientConfig::new("t", "a", "p").with_base_url("http://127.0.0.1:1");
    let client = CloudflareClient::new(config).expect("client");

    let err = client
        .list_deployments(Environment::Production, 1)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Http(_)));
}
