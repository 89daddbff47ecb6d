//! API description, docs assets, health and banner.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestApp;
use team_roles_api::app::LEGACY_CONTENT_TYPE;
use tower::ServiceExt;

#[tokio::test]
async fn test_swagger_document() {
    let ctx = TestApp::new().await;

    let (status, body) = ctx.get("/api/swagger.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["openapi"], "3.0.3");

    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/team/{team_id}",
        "/teams",
        "/role/{role_id}",
        "/roles",
        "/team/assign/role",
        "/team/{team_name}/roles",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }

    assert_eq!(body["paths"]["/team/assign/role"]["post"]["tags"][0], "Team Role");
    assert_eq!(
        body["paths"]["/teams"]["post"]["requestBody"]["content"]["application/json"]["schema"]["$ref"],
        "#/components/schemas/TeamCreate"
    );
}

#[tokio::test]
async fn test_health_check() {
    let ctx = TestApp::new().await;

    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_i64());
}

#[tokio::test]
async fn test_banner() {
    let ctx = TestApp::new().await;

    let (status, bytes) = ctx
        .send_bytes(Request::get("/").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().starts_with("Team Roles API"));
}

#[tokio::test]
async fn test_json_endpoints_send_legacy_content_type() {
    let ctx = TestApp::new().await;

    for uri in ["/teams", "/team/9", "/roles", "/api/swagger.json", "/health"] {
        let response = ctx
            .app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers().get(LEGACY_CONTENT_TYPE);
        assert_eq!(
            header.and_then(|v| v.to_str().ok()),
            Some("application/json"),
            "{} is missing the ContentType header",
            uri
        );
        assert_eq!(response.headers()["content-type"], "application/json");
    }
}

#[tokio::test]
async fn test_docs_assets() {
    let ctx = TestApp::new().await;

    for uri in ["/docs", "/docs/"] {
        let (status, bytes) = ctx
            .send_bytes(Request::get(uri).body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(String::from_utf8(bytes).unwrap().contains("/api/swagger.json"));
    }

    let (status, bytes) = ctx
        .send_bytes(Request::get("/docs/index.html").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8(bytes).unwrap().contains("/api/swagger.json"));

    let (status, _) = ctx
        .send_bytes(Request::get("/docs/missing.js").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
