//! Shared helpers for the HTTP integration tests.
//!
//! Each `TestApp` owns a fresh in-memory database, so tests never see each
//! other's rows.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePool;
use tower::ServiceExt;

use team_roles_api::app::{build_router, AppState};
use team_roles_api::config::{Profile, Settings};
use team_roles_api::db;

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut settings = Settings::for_profile(Profile::Testing);
        settings.docs_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/swagger").into();

        let pool = db::connect(&settings.database_url).await.unwrap();
        db::init_schema(&pool).await.unwrap();

        let state = AppState::new(pool.clone(), settings).unwrap();
        Self {
            app: build_router(state),
            pool,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, Some("application/json"), body.to_string()).await
    }

    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: Option<&str>,
        body: impl Into<String>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::post(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        self.send(builder.body(Body::from(body.into())).unwrap()).await
    }

    pub async fn create_team(&self, name: &str, description: &str) {
        let (status, body) = self
            .post_json("/teams", json!({ "name": name, "description": description }))
            .await;
        assert_eq!(status, StatusCode::OK, "creating team {}: {}", name, body);
    }

    pub async fn create_role(&self, name: &str, description: &str) {
        let (status, body) = self
            .post_json("/roles", json!({ "name": name, "description": description }))
            .await;
        assert_eq!(status, StatusCode::OK, "creating role {}: {}", name, body);
    }

    pub async fn assign(&self, team_name: &str, role_name: &str) -> (StatusCode, Value) {
        self.post_json(
            "/team/assign/role",
            json!({ "team_name": team_name, "role_name": role_name }),
        )
        .await
    }

    /// Sends a request and decodes the body as JSON (`Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send_bytes(request).await;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn send_bytes(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }
}
