//! Shared fixtures for the HTTP integration tests.
//!
//! The app is built with the same router as the binary, backed by the
//! in-memory record store and profile directory.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use brieflink_api::auth::jwt::{generate_access_token, JwtConfig};
use brieflink_api::config::ServerConfig;
use brieflink_api::router::build_app_router;
use brieflink_api::state::AppState;
use brieflink_core::matching::VerificationStatus;
use brieflink_core::types::DbId;
use brieflink_events::EventBus;
use brieflink_workflow::memory::{InMemoryDirectory, InMemoryStore};
use brieflink_workflow::{ProfileDirectory, RecordStore, Workflow, WorkflowConfig};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const BRAND_ACTOR: DbId = 100;
pub const OTHER_BRAND_ACTOR: DbId = 101;
pub const M1_ACTOR: DbId = 201;
pub const M2_ACTOR: DbId = 202;
/// Verified, Footwear only.
pub const M3_ACTOR: DbId = 203;
/// Authenticates but has no profile on either side.
pub const STRANGER_ACTOR: DbId = 999;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        workflow: WorkflowConfig::default(),
    }
}

pub struct TestApp {
    pub app: Router,
    pub config: ServerConfig,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = test_config();
        let store = Arc::new(InMemoryStore::new());
        let directory = Arc::new(InMemoryDirectory::new());

        directory.add_brand(BRAND_ACTOR, "Acme Apparel Co");
        directory.add_brand(OTHER_BRAND_ACTOR, "Rival Goods");
        directory.add_manufacturer(
            M1_ACTOR,
            "Northside Mills",
            VerificationStatus::Verified,
            &["Apparel"],
        );
        directory.add_manufacturer(
            M2_ACTOR,
            "Harbor Textiles",
            VerificationStatus::Verified,
            &["apparel"],
        );
        directory.add_manufacturer(
            M3_ACTOR,
            "Sole Works",
            VerificationStatus::Verified,
            &["Footwear"],
        );

        let event_bus = Arc::new(EventBus::default());
        let workflow = Workflow::new(
            Arc::clone(&store) as Arc<dyn RecordStore>,
            directory as Arc<dyn ProfileDirectory>,
            Arc::clone(&event_bus),
            config.workflow.clone(),
        );
        let state = AppState {
            config: Arc::new(config.clone()),
            workflow,
            event_bus,
        };
        let app = build_app_router(state, &config).expect("router builds");

        Self { app, config, store }
    }

    pub fn token(&self, actor_id: DbId, role: &str) -> String {
        generate_access_token(actor_id, role, &self.config.jwt).unwrap()
    }

    pub fn brand(&self) -> String {
        self.token(BRAND_ACTOR, "brand")
    }

    pub fn m1(&self) -> String {
        self.token(M1_ACTOR, "manufacturer")
    }

    pub fn m2(&self) -> String {
        self.token(M2_ACTOR, "manufacturer")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(Method::POST, uri, Some(token), None).await
    }

    /// Create and publish a brief as the default brand; returns its id.
    pub async fn open_brief(&self) -> i64 {
        let created = self.post("/api/v1/briefs", &self.brand(), brief_body()).await;
        let id = body_json(created).await["data"]["id"].as_i64().unwrap();
        let published = self
            .post_empty(&format!("/api/v1/briefs/{id}/publish"), &self.brand())
            .await;
        assert_eq!(published.status(), 200);
        id
    }

    /// Submit a proposal as `token`; returns its id.
    pub async fn submit(&self, brief_id: i64, token: &str, price: f64) -> i64 {
        let response = self
            .post(
                &format!("/api/v1/briefs/{brief_id}/proposals"),
                token,
                proposal_body(price),
            )
            .await;
        assert_eq!(response.status(), 201);
        body_json(response).await["data"]["id"].as_i64().unwrap()
    }
}

pub fn brief_body() -> Value {
    json!({
        "title": "Organic cotton tees",
        "description": "Heavyweight crew-neck tees in three colours",
        "requirements": { "product_type": "T-shirt", "quantity": 500 },
        "budget": { "min": 1000.0, "max": 5000.0 },
        "category": "Apparel",
        "timeline": "6 weeks"
    })
}

pub fn proposal_body(price: f64) -> Value {
    json!({
        "price": price,
        "delivery_timeline": "2 weeks",
        "details": { "notes": "Samples in 5 days", "minimum_order_quantity": 300 }
    })
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
