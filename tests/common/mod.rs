//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which starts wiremock stand-ins for Radarr and
//! Unmanic and builds an [`AppContext`] whose real HTTP clients point at them.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use http_body_util::BodyExt;
use radarr_relay::config::{Config, LibraryId, RadarrConfig, RuleConfig, UnmanicConfig, WebhookConfig};
use radarr_relay::server::{create_router, AppContext};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestHarness {
    pub radarr: MockServer,
    pub unmanic: MockServer,
    pub config: Config,
}

impl TestHarness {
    /// Webhook enabled, Radarr knows quality profile 4 = "HD", Unmanic has
    /// libraries 1 (`/lib1`) and 2 (`/lib4k`).
    pub async fn new(rules: Vec<RuleConfig>) -> Self {
        let radarr = MockServer::start().await;
        let unmanic = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/qualityprofile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 4, "name": "HD" },
                { "id": 5, "name": "Ultra-HD" }
            ])))
            .mount(&radarr)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/v3/tag"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "label": "4k" }
            ])))
            .mount(&radarr)
            .await;

        Mock::given(method("GET"))
            .and(path("/unmanic/api/v2/settings/libraries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "libraries": [
                    { "id": 1, "name": "Default", "path": "/lib1" },
                    { "id": 2, "name": "4K", "path": "/lib4k" }
                ]
            })))
            .mount(&unmanic)
            .await;

        let config = Config {
            radarr: RadarrConfig {
                url: radarr.uri(),
                api_key: "test-key".to_string(),
            },
            unmanic: UnmanicConfig { url: unmanic.uri() },
            webhook: WebhookConfig {
                enabled: true,
                signature_secret: None,
                rules,
            },
            ..Default::default()
        };

        Self {
            radarr,
            unmanic,
            config,
        }
    }

    pub fn router(&self) -> Router {
        create_router(AppContext::new(self.config.clone()))
    }
}

pub fn rule(query: &str, library: i64, create_task: bool) -> RuleConfig {
    RuleConfig {
        query: query.to_string(),
        library_id: Some(LibraryId(library)),
        trigger_test: true,
        create_task,
    }
}

/// Download event for "Foo (2020)" with one file
pub fn download_payload() -> Value {
    json!({
        "eventType": "Download",
        "movie": {
            "id": 1,
            "title": "Foo",
            "tmdbId": 1234,
            "path": "/movies/Foo (2020)",
            "tags": [1],
            "qualityProfileId": 4
        },
        "movieFile": {
            "id": 9,
            "relativePath": "Foo.mkv",
            "path": "/movies/Foo (2020)/Foo.mkv",
            "quality": "Bluray-1080p",
            "qualityVersion": 1
        }
    })
}

pub fn webhook_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

/// Helper to get response body as JSON
pub async fn body_to_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
