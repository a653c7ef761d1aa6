//! Webhook integration tests
//!
//! Drive `POST /webhook` through the full router with Radarr and Unmanic
//! replaced by wiremock servers.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{body_to_json, download_payload, rule, webhook_request, TestHarness};
use radarr_relay::arr::{Command, CommandResponse, Movie, QualityProfile, QueueRecord, RadarrApi, Tag};
use radarr_relay::error::ServiceResult;
use radarr_relay::server::signature::{sign, SIGNATURE_HEADER};
use radarr_relay::server::{create_router, AppContext};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_event_is_acknowledged_without_calls() {
    let harness = TestHarness::new(vec![rule("True", 1, true)]).await;

    let response = harness
        .router()
        .oneshot(webhook_request(json!({ "eventType": "Test" }).to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "success": true, "message": "Test successful" }));
    assert!(harness.radarr.received_requests().await.unwrap().is_empty());
    assert!(harness.unmanic.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn lowercase_test_event_is_acknowledged() {
    let harness = TestHarness::new(vec![]).await;

    let response = harness
        .router()
        .oneshot(webhook_request(json!({ "eventType": "test" }).to_string()))
        .await
        .unwrap();

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["message"], "Test successful");
}

#[tokio::test]
async fn download_routes_and_tests_file() {
    let harness = TestHarness::new(vec![rule("quality_profile == 'HD'", 1, false)]).await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/test"))
        .and(body_partial_json(json!({ "path": "/lib1/Foo (2020)/Foo.mkv", "library_id": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "add_file_to_pending_tasks": true,
            "priority_score": 0
        })))
        .expect(1)
        .mount(&harness.unmanic)
        .await;

    let response = harness
        .router()
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["actions"],
        json!([{ "library_id": 1, "action": "test_only", "rule_index": 1 }])
    );
}

#[tokio::test]
async fn download_creates_task_with_priority() {
    let harness = TestHarness::new(vec![
        rule("'4k' in tags", 2, true),
        rule("quality_profile == 'Ultra-HD'", 1, true),
    ])
    .await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "add_file_to_pending_tasks": true,
            "priority_score": 75
        })))
        .mount(&harness.unmanic)
        .await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/create"))
        .and(body_partial_json(json!({
            "path": "/lib4k/Foo (2020)/Foo.mkv",
            "library_id": 2,
            "priority_score": 75
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&harness.unmanic)
        .await;

    let response = harness
        .router()
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    let body = body_to_json(response.into_body()).await;
    assert_eq!(
        body["actions"],
        json!([{ "library_id": 2, "action": "task_created", "rule_index": 1 }])
    );
}

#[tokio::test]
async fn not_needed_means_test_only_and_no_task() {
    let harness = TestHarness::new(vec![rule("True", 1, true)]).await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "add_file_to_pending_tasks": false,
            "priority_score": 0
        })))
        .mount(&harness.unmanic)
        .await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&harness.unmanic)
        .await;

    let response = harness
        .router()
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["actions"][0]["action"], "test_only");
}

#[tokio::test]
async fn failed_test_is_isolated_to_its_match() {
    let harness = TestHarness::new(vec![rule("True", 1, true), rule("True", 2, true)]).await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/test"))
        .and(body_partial_json(json!({ "library_id": 1 })))
        .respond_with(ResponseTemplate::new(502))
        .mount(&harness.unmanic)
        .await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/test"))
        .and(body_partial_json(json!({ "library_id": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "add_file_to_pending_tasks": true,
            "priority_score": 1
        })))
        .mount(&harness.unmanic)
        .await;

    Mock::given(method("POST"))
        .and(path("/unmanic/api/v2/pending/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&harness.unmanic)
        .await;

    let response = harness
        .router()
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(
        body["actions"],
        json!([
            { "library_id": 1, "action": "test_failed", "rule_index": 1 },
            { "library_id": 2, "action": "task_created", "rule_index": 2 }
        ])
    );
}

#[tokio::test]
async fn empty_query_means_no_rules_matched() {
    let harness = TestHarness::new(vec![rule("", 1, true)]).await;

    let response = harness
        .router()
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body, json!({ "success": false, "message": "No rules matched" }));
}

#[tokio::test]
async fn skipped_actions_are_reported() {
    let mut no_test = rule("True", 1, false);
    no_test.trigger_test = false;
    let harness = TestHarness::new(vec![no_test]).await;

    let response = harness
        .router()
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["actions"][0]["action"], "skipped");
}

#[tokio::test]
async fn other_events_are_ignored() {
    let harness = TestHarness::new(vec![rule("True", 1, true)]).await;

    let response = harness
        .router()
        .oneshot(webhook_request(
            json!({ "eventType": "Grab", "movie": { "title": "Foo" } }).to_string(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn download_without_files_is_ignored() {
    let harness = TestHarness::new(vec![rule("True", 1, true)]).await;

    let response = harness
        .router()
        .oneshot(webhook_request(
            json!({ "eventType": "Download", "movie": { "title": "Foo", "path": "/movies/Foo" } })
                .to_string(),
        ))
        .await
        .unwrap();

    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["status"], "ignored");
    assert!(harness.unmanic.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_payloads_are_rejected() {
    let harness = TestHarness::new(vec![]).await;

    for body in [
        "not json".to_string(),
        json!({ "movie": {} }).to_string(),
        json!({ "eventType": "Download" }).to_string(),
    ] {
        let response = harness.router().oneshot(webhook_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["code"], "malformed_payload");
    }
}

#[tokio::test]
async fn disabled_webhook_is_not_found() {
    let mut harness = TestHarness::new(vec![]).await;
    harness.config.webhook.enabled = false;

    let response = harness
        .router()
        .oneshot(webhook_request(json!({ "eventType": "Test" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_api_key_is_not_found() {
    let mut harness = TestHarness::new(vec![]).await;
    harness.config.radarr.api_key.clear();

    let response = harness
        .router()
        .oneshot(webhook_request(json!({ "eventType": "Test" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_is_method_not_allowed() {
    let harness = TestHarness::new(vec![]).await;

    let response = harness
        .router()
        .oneshot(Request::builder().uri("/webhook").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_check() {
    let harness = TestHarness::new(vec![]).await;

    let response = harness
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signature_is_enforced_when_configured() {
    let mut harness = TestHarness::new(vec![]).await;
    harness.config.webhook.signature_secret = Some("s3cret".to_string());
    let body = json!({ "eventType": "Test" }).to_string();

    let unsigned = harness
        .router()
        .oneshot(webhook_request(body.clone()))
        .await
        .unwrap();
    assert_eq!(unsigned.status(), StatusCode::UNAUTHORIZED);

    let mut bad = webhook_request(body.clone());
    bad.headers_mut()
        .insert(SIGNATURE_HEADER, "sha256=00ff".parse().unwrap());
    let bad = harness.router().oneshot(bad).await.unwrap();
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let mut good = webhook_request(body.clone());
    good.headers_mut().insert(
        SIGNATURE_HEADER,
        sign("s3cret", body.as_bytes()).unwrap().parse().unwrap(),
    );
    let good = harness.router().oneshot(good).await.unwrap();
    assert_eq!(good.status(), StatusCode::OK);
}

/// Radarr client that panics on every lookup
struct PanickingRadarr;

#[async_trait::async_trait]
impl RadarrApi for PanickingRadarr {
    async fn lookup_movie(&self, _term: &str) -> ServiceResult<Vec<Movie>> {
        panic!("lookup_movie")
    }
    async fn get_movie(&self, _movie_id: i64) -> ServiceResult<Movie> {
        panic!("get_movie")
    }
    async fn list_tags(&self) -> ServiceResult<Vec<Tag>> {
        panic!("list_tags")
    }
    async fn list_quality_profiles(&self) -> ServiceResult<Vec<QualityProfile>> {
        panic!("list_quality_profiles")
    }
    async fn post_command(&self, _command: &Command) -> ServiceResult<CommandResponse> {
        panic!("post_command")
    }
    async fn get_queue(&self) -> ServiceResult<Vec<QueueRecord>> {
        panic!("get_queue")
    }
}

#[tokio::test]
async fn panic_becomes_server_error() {
    let harness = TestHarness::new(vec![rule("True", 1, true)]).await;
    let mut ctx = AppContext::new(harness.config.clone());
    ctx.radarr = Arc::new(PanickingRadarr);

    let response = create_router(ctx)
        .oneshot(webhook_request(download_payload().to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_to_json(response.into_body()).await;
    assert_eq!(body["code"], "internal_error");
}
