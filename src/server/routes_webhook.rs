use crate::arr::RadarrWebhook;
use crate::routing::{self, ActionReport};
use crate::server::error::WebhookError;
use crate::server::signature::{verify_webhook_signature, SIGNATURE_HEADER};
use crate::server::AppContext;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

pub fn webhook_routes() -> Router<AppContext> {
    Router::new().route("/webhook", post(handle_webhook))
}

async fn handle_webhook(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    let config = &ctx.config;
    if !config.webhook.enabled || !config.radarr.has_api_key() {
        return Err(WebhookError::Disabled);
    }

    if let Some(secret) = config.webhook.signature_secret.as_deref().filter(|s| !s.is_empty()) {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| WebhookError::Unauthorized(format!("Missing {} header", SIGNATURE_HEADER)))?;

        if !verify_webhook_signature(secret, &body, signature) {
            return Err(WebhookError::Unauthorized("Invalid signature".to_string()));
        }
    }

    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::MalformedPayload(format!("invalid JSON: {}", e)))?;

    let event_type = raw
        .get("eventType")
        .and_then(Value::as_str)
        .ok_or_else(|| WebhookError::MalformedPayload("missing eventType".to_string()))?;

    if event_type.eq_ignore_ascii_case("test") {
        tracing::info!("Received Radarr test webhook");
        return Ok(Json(json!({ "success": true, "message": "Test successful" })));
    }

    let payload: RadarrWebhook =
        serde_json::from_value(raw).map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

    if !payload.is_download() {
        tracing::debug!("Ignoring event type: {}", payload.event_type);
        return Ok(Json(ignored(format!(
            "Event type '{}' not processed",
            payload.event_type
        ))));
    }

    let Some(movie) = payload.movie.as_ref() else {
        return Err(WebhookError::MalformedPayload(
            "Download event without movie".to_string(),
        ));
    };

    tracing::info!(
        "Received Radarr webhook: {} for {}",
        payload.event_type,
        movie.title.as_deref().unwrap_or("unknown")
    );

    if payload.files().is_empty() {
        return Ok(Json(ignored("No movie file details in payload".to_string())));
    }

    let matches = routing::plan(
        &payload,
        &config.webhook.rules,
        ctx.radarr.as_ref(),
        ctx.catalog.as_ref(),
    )
    .await;

    if matches.is_empty() {
        tracing::info!("No rules matched for {}", movie.title.as_deref().unwrap_or("unknown"));
        return Ok(Json(json!({ "success": false, "message": "No rules matched" })));
    }

    let actions = routing::trigger_all(&matches, ctx.tasks.as_ref()).await;
    Ok(Json(matched(&actions)))
}

fn ignored(message: String) -> Value {
    json!({ "success": true, "status": "ignored", "message": message })
}

fn matched(actions: &[ActionReport]) -> Value {
    json!({
        "success": true,
        "message": format!("Processed {} matching rule(s)", actions.len()),
        "actions": actions,
    })
}
