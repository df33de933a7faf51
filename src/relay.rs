//! Relay an authenticated, prebuilt attachment onto Slack.
//!
//! Callers POST `application/json` shaped like so:
//!
//! ```json
//! {
//!     "token": "<$ALIEM_API_KEY>",
//!     "channel": "#general",
//!     "message": { "fallback": "Hello", "text": "Hello", "color": "good" }
//! }
//! ```
//!
//! `message` is a Slack attachment, passed through untouched. Checks happen in
//! a fixed order and the first to fail decides the response; see
//! [validate_head].

use crate::{
    auth::{is_valid_token, ApiKey},
    de::is_truthy,
    error::RelayError,
    router::Deps,
};
use axum::{
    body::Body,
    extract::State,
    http::{Method, StatusCode},
};
use axum_extra::{headers::ContentType, TypedHeader};
use mime::Mime;
use serde_json::Value;
use tracing::info;

/// A request which has passed every check and is ready to go to Slack.
#[derive(Debug, PartialEq)]
pub struct Relay {
    pub channel: Value,
    pub message: Value,
}

/// The most we'll buffer of a request body. Only applied once the method and
/// content type have been accepted.
pub const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Handler for the relay route.
///
/// Responds 200 with an empty body once Slack has accepted the message. Each
/// request results in at most one call to Slack, and identical requests are
/// never deduplicated.
pub async fn relay_handler(
    State(deps): State<Deps>,
    method: Method,
    content_type: Option<TypedHeader<ContentType>>,
    // Buffered by hand so that nothing about the body can preempt the method
    // and content type checks.
    body: Body,
) -> Result<StatusCode, RelayError> {
    let content_type = content_type.map(|TypedHeader(x)| Mime::from(x));
    validate_head(&method, content_type.as_ref())?;

    let body = axum::body::to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|_| RelayError::body_too_large())?;
    let relay = validate_payload(&deps.api_key, &body)?;

    deps.slack_client
        .post_message(&relay.channel, &relay.message)
        .await?;

    info!("Relayed message to Slack channel {}", channel_label(&relay.channel));
    Ok(StatusCode::OK)
}

/// Checks run in order, and the first to fail decides the response:
///
/// 1. the method must be POST,
/// 2. the media type must be `application/json`, parameters aside,
/// 3. there must be a body, and it mustn't be `null`,
/// 4. `channel`, `message`, and `token` must all be present and truthy,
/// 5. `token` must match our [ApiKey].
///
/// This covers the first two, which need nothing but the request head. See
/// [validate_payload] for the rest.
fn validate_head(method: &Method, content_type: Option<&Mime>) -> Result<(), RelayError> {
    if *method != Method::POST {
        return Err(RelayError::method_not_allowed());
    }

    if !is_json(content_type) {
        return Err(RelayError::not_json());
    }

    Ok(())
}

/// Checks 3 to 5 of [validate_head], once the body has been buffered.
fn validate_payload(key: &ApiKey, body: &[u8]) -> Result<Relay, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RelayError::missing_body());
    }

    let payload: Value = serde_json::from_slice(body).map_err(|_| RelayError::bad_request())?;
    if payload.is_null() {
        return Err(RelayError::missing_body());
    }

    let field = |name: &str| payload.get(name).filter(|x| is_truthy(x));
    let (channel, message, token) = match (field("channel"), field("message"), field("token")) {
        (Some(c), Some(m), Some(t)) => (c, m, t),
        _ => return Err(RelayError::bad_request()),
    };

    if !is_valid_token(key, token) {
        return Err(RelayError::invalid_credentials());
    }

    Ok(Relay {
        channel: channel.clone(),
        message: message.clone(),
    })
}

/// Channels are almost always strings, which we'd rather log unquoted.
fn channel_label(channel: &Value) -> String {
    channel
        .as_str()
        .map_or_else(|| channel.to_string(), str::to_owned)
}

fn is_json(content_type: Option<&Mime>) -> bool {
    content_type.map_or(false, |x| {
        x.essence_str() == mime::APPLICATION_JSON.essence_str()
    })
}
