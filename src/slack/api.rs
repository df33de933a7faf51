//! Type definitions and helpers for the Slack Web API.

use super::auth::*;
use serde::Deserialize;
use url::Url;

/// The base URL of the Slack API.
pub const API_BASE: &str = "https://slack.com/api";

/// A client bound to one Slack workspace via its access token.
///
/// Holds a connection pool internally, as per [reqwest::Client], so it should
/// be shared rather than rebuilt per request.
pub struct SlackClient {
    base: Url,
    token: SlackAccessToken,
    http: reqwest::Client,
}

impl SlackClient {
    pub fn new(base: Url, token: SlackAccessToken) -> Self {
        SlackClient {
            base,
            token,
            http: reqwest::Client::new(),
        }
    }

    /// Create a POST request to any Slack API method, handling authentication.
    pub fn post<T: ToString>(&self, method: T) -> reqwest::RequestBuilder {
        self.http
            .post(method_url(&self.base, method))
            .header(reqwest::header::AUTHORIZATION, to_auth_header_val(&self.token))
    }
}

/// The base may or may not carry a trailing slash depending upon where it came
/// from, so we normalise before appending the method name.
fn method_url<T: ToString>(base: &Url, method: T) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        method.to_string().trim_start_matches('/')
    )
}

/// Slack's API returns a common "untagged" response, representing whether a
/// request was successful.
///
/// ```json
/// {
///     "ok": true,
///     "ts": "1503435956.000247"
/// }
/// ```
///
/// ```json
/// {
///     "ok": false,
///     "error": "channel_not_found"
/// }
/// ```
#[derive(Deserialize)]
#[serde(untagged)]
pub enum APIResult<T> {
    Ok(T),
    Err(ErrorResponse),
}

/// The universal response in case of an unsuccessful request. Slack ought to
/// always name the error, but we don't rely on it.
#[derive(Deserialize)]
pub struct ErrorResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_false")]
    ok: bool,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Empty {
        #[allow(dead_code)]
        #[serde(deserialize_with = "crate::de::only_true")]
        ok: bool,
    }

    fn decode(raw: &str) -> APIResult<Empty> {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_method_url() {
        let with_path = Url::parse("https://slack.com/api").unwrap();
        assert_eq!(
            method_url(&with_path, "chat.postMessage"),
            "https://slack.com/api/chat.postMessage"
        );

        let with_slash = Url::parse("http://127.0.0.1:1234").unwrap();
        assert_eq!(
            method_url(&with_slash, "/chat.postMessage"),
            "http://127.0.0.1:1234/chat.postMessage"
        );
    }

    #[test]
    fn test_api_result() {
        assert!(matches!(
            decode(r#"{"ok": true, "ts": "1503435956.000247"}"#),
            APIResult::Ok(_)
        ));

        match decode(r#"{"ok": false, "error": "channel_not_found"}"#) {
            APIResult::Err(e) => assert_eq!(e.error.as_deref(), Some("channel_not_found")),
            APIResult::Ok(_) => panic!("expected error response"),
        }

        match decode(r#"{"ok": false}"#) {
            APIResult::Err(e) => assert_eq!(e.error, None),
            APIResult::Ok(_) => panic!("expected error response"),
        }

        assert!(serde_json::from_str::<APIResult<Empty>>(r#"{"error": "x"}"#).is_err());
    }
}
