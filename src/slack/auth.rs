//! Helpers around Slack's use of OAuth Bearer Authentication.

use std::fmt;

/// A newtype wrapper around Slack access tokens, taken from `$SLACK_TOKEN`.
#[derive(PartialEq, Eq, Clone)]
pub struct SlackAccessToken(pub String);

impl fmt::Debug for SlackAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SlackAccessToken(..)")
    }
}

/// Convert a Slack access token to a `Bearer` `Authorization` header value.
pub fn to_auth_header_val(t: &SlackAccessToken) -> String {
    format!("Bearer {}", t.0)
}
