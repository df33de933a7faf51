use std::fmt;

/// Fallback description for when Slack declines a request without saying why.
pub const MISSING_ERROR: &str = "Error hitting slack API";

/// Sum type representing every possible unexceptional fail state.
pub enum SlackError {
    /// We never got a decodable answer out of Slack.
    APIRequestFailed(reqwest::Error),
    /// Slack answered `"ok": false`, naming the problem.
    APIResponseError(String),
    /// Slack answered `"ok": false` without an `error`.
    APIResponseMissingError,
    /// Slack answered with a non-2xx status, perhaps naming the problem.
    APIStatus { status: u16, error: Option<String> },
}

impl From<reqwest::Error> for SlackError {
    fn from(e: reqwest::Error) -> Self {
        SlackError::APIRequestFailed(e)
    }
}

impl SlackError {
    /// The HTTP status Slack replied with, if that's what went wrong.
    pub fn status(&self) -> Option<u16> {
        match self {
            SlackError::APIRequestFailed(e) => e.status().map(|s| s.as_u16()),
            SlackError::APIStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Slack's own error strings are surfaced untouched, as callers may match on
/// them (e.g. `channel_not_found`).
impl fmt::Display for SlackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlackError::APIRequestFailed(e) => write!(f, "{}", e),
            SlackError::APIResponseError(e) => write!(f, "{}", e),
            SlackError::APIResponseMissingError => write!(f, "{}", MISSING_ERROR),
            SlackError::APIStatus {
                error: Some(e), ..
            } => write!(f, "{}", e),
            SlackError::APIStatus {
                status,
                error: None,
            } => write!(f, "Slack API responded with HTTP {}", status),
        }
    }
}
