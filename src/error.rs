use crate::slack::SlackError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use tracing::error;

/// Every way in which a relay request can fail, reduced to what the caller
/// sees: a status and a plaintext body.
#[derive(Debug, PartialEq, Eq)]
pub struct RelayError {
    pub status: StatusCode,
    pub message: String,
}

impl RelayError {
    pub fn new<T: ToString>(status: StatusCode, message: T) -> Self {
        RelayError {
            status,
            message: message.to_string(),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Only POST requests are accepted")
    }

    pub fn not_json() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            r#"Content-Type must be "application/json""#,
        )
    }

    pub fn missing_body() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Request must have a body")
    }

    pub fn body_too_large() -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body is too large")
    }

    pub fn bad_request() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad request")
    }

    pub fn invalid_credentials() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.message)
    }
}

/// Slack's failures are all ours to answer for, hence 500, unless Slack gave
/// us an HTTP status of its own.
impl From<SlackError> for RelayError {
    fn from(e: SlackError) -> Self {
        let status = e
            .status()
            .and_then(|x| StatusCode::from_u16(x).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        RelayError::new(status, e)
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!("{}", self);

        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_into_response() {
        let res = RelayError::invalid_credentials().into_response();

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Invalid credentials");
    }

    #[test]
    fn test_from_slack_error() {
        assert_eq!(
            RelayError::from(SlackError::APIResponseError("channel_not_found".into())),
            RelayError::new(StatusCode::INTERNAL_SERVER_ERROR, "channel_not_found"),
        );

        assert_eq!(
            RelayError::from(SlackError::APIResponseMissingError),
            RelayError::new(StatusCode::INTERNAL_SERVER_ERROR, "Error hitting slack API"),
        );
    }
}
