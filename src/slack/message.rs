//! Post prebuilt attachments to any given Slack channel.

use super::{api::*, SlackError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// <https://api.slack.com/methods/chat.postMessage#args>
///
/// Both the channel and the attachment are whatever the caller gave us; Slack
/// is left to judge them.
#[derive(Serialize)]
struct MessageRequest<'a> {
    channel: &'a Value,
    // Everything visible lives in the attachment.
    text: &'static str,
    attachments: [&'a Value; 1],
}

/// <https://api.slack.com/methods/chat.postMessage#examples>
#[derive(Deserialize)]
struct MessageResponse {
    #[allow(dead_code)]
    #[serde(deserialize_with = "crate::de::only_true")]
    ok: bool,
}

impl SlackClient {
    /// Post a single attachment to a channel. There's exactly one request per
    /// call; failures are not retried.
    pub async fn post_message(&self, channel: &Value, attachment: &Value) -> Result<(), SlackError> {
        debug!("Posting to Slack channel {}", channel);

        let res = self
            .post("chat.postMessage")
            .json(&MessageRequest {
                channel,
                text: "",
                attachments: [attachment],
            })
            .send()
            .await?;

        // Slack may explain itself even when the status alone says enough, as
        // with `429` and `ratelimited`.
        let status = res.status();
        if !status.is_success() {
            let error = res.json::<ErrorResponse>().await.ok().and_then(|x| x.error);
            return Err(SlackError::APIStatus {
                status: status.as_u16(),
                error,
            });
        }

        let res: APIResult<MessageResponse> = res.json().await?;

        match res {
            APIResult::Ok(_) => Ok(()),
            APIResult::Err(res) => Err(res
                .error
                .map_or(SlackError::APIResponseMissingError, SlackError::APIResponseError)),
        }
    }
}
