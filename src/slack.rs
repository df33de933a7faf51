//! Supports posting a prebuilt attachment to any Slack channel.
//!
//! See [api::SlackClient::post_message].

pub mod api;
pub mod auth;
pub mod error;
mod message;

pub use error::SlackError;
