//! Process configuration, read once from the environment at startup.
//!
//! The following variables are consulted:
//!
//! - `ALIEM_API_KEY` (required): the shared secret callers must supply.
//! - `SLACK_TOKEN` (required): the Slack bot token used for onward requests.
//! - `SLACK_API_BASE` (optional): defaults to [API_BASE].
//! - `PORT` (optional): defaults to 80.

use crate::{
    auth::ApiKey,
    slack::{api::API_BASE, auth::SlackAccessToken},
};
use std::{env, fmt};
use url::Url;

const DEFAULT_PORT: u16 = 80;

/// Everything the server needs to run. Never mutated after construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub slack_token: SlackAccessToken,
    pub slack_api_base: Url,
    pub port: u16,
}

pub enum ConfigError {
    Missing(&'static str),
    Invalid { var: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(var) => write!(f, "${} must be set", var),
            ConfigError::Invalid { var, reason } => write!(f, "Invalid ${}: {}", var, reason),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Read configuration through an arbitrary lookup, which lets tests avoid
    /// touching the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values are as good as missing.
        let required = |var: &'static str| {
            lookup(var)
                .filter(|x| !x.is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let api_key = ApiKey(required("ALIEM_API_KEY")?);
        let slack_token = SlackAccessToken(required("SLACK_TOKEN")?);

        let slack_api_base = lookup("SLACK_API_BASE")
            .unwrap_or_else(|| API_BASE.to_owned());
        let slack_api_base = Url::parse(&slack_api_base).map_err(|e| ConfigError::Invalid {
            var: "SLACK_API_BASE",
            reason: e.to_string(),
        })?;

        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(x) => x.parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                reason: format!("could not parse {:?} to u16", x),
            })?,
        };

        Ok(Config {
            api_key,
            slack_token,
            slack_api_base,
            port,
        })
    }
}
