//! Connection configuration for a REDCap project.
//!
//! # Design
//! `ClientConfig` is validated once at construction and never mutated after
//! the client is built. Its `Debug` output omits the token.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RedcapError;

/// Serialization REDCap uses for its response body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
    Csv,
}

impl ResponseFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
            ResponseFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseFormat {
    type Err = RedcapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ResponseFormat::Json),
            "xml" => Ok(ResponseFormat::Xml),
            "csv" => Ok(ResponseFormat::Csv),
            _ => Err(RedcapError::InvalidFormat(s.to_string())),
        }
    }
}

/// Endpoint, credentials and response format for one REDCap project.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: Url,
    token: String,
    format: ResponseFormat,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Validate the endpoint and token. The format defaults to JSON and no
    /// timeout is applied.
    pub fn new(base_url: &str, token: &str) -> Result<Self, RedcapError> {
        let parsed = Url::parse(base_url).map_err(|source| RedcapError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => return Err(RedcapError::UnsupportedScheme(other.to_string())),
        }

        if token.trim().is_empty() {
            return Err(RedcapError::MissingToken);
        }

        Ok(Self {
            base_url: parsed,
            token: token.to_string(),
            format: ResponseFormat::default(),
            timeout: None,
        })
    }

    /// Build a config from `REDCAP_API_URL` and `REDCAP_API_TOKEN`, with
    /// optional `REDCAP_FORMAT` and `REDCAP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, RedcapError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RedcapError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("REDCAP_API_URL")
            .ok_or_else(|| RedcapError::InvalidConfig("REDCAP_API_URL is not set".to_string()))?;
        let token = lookup("REDCAP_API_TOKEN").unwrap_or_default();
        let mut config = Self::new(&url, &token)?;

        if let Some(format) = lookup("REDCAP_FORMAT") {
            config = config.with_format(format.parse()?);
        }
        if let Some(secs) = lookup("REDCAP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                RedcapError::InvalidConfig(format!("REDCAP_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_format(mut self, format: ResponseFormat) -> Self {
        self.format = format;
        self
    }

    /// Overall deadline for a single call, connection through body read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("format", &self.format)
            .field("timeout", &self.timeout)
            .finish()
    }
}
