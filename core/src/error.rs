//! Error types for the REDCap API client.
//!
//! # Design
//! Errors fall into two classes. Construction errors are raised before any
//! I/O happens (bad endpoint URL, empty token, payload that cannot be
//! serialized or encoded). Transport errors wrap failures of the single POST
//! itself.
//!
//! REDCap reports application failures (invalid token, unknown field,
//! permission denied) in the response body. Those are not errors here: the
//! body is returned verbatim inside an `ApiResponse` for the caller to inspect.

use thiserror::Error;

/// Errors returned by `RedcapClient`.
#[derive(Debug, Error)]
pub enum RedcapError {
    /// The configured endpoint is not a valid absolute URL.
    #[error("invalid REDCap URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The endpoint URL uses a scheme other than http or https.
    #[error("unsupported URL scheme `{0}`, expected http or https")]
    UnsupportedScheme(String),

    /// Every request must carry an API token.
    #[error("API token is empty")]
    MissingToken,

    /// A response format other than json, xml or csv was requested.
    #[error("unknown response format `{0}`")]
    InvalidFormat(String),

    /// A configuration value read from the environment could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An import payload could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The file upload body could not be assembled.
    #[error("multipart encoding failed: {0}")]
    Multipart(#[source] std::io::Error),

    /// The POST could not be completed or its body could not be read.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),
}

impl RedcapError {
    /// True when the failure happened on the wire rather than while
    /// constructing the request.
    pub fn is_transport(&self) -> bool {
        matches!(self, RedcapError::Transport(_))
    }
}
