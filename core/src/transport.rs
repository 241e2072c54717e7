//! Blocking HTTP transport built on ureq.
//!
//! # Design
//! One `HttpRequest` becomes exactly one POST. Status codes are returned as
//! data, never as errors, so REDCap's own error envelopes reach the caller
//! unchanged. Nothing is retried.

use ureq::Agent;

use crate::config::ClientConfig;
use crate::error::RedcapError;
use crate::http::{ApiResponse, HttpRequest};

/// Build the agent for a config. The only knob is the overall deadline.
pub fn agent_for(config: &ClientConfig) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(config.timeout())
        .build()
        .new_agent()
}

/// Execute `request` and read the whole response body.
pub fn execute(agent: &Agent, request: &HttpRequest) -> Result<ApiResponse, RedcapError> {
    let mut builder = agent.post(request.url.as_str());
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let mut response = builder.send(request.body.as_slice())?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    // File exports can be large; read without ureq's default cap.
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()?;

    Ok(ApiResponse {
        status,
        headers,
        body,
    })
}
