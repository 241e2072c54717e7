//! HTTP request and response values.
//!
//! # Design
//! Requests are plain data so they can be built and inspected without any
//! network access; `transport` turns them into a single POST. Every REDCap
//! call is a POST, so there is no method field.

use std::borrow::Cow;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const ACCEPT_JSON: &str = "application/json";

/// A fully assembled REDCap POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Value of the first header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as text, replacing invalid UTF-8 (multipart uploads may hold
    /// binary data).
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// The raw outcome of one POST.
///
/// Any status is a successful transport outcome. REDCap error envelopes are
/// left in `body` untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
