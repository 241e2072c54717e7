//! A fake REDCap API endpoint.
//!
//! Accepts POSTs on `/api/`, records each one verbatim, and answers with
//! REDCap-shaped bodies: a 403 error envelope for a wrong token, canned data
//! for a few verbs, and an echo of `content`/`action` for everything else.
//! `GET /__requests` returns what was recorded, in arrival order.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// One request as the server saw it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: String,
}

pub struct MockState {
    token: String,
    requests: RwLock<Vec<RecordedRequest>>,
}

pub type Shared = Arc<MockState>;

pub const DEFAULT_TOKEN: &str = "MOCKTOKEN";
pub const INVALID_TOKEN_BODY: &str = r#"{"error":"You do not have permissions to use the API"}"#;
pub const VERSION: &str = "14.0.0";
pub const FILE_CONTENTS: &[u8] = b"mock file contents";

pub fn app(token: &str) -> Router {
    let state: Shared = Arc::new(MockState {
        token: token.to_string(),
        requests: RwLock::new(Vec::new()),
    });
    Router::new()
        .route("/api/", post(handle_api))
        .route("/__requests", get(list_requests).delete(clear_requests))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn list_requests(State(state): State<Shared>) -> Json<Vec<RecordedRequest>> {
    Json(state.requests.read().await.clone())
}

async fn clear_requests(State(state): State<Shared>) -> StatusCode {
    state.requests.write().await.clear();
    StatusCode::NO_CONTENT
}

async fn handle_api(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let header_text = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header_text(header::CONTENT_TYPE);
    let text = String::from_utf8_lossy(&body).into_owned();

    let is_multipart = content_type
        .as_deref()
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));
    let field = |name: &str| {
        if is_multipart {
            multipart_field(&text, name)
        } else {
            form_field(&text, name)
        }
    };
    let token = field("token");
    let content = field("content").unwrap_or_default();
    let action = field("action");

    tracing::debug!(content = %content, action = ?action, bytes = body.len() as u64, "mock REDCap request");

    state.requests.write().await.push(RecordedRequest {
        content_type,
        accept: header_text(header::ACCEPT),
        body: text.clone(),
    });

    if token.as_deref() != Some(state.token.as_str()) {
        return (
            StatusCode::FORBIDDEN,
            [(header::CONTENT_TYPE, "application/json")],
            INVALID_TOKEN_BODY,
        )
            .into_response();
    }

    match (content.as_str(), action.as_deref()) {
        ("version", _) => VERSION.into_response(),
        ("arm", None) => Json(serde_json::json!([{"arm_num": 1, "name": "Arm 1"}])).into_response(),
        ("file", Some("export")) => (
            [(header::CONTENT_TYPE, "text/plain; name=\"mock.txt\"")],
            FILE_CONTENTS,
        )
            .into_response(),
        ("file", Some("import")) => StatusCode::OK.into_response(),
        ("exportFieldNames", None) if field("field").as_deref() == Some("missing") => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "error": "The following values of the parameter 'field' are not valid: 'missing'"
            })),
        )
            .into_response(),
        (_, Some("delete")) | (_, Some("import")) => "1".into_response(),
        _ => Json(serde_json::json!({ "content": &content, "action": &action })).into_response(),
    }
}

/// First value of `name` in a form body. Values are returned undecoded.
///
/// Indexed lists are written back to back (`dags[0]=adags[1]=b`), so only
/// the first `=` of each `&`-separated chunk splits key from value.
pub fn form_field(body: &str, name: &str) -> Option<String> {
    body.split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Value of the text part named `name` in a multipart body.
pub fn multipart_field(body: &str, name: &str) -> Option<String> {
    let marker = format!("name=\"{name}\"\r\n\r\n");
    let start = body.find(&marker)? + marker.len();
    let rest = &body[start..];
    let end = rest.find("\r\n")?;
    Some(rest[..end].to_string())
}
