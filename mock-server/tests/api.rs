use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, RecordedRequest, DEFAULT_TOKEN, FILE_CONTENTS, INVALID_TOKEN_BODY, VERSION};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn form_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/api/")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(http::header::ACCEPT, "application/json")
        .body(body.to_string())
        .unwrap()
}

// --- token ---

#[tokio::test]
async fn wrong_token_returns_403_envelope() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request("token=NOPE&content=arm&format=json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_bytes(resp).await, INVALID_TOKEN_BODY.as_bytes());
}

#[tokio::test]
async fn missing_token_returns_403() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request("content=arm&format=json"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- canned verbs ---

#[tokio::test]
async fn version_returns_plain_text() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request(&format!("token={DEFAULT_TOKEN}&content=version")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, VERSION.as_bytes());
}

#[tokio::test]
async fn export_arms_returns_json_array() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request(&format!("token={DEFAULT_TOKEN}&content=arm&format=json")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let arms: serde_json::Value = body_json(resp).await;
    assert_eq!(arms[0]["name"], "Arm 1");
}

#[tokio::test]
async fn export_file_returns_bytes_with_name() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request(&format!(
            "token={DEFAULT_TOKEN}&content=file&action=export&record=1&field=f&event=e"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()[http::header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.contains("name=\"mock.txt\""));
    assert_eq!(body_bytes(resp).await, FILE_CONTENTS);
}

#[tokio::test]
async fn delete_returns_count() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request(&format!(
            "token={DEFAULT_TOKEN}&content=dag&action=delete&format=json&dags[0]=a"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "1".as_bytes());
}

#[tokio::test]
async fn invalid_field_returns_400_envelope() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request(&format!(
            "token={DEFAULT_TOKEN}&content=exportFieldNames&format=json&field=missing"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let envelope: serde_json::Value = body_json(resp).await;
    assert!(envelope["error"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn other_verbs_echo_content_and_action() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(form_request(&format!(
            "token={DEFAULT_TOKEN}&content=dag&action=switch&format=json&dag=g1"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: serde_json::Value = body_json(resp).await;
    assert_eq!(echo["content"], "dag");
    assert_eq!(echo["action"], "switch");
}

#[tokio::test]
async fn multipart_upload_is_accepted() {
    let body = format!(
        "--B\r\nContent-Disposition: form-data; name=\"token\"\r\n\r\n{DEFAULT_TOKEN}\r\n\
         --B\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\nfile\r\n\
         --B\r\nContent-Disposition: form-data; name=\"action\"\r\n\r\nimport\r\n--B--\r\n"
    );
    let req = Request::builder()
        .method("POST")
        .uri("/api/")
        .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=B")
        .body(body)
        .unwrap();
    let resp = app(DEFAULT_TOKEN).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- recording ---

#[tokio::test]
async fn requests_are_recorded_in_order() {
    use tower::Service;

    let mut app = app(DEFAULT_TOKEN).into_service();

    for body in [
        format!("token={DEFAULT_TOKEN}&content=arm&format=json"),
        "token=WRONG&content=dag&format=json".to_string(),
    ] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(form_request(&body))
            .await
            .unwrap();
        assert!(resp.status() == StatusCode::OK || resp.status() == StatusCode::FORBIDDEN);
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/__requests").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let recorded: Vec<RecordedRequest> = body_json(resp).await;
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0].body, format!("token={DEFAULT_TOKEN}&content=arm&format=json"));
    assert_eq!(recorded[0].accept.as_deref(), Some("application/json"));
    assert_eq!(
        recorded[1].content_type.as_deref(),
        Some("application/x-www-form-urlencoded")
    );

    // clear
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri("/__requests")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(Request::builder().uri("/__requests").body(String::new()).unwrap())
        .await
        .unwrap();
    let recorded: Vec<RecordedRequest> = body_json(resp).await;
    assert!(recorded.is_empty());
}

#[tokio::test]
async fn get_on_api_is_not_allowed() {
    let resp = app(DEFAULT_TOKEN)
        .oneshot(Request::builder().uri("/api/").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
