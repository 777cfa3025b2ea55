mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use common::{OWNER, exec, seal, seal_all, spawn_app, temp_store};
use serde_json::json;
use tower::ServiceExt;

fn payload(token: &str) -> serde_json::Value {
    json!({
        "token": token,
        "name": "<b>Jane</b>",
        "email": "jane@example.org",
        "message": "Hello <script>alert(1)</script>there, love the projects!"
    })
}

#[tokio::test]
async fn valid_submission_sends_sanitized_mail_and_confirmation() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let (status, body) = exec(&app, "POST", "/api/mail", Some(payload("0.9"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Email successfully sent"}));

    let sent = app.mail.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].from, "jane@example.org");
    assert_eq!(sent[0].to, OWNER);
    assert_eq!(sent[0].subject, "Jane jane@example.org - Portfolio");
    assert_eq!(sent[0].body, "Hello there, love the projects!");
    assert_eq!(sent[1].to, "jane@example.org");
}

#[tokio::test]
async fn gate_boundary_is_exclusive() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let (status, body) = exec(&app, "POST", "/api/mail", Some(payload("0.3"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"message": "Sorry, your request can't be processed right now due to suspicious activity."})
    );
    assert!(app.mail.sent.lock().unwrap().is_empty());

    let (status, _) = exec(&app, "POST", "/api/mail", Some(payload("0.31"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn broken_assessment_fails_closed() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let (status, body) = exec(&app, "POST", "/api/mail", Some(payload("broken"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "There appears to be an issue..."}));
    assert!(app.mail.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn validation_errors_answer_ok_with_field_list() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let (status, body) = exec(
        &app,
        "POST",
        "/api/mail",
        Some(json!({"token": "0.9", "name": "a", "email": "x@y.com", "message": "0123456789"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"path": "name", "message": "Name must be at least 2 characters"}])
    );
    assert!(app.mail.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_credential_is_internal_error_without_sending() {
    let store = temp_store().await;
    seal(&store, "APIKey", "risk-api-key").await;
    seal(&store, "ClientID", "client-id").await;
    seal(&store, "ClientSecret", "").await;
    seal(&store, "RefreshToken", "refresh-token").await;
    let app = spawn_app(store, false).await;

    let (status, body) = exec(&app, "POST", "/api/mail", Some(payload("0.9"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "An error occurred"}));
    assert!(app.mail.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_gate_key_is_internal_error() {
    let app = spawn_app(temp_store().await, false).await;
    let (status, _) = exec(&app, "POST", "/api/mail", Some(payload("0.9"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn oversized_body_is_refused() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let oversized = format!(
        r#"{{"token":"0.9","name":"Jane","email":"jane@example.org","message":"{}"}}"#,
        "a".repeat(128 * 1024)
    );
    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/mail")
                .header("content-type", "application/json")
                .body(Body::from(oversized))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body: serde_json::Value = serde_json::from_slice(&body).expect("413 body is JSON");
    assert_eq!(body, json!({"message": "Request body too large"}));
    assert!(app.mail.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mistyped_field_is_generic_bad_request() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let body = json!({
        "token": "0.9",
        "name": 123,
        "email": "jane@example.org",
        "message": "Hello there, love the projects!"
    });
    let (status, body) = exec(&app, "POST", "/api/mail", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "There appears to be an issue..."}));
    assert!(app.mail.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn body_without_json_content_type_is_generic_bad_request() {
    let store = temp_store().await;
    seal_all(&store).await;
    let app = spawn_app(store, false).await;

    let (status, body) = exec(&app, "POST", "/api/resume", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"message": "There appears to be an issue..."}));

    let resp = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/mail")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
