use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use jedi_widget::adapters::preview_handler::{PreviewResponse, PreviewState};
use jedi_widget::config::{AssetSettings, EditorSettings, ServerSettings, Settings};
use jedi_widget::domain::{DiagnosticCode, Schema};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        editor: EditorSettings::default(),
        assets: AssetSettings::default(),
        default_options: json!({"showErrors": "always"}),
    }
}

fn test_app() -> Router {
    let schema = Schema::normalize(
        json!({"type": "object", "properties": {"name": {"type": "string"}}}).into(),
    )
    .unwrap();
    let state = PreviewState::new(Arc::new(test_settings()), schema).unwrap();
    jedi_widget::create_app(state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_preview_page_renders_editor() {
    let request = Request::builder()
        .uri("/?value=%7B%22name%22%3A%22Ada%22%7D")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains(r#"<div id="w0-container"></div>"#));
    assert!(html.contains(r#"<link href="&#x2F;assets&#x2F;jedi.css" rel="stylesheet">"#));
    assert!(html.contains("const initEditorw0 = async () => {"));
    assert!(html.contains(r#""data":{"name":"Ada"}"#));
    assert!(html.contains(r#""showErrors":"always""#));
    assert!(!html.contains("Data is not a valid JSON."));
}

#[tokio::test]
async fn test_submit_with_invalid_json_shows_warning() {
    let request = Request::builder()
        .uri("/")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("payload=not+json"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("Data is not a valid JSON."));
    assert!(html.contains(r#"<pre id="submitted">not json</pre>"#));
    assert!(!html.contains(r#""data":"#));
}

#[tokio::test]
async fn test_submit_with_json_prefills_editor() {
    let request = Request::builder()
        .uri("/")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("payload=%7B%22name%22%3A%22Bo%22%7D"))
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    let html = body_string(response).await;

    assert!(html.contains(r#""data":{"name":"Bo"}"#));
    assert!(html.contains("<pre id=\"submitted\">"));
}

#[tokio::test]
async fn test_preview_api() {
    let request = Request::builder()
        .uri("/api/preview?value=nope")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: PreviewResponse = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body.html, r#"<div id="w0-container"></div>"#);
    assert_eq!(body.input_id, "w0");
    assert!(body.diagnostics.contains(DiagnosticCode::InvalidData));
    assert!(body.body_end.contains("initEditorw0()"));
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["schema_file"], "not_configured");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
