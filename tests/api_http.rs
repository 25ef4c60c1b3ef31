// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - POST /voice       (spam, clean, anonymous, screening)
// - POST /voice/screen
// - GET  /health
// - GET  /debug/route, /debug/last-decision

use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use call_screener::{create_router, AppState, ScreenerConfig};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

const TEST_CONFIG: &str = r#"
    [policy]
    blocked_numbers = ["+12145550666"]

    [routing]
    default_url = "https://example.test/default"

    [[routing.route]]
    number = "+12145500953"
    url = "https://partner.example/inbound"
"#;

/// Build the same Router the binary uses.
fn test_router() -> Router {
    let cfg = ScreenerConfig::from_toml_str(TEST_CONFIG).expect("test config");
    let state = AppState::from_config(cfg).expect("test state");
    create_router(state)
}

fn voice_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/voice")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("build POST /voice")
}

async fn body_string(resp: shuttle_axum::axum::response::Response) -> String {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    String::from_utf8(bytes).expect("utf8")
}

#[tokio::test]
async fn blocked_caller_gets_spoken_notice_and_hangup() {
    let app = test_router();

    let resp = app
        .oneshot(voice_request(
            "From=%2B12145550666&To=%2B12145500953&CallSid=CA1",
        ))
        .await
        .expect("oneshot /voice");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/xml")
    );

    let xml = body_string(resp).await;
    assert!(xml.contains("has been blocked"), "body: {xml}");
    assert!(xml.contains("<Hangup/>"));
    assert!(!xml.contains("<Redirect"));
}

#[tokio::test]
async fn clean_call_redirects_to_resolved_destination() {
    let app = test_router();

    let resp = app
        .oneshot(voice_request(
            "From=%2B19725551234&To=%2B12145500953&CallSid=CA2&CallerName=Jane",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let xml = body_string(resp).await;
    assert!(
        xml.contains(r#"<Redirect method="POST">https://partner.example/inbound</Redirect>"#),
        "body: {xml}"
    );
}

#[tokio::test]
async fn anonymous_caller_is_sent_to_voicemail() {
    let app = test_router();

    let resp = app
        .oneshot(voice_request("From=anonymous&To=%2B12145500953"))
        .await
        .unwrap();
    let xml = body_string(resp).await;
    assert!(xml.contains("Please leave a message."), "body: {xml}");
    assert!(xml.contains("<Hangup/>"));
}

#[tokio::test]
async fn single_provider_flag_renders_gather() {
    let app = test_router();

    // AddOns JSON, urlencoded: one flagging provider under threshold 2.
    let addons = "%7B%22results%22%3A%7B%22nomorobo_spamscore%22%3A%7B%22result%22%3A%7B%22score%22%3A0.9%7D%7D%7D%7D";
    let resp = app
        .oneshot(voice_request(&format!(
            "From=%2B19725551234&To=%2B12145500953&AddOns={addons}"
        )))
        .await
        .unwrap();
    let xml = body_string(resp).await;
    assert!(xml.contains("<Gather"), "body: {xml}");
    assert!(xml.contains(r#"action="/voice/screen""#));
}

#[tokio::test]
async fn screen_callback_with_digits_redirects() {
    let app = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/voice/screen")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(
            "Digits=1&From=%2B19725551234&To=%2B12145500953".to_string(),
        ))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let xml = body_string(resp).await;
    assert!(
        xml.contains("https://partner.example/inbound"),
        "body: {xml}"
    );
}

#[tokio::test]
async fn screen_callback_without_digits_hangs_up() {
    let app = test_router();

    let req = Request::builder()
        .method("POST")
        .uri("/voice/screen")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("From=%2B19725551234&To=%2B12145500953".to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let xml = body_string(resp).await;
    assert!(xml.contains("<Hangup/>"));
    assert!(!xml.contains("<Redirect"));
}

#[tokio::test]
async fn health_reports_configured_routes() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let v: Json = serde_json::from_str(&body_string(resp).await).expect("health json");
    assert_eq!(v["status"], serde_json::json!("active"));
    assert_eq!(v["service"], serde_json::json!("call-screener"));
    assert_eq!(v["exact_routes"], serde_json::json!(1));
    assert_eq!(v["default_url"], serde_json::json!("https://example.test/default"));
    assert!(v.get("timestamp").is_some());
}

#[tokio::test]
async fn debug_route_dry_runs_the_resolver() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/debug/route?to=%2B12145500953")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let body = body_string(resp).await;
    assert!(body.contains("https://partner.example/inbound"), "{body}");
}

#[tokio::test]
async fn last_decision_shows_hashed_caller() {
    let app = test_router();

    let _ = app
        .clone()
        .oneshot(voice_request("From=%2B12145550666&To=%2B12145500953"))
        .await
        .unwrap();

    let req = Request::builder()
        .method("GET")
        .uri("/debug/last-decision")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let v: Json = serde_json::from_str(&body_string(resp).await).expect("json");

    assert_eq!(v["is_spam"], serde_json::json!(true));
    assert_eq!(v["action"], serde_json::json!("blocked_message"));
    // Hashed, not the raw caller number.
    let caller = v["caller"].as_str().unwrap();
    assert_eq!(caller, call_screener::call::anon_hash("+12145550666"));
    assert_ne!(caller, "+12145550666");
}
