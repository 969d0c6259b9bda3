//! REST router tests with a canned transport.

use assert_json_diff::assert_json_include;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use transcript_engine::acquisition::{RawPage, TransportClient};
use transcript_engine::rest::{router, AppState, RestOptions};
use transcript_engine::{EngineConfig, EngineError, RegistrationNumber, TranscriptEngine, TransportKind};

const RESULT_PAGE: &str = include_str!("fixtures/result_page.html");
const KEY: &str = "s3cret";

struct CannedTransport(Result<&'static str, EngineError>);

#[async_trait]
impl TransportClient for CannedTransport {
    async fn fetch_result_page(&self, _reg: &RegistrationNumber) -> Result<RawPage, EngineError> {
        self.0.clone().map(|html| RawPage {
            url: "https://portal.test/result".into(),
            html: html.into(),
        })
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Http
    }
}

fn app(canned: Result<&'static str, EngineError>, api_key: Option<&str>) -> axum::Router {
    let engine =
        TranscriptEngine::with_transport(EngineConfig::default(), Box::new(CannedTransport(canned)));
    let options = RestOptions {
        api_key: api_key.map(String::from),
        frontend_url: Some("https://results.example.org".into()),
        max_concurrent_lookups: 2,
    };
    router(Arc::new(AppState::new(engine, &options)), options.frontend_url.as_deref())
}

fn lookup_request(body: Value) -> Request<Body> {
    Request::post("/Cgpa/result")
        .header("content-type", "application/json")
        .header("x-api-key", KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_needs_no_key() {
    let (status, json) = send(
        app(Ok(RESULT_PAGE), Some(KEY)),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_home_with_key() {
    let req = Request::get("/Cgpa").header("x-api-key", KEY).body(Body::empty()).unwrap();
    let (status, json) = send(app(Ok(RESULT_PAGE), Some(KEY)), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "type": "info", "message": "Result Scraper Home" }));
}

#[tokio::test]
async fn test_home_with_trailing_slash() {
    let req = Request::get("/Cgpa/").header("x-api-key", KEY).body(Body::empty()).unwrap();
    let (status, json) = send(app(Ok(RESULT_PAGE), Some(KEY)), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "type": "info", "message": "Result Scraper Home" }));
}

#[tokio::test]
async fn test_trailing_slash_home_still_needs_key() {
    let req = Request::get("/Cgpa/").body(Body::empty()).unwrap();
    let (status, json) = send(app(Ok(RESULT_PAGE), Some(KEY)), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["message"], "Unauthorized request");
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let req = Request::post("/Cgpa/result")
        .header("content-type", "application/json")
        .header("x-api-key", "nope")
        .body(Body::from(r#"{"regNo":"2022-ag-7755"}"#))
        .unwrap();
    let (status, json) = send(app(Ok(RESULT_PAGE), Some(KEY)), req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json, json!({ "type": "error", "message": "Unauthorized request" }));
}

#[tokio::test]
async fn test_missing_server_key_is_server_error() {
    let (status, json) = send(
        app(Ok(RESULT_PAGE), None),
        lookup_request(json!({ "regNo": "2022-ag-7755" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Server env missing API key");
}

#[tokio::test]
async fn test_successful_lookup() {
    let (status, json) = send(
        app(Ok(RESULT_PAGE), Some(KEY)),
        lookup_request(json!({ "regNo": "2022-ag-7755" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_json_include!(
        actual: json,
        expected: json!({
            "success": true,
            "studentName": "Ayesha Khan",
            "registrationNo": "2022-ag-7755",
            "cgpa": 3.04125,
            "totalCreditHours": 8,
            "totalQualityPoints": 24.33,
            "semesters": [
                {
                    "semester": "Winter 2022-2023",
                    "gpa": 4.0,
                    "subjects": [
                        {
                            "courseCode": "CS-101",
                            "creditHours": 3,
                            "obtainedMarks": 54,
                            "grade": "A",
                            "qualityPoints": 12.0
                        }
                    ]
                },
                { "semester": "Spring 2023", "gpa": 2.466 }
            ]
        })
    );
}

#[tokio::test]
async fn test_form_encoded_body_is_accepted() {
    let req = Request::post("/Cgpa/result")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("x-api-key", KEY)
        .body(Body::from("regNo=2022-ag-7755"))
        .unwrap();
    let (status, json) = send(app(Ok(RESULT_PAGE), Some(KEY)), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["studentName"], "Ayesha Khan");
}

#[tokio::test]
async fn test_blank_registration_is_bad_request() {
    let (status, json) = send(
        app(Ok(RESULT_PAGE), Some(KEY)),
        lookup_request(json!({ "regNo": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({
            "success": false,
            "type": "warning",
            "message": "Registration number is required"
        })
    );
}

#[tokio::test]
async fn test_warning_maps_to_bad_request() {
    let (status, json) = send(
        app(Err(EngineError::NoResultTable), Some(KEY)),
        lookup_request(json!({ "regNo": "2022-ag-7755" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["type"], "warning");
    assert!(json.get("semesters").is_none());
}

#[tokio::test]
async fn test_error_maps_to_server_error() {
    let (status, json) = send(
        app(Err(EngineError::Certificate), Some(KEY)),
        lookup_request(json!({ "regNo": "2022-ag-7755" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({
            "success": false,
            "type": "error",
            "message": "SSL issue detected, website certificate invalid"
        })
    );
}

#[tokio::test]
async fn test_cors_allows_configured_frontend() {
    let req = Request::get("/health")
        .header("origin", "https://results.example.org")
        .body(Body::empty())
        .unwrap();
    let resp = app(Ok(RESULT_PAGE), Some(KEY)).oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://results.example.org")
    );
    assert_eq!(
        resp.headers()
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}
