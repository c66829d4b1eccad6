use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use cartprobe_core::AppConfig;

use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "bad_request" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ProbeRequest {
    #[serde(default)]
    url: String,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/probe", post(probe))
        .layer(build_cors())
        .layer(axum::middleware::from_fn(request_id))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
}

async fn health() -> Json<HealthData> {
    Json(HealthData { status: "ok" })
}

/// Runs one probe for the posted target URL and returns the report verbatim.
///
/// Probe-level failures (bad target, unreachable site, exhausted walk) are
/// encoded in the report's `status` field with HTTP 200 — the report is the
/// product. Only a malformed request body is an HTTP-level error.
async fn probe(
    State(state): State<AppState>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    Json(request): Json<ProbeRequest>,
) -> Result<Json<cartprobe_core::ProbeReport>, ApiError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(ApiError::new(
            request_id,
            "bad_request",
            "missing or empty \"url\" field",
        ));
    }

    tracing::info!(%request_id, url, "probe requested");
    let report = cartprobe_probe::run_probe(&state.config, url).await;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            config: Arc::new(AppConfig {
                env: cartprobe_core::Environment::Test,
                bind_addr: "127.0.0.1:0".parse().unwrap(),
                log_level: "debug".to_owned(),
                request_timeout_secs: 2,
                connect_timeout_secs: 2,
                probe_deadline_secs: 30,
                user_agent: "cartprobe-test/0.1".to_owned(),
                verify_tls: true,
                candidate_concurrency: 1,
            }),
        }
    }

    fn probe_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/probe")
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let app = build_app(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn probe_rejects_empty_url_with_400() {
        let app = build_app(test_state());
        let response = app
            .oneshot(probe_request(r#"{"url": ""}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn probe_encodes_invalid_target_in_report_status() {
        let app = build_app(test_state());
        let response = app
            .oneshot(probe_request(r#"{"url": "not a url"}"#))
            .await
            .expect("response");

        // No network activity happens for an unparseable target; the probe
        // still answers 200 with an error-status report.
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["status"], "error");
        assert_eq!(json["url"], "not a url");
    }

    #[tokio::test]
    async fn probe_returns_full_report_for_a_mocked_storefront() {
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/product/widget"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><a href="?add-to-cart=7">Buy</a></html>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(query_param("wc-ajax", "add_to_cart"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"fragments":{"div.cart":"<div></div>"}}"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/checkout/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<div id="payment"><input type="radio" name="payment_method" value="bacs"></div>"#,
            ))
            .mount(&server)
            .await;

        let app = build_app(test_state());
        let entry = format!("{}/product/widget", server.uri());
        let response = app
            .oneshot(probe_request(&format!(r#"{{"url": "{entry}"}}"#)))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["status"], "success");
        assert_eq!(json["product_ids"][0], "7");
        assert_eq!(json["captcha"], false);
        assert_eq!(json["payment_methods"][0], "bacs");
        assert_eq!(json["cart"], "confirmed");
    }
}
