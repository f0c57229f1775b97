//! REST API for the estimation service.
//!
//! Provides HTTP endpoints for the embedded web UI and other clients.
//! Uses Axum as the web framework and supports CORS.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Router,
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::OnceLock;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{OpenApi, ToSchema};

use crate::config::ApiConfig;
use crate::model::{Constraints, EstimateRequest, ValidationError};
use crate::optimizer::{
    Estimate, EstimatorConfig, GridArrangement, WeightCapOutcome, estimate,
    estimate_with_progress,
};
use crate::report;
use crate::types::Dimensions;

#[derive(Clone)]
struct ApiState {
    estimator_config: EstimatorConfig,
}

static OPENAPI_DOC: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

// SRI hashes verified against https://unpkg.com/swagger-ui-dist@5.17.14/ on 2025-10-29.
const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8" />
        <title>pallet-fit API Docs</title>
        <link
            rel="stylesheet"
            href="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui.css"
            integrity="sha384-wxLW6kwyHktdDGr6Pv1zgm/VGJh99lfUbzSn6HNHBENZlCN7W602k9VkGdxuFvPn"
            crossorigin="anonymous"
        />
    </head>
    <body>
        <div id="swagger-ui"></div>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-bundle.js"
            integrity="sha384-wmyclcVGX/WhUkdkATwhaK1X1JtiNrr2EoYJ+diV3vj4v6OC5yCeSu+yW13SYJep"
            crossorigin="anonymous"
        ></script>
        <script
            src="https://unpkg.com/swagger-ui-dist@5.17.14/swagger-ui-standalone-preset.js"
            integrity="sha384-2YH8WDRaj7V2OqU/trsmzSagmk/E2SutiCsGkdgoQwC9pNUJV1u/141DHB6jgs8t"
            crossorigin="anonymous"
        ></script>
        <script>
            window.onload = function () {
                const ui = SwaggerUIBundle({
                    url: "/docs/openapi.json",
                    dom_id: "#swagger-ui",
                    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
                    layout: "StandaloneLayout",
                });
                window.ui = ui;
            };
        </script>
    </body>
    </html>"##;

fn openapi_doc() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_DOC.get_or_init(ApiDoc::openapi)
}

/// Embedded Web Assets (HTML, CSS, JS)
#[derive(RustEmbed)]
#[folder = "web/"]
struct WebAssets;

/// Request structure for all estimation endpoints.
///
/// Omitted `allow_rotations` and `margin` fall back to the server configuration.
#[derive(Deserialize, Clone, ToSchema)]
#[schema(
    example = json!({
        "container": [120.0, 80.0, 150.0],
        "item": [30.0, 20.0, 15.0],
        "allow_rotations": true,
        "margin": 0.0,
        "max_weight": 500.0,
        "unit_weight": 5.0
    })
)]
pub struct FitRequest {
    #[schema(value_type = [f64; 3], example = json!([589.0, 235.0, 239.0]))]
    pub container: Dimensions,
    #[schema(value_type = [f64; 3], example = json!([120.0, 80.0, 15.0]))]
    pub item: Dimensions,
    #[serde(default)]
    #[schema(nullable = true)]
    pub allow_rotations: Option<bool>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub margin: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub max_weight: Option<f64>,
    #[serde(default)]
    #[schema(nullable = true)]
    pub unit_weight: Option<f64>,
}

impl FitRequest {
    fn into_validated(self, config: &EstimatorConfig) -> Result<EstimateRequest, ValidationError> {
        let constraints = Constraints {
            max_weight: self.max_weight,
            unit_weight: self.unit_weight,
        };
        let request = config.request(
            self.container,
            self.item,
            self.allow_rotations,
            self.margin,
            constraints,
        );
        request.validate()?;
        Ok(request)
    }
}

/// Response structure of an estimation.
///
/// # Fields
/// * `total_items` - Item count after the weight cap
/// * `grid_items` - Item count of the grid fit alone
/// * `orientation` - Item extents along the container's length, width and height
/// * `arrangement` - Items along each container axis
/// * `weight_cap` - `not_requested`, `within_limit`, `capped` or `skipped`
#[derive(Serialize, ToSchema)]
pub struct FitResponse {
    pub total_items: u64,
    pub grid_items: u64,
    #[schema(value_type = [f64; 3], example = json!([30.0, 20.0, 15.0]))]
    pub orientation: Dimensions,
    #[schema(value_type = [u64; 3], example = json!([4, 4, 10]))]
    pub arrangement: GridArrangement,
    pub layout: String,
    pub weight_cap: String,
    #[schema(nullable = true)]
    pub weight_cap_note: Option<String>,
    pub container_volume_m3: f64,
    pub item_volume_m3: f64,
    pub total_volume_m3: f64,
    pub occupancy_percent: f64,
    pub total_weight_kg: f64,
}

impl FitResponse {
    /// Creates a FitResponse from an Estimate.
    pub fn from_estimate(estimate: Estimate) -> Self {
        let layout = estimate.layout();
        let Estimate {
            fit,
            count,
            weight_cap,
            stats,
        } = estimate;

        let weight_cap_note = match &weight_cap {
            WeightCapOutcome::Capped { from, to } => {
                Some(format!("Weight capacity lowers {} items to {}", from, to))
            }
            WeightCapOutcome::Skipped { reason } => Some(reason.clone()),
            WeightCapOutcome::NotRequested | WeightCapOutcome::WithinLimit => None,
        };

        Self {
            total_items: count,
            grid_items: fit.count,
            orientation: fit.orientation,
            arrangement: fit.arrangement,
            layout,
            weight_cap: weight_cap.code().to_string(),
            weight_cap_note,
            container_volume_m3: stats.container_volume_m3,
            item_volume_m3: stats.item_volume_m3,
            total_volume_m3: stats.total_volume_m3,
            occupancy_percent: stats.occupancy_percent,
            total_weight_kg: stats.total_weight_kg,
        }
    }
}

#[derive(Serialize, ToSchema)]
struct ErrorResponse {
    error: String,
    details: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(error, details))).into_response()
}

fn json_deserialize_error(err: JsonRejection) -> Response {
    error_response(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Invalid JSON data",
        err.to_string(),
    )
}

fn validation_error(err: ValidationError) -> Response {
    let error = match &err {
        ValidationError::InvalidDimension(_) => "Invalid dimensions",
        ValidationError::InvalidWeight(_) => "Invalid weight",
        ValidationError::InvalidMargin(_) => "Invalid margin",
    };
    error_response(StatusCode::UNPROCESSABLE_ENTITY, error, err.to_string())
}

fn parse_fit_request(
    payload: Result<Json<FitRequest>, JsonRejection>,
    config: &EstimatorConfig,
) -> Result<EstimateRequest, Response> {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(err) => return Err(json_deserialize_error(err)),
    };

    payload.into_validated(config).map_err(validation_error)
}

fn run_estimate(
    state: &ApiState,
    payload: Result<Json<FitRequest>, JsonRejection>,
) -> Result<(EstimateRequest, Estimate), Response> {
    let request = parse_fit_request(payload, &state.estimator_config)?;
    info!(
        "📥 New estimate request: container {}, item {}, rotations {}",
        request.container, request.item, request.allow_rotation
    );
    let result = estimate(&request).map_err(validation_error)?;
    info!(
        "📦 Result: {} items ({}), occupancy {:.1}%",
        result.count,
        result.layout(),
        result.stats.occupancy_percent
    );
    Ok((request, result))
}

#[derive(OpenApi)]
#[openapi(
    paths(handle_estimate, handle_estimate_stream, handle_estimate_csv, handle_estimate_text),
    components(schemas(FitRequest, FitResponse, ErrorResponse)),
    tags((name = "estimation", description = "Endpoints for grid fit estimation"))
)]
struct ApiDoc;

fn router(estimator_config: EstimatorConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let state = ApiState { estimator_config };

    Router::new()
        // API endpoints
        .route("/estimate", post(handle_estimate))
        .route("/estimate_stream", post(handle_estimate_stream))
        .route("/estimate/csv", post(handle_estimate_csv))
        .route("/estimate/text", post(handle_estimate_text))
        // API documentation
        .route("/docs/openapi.json", get(serve_openapi_json))
        .route("/docs", get(serve_openapi_ui))
        // Web-UI (embedded)
        .route("/", get(serve_index))
        .route("/{*path}", get(serve_static))
        .layer(cors)
        .with_state(state)
}

/// Starts the API server.
///
/// Configures CORS for cross-origin requests from the frontend.
/// Blocks until the server is terminated.
pub async fn start_api_server(
    config: ApiConfig,
    estimator_config: EstimatorConfig,
) -> std::io::Result<()> {
    let app = router(estimator_config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await.inspect_err(|err| {
        error!("❌ Could not bind API server to {}: {}", addr, err);
    })?;

    let display_host = config.display_host().to_string();
    info!(
        "🚀 Server running on http://{}:{}",
        display_host,
        config.port()
    );
    if config.binds_to_all_interfaces() && config.uses_default_host() {
        info!("💡 Local access: http://localhost:{}", config.port());
    }
    info!("📦 API Endpoints:");
    info!("   - POST /estimate");
    info!("   - POST /estimate_stream");
    info!("   - POST /estimate/csv");
    info!("   - POST /estimate/text");
    info!("📑 Documentation:");
    info!("   - GET /docs");
    info!("   - GET /docs/openapi.json");

    axum::serve(listener, app).await
}

/// Handler for POST /estimate endpoint.
///
/// Computes how many whole items fit into the container.
///
/// # Parameters
/// * `payload` - JSON payload with container, item and options
///
/// # Returns
/// JSON response with count, orientation, layout and statistics
#[utoipa::path(
    post,
    path = "/estimate",
    request_body = FitRequest,
    responses(
        (status = 200, description = "Estimate computed", body = FitResponse),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_estimate(
    State(state): State<ApiState>,
    payload: Result<Json<FitRequest>, JsonRejection>,
) -> impl IntoResponse {
    match run_estimate(&state, payload) {
        Ok((_, result)) => {
            (StatusCode::OK, Json(FitResponse::from_estimate(result))).into_response()
        }
        Err(response) => response,
    }
}

/// Handler for POST /estimate/csv endpoint.
///
/// Returns the estimate as a downloadable CSV file.
#[utoipa::path(
    post,
    path = "/estimate/csv",
    request_body = FitRequest,
    responses(
        (status = 200, description = "CSV report", content_type = "text/csv", body = String),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_estimate_csv(
    State(state): State<ApiState>,
    payload: Result<Json<FitRequest>, JsonRejection>,
) -> impl IntoResponse {
    match run_estimate(&state, payload) {
        Ok((request, result)) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"resultat.csv\"",
                ),
            ],
            report::to_csv_now(&request, &result),
        )
            .into_response(),
        Err(response) => response,
    }
}

/// Handler for POST /estimate/text endpoint.
///
/// Returns a plain-text summary of the estimate.
#[utoipa::path(
    post,
    path = "/estimate/text",
    request_body = FitRequest,
    responses(
        (status = 200, description = "Text report", content_type = "text/plain", body = String),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_estimate_text(
    State(state): State<ApiState>,
    payload: Result<Json<FitRequest>, JsonRejection>,
) -> impl IntoResponse {
    match run_estimate(&state, payload) {
        Ok((request, result)) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report::to_text(&request, &result),
        )
            .into_response(),
        Err(response) => response,
    }
}

/// Handler for POST /estimate_stream endpoint (SSE).
///
/// Streams every evaluated orientation as a Server-Sent Event, followed by
/// an `Estimate` event carrying the final result.
#[utoipa::path(
    post,
    path = "/estimate_stream",
    request_body = FitRequest,
    responses(
        (
            status = 200,
            description = "Streams orientation events in real-time",
            content_type = "text/event-stream",
            body = String
        ),
        (
            status = UNPROCESSABLE_ENTITY,
            description = "Invalid request data",
            body = ErrorResponse
        )
    ),
    tag = "estimation"
)]
async fn handle_estimate_stream(
    State(state): State<ApiState>,
    payload: Result<Json<FitRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match parse_fit_request(payload, &state.estimator_config) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let (tx, rx) = mpsc::channel::<String>(32);

    tokio::task::spawn_blocking(move || {
        let outcome = estimate_with_progress(&request, |evt| {
            if let Ok(json) = serde_json::to_string(evt) {
                // A closed receiver only means the client went away.
                let _ = tx.blocking_send(json);
            }
        });
        let message = match outcome {
            Ok(result) => json!({
                "type": "Estimate",
                "result": FitResponse::from_estimate(result),
            }),
            Err(err) => json!({ "type": "Error", "details": err.to_string() }),
        };
        let _ = tx.blocking_send(message.to_string());
    });

    let stream = ReceiverStream::new(rx)
        .map(|msg| Ok::<_, std::convert::Infallible>(Event::default().data(msg)));
    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(std::time::Duration::from_secs(10))
                .text("keep-alive"),
        )
        .into_response()
}

/// Serves the index.html main page
async fn serve_index() -> Response {
    match WebAssets::get("index.html") {
        Some(content) => Html(content.data).into_response(),
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Serves static assets (JS, CSS, etc.)
async fn serve_static(uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    match WebAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

async fn serve_openapi_json() -> impl IntoResponse {
    Json(openapi_doc())
}

async fn serve_openapi_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::extract::FromRequest;
    use axum::http::Request;

    fn state() -> ApiState {
        ApiState {
            estimator_config: EstimatorConfig::builder()
                .allow_rotation(true)
                .default_margin(0.0)
                .build(),
        }
    }

    fn fit_request(json: &str) -> FitRequest {
        serde_json::from_str(json).expect("Should parse valid JSON")
    }

    async fn extract_payload(body: &'static str) -> Result<Json<FitRequest>, JsonRejection> {
        let request = Request::builder()
            .method("POST")
            .uri("/estimate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .expect("Should build request");
        Json::<FitRequest>::from_request(request, &()).await
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should be readable");
        String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should be readable");
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    }

    #[test]
    fn openapi_doc_lists_expected_paths() {
        let doc = openapi_doc();
        let paths = &doc.paths.paths;
        for path in ["/estimate", "/estimate_stream", "/estimate/csv", "/estimate/text"] {
            assert!(
                paths.contains_key(path),
                "OpenAPI documentation is missing the {} path",
                path
            );
        }
    }

    #[test]
    fn openapi_doc_contains_key_schemas() {
        let doc = openapi_doc();
        let components = doc
            .components
            .as_ref()
            .expect("OpenAPI documentation contains no components");
        for name in ["FitRequest", "FitResponse", "ErrorResponse"] {
            assert!(
                components.schemas.contains_key(name),
                "Expected schema '{}' is missing from OpenAPI spec",
                name
            );
        }
    }

    #[test]
    fn fit_request_optional_fields_default_to_none() {
        let request = fit_request(r#"{"container": [120, 80, 150], "item": [30, 20, 15]}"#);
        assert_eq!(request.container, Dimensions::new(120.0, 80.0, 150.0));
        assert_eq!(request.allow_rotations, None);
        assert_eq!(request.margin, None);
        assert_eq!(request.max_weight, None);
        assert_eq!(request.unit_weight, None);
    }

    #[test]
    fn config_defaults_apply_when_request_omits_options() {
        let config = EstimatorConfig::builder()
            .allow_rotation(false)
            .default_margin(5.0)
            .build();
        let request = fit_request(r#"{"container": [120, 80, 150], "item": [30, 20, 15]}"#)
            .into_validated(&config)
            .expect("Should validate successfully");
        assert!(!request.allow_rotation);
        assert_eq!(request.margin, 5.0);

        let request = fit_request(
            r#"{"container": [120, 80, 150], "item": [30, 20, 15], "allow_rotations": true, "margin": 0}"#,
        )
        .into_validated(&config)
        .expect("Should validate successfully");
        assert!(request.allow_rotation);
        assert_eq!(request.margin, 0.0);
    }

    #[tokio::test]
    async fn estimate_endpoint_returns_capped_result() {
        let payload = fit_request(
            r#"{"container": [120, 80, 150], "item": [30, 20, 15], "max_weight": 500, "unit_weight": 5}"#,
        );
        let response = handle_estimate(State(state()), Ok(Json(payload)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total_items"], 100);
        assert_eq!(body["grid_items"], 160);
        assert_eq!(body["arrangement"], json!([4, 4, 10]));
        assert_eq!(body["orientation"], json!([30.0, 20.0, 15.0]));
        assert_eq!(body["layout"], "4 × 4 × 10");
        assert_eq!(body["weight_cap"], "capped");
        assert_eq!(body["total_weight_kg"], 500.0);
    }

    #[tokio::test]
    async fn estimate_endpoint_rejects_invalid_dimensions() {
        let payload = fit_request(r#"{"container": [0, 80, 150], "item": [30, 20, 15]}"#);
        let response = handle_estimate(State(state()), Ok(Json(payload)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid dimensions");
        assert!(
            body["details"]
                .as_str()
                .unwrap_or_default()
                .contains("Container length")
        );
    }

    #[tokio::test]
    async fn csv_endpoint_sets_attachment_headers() {
        let payload = fit_request(r#"{"container": [100, 100, 100], "item": [50, 50, 50]}"#);
        let response = handle_estimate_csv(State(state()), Ok(Json(payload)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert!(
            response.headers()[header::CONTENT_DISPOSITION]
                .to_str()
                .unwrap()
                .contains("resultat.csv")
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(csv.starts_with(report::CSV_HEADER));
        assert!(csv.contains(",50x50x50,50x50x50,2 × 2 × 2,8,"));
    }

    #[tokio::test]
    async fn malformed_json_is_unprocessable() {
        let payload = extract_payload("{bad").await;
        assert!(payload.is_err());

        let response = handle_estimate(State(state()), payload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid JSON data");
        assert!(!body["details"].as_str().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn missing_item_field_is_unprocessable() {
        let payload = extract_payload(r#"{"container": [120, 80, 150]}"#).await;
        let response = handle_estimate_text(State(state()), payload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "Invalid JSON data");
    }

    #[tokio::test]
    async fn text_endpoint_renders_summary() {
        let payload = extract_payload(
            r#"{"container": [120, 80, 150], "item": [30, 20, 15], "max_weight": 500, "unit_weight": 5}"#,
        )
        .await;
        let response = handle_estimate_text(State(state()), payload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        let text = body_text(response).await;
        assert!(text.contains("Layout:       4 × 4 × 10"));
        assert!(text.contains("Total items:  100"));
        assert!(text.contains("Weight cap:   160 -> 100 items"));
    }

    #[tokio::test]
    async fn stream_sends_orientation_events_then_estimate() {
        let payload = extract_payload(r#"{"container": [120, 80, 150], "item": [30, 20, 15]}"#).await;
        let response = handle_estimate_stream(State(state()), payload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/event-stream")
        );

        let text = body_text(response).await;
        let frames: Vec<serde_json::Value> = text
            .lines()
            .filter_map(|line| line.strip_prefix("data: "))
            .map(|data| serde_json::from_str(data).expect("Frame should be JSON"))
            .collect();
        let types: Vec<&str> = frames
            .iter()
            .map(|frame| frame["type"].as_str().unwrap_or_default())
            .collect();

        // (15, 20, 30) ties at 160 and does not replace the first orientation.
        assert_eq!(
            types,
            [
                "OrientationEvaluated",
                "BestImproved",
                "OrientationEvaluated",
                "OrientationEvaluated",
                "OrientationEvaluated",
                "OrientationEvaluated",
                "OrientationEvaluated",
                "Finished",
                "Estimate",
            ]
        );
        assert_eq!(frames[7]["orientations"], 6);
        assert_eq!(frames[7]["best_count"], 160);

        let result = &frames[8]["result"];
        assert_eq!(result["total_items"], 160);
        assert_eq!(result["layout"], "4 × 4 × 10");
        assert_eq!(result["weight_cap"], "not_requested");
    }

    #[tokio::test]
    async fn stream_rejects_invalid_request_before_streaming() {
        let payload = extract_payload(r#"{"container": [120, 80, 150], "item": [30, 0, 15]}"#).await;
        let response = handle_estimate_stream(State(state()), payload)
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["error"], "Invalid dimensions");
    }
}
