//! HTTP Server for the CSV converter.
//!
//! # API Endpoints
//!
//! | Method | Path                                    | Description                 |
//! |--------|-----------------------------------------|-----------------------------|
//! | GET    | `/api`                                  | Health check                |
//! | POST   | `/api/converters/file/{direction}`      | Convert an uploaded file    |
//! | POST   | `/api/converters/text/{direction}`      | Convert a raw `text/csv` body |
//! | GET    | `/api/logs`                             | SSE stream of conversion logs |
//!
//! `{direction}` is `sk-to-wp` or `wp-to-sk`; anything else is a 404. Every
//! failure carries a `{"detail": ...}` JSON body.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{header, Method},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, LOG_BROADCASTER};
use super::types::{ConvertResponse, HealthResponse};
use crate::error::{ServerError, ServerResult};
use crate::models::Direction;
use crate::transform::pipeline::Converter;

/// Multipart field carrying the uploaded CSV.
pub const FILE_FIELD: &str = "file";

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub converter: Arc<Converter>,
}

impl AppState {
    pub fn new(converter: Converter) -> Self {
        Self {
            converter: Arc::new(converter),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api", get(health))
        .route("/api/converters/file/{direction}", post(convert_file))
        .route("/api/converters/text/{direction}", post(convert_text))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(port: u16, converter: Converter) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(converter));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 CSV Converter running on http://localhost:{}", port);
    println!("   GET  /api                                - Health check");
    println!("   POST /api/converters/file/{{sk-to-wp|wp-to-sk}} - Upload CSV file");
    println!("   POST /api/converters/text/{{sk-to-wp|wp-to-sk}} - Raw text/csv body");
    println!("   GET  /api/logs                           - SSE log stream");
    println!();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    log_info("Health check! Status is ok!");
    Json(HealthResponse::ok())
}

/// SSE endpoint for real-time log streaming
pub async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // Lagged receivers skip the entries they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Convert an uploaded CSV file
pub async fn convert_file(
    State(state): State<AppState>,
    Path(direction): Path<String>,
    multipart: Multipart,
) -> ServerResult<Json<ConvertResponse>> {
    let direction = parse_direction(&direction)?;
    let (file_name, bytes) = read_upload(multipart).await?;
    log_info(format!(
        "📄 {} upload: {} ({} bytes)",
        direction,
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    let converted_csv = state
        .converter
        .convert_bytes(direction, &bytes)
        .map_err(report)?;
    Ok(Json(ConvertResponse { converted_csv }))
}

/// Convert a raw CSV text body
pub async fn convert_text(
    State(state): State<AppState>,
    Path(direction): Path<String>,
    body: Bytes,
) -> ServerResult<Json<ConvertResponse>> {
    let direction = parse_direction(&direction)?;
    let body = std::str::from_utf8(&body)
        .map_err(|e| ServerError::BadRequest(format!("Body is not valid UTF-8: {}", e)))?;

    let converted_csv = state
        .converter
        .convert_text(direction, body)
        .map_err(report)?;
    Ok(Json(ConvertResponse { converted_csv }))
}

fn parse_direction(raw: &str) -> ServerResult<Direction> {
    raw.parse().map_err(ServerError::NotFound)
}

/// Pull the `file` field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> ServerResult<(Option<String>, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some(FILE_FIELD) {
            let file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
            return Ok((file_name, bytes.to_vec()));
        }
    }

    Err(ServerError::BadRequest(format!(
        "No '{}' field in upload",
        FILE_FIELD
    )))
}

fn report(err: crate::error::ConverterError) -> ServerError {
    log_error(format!("Conversion failed: {}", err));
    ServerError::from(err)
}
