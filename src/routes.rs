use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use include_dir::{include_dir, Dir};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use crate::{
    config::AppConfig,
    delivery::PlatformDetector,
    error::AppError,
    invoice::render_invoice,
    layout::TemplateLayout,
    models::InvoiceData,
    sheet::parse_invoice,
};

pub const TEMPLATE_FIELD: &str = "template";
pub const SPREADSHEET_FIELD: &str = "spreadsheet";

static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<PlatformDetector>,
    pub layout: TemplateLayout,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            detector: Arc::new(PlatformDetector::new(&config.mobile_ua_pattern)),
            layout: TemplateLayout::INVOICE,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

pub fn router(state: AppState) -> Router {
    // Both files travel in one body, plus multipart framing.
    let body_limit = state.max_upload_bytes.saturating_mul(2).saturating_add(64 * 1024);
    Router::new()
        .route("/", get(index))
        .route("/api/invoice", post(generate_invoice))
        .route("/api/invoice/preview", post(preview_invoice))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers([header::CONTENT_DISPOSITION])
        )
        .with_state(state)
}

pub async fn index() -> Response {
    match STATIC_DIR.get_file("index.html").and_then(|f| f.contents_utf8()) {
        Some(html) => Html(html).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Default)]
struct Uploads {
    template: Option<Bytes>,
    spreadsheet: Option<Bytes>,
}

/// Buffers the known file fields. Empty parts (no file chosen) count as missing.
async fn read_uploads(mut multipart: Multipart, limit: usize) -> Result<Uploads, AppError> {
    let mut uploads = Uploads::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| AppError::Upload(e.to_string()))? {
        let name = field.name().unwrap_or_default().to_string();
        let (label, slot) = match name.as_str() {
            TEMPLATE_FIELD => (TEMPLATE_FIELD, &mut uploads.template),
            SPREADSHEET_FIELD => (SPREADSHEET_FIELD, &mut uploads.spreadsheet),
            _ => {
                debug!("Ignoring upload field {:?}", name);
                continue;
            }
        };
        let data = field.bytes().await.map_err(|e| AppError::Upload(e.to_string()))?;
        if data.len() > limit {
            return Err(AppError::TooLarge { field: label, size: data.len(), limit });
        }
        info!("📥 Received {} ({} bytes)", label, data.len());
        if !data.is_empty() {
            *slot = Some(data);
        }
    }
    Ok(uploads)
}

pub async fn generate_invoice(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let uploads = read_uploads(multipart, state.max_upload_bytes).await?;
    let template = uploads.template.ok_or(AppError::MissingFile(TEMPLATE_FIELD))?;
    let spreadsheet = uploads.spreadsheet.ok_or(AppError::MissingFile(SPREADSHEET_FIELD))?;

    let layout = state.layout;
    let rendered = tokio::task::spawn_blocking(move || render_invoice(&template, &spreadsheet, &layout)).await??;

    let user_agent = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok());
    let delivery = state.detector.delivery(user_agent);
    info!("✅ Generated {} ({} bytes), delivering via {}", rendered.filename, rendered.bytes.len(), delivery.name());
    Ok((StatusCode::OK, delivery.headers(&rendered.filename), rendered.bytes).into_response())
}

pub async fn preview_invoice(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<InvoiceData>, AppError> {
    let uploads = read_uploads(multipart, state.max_upload_bytes).await?;
    let spreadsheet = uploads.spreadsheet.ok_or(AppError::MissingFile(SPREADSHEET_FIELD))?;
    let data = tokio::task::spawn_blocking(move || parse_invoice(&spreadsheet)).await??;
    Ok(Json(data))
}
