use std::path::{Path, PathBuf};

use axum::{
    extract::{rejection::JsonRejection, Json, Path as UrlPath, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use curve_protocol::error::SessionError;
use curve_protocol::model::{BasicSettings, HourlySchedule};
use curve_protocol::prices::{is_known_location, location_prices};
use curve_protocol::state::{Tab, UiState};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;

use crate::config::ServerConfig;
use crate::session::Session;

// Shared state between the handlers
#[derive(Clone)]
pub struct WebState {
    pub session: Session,
    pub static_dir: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedRequest {
    settings: BasicSettings,
    hourly: HourlySchedule,
}

#[derive(Deserialize)]
pub struct TabRequest {
    tab: Tab,
}

#[derive(Serialize)]
pub struct LocationPrices {
    location: u8,
    known: bool,
    prices: Vec<f64>,
}

pub enum ApiError {
    Session(SessionError),
    // Body that does not parse into the form, e.g. an empty number field sent as null
    Body(JsonRejection),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::Body(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Session(SessionError::Busy) => (StatusCode::CONFLICT, SessionError::Busy.to_string()),
            ApiError::Session(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Body(e) => (StatusCode::BAD_REQUEST, e.body_text()),
        };
        warn!("rejected: {}", message);
        let body = serde_json::json!({
            "success": false,
            "error": message
        });
        (status, axum::Json(body)).into_response()
    }
}

pub fn create_router(session: Session, static_dir: &Path) -> Router {
    let app_state = WebState { session, static_dir: static_dir.to_path_buf() };

    Router::new()
        .route("/", get(serve_demo_page))
        .route("/api/state", get(get_state))
        .route("/api/basic", post(calculate_basic))
        .route("/api/advanced", post(calculate_advanced))
        .route("/api/retry", post(retry))
        .route("/api/try-another", post(try_another))
        .route("/api/tab", post(switch_tab))
        .route("/api/schedule/defaults", get(default_schedule))
        .route("/api/prices/:location", get(get_prices))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CompressionLayer::new())
        .with_state(app_state)
}

pub async fn create_web_server(config: &ServerConfig, session: Session) -> anyhow::Result<()> {
    let app = create_router(session, &config.static_dir);

    let listener = tokio::net::TcpListener::bind((config.bind_address.as_str(), config.port)).await?;
    info!("starting web server on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn serve_demo_page(State(state): State<WebState>) -> Html<String> {
    // Read the HTML file from the filesystem
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Html(content),
        Err(e) => {
            error!("error reading {}: {}", path.display(), e);
            Html("Error loading page".to_string())
        }
    }
}

async fn get_state(State(state): State<WebState>) -> axum::Json<UiState> {
    axum::Json(state.session.snapshot().await)
}

async fn calculate_basic(
    State(state): State<WebState>,
    body: Result<Json<BasicSettings>, JsonRejection>,
) -> Result<axum::Json<UiState>, ApiError> {
    let Json(settings) = body?;
    Ok(axum::Json(state.session.calculate_basic(&settings).await?))
}

async fn calculate_advanced(
    State(state): State<WebState>,
    body: Result<Json<AdvancedRequest>, JsonRejection>,
) -> Result<axum::Json<UiState>, ApiError> {
    let Json(request) = body?;
    let next = state.session.calculate_advanced(&request.settings, &request.hourly).await?;
    Ok(axum::Json(next))
}

async fn retry(State(state): State<WebState>) -> Result<axum::Json<UiState>, ApiError> {
    Ok(axum::Json(state.session.retry().await?))
}

async fn try_another(State(state): State<WebState>) -> axum::Json<UiState> {
    axum::Json(state.session.try_another().await)
}

async fn switch_tab(
    State(state): State<WebState>,
    body: Result<Json<TabRequest>, JsonRejection>,
) -> Result<axum::Json<UiState>, ApiError> {
    let Json(request) = body?;
    Ok(axum::Json(state.session.switch_tab(request.tab).await))
}

async fn default_schedule() -> axum::Json<HourlySchedule> {
    axum::Json(HourlySchedule::default())
}

async fn get_prices(UrlPath(location): UrlPath<u8>) -> axum::Json<LocationPrices> {
    axum::Json(LocationPrices {
        location,
        known: is_known_location(location),
        prices: location_prices(location),
    })
}
