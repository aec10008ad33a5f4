use axum::{
    extract::{Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hyper::Server;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::app::Aggregator;
use crate::error::CuratorError;
use crate::storage::ExhibitionStore;
use crate::types::{ArtworkPage, ArtworksQuery, FetchParams, NormalizedArtwork};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub exhibition: Arc<Mutex<ExhibitionStore>>,
}

impl AppState {
    pub fn new(aggregator: Aggregator, exhibition: ExhibitionStore) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            exhibition: Arc::new(Mutex::new(exhibition)),
        }
    }
}

/// Error body returned to clients. Messages are fixed strings; details stay in
/// the server log.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<CuratorError> for ApiError {
    fn from(err: CuratorError) -> Self {
        match err {
            CuratorError::InvalidSource(_) => ApiError::BadRequest("Invalid artwork source"),
            CuratorError::NotFound(_) => ApiError::NotFound("Failed to fetch artwork data"),
            CuratorError::Normalization(id) => {
                error!(%id, "Artwork could not be normalized");
                ApiError::Internal("Failed to normalize artwork data")
            }
            other => {
                error!(error = %other, "Request failed");
                ApiError::Internal("Internal Server Error")
            }
        }
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "exhibition-curator",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn list_artworks(
    State(state): State<AppState>,
    Query(query): Query<ArtworksQuery>,
) -> Json<ArtworkPage> {
    let params = FetchParams::from(query);
    Json(state.aggregator.list_artworks(&params).await)
}

async fn get_artwork(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NormalizedArtwork>, ApiError> {
    let artwork = state.aggregator.lookup(&id).await?;
    Ok(Json(artwork))
}

async fn list_classifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    match state.aggregator.classifications().await {
        Ok(names) => Ok(Json(names)),
        Err(e) => {
            error!(error = %e, "Error fetching classifications");
            Err(ApiError::Internal("Internal Server Error"))
        }
    }
}

async fn list_exhibition(State(state): State<AppState>) -> Json<Vec<NormalizedArtwork>> {
    let store = state.exhibition.lock().await;
    Json(store.list().to_vec())
}

/// Resolve the id against its source and store the snapshot.
async fn add_to_exhibition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if let Some(existing) = state.exhibition.lock().await.get(&id).cloned() {
        return Ok((StatusCode::OK, Json(existing)).into_response());
    }

    // The lock is not held across the upstream lookup
    let artwork = state.aggregator.lookup(&id).await?;

    let mut store = state.exhibition.lock().await;
    let added = store.add(artwork.clone())?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(artwork)).into_response())
}

async fn remove_from_exhibition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.exhibition.lock().await;
    if store.remove(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Artwork not in exhibition"))
    }
}

/// Create the HTTP router with all routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/artworks", get(list_artworks))
        .route("/api/artwork/:id", get(get_artwork))
        .route("/api/classification", get(list_classifications))
        .route("/api/exhibition", get(list_exhibition))
        .route(
            "/api/exhibition/:id",
            post(add_to_exhibition).delete(remove_from_exhibition),
        )
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

/// Start the HTTP server on the specified port and run until Ctrl-C
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_server(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("HTTP server running on http://localhost:{port}");
    info!("Artworks API: http://localhost:{port}/api/artworks");

    Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
