//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::models::{
    ApiResponse, ChannelsQuery, GridQuery, IdentifyQuery, PredictionQuery, SuggestRequest,
    SuggestionsQuery,
};
use super::{handlers, USER_ID_HEADER};
use crate::catalog::Catalog;
use crate::models::{ChannelId, UserId};
use crate::CatalogError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

/// Build the application router
pub fn router(catalog: Arc<Catalog>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::HeaderName::from_static(USER_ID_HEADER),
        ]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        .route("/api/channels", get(channels_handler))
        .route("/api/channels/count", get(channel_count_handler))
        .route("/api/channels/identify", get(identify_handler))
        .route("/api/channels/:id", get(channel_handler))
        .route("/api/channels/:id/prediction", get(prediction_handler))
        .route("/api/predictions/grid", get(grid_handler))
        .route("/api/languages", get(languages_handler))
        .route(
            "/api/suggestions",
            get(suggestions_handler).post(suggest_handler),
        )
        .with_state(AppState { catalog })
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(catalog: Arc<Catalog>, port: u16) -> Result<()> {
    let app = router(catalog);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("🌐 API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn respond<T: Serialize>(result: crate::Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            warn!("❌ Request failed: {}", e);
            let status = match e {
                CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

fn user_from_headers(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserId::new)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check().await))
}

async fn channels_handler(
    State(state): State<AppState>,
    Query(query): Query<ChannelsQuery>,
) -> Response {
    respond(handlers::list_channels(&state.catalog, &query.to_query()).await)
}

async fn channel_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    respond(handlers::get_channel(&state.catalog, &ChannelId::from(id)).await)
}

async fn channel_count_handler(State(state): State<AppState>) -> Response {
    respond(handlers::channel_count(&state.catalog).await)
}

async fn languages_handler(State(state): State<AppState>) -> Response {
    respond(handlers::languages(&state.catalog).await)
}

async fn identify_handler(
    State(state): State<AppState>,
    Query(query): Query<IdentifyQuery>,
) -> Response {
    respond(handlers::identify_channel(&state.catalog, &query.url).await)
}

async fn prediction_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PredictionQuery>,
) -> Response {
    respond(
        handlers::channel_prediction(
            &state.catalog,
            &ChannelId::from(id),
            query.min_gradient,
            query.filter_below_average,
        )
        .await,
    )
}

async fn grid_handler(State(state): State<AppState>, Query(query): Query<GridQuery>) -> Response {
    respond(handlers::programming_grid(&state.catalog, query.min_gradient).await)
}

async fn suggest_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SuggestRequest>,
) -> Response {
    let suggested =
        handlers::suggest_channel(&state.catalog, payload.channel_id, user_from_headers(&headers))
            .await;
    (StatusCode::OK, Json(ApiResponse::success(suggested))).into_response()
}

async fn suggestions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SuggestionsQuery>,
) -> Response {
    respond(
        handlers::channel_suggestions(&state.catalog, &query.ids(), user_from_headers(&headers))
            .await,
    )
}
