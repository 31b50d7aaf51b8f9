use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub mod auth;
pub mod health;
pub mod rankings;
pub mod stats;

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().frontend_origin);

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::router())
        .merge(stats::router())
        .merge(rankings::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Router::new().nest("/api", api_routes)
}

fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let origin = frontend_origin
        .parse::<HeaderValue>()
        .expect("FRONTEND_ORIGIN is not a valid header value");

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
