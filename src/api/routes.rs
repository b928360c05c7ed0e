use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Users & preferences
        .route("/users", post(handlers::create_user))
        .route("/users/:id/preferences", put(handlers::update_preferences))
        // Catalog seeding
        .route("/channels", post(handlers::create_channel))
        .route("/videos", post(handlers::create_video))
        .route("/videos/:id/watch", post(handlers::record_watch))
        // Recommendation engine
        .route("/recommendations/trending", get(handlers::get_trending))
        .route("/recommendations/:user_id", get(handlers::get_recommendations))
        .route(
            "/recommendations/:user_id/active",
            get(handlers::get_active_recommendations),
        )
        .route(
            "/recommendations/:user_id/analytics",
            get(handlers::get_analytics),
        )
        .route(
            "/recommendations/:user_id/performance",
            get(handlers::get_performance),
        )
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
