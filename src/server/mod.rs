pub mod advice;
pub mod auth;
pub mod routes;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// Shared immutable state; handlers never mutate anything across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/astro/transits", post(routes::astro_transits))
        .route("/astro/fullpro", post(routes::astro_fullpro))
        .layer(cors)
        .with_state(state)
}

/// Start the ephemeris service.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let app = build_router(config);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("cazimi listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
