mod handlers;
mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::error::{CourierError, Result};
use crate::package::PackageService;
use state::AppState;

pub fn build_router(service: PackageService) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/areas", get(handlers::area_list))
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/quote", post(handlers::quote))
        .route("/api/stats", get(handlers::stats))
        .route("/api/packages", post(handlers::create_package).get(handlers::list_packages))
        .route(
            "/api/packages/{id}",
            get(handlers::track_package)
                .put(handlers::update_package)
                .delete(handlers::delete_package),
        )
        .route("/api/packages/id/{id}", get(handlers::get_package))
        .route("/api/packages/{id}/status", put(handlers::update_status))
        .route("/api/packages/{id}/assign", post(handlers::assign_driver))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, service: PackageService) -> Result<()> {
    let app = build_router(service);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        CourierError::config(format!("cannot bind to {}: {}", addr, e))
    })?;

    tracing::info!("eirpost server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
