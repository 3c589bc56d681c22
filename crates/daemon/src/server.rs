// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::{middleware, Router};
use sl_core::{Database, Tracker};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState, SharedState};
use crate::config::Config;
use crate::error::Result;
use crate::handle::TrackerHandle;

/// Assembles the full application: guarded API routes, `/health`, CORS and
/// request tracing.
pub fn build_router(state: SharedState, cors_origins: &[String]) -> Router {
    let guarded = api::routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        api::require_token,
    ));

    Router::new()
        .route("/health", get(api::health))
        .merge(guarded)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Opens the database and serves until ctrl-c.
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr()?;
    let db_path = config.database_path();
    let db = Database::open(&db_path)?;
    let tracker = Tracker::new(db).with_policy(config.transition_policy);

    let state = Arc::new(AppState::new(
        TrackerHandle::new(tracker),
        config.api_token().map(str::to_string),
    ));
    let app = build_router(state, &config.cors_origins);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        database = %db_path.display(),
        policy = %config.transition_policy,
        "sitelined listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("sitelined stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => {
            tracing::warn!(error = %e, "could not listen for ctrl-c, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
