//! Router construction and server lifecycle.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::ServerConfig, error::ServerError};

use super::{handler, signal::shutdown_signal, state::AppState};

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(handler::websocket_handler))
        .route("/messages/{room}", get(handler::get_messages))
        .route("/api/health", get(handler::health_check))
        .route("/api/rooms", get(handler::get_rooms))
        .route("/api/rooms/{room_id}", get(handler::get_room_detail))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind the configured address and run until Ctrl+C / SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!(
        "Listening on {} (history limit {}, outbox capacity {})",
        listener.local_addr().map(|a| a.to_string()).unwrap_or(addr),
        config
            .history_limit
            .map_or_else(|| "none".to_string(), |limit| limit.to_string()),
        config.outbox_capacity
    );

    let state = Arc::new(AppState::new(&config));
    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}
