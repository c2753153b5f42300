//! Backend for proxy mode: `GET /consulta/{identifier}` answers with a
//! `{status, data | message}` envelope whose `data` is a tagged report.

use std::net::SocketAddr;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use camara_acquire::{compose, CamaraClient};
use camara_model::{tagged, ProxyEnvelope};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub client: CamaraClient,
}

pub fn router(client: CamaraClient) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/consulta/{*pl}", get(consulta))
        .with_state(AppState { client })
        .layer(TraceLayer::new_for_http())
}

pub async fn health() -> &'static str {
    "OK"
}

/// Failures are reported inside the envelope; the HTTP status stays 200.
pub async fn consulta(State(state): State<AppState>, Path(pl): Path<String>) -> Json<ProxyEnvelope> {
    tracing::info!(query = %pl, "consulta");
    match compose::consultar(&state.client, &pl).await {
        Ok(sections) => Json(ProxyEnvelope::success(tagged::emit(&sections))),
        Err(e) => {
            tracing::warn!(query = %pl, error = %e, "consulta failed");
            Json(ProxyEnvelope::error(e.to_string()))
        }
    }
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, client: CamaraClient) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, router(client)).await
}
