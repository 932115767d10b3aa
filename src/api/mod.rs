//! REST API for on-demand quotes.
//!
//! Provides two GET endpoints:
//! - `/quote` computes a quote from query parameters
//! - `/banks` lists banks and the installment durations they offer

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::config::QuoteConfig;

pub use types::{BankSummary, ErrorResponse, QuoteQuery, QuoteResponse};

/// Immutable application state shared across all request handlers.
///
/// Holds the validated tables; every request recomputes its quote from
/// them, so no locks are needed.
pub struct AppState {
    pub config: QuoteConfig,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quote", get(handlers::get_quote))
        .route("/banks", get(handlers::get_banks))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
