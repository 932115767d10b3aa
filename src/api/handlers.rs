//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{BankSummary, ErrorResponse, QuoteQuery, QuoteResponse};
use crate::finance::FinancingEngine;
use crate::quote::{Quote, QuoteInputs};

/// Computes a quote from query parameters.
///
/// `GET /quote?bill=250&surcharge=-0.02` → 200 + `QuoteResponse` JSON
/// `GET /quote?bill=250&bank=Unknown` → 400 + `ErrorResponse`
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuoteQuery>,
) -> impl IntoResponse {
    let inputs = QuoteInputs::from(query);
    match Quote::compute(&state.config, &inputs) {
        Ok(quote) => Ok(Json(QuoteResponse::new(inputs, quote))),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}

/// Lists banks with their durations.
///
/// `GET /banks` → 200 + `Vec<BankSummary>` JSON
pub async fn get_banks(State(state): State<Arc<AppState>>) -> Json<Vec<BankSummary>> {
    let financing = FinancingEngine::new(&state.config.financing);
    let banks = financing
        .banks()
        .map(|name| BankSummary {
            name: name.to_string(),
            durations: financing.available_durations(name).unwrap_or_default(),
        })
        .collect();
    Json(banks)
}
