//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::{IndexerError, Result};
use crate::events::{EventRecord, InvestorSummary};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

/// All routes, without middleware layers.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/investors/:address/events", get(get_investor_events))
        .route("/investors/:address/summary", get(get_investor_summary))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    pub investor: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns all indexed events in ledger order.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<Json<AllEventsResponse>> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(AllEventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /investors/:address/events`
pub async fn get_investor_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<EventsResponse>> {
    validate_address(&address)?;
    let events = db::get_events_for_investor(&state.pool, &address).await?;
    Ok(Json(EventsResponse {
        investor: address,
        count: events.len(),
        events,
    }))
}

/// `GET /investors/:address/summary`
///
/// Invested, refunded and claimed totals folded from the indexed events.
pub async fn get_investor_summary(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<InvestorSummary>> {
    validate_address(&address)?;
    let events = db::get_events_for_investor(&state.pool, &address).await?;
    Ok(Json(InvestorSummary::from_events(&address, &events)?))
}

/// Accept account (`G…`) and contract (`C…`) strkeys.
fn validate_address(address: &str) -> Result<()> {
    let well_formed = address.len() == 56
        && matches!(address.as_bytes()[0], b'G' | b'C')
        && address
            .bytes()
            .all(|b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b));
    if well_formed {
        Ok(())
    } else {
        Err(IndexerError::InvalidAddress(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strkeys() {
        let account = format!("G{}", "A".repeat(55));
        let contract = format!("C{}", "B2".repeat(27) + "7");
        assert!(validate_address(&account).is_ok());
        assert!(validate_address(&contract).is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_address("").is_err());
        assert!(validate_address("GABC").is_err());
        assert!(validate_address(&format!("X{}", "A".repeat(55))).is_err());
        assert!(validate_address(&format!("G{}", "a".repeat(55))).is_err());
        assert!(validate_address(&format!("G{}", "1".repeat(55))).is_err());
    }
}
