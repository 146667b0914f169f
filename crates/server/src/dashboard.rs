//! Dashboard API endpoints

use api_types::dashboard::{ClientRow, DashboardStatsView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState, views};

/// Handle requests for the dashboard counters
pub async fn stats(State(state): State<ServerState>) -> Result<Json<DashboardStatsView>, ServerError> {
    let stats = state.engine.dashboard_stats().await?;
    Ok(Json(views::stats(stats)))
}

/// Handle requests for the dashboard client table
pub async fn clients(State(state): State<ServerState>) -> Result<Json<Vec<ClientRow>>, ServerError> {
    let rows = state.engine.dashboard_clients().await?;
    Ok(Json(rows.into_iter().map(views::client_row).collect()))
}
