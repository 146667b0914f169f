//! Package API endpoints

use api_types::package::{
    CatalogEntryView, PackageListQuery, PackageNew, PackageSummaryView, PackageUpdate, PackageView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Money, PackageFilter, PackageInput};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Handle requests for selling a package. The previous in-progress package
/// of the client is terminated.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PackageNew>,
) -> Result<(StatusCode, Json<PackageView>), ServerError> {
    let tier = views::engine_tier(payload.tier);
    let package = state
        .engine
        .create_package(PackageInput {
            client_id: payload.client_id,
            tier,
            total_price: payload
                .total_price_minor
                .map_or_else(|| tier.suggested_price(), Money::new),
            start_date: payload.start_date.unwrap_or_else(Utc::now),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(views::package(package))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PackageListQuery>,
) -> Result<Json<Vec<PackageView>>, ServerError> {
    let packages = state
        .engine
        .find_packages(PackageFilter {
            client_id: query.client_id,
            statuses: query
                .status
                .map(views::engine_package_status)
                .into_iter()
                .collect(),
        })
        .await?;
    Ok(Json(packages.into_iter().map(views::package).collect()))
}

/// A package with its derived figures (paid, debt, sessions, badge).
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PackageSummaryView>, ServerError> {
    let ledger = state.engine.package_ledger(id).await?;
    Ok(Json(views::package_summary(ledger.summary())))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PackageUpdate>,
) -> Result<Json<PackageView>, ServerError> {
    let package = state
        .engine
        .update_package(
            id,
            engine::PackageUpdate {
                tier: views::engine_tier(payload.tier),
                total_price: Money::new(payload.total_price_minor),
                status: views::engine_package_status(payload.status),
                start_date: payload.start_date,
            },
        )
        .await?;
    Ok(Json(views::package(package)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_package(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handle requests for the package price list
pub async fn catalog(State(state): State<ServerState>) -> Json<Vec<CatalogEntryView>> {
    Json(
        state
            .engine
            .catalog()
            .into_iter()
            .map(views::catalog_entry)
            .collect(),
    )
}
