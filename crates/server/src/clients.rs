//! Client API endpoints

use api_types::{
    client::{ClientDetailView, ClientListQuery, ClientNew, ClientUpdate, ClientView},
    package::PackageSummaryView,
    payment::ClientPaymentView,
    session::{ClientSessionView, SessionView},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::ClientInput;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

/// Handle requests for registering a client
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientNew>,
) -> Result<(StatusCode, Json<ClientView>), ServerError> {
    let client = state
        .engine
        .create_client(ClientInput {
            name: payload.name,
            age: payload.age,
            pathology: payload.pathology,
            email: payload.email,
            phone: payload.phone,
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(views::client(client))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<ClientView>>, ServerError> {
    let clients = state
        .engine
        .list_clients(query.status.map(views::engine_client_status))
        .await?;
    Ok(Json(clients.into_iter().map(views::client).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientView>, ServerError> {
    let client = state.engine.client(id).await?;
    Ok(Json(views::client(client)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientUpdate>,
) -> Result<Json<ClientView>, ServerError> {
    let client = state
        .engine
        .update_client(
            id,
            ClientInput {
                name: payload.name,
                age: payload.age,
                pathology: payload.pathology,
                email: payload.email,
                phone: payload.phone,
                notes: payload.notes,
            },
            views::engine_client_status(payload.status),
        )
        .await?;
    Ok(Json(views::client(client)))
}

/// Deletes the client and everything it owns.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn detail(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClientDetailView>, ServerError> {
    let detail = state.engine.client_detail(id).await?;
    Ok(Json(views::client_detail(detail)))
}

pub async fn packages(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PackageSummaryView>>, ServerError> {
    let rows = state.engine.client_packages(id).await?;
    Ok(Json(rows.into_iter().map(views::package_summary).collect()))
}

pub async fn payments(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClientPaymentView>>, ServerError> {
    let rows = state.engine.client_payments(id).await?;
    Ok(Json(rows.into_iter().map(views::client_payment).collect()))
}

pub async fn sessions(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClientSessionView>>, ServerError> {
    let rows = state.engine.client_sessions(id).await?;
    Ok(Json(rows.into_iter().map(views::client_session).collect()))
}

pub async fn next_session(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Option<SessionView>>, ServerError> {
    let next = state.engine.next_session(id).await?;
    Ok(Json(next.map(views::session)))
}
