//! Session API endpoints

use api_types::session::{SessionCount, SessionListQuery, SessionNew, SessionUpdate, SessionView};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{SessionFilter, SessionInput, SessionStatus};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

fn filter(query: SessionListQuery) -> Result<SessionFilter, ServerError> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err(ServerError::Generic("rango de fechas inválido".to_string()));
    }

    Ok(SessionFilter {
        package_id: query.package_id,
        client_id: query.client_id,
        statuses: query
            .status
            .map(views::engine_session_status)
            .into_iter()
            .collect(),
        date_from: query.from,
        date_to: query.to,
    })
}

/// Handle requests for logging a session. Fails with 409 once the package
/// is full.
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SessionNew>,
) -> Result<(StatusCode, Json<SessionView>), ServerError> {
    let session = state
        .engine
        .create_session(SessionInput {
            package_id: payload.package_id,
            session_date: payload.session_date,
            status: payload
                .status
                .map_or(SessionStatus::Pendiente, views::engine_session_status),
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(views::session(session))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<Vec<SessionView>>, ServerError> {
    let sessions = state.engine.find_sessions(filter(query)?).await?;
    Ok(Json(sessions.into_iter().map(views::session).collect()))
}

pub async fn count(
    State(state): State<ServerState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<SessionCount>, ServerError> {
    let count = state.engine.count_sessions(filter(query)?).await?;
    Ok(Json(SessionCount { count }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.engine.session(id).await?;
    Ok(Json(views::session(session)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SessionUpdate>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state
        .engine
        .update_session(
            id,
            engine::SessionUpdate {
                session_date: payload.session_date,
                status: views::engine_session_status(payload.status),
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(views::session(session)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
