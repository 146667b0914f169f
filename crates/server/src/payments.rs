//! Payment API endpoints

use api_types::payment::{
    PaymentListQuery, PaymentMethod, PaymentNew, PaymentTotal, PaymentUpdate, PaymentView,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::{Money, PaymentFilter, PaymentInput};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, views};

fn filter(query: PaymentListQuery) -> Result<PaymentFilter, ServerError> {
    if let (Some(from), Some(to)) = (query.from, query.to)
        && from > to
    {
        return Err(ServerError::Generic("rango de fechas inválido".to_string()));
    }

    Ok(PaymentFilter {
        package_id: query.package_id,
        client_id: query.client_id,
        date_from: query.from,
        date_to: query.to,
    })
}

/// Handle requests for recording a payment
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentNew>,
) -> Result<(StatusCode, Json<PaymentView>), ServerError> {
    let payment = state
        .engine
        .create_payment(PaymentInput {
            package_id: payload.package_id,
            amount: Money::new(payload.amount_minor),
            payment_date: payload.payment_date.unwrap_or_else(Utc::now),
            method: views::engine_method(payload.method.unwrap_or(PaymentMethod::Efectivo)),
            notes: payload.notes,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(views::payment(payment))))
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<Vec<PaymentView>>, ServerError> {
    let payments = state.engine.find_payments(filter(query)?).await?;
    Ok(Json(payments.into_iter().map(views::payment).collect()))
}

pub async fn total(
    State(state): State<ServerState>,
    Query(query): Query<PaymentListQuery>,
) -> Result<Json<PaymentTotal>, ServerError> {
    let total = state.engine.sum_payments(filter(query)?).await?;
    Ok(Json(PaymentTotal {
        total_minor: total.minor(),
    }))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentView>, ServerError> {
    let payment = state.engine.payment(id).await?;
    Ok(Json(views::payment(payment)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentUpdate>,
) -> Result<Json<PaymentView>, ServerError> {
    let payment = state
        .engine
        .update_payment(
            id,
            engine::PaymentUpdate {
                amount: Money::new(payload.amount_minor),
                payment_date: payload.payment_date,
                method: views::engine_method(payload.method),
                notes: payload.notes,
            },
        )
        .await?;
    Ok(Json(views::payment(payment)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
