// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::{
        establishment::Establishment,
        payment::{ConfirmPaymentPayload, PaymentConfirmation},
    },
};

// GET /api/admin/establishments
#[utoipa::path(
    get,
    path = "/api/admin/establishments",
    tag = "Admin",
    responses((status = 200, description = "Todos os estabelecimentos", body = Vec<Establishment>)),
    security(("api_jwt" = []))
)]
pub async fn list_establishments(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Establishment>>, AppError> {
    let establishments = app_state
        .establishment_service
        .list(&app_state.db_pool)
        .await?;

    Ok(Json(establishments))
}

// DELETE /api/admin/establishments/{establishment_id}
#[utoipa::path(
    delete,
    path = "/api/admin/establishments/{establishment_id}",
    tag = "Admin",
    params(("establishment_id" = Uuid, Path, description = "ID do estabelecimento")),
    responses(
        (status = 204, description = "Estabelecimento removido com todos os dados"),
        (status = 404, description = "Estabelecimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_establishment(
    State(app_state): State<AppState>,
    Path(establishment_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state
        .establishment_service
        .delete_establishment(&app_state.db_pool, establishment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// POST /api/admin/establishments/{establishment_id}/payments
#[utoipa::path(
    post,
    path = "/api/admin/establishments/{establishment_id}/payments",
    tag = "Admin",
    params(("establishment_id" = Uuid, Path, description = "ID do estabelecimento")),
    request_body = ConfirmPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = PaymentConfirmation),
        (status = 404, description = "Estabelecimento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_payment(
    State(app_state): State<AppState>,
    Path(establishment_id): Path<Uuid>,
    Json(payload): Json<ConfirmPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let confirmation = app_state
        .subscription_service
        .confirm_payment(
            &app_state.db_pool,
            establishment_id,
            payload.payment_date,
            payload.amount,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(confirmation)))
}
