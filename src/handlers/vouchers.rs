// src/handlers/vouchers.rs

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
    middleware::auth::AuthenticatedUser,
    models::voucher::{RedeemVoucherPayload, RedeemVoucherResponse, Voucher},
};

// POST /api/vouchers
#[utoipa::path(
    post,
    path = "/api/vouchers",
    tag = "Vouchers",
    request_body = RedeemVoucherPayload,
    responses(
        (status = 201, description = "Voucher resgatado", body = RedeemVoucherResponse),
        (status = 402, description = "Mensalidade vencida"),
        (status = 422, description = "Pontos insuficientes")
    ),
    security(("api_jwt" = []))
)]
pub async fn redeem_voucher(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<RedeemVoucherPayload>,
) -> Result<impl IntoResponse, AppError> {
    let establishment_id = user.establishment_id()?;

    let response = app_state
        .voucher_service
        .redeem(
            &app_state.db_pool,
            establishment_id,
            user.0.id,
            payload.card_id,
            payload.custom_message.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// GET /api/vouchers
#[utoipa::path(
    get,
    path = "/api/vouchers",
    tag = "Vouchers",
    responses((status = 200, description = "Vouchers do estabelecimento", body = Vec<Voucher>)),
    security(("api_jwt" = []))
)]
pub async fn list_vouchers(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Voucher>>, AppError> {
    let establishment_id = user.establishment_id()?;

    let vouchers = app_state
        .voucher_service
        .list(&app_state.db_pool, establishment_id)
        .await?;

    Ok(Json(vouchers))
}

// PATCH /api/vouchers/{voucher_id}/confirm
#[utoipa::path(
    patch,
    path = "/api/vouchers/{voucher_id}/confirm",
    tag = "Vouchers",
    params(("voucher_id" = Uuid, Path, description = "ID do voucher")),
    responses(
        (status = 200, description = "Entrega confirmada", body = Voucher),
        (status = 404, description = "Voucher não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn confirm_voucher(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(voucher_id): Path<Uuid>,
) -> Result<Json<Voucher>, AppError> {
    let establishment_id = user.establishment_id()?;

    let voucher = app_state
        .voucher_service
        .confirm(&app_state.db_pool, establishment_id, voucher_id)
        .await?;

    Ok(Json(voucher))
}
