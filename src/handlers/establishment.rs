// src/handlers/establishment.rs

use axum::{Json, extract::State};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        establishment::{Establishment, UpdateSettingsPayload},
        payment::SubscriptionStatus,
    },
};

// GET /api/establishment
#[utoipa::path(
    get,
    path = "/api/establishment",
    tag = "Estabelecimento",
    responses((status = 200, description = "Dados do estabelecimento", body = Establishment)),
    security(("api_jwt" = []))
)]
pub async fn get_establishment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Establishment>, AppError> {
    let establishment_id = user.establishment_id()?;

    let establishment = app_state
        .establishment_service
        .get(&app_state.db_pool, establishment_id)
        .await?;

    Ok(Json(establishment))
}

// PUT /api/establishment
#[utoipa::path(
    put,
    path = "/api/establishment",
    tag = "Estabelecimento",
    request_body = UpdateSettingsPayload,
    responses((status = 200, description = "Configurações atualizadas", body = Establishment)),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<Json<Establishment>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let establishment_id = user.establishment_id()?;

    let establishment = app_state
        .establishment_service
        .update_settings(&app_state.db_pool, establishment_id, &payload)
        .await?;

    Ok(Json(establishment))
}

// GET /api/establishment/subscription
#[utoipa::path(
    get,
    path = "/api/establishment/subscription",
    tag = "Estabelecimento",
    responses((status = 200, description = "Situação da mensalidade", body = SubscriptionStatus)),
    security(("api_jwt" = []))
)]
pub async fn subscription_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<SubscriptionStatus>, AppError> {
    let establishment_id = user.establishment_id()?;

    let status = app_state
        .subscription_service
        .status(&app_state.db_pool, establishment_id)
        .await?;

    Ok(Json(status))
}
