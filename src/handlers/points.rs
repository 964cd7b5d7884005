// src/handlers/points.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::movement::{AddPointsPayload, AddPointsResponse},
};

// POST /api/points
#[utoipa::path(
    post,
    path = "/api/points",
    tag = "Pontos",
    request_body = AddPointsPayload,
    responses(
        (status = 201, description = "Pontos creditados", body = AddPointsResponse),
        (status = 400, description = "Quantidade inválida"),
        (status = 402, description = "Mensalidade vencida"),
        (status = 403, description = "Cartão de outro estabelecimento"),
        (status = 404, description = "Cartão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_points(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<AddPointsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let establishment_id = user.establishment_id()?;

    let (movement, card) = app_state
        .points_service
        .credit(
            &app_state.db_pool,
            establishment_id,
            payload.card_id,
            payload.points,
            payload.description.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AddPointsResponse { movement, card })))
}
