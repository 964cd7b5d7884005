// src/handlers/clients.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        card::{CardView, RegisterClientPayload, RegisterClientResponse},
        movement::Movement,
    },
};

// POST /api/clients
#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clientes",
    request_body = RegisterClientPayload,
    responses(
        (status = 201, description = "Cliente cadastrado", body = RegisterClientResponse),
        (status = 200, description = "Telefone já cadastrado; cartão existente devolvido", body = RegisterClientResponse),
        (status = 402, description = "Mensalidade vencida")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_client(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<RegisterClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;
    let establishment_id = user.establishment_id()?;

    let (card, already_registered) = app_state
        .card_service
        .register_client(
            &app_state.db_pool,
            establishment_id,
            &payload.name,
            &payload.phone,
            payload.initial_points.unwrap_or(0),
        )
        .await?;

    // 200 para recadastro idempotente, 201 para cartão novo
    let status = if already_registered {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };

    Ok((
        status,
        Json(RegisterClientResponse {
            already_registered,
            card,
        }),
    ))
}

// GET /api/clients
#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clientes",
    responses((status = 200, description = "Cartões do estabelecimento", body = Vec<CardView>)),
    security(("api_jwt" = []))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<CardView>>, AppError> {
    let establishment_id = user.establishment_id()?;

    let cards = app_state
        .card_service
        .list_clients(&app_state.db_pool, establishment_id)
        .await?;

    Ok(Json(cards))
}

// GET /api/clients/{card_id}/movements
#[utoipa::path(
    get,
    path = "/api/clients/{card_id}/movements",
    tag = "Clientes",
    params(("card_id" = Uuid, Path, description = "ID do cartão")),
    responses((status = 200, description = "Extrato do cartão", body = Vec<Movement>)),
    security(("api_jwt" = []))
)]
pub async fn card_movements(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(card_id): Path<Uuid>,
) -> Result<Json<Vec<Movement>>, AppError> {
    let establishment_id = user.establishment_id()?;

    let movements = app_state
        .card_service
        .movements(&app_state.db_pool, establishment_id, card_id)
        .await?;

    Ok(Json(movements))
}

// DELETE /api/clients/{card_id}
#[utoipa::path(
    delete,
    path = "/api/clients/{card_id}",
    tag = "Clientes",
    params(("card_id" = Uuid, Path, description = "ID do cartão")),
    responses(
        (status = 204, description = "Cartão removido"),
        (status = 404, description = "Cartão não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_card(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(card_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let establishment_id = user.establishment_id()?;

    app_state
        .card_service
        .delete_card(&app_state.db_pool, establishment_id, card_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
