// src/handlers/public.rs

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::card::{SearchQuery, SearchResponse},
};

// GET /api/public/{slug}/cards
//
// Busca sem autenticação: o cliente final consulta o próprio cartão pelo
// slug público do estabelecimento.
#[utoipa::path(
    get,
    path = "/api/public/{slug}/cards",
    tag = "Publico",
    params(
        ("slug" = String, Path, description = "Slug público do estabelecimento"),
        SearchQuery
    ),
    responses(
        (status = 200, description = "Cartões encontrados", body = SearchResponse),
        (status = 400, description = "Busca sem nome e sem telefone"),
        (status = 404, description = "Estabelecimento ou cliente não encontrado")
    )
)]
pub async fn search_cards(
    State(app_state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let response = app_state
        .card_service
        .search(
            &app_state.db_pool,
            &slug,
            query.name.as_deref(),
            query.phone.as_deref(),
        )
        .await?;

    Ok(Json(response))
}
