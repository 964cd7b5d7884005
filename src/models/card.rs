// src/models/card.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// A pessoa dona de um cartão. Escopado por estabelecimento: o mesmo telefone
// em dois estabelecimentos gera dois registros independentes.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,

    // Somente dígitos (ver common::phone)
    pub phone: String,

    pub created_at: DateTime<Utc>,
}

// A linha crua da tabela, usada internamente pelos serviços.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyCard {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub client_id: Uuid,
    pub code: String,

    // Cache transacional do somatório dos movimentos do cartão
    pub points: i32,

    pub created_at: DateTime<Utc>,
}

// A visão do cartão devolvida pela API: cartão + dados do cliente + data do
// último crédito de pontos.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: Uuid,
    pub client_id: Uuid,
    pub code: String,
    pub name: String,
    pub phone: String,
    pub points: i32,
    pub last_point_addition: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// O que o estabelecimento envia para cadastrar um cliente
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[validate(length(min = 8, message = "O telefone deve ter no mínimo 8 dígitos."))]
    #[schema(example = "(11) 99999-8888")]
    pub phone: String,

    #[validate(range(min = 0, message = "Os pontos iniciais não podem ser negativos."))]
    #[serde(default)]
    #[schema(example = 0)]
    pub initial_points: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientResponse {
    // true quando o telefone já estava cadastrado neste estabelecimento e
    // devolvemos o cartão existente sem alterá-lo
    pub already_registered: bool,
    pub card: CardView,
}

// Parâmetros da busca pública por slug
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub establishment_name: String,
    pub cards: Vec<CardView>,
}
