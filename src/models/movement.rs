// src/models/movement.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::card::CardView;

// Mapeia o CREATE TYPE movement_kind do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "movement_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    Credit,
    Debit,
}

// Uma linha do razão de pontos. Imutável: o saldo do cartão é sempre o
// somatório das linhas, e o campo `points` guarda o delta com sinal
// (positivo em créditos, negativo em débitos).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: Uuid,
    pub card_id: Uuid,
    pub kind: MovementKind,
    pub points: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// O que o estabelecimento envia para creditar pontos
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsPayload {
    pub card_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade de pontos deve ser maior que zero."))]
    #[schema(example = 5)]
    pub points: i32,

    #[schema(example = "Compra acima de R$ 50")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsResponse {
    pub movement: Movement,
    pub card: CardView,
}
