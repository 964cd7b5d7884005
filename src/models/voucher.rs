// src/models/voucher.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::card::CardView;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "voucher_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoucherStatus {
    // Gerado e entregue ao fluxo externo de envio (deep link do WhatsApp)
    Sent,
    // Confirmado manualmente pelo operador depois do envio
    Confirmed,
}

// Registro do resgate: congela a mensagem renderizada e o telefone do
// cliente no momento do resgate.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: Uuid,
    pub establishment_id: Uuid,
    pub card_id: Uuid,
    pub client_id: Uuid,

    // Usuário que fez o resgate no balcão
    pub issued_by: Option<Uuid>,

    pub message: String,
    pub recipient_phone: String,
    pub status: VoucherStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemVoucherPayload {
    pub card_id: Uuid,

    // Sobrescreve o template do estabelecimento só neste resgate
    pub custom_message: Option<String>,
}

// O que o colaborador externo de mensageria precisa para montar o deep link.
// O backend não envia nada pela rede.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPayload {
    pub recipient_phone: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemVoucherResponse {
    pub voucher: Voucher,
    pub card: CardView,
    pub delivery: DeliveryPayload,
}
