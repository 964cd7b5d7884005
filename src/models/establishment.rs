// src/models/establishment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// O tenant raiz do sistema. Tudo (usuários, cartões, vouchers, pagamentos)
// pertence a um estabelecimento.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    pub id: Uuid,
    pub name: String,

    // Identificador público usado na busca de clientes sem autenticação
    pub slug: String,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub logo_path: Option<String>,

    // Quantos pontos o cliente precisa acumular para resgatar um voucher
    pub points_for_voucher: i32,

    pub voucher_message_template: Option<String>,

    // None = nunca pagou; no passado = mensalidade vencida
    pub subscription_valid_until: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Atualização das configurações pelo dono; campos ausentes ficam como estão.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub logo_path: Option<String>,

    #[validate(range(min = 1, message = "A meta de pontos deve ser maior que zero."))]
    pub points_for_voucher: Option<i32>,

    pub voucher_message_template: Option<String>,
}
