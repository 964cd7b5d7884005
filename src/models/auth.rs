// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papel do usuário: o superadmin global administra os estabelecimentos,
// o dono opera o seu próprio.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Owner,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    // None para o superadmin global
    pub establishment_id: Option<Uuid>,

    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: UserRole,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados para registrar um estabelecimento junto com o usuário dono
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEstablishmentPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Padaria do Zé")]
    pub name: String,

    #[validate(length(min = 2, message = "O slug deve ter no mínimo 2 caracteres."))]
    #[schema(example = "padaria-do-ze")]
    pub slug: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "ze@padaria.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[schema(example = "11999998888")]
    pub phone: Option<String>,

    #[validate(range(min = 1, message = "A meta de pontos deve ser maior que zero."))]
    #[schema(example = 10)]
    pub points_for_voucher: i32,

    // Deve conter o placeholder {cliente}; se ausente, usamos o padrão.
    #[schema(example = "Parabéns {cliente}! Você ganhou um voucher.")]
    pub voucher_message_template: Option<String>,

    // Caminho do logo já gravado em disco pela rota de upload.
    pub logo_path: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
