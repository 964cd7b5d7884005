// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante de regra de negócio vira um par (status, code) estável na
// resposta, para que o frontend possa ramificar o comportamento.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("A quantidade de pontos deve ser maior que zero")]
    InvalidAmount,

    #[error("Este e-mail já está em uso")]
    EmailAlreadyExists,

    #[error("Este slug já está em uso")]
    SlugAlreadyExists,

    #[error("E-mail ou senha inválidos")]
    InvalidCredentials,

    #[error("Token de autenticação inválido ou ausente")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Estabelecimento não encontrado")]
    EstablishmentNotFound,

    #[error("Cartão fidelidade não encontrado")]
    CardNotFound,

    #[error("Voucher não encontrado")]
    VoucherNotFound,

    #[error("Nenhum cliente encontrado")]
    NoClientsFound,

    // A mensalidade venceu (ou nunca foi paga). Vira 402 para o frontend
    // redirecionar ao fluxo de pagamento em vez de mostrar um erro genérico.
    #[error("A mensalidade do estabelecimento está vencida")]
    SubscriptionExpired,

    #[error("Pontos insuficientes: o cartão tem {available} e o resgate exige {required}")]
    InsufficientPoints { available: i32, required: i32 },

    #[error("Não foi possível gerar um código único para o cartão")]
    CardCodeConflict,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Constrói um erro de validação para um único campo, fora do `derive`.
    pub fn validation_field(field: &str, message: &str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut error = validator::ValidationError::new("invalid");
        error.message = Some(message.to_string().into());

        // Leak seguro para erro estático
        let static_field: &'static str = Box::leak(field.to_string().into_boxed_str());
        errors.add(static_field, error);

        AppError::ValidationError(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Validação tem tratamento especial: devolve todos os detalhes por campo.
        if let AppError::ValidationError(errors) = &self {
            let mut details = std::collections::HashMap::new();
            for (field, field_errors) in errors.field_errors() {
                let messages: Vec<String> = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(field.to_string(), messages);
            }
            let body = Json(json!({
                "error": "Um ou mais campos são inválidos.",
                "code": "VALIDATION_ERROR",
                "details": details,
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        let (status, code) = match &self {
            AppError::ValidationError(_) => unreachable!(),
            AppError::InvalidAmount => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            AppError::EmailAlreadyExists | AppError::SlugAlreadyExists => {
                (StatusCode::CONFLICT, "CONFLICT")
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::UserNotFound
            | AppError::EstablishmentNotFound
            | AppError::CardNotFound
            | AppError::VoucherNotFound
            | AppError::NoClientsFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::SubscriptionExpired => {
                (StatusCode::PAYMENT_REQUIRED, "SUBSCRIPTION_EXPIRED")
            }
            AppError::InsufficientPoints { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INSUFFICIENT_POINTS")
            }
            AppError::CardCodeConflict => (StatusCode::CONFLICT, "CONFLICT"),

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que `thiserror` nos deu; a resposta fica genérica.
            e => {
                tracing::error!("Erro interno do servidor: {e}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Ocorreu um erro inesperado.",
                        "code": "INTERNAL_ERROR",
                    })),
                )
                    .into_response();
            }
        };

        let body = Json(json!({ "error": self.to_string(), "code": code }));
        (status, body).into_response()
    }
}
