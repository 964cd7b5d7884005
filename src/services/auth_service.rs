// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::violates_constraint, error::AppError},
    db::{EstablishmentRepository, UserRepository},
    models::auth::{Claims, RegisterEstablishmentPayload, User, UserRole},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    establishment_repo: EstablishmentRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        establishment_repo: EstablishmentRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            establishment_repo,
            jwt_secret,
            pool,
        }
    }

    /// Registra o estabelecimento e o usuário dono numa transação só: se a
    /// criação do usuário falhar, o estabelecimento é desfeito junto.
    pub async fn register_establishment(
        &self,
        payload: &RegisterEstablishmentPayload,
    ) -> Result<String, AppError> {
        // O hashing fica fora da transação, pois não toca no banco.
        let password = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {e}"))??;

        let mut tx = self.pool.begin().await?;

        // As constraints UNIQUE do banco são a fonte da verdade para slug e
        // e-mail repetidos; aqui só traduzimos a violação para o erro certo.
        // Sair com Err desfaz a transação no drop.
        let establishment = match self
            .establishment_repo
            .create(
                &mut *tx,
                &payload.name,
                &payload.slug,
                Some(&payload.email),
                payload.phone.as_deref(),
                payload.logo_path.as_deref(),
                payload.points_for_voucher,
                payload.voucher_message_template.as_deref(),
            )
            .await
        {
            Ok(establishment) => establishment,
            Err(AppError::DatabaseError(e))
                if violates_constraint(&e, "establishments_slug_key") =>
            {
                return Err(AppError::SlugAlreadyExists);
            }
            Err(e) => return Err(e),
        };

        let owner = match self
            .user_repo
            .create_user(
                &mut *tx,
                Some(establishment.id),
                &payload.email,
                &hashed_password,
                UserRole::Owner,
            )
            .await
        {
            Ok(owner) => owner,
            Err(AppError::DatabaseError(e)) if violates_constraint(&e, "users_email_key") => {
                return Err(AppError::EmailAlreadyExists);
            }
            Err(e) => return Err(e),
        };

        tx.commit().await?;

        tracing::info!(
            "Estabelecimento '{}' registrado com o slug '{}'.",
            establishment.name,
            establishment.slug
        );

        self.create_token(owner.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(&self.pool, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {e}"))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(&self.pool, token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Garante o superadmin global no boot, a partir das variáveis de
    /// ambiente ADMIN_EMAIL / ADMIN_PASSWORD. Não faz nada se já existe.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(&self.pool, email).await?.is_some() {
            return Ok(());
        }

        let password = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {e}"))??;

        self.user_repo
            .create_user(&self.pool, None, email, &hashed_password, UserRole::Admin)
            .await?;

        tracing::info!("👑 Superadmin {email} criado.");

        Ok(())
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
