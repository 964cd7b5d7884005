// src/db/establishment_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::establishment::Establishment};

#[derive(Clone)]
pub struct EstablishmentRepository {
    pool: PgPool,
}

impl EstablishmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        slug: &str,
        email: Option<&str>,
        phone: Option<&str>,
        logo_path: Option<&str>,
        points_for_voucher: i32,
        voucher_message_template: Option<&str>,
    ) -> Result<Establishment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let establishment = sqlx::query_as::<_, Establishment>(
            r#"
            INSERT INTO establishments
                (name, slug, email, phone, logo_path, points_for_voucher, voucher_message_template)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(email)
        .bind(phone)
        .bind(logo_path)
        .bind(points_for_voucher)
        .bind(voucher_message_template)
        .fetch_one(executor)
        .await?;

        Ok(establishment)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Establishment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let establishment =
            sqlx::query_as::<_, Establishment>("SELECT * FROM establishments WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;

        Ok(establishment)
    }

    pub async fn find_by_slug<'e, E>(
        &self,
        executor: E,
        slug: &str,
    ) -> Result<Option<Establishment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let establishment =
            sqlx::query_as::<_, Establishment>("SELECT * FROM establishments WHERE slug = $1")
                .bind(slug)
                .fetch_optional(executor)
                .await?;

        Ok(establishment)
    }

    // O portão de assinatura só precisa desta coluna; o Option externo
    // distingue "estabelecimento não existe" de "nunca pagou".
    pub async fn subscription_valid_until<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Option<DateTime<Utc>>>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT subscription_valid_until FROM establishments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    pub async fn set_subscription_valid_until<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        valid_until: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE establishments
               SET subscription_valid_until = $2, updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(valid_until)
        .execute(executor)
        .await?;

        Ok(())
    }

    // Campos ausentes (NULL) mantêm o valor atual.
    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        logo_path: Option<&str>,
        points_for_voucher: Option<i32>,
        voucher_message_template: Option<&str>,
    ) -> Result<Establishment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let establishment = sqlx::query_as::<_, Establishment>(
            r#"
            UPDATE establishments
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = COALESCE($4, phone),
                   logo_path = COALESCE($5, logo_path),
                   points_for_voucher = COALESCE($6, points_for_voucher),
                   voucher_message_template = COALESCE($7, voucher_message_template),
                   updated_at = now()
             WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(logo_path)
        .bind(points_for_voucher)
        .bind(voucher_message_template)
        .fetch_one(executor)
        .await?;

        Ok(establishment)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Establishment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let establishments = sqlx::query_as::<_, Establishment>(
            "SELECT * FROM establishments ORDER BY created_at DESC",
        )
        .fetch_all(executor)
        .await?;

        Ok(establishments)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM establishments WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
