// src/db/payment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::payment::SubscriptionPayment};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        amount: Option<Decimal>,
        paid_at: DateTime<Utc>,
    ) -> Result<SubscriptionPayment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, SubscriptionPayment>(
            r#"
            INSERT INTO subscription_payments (establishment_id, amount, paid_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(establishment_id)
        .bind(amount)
        .bind(paid_at)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Vec<SubscriptionPayment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, SubscriptionPayment>(
            "SELECT * FROM subscription_payments WHERE establishment_id = $1 ORDER BY paid_at DESC",
        )
        .bind(establishment_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    pub async fn delete_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM subscription_payments WHERE establishment_id = $1")
            .bind(establishment_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
