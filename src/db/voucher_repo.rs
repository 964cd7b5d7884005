// src/db/voucher_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::voucher::{Voucher, VoucherStatus},
};

#[derive(Clone)]
pub struct VoucherRepository {
    pool: PgPool,
}

impl VoucherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        card_id: Uuid,
        client_id: Uuid,
        issued_by: Option<Uuid>,
        message: &str,
        recipient_phone: &str,
    ) -> Result<Voucher, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let voucher = sqlx::query_as::<_, Voucher>(
            r#"
            INSERT INTO vouchers
                (establishment_id, card_id, client_id, issued_by, message, recipient_phone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(establishment_id)
        .bind(card_id)
        .bind(client_id)
        .bind(issued_by)
        .bind(message)
        .bind(recipient_phone)
        .fetch_one(executor)
        .await?;

        Ok(voucher)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Voucher>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let voucher = sqlx::query_as::<_, Voucher>("SELECT * FROM vouchers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(voucher)
    }

    pub async fn list_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Vec<Voucher>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let vouchers = sqlx::query_as::<_, Voucher>(
            "SELECT * FROM vouchers WHERE establishment_id = $1 ORDER BY created_at DESC",
        )
        .bind(establishment_id)
        .fetch_all(executor)
        .await?;

        Ok(vouchers)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: VoucherStatus,
    ) -> Result<Voucher, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let voucher = sqlx::query_as::<_, Voucher>(
            "UPDATE vouchers SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(voucher)
    }

    pub async fn delete_by_card<'e, E>(&self, executor: E, card_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM vouchers WHERE card_id = $1")
            .bind(card_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    pub async fn delete_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM vouchers WHERE establishment_id = $1")
            .bind(establishment_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
