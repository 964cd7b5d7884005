// src/db/movement_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::movement::{Movement, MovementKind},
};

// Repositório do razão de pontos. Só insere e consulta: linhas de movimento
// nunca são alteradas, apenas removidas em cascata junto com o cartão.
#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
        kind: MovementKind,
        points: i32,
        description: Option<&str>,
    ) -> Result<Movement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, Movement>(
            r#"
            INSERT INTO point_movements (card_id, kind, points, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(card_id)
        .bind(kind)
        .bind(points)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(movement)
    }

    pub async fn list_by_card<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
    ) -> Result<Vec<Movement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movements = sqlx::query_as::<_, Movement>(
            "SELECT * FROM point_movements WHERE card_id = $1 ORDER BY created_at DESC",
        )
        .bind(card_id)
        .fetch_all(executor)
        .await?;

        Ok(movements)
    }

    // Somatório dos deltas do cartão. O saldo denormalizado em
    // loyalty_cards.points deve sempre bater com este valor.
    pub async fn sum_for_card<'e, E>(&self, executor: E, card_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sum = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(points), 0) FROM point_movements WHERE card_id = $1",
        )
        .bind(card_id)
        .fetch_one(executor)
        .await?;

        Ok(sum)
    }

    pub async fn delete_by_card<'e, E>(&self, executor: E, card_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM point_movements WHERE card_id = $1")
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
        sqlx::query(
            r#"
            DELETE FROM point_movements
             WHERE card_id IN (SELECT id FROM loyalty_cards WHERE establishment_id = $1)
            "#,
        )
        .bind(establishment_id)
        .execute(executor)
        .await?;

        Ok(())
    }
}
