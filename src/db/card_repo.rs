// src/db/card_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::card::{CardView, Client, LoyaltyCard},
};

// Projeção compartilhada pelas consultas que devolvem a visão do cartão
// (cartão + cliente + data do último crédito).
const CARD_VIEW_SELECT: &str = r#"
    SELECT lc.id,
           lc.client_id,
           lc.code,
           c.name,
           c.phone,
           lc.points,
           (SELECT MAX(m.created_at)
              FROM point_movements m
             WHERE m.card_id = lc.id AND m.kind = 'credit') AS last_point_addition,
           lc.created_at
      FROM loyalty_cards lc
      JOIN clients c ON c.id = lc.client_id
"#;

#[derive(Clone)]
pub struct CardRepository {
    pool: PgPool,
}

impl CardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        name: &str,
        phone: &str,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            "INSERT INTO clients (name, phone) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(phone)
        .fetch_one(executor)
        .await?;

        Ok(client)
    }

    pub async fn find_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(client_id)
            .fetch_optional(executor)
            .await?;

        Ok(client)
    }

    pub async fn count_cards_for_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM loyalty_cards WHERE client_id = $1",
        )
        .bind(client_id)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    pub async fn delete_client<'e, E>(&self, executor: E, client_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(client_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  CARTÕES
    // =========================================================================

    pub async fn create_card<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        client_id: Uuid,
        code: &str,
    ) -> Result<LoyaltyCard, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let card = sqlx::query_as::<_, LoyaltyCard>(
            r#"
            INSERT INTO loyalty_cards (establishment_id, client_id, code)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(establishment_id)
        .bind(client_id)
        .bind(code)
        .fetch_one(executor)
        .await?;

        Ok(card)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
    ) -> Result<Option<LoyaltyCard>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let card = sqlx::query_as::<_, LoyaltyCard>("SELECT * FROM loyalty_cards WHERE id = $1")
            .bind(card_id)
            .fetch_optional(executor)
            .await?;

        Ok(card)
    }

    pub async fn code_exists<'e, E>(&self, executor: E, code: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM loyalty_cards WHERE code = $1)",
        )
        .bind(code)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    // Trava a linha do cartão até o fim da transação. Todo caminho que lê o
    // saldo para depois alterá-lo (crédito, resgate) passa por aqui, para que
    // duas requisições concorrentes se serializem em vez de perder updates.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
    ) -> Result<Option<LoyaltyCard>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let card = sqlx::query_as::<_, LoyaltyCard>(
            "SELECT * FROM loyalty_cards WHERE id = $1 FOR UPDATE",
        )
        .bind(card_id)
        .fetch_optional(executor)
        .await?;

        Ok(card)
    }

    pub async fn apply_points_delta<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
        delta: i32,
    ) -> Result<LoyaltyCard, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let card = sqlx::query_as::<_, LoyaltyCard>(
            "UPDATE loyalty_cards SET points = points + $2 WHERE id = $1 RETURNING *",
        )
        .bind(card_id)
        .bind(delta)
        .fetch_one(executor)
        .await?;

        Ok(card)
    }

    pub async fn set_points<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
        points: i32,
    ) -> Result<LoyaltyCard, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let card = sqlx::query_as::<_, LoyaltyCard>(
            "UPDATE loyalty_cards SET points = $2 WHERE id = $1 RETURNING *",
        )
        .bind(card_id)
        .bind(points)
        .fetch_one(executor)
        .await?;

        Ok(card)
    }

    pub async fn delete_card<'e, E>(&self, executor: E, card_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM loyalty_cards WHERE id = $1")
            .bind(card_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // =========================================================================
    //  VISÕES (cartão + cliente)
    // =========================================================================

    pub async fn find_view_by_id<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
    ) -> Result<Option<CardView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{CARD_VIEW_SELECT} WHERE lc.id = $1");
        let view = sqlx::query_as::<_, CardView>(&sql)
            .bind(card_id)
            .fetch_optional(executor)
            .await?;

        Ok(view)
    }

    // A deduplicação por telefone do cadastro: no máximo um cartão por
    // (estabelecimento, telefone normalizado).
    pub async fn find_view_by_phone<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        phone: &str,
    ) -> Result<Option<CardView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{CARD_VIEW_SELECT} WHERE lc.establishment_id = $1 AND c.phone = $2");
        let view = sqlx::query_as::<_, CardView>(&sql)
            .bind(establishment_id)
            .bind(phone)
            .fetch_optional(executor)
            .await?;

        Ok(view)
    }

    pub async fn list_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Vec<CardView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{CARD_VIEW_SELECT} WHERE lc.establishment_id = $1 ORDER BY lc.created_at DESC"
        );
        let views = sqlx::query_as::<_, CardView>(&sql)
            .bind(establishment_id)
            .fetch_all(executor)
            .await?;

        Ok(views)
    }

    // Busca pública: nome por substring (case-insensitive) OU telefone por
    // substring nos dois sentidos, para tolerar diferenças de formatação
    // (o que está salvo contém o buscado, ou o buscado contém o salvo).
    pub async fn search<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Vec<CardView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{CARD_VIEW_SELECT}
             WHERE lc.establishment_id = $1
               AND (($2::text IS NOT NULL AND c.name ILIKE '%' || $2::text || '%')
                 OR ($3::text IS NOT NULL AND (c.phone LIKE '%' || $3::text || '%'
                                            OR $3::text LIKE '%' || c.phone || '%')))
             ORDER BY lc.created_at DESC"#
        );
        let views = sqlx::query_as::<_, CardView>(&sql)
            .bind(establishment_id)
            .bind(name)
            .bind(phone)
            .fetch_all(executor)
            .await?;

        Ok(views)
    }

    // =========================================================================
    //  CASCATA DO ESTABELECIMENTO
    // =========================================================================

    pub async fn client_ids_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT client_id FROM loyalty_cards WHERE establishment_id = $1",
        )
        .bind(establishment_id)
        .fetch_all(executor)
        .await?;

        Ok(ids)
    }

    pub async fn delete_cards_by_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM loyalty_cards WHERE establishment_id = $1")
            .bind(establishment_id)
            .execute(executor)
            .await?;

        Ok(())
    }

    // Remove os clientes que ficaram sem nenhum cartão depois da cascata.
    pub async fn delete_clients_without_cards<'e, E>(
        &self,
        executor: E,
        client_ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            DELETE FROM clients
             WHERE id = ANY($1)
               AND NOT EXISTS (SELECT 1 FROM loyalty_cards lc WHERE lc.client_id = clients.id)
            "#,
        )
        .bind(client_ids)
        .execute(executor)
        .await?;

        Ok(())
    }
}
