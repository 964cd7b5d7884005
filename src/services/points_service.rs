// src/services/points_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CardRepository, MovementRepository},
    models::{
        card::{CardView, LoyaltyCard},
        movement::{Movement, MovementKind},
    },
    services::SubscriptionService,
};

// O razão de pontos. Toda mutação de saldo passa por aqui ou pelo motor de
// resgate; nunca por escrita direta no campo.
#[derive(Clone)]
pub struct PointsService {
    card_repo: CardRepository,
    movement_repo: MovementRepository,
    subscription_service: SubscriptionService,
}

impl PointsService {
    pub fn new(
        card_repo: CardRepository,
        movement_repo: MovementRepository,
        subscription_service: SubscriptionService,
    ) -> Self {
        Self {
            card_repo,
            movement_repo,
            subscription_service,
        }
    }

    /// Credita pontos no cartão: insere o movimento e incrementa o saldo
    /// denormalizado na mesma transação, com a linha do cartão travada.
    /// Ou os dois commitam juntos, ou nenhum.
    pub async fn credit<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        card_id: Uuid,
        points: i32,
        description: Option<&str>,
    ) -> Result<(Movement, CardView), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if points <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let mut tx = executor.begin().await?;

        self.subscription_service
            .assert_active(&mut *tx, establishment_id)
            .await?;

        let card = self
            .card_repo
            .find_by_id_for_update(&mut *tx, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;
        if card.establishment_id != establishment_id {
            return Err(AppError::Forbidden);
        }

        let movement = self
            .movement_repo
            .insert(
                &mut *tx,
                card_id,
                MovementKind::Credit,
                points,
                Some(description.unwrap_or("Pontos adicionados")),
            )
            .await?;
        self.card_repo
            .apply_points_delta(&mut *tx, card_id, points)
            .await?;

        let view = self
            .card_repo
            .find_view_by_id(&mut *tx, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;

        tx.commit().await?;

        Ok((movement, view))
    }

    /// Recalcula o saldo do cartão a partir do somatório do razão. O razão é
    /// a fonte da verdade; o campo `points` é só um cache transacional, e
    /// esta rotina reescreve o cache quando for preciso conferir ou reparar.
    pub async fn reconcile_card<'e, E>(
        &self,
        executor: E,
        card_id: Uuid,
    ) -> Result<LoyaltyCard, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.card_repo
            .find_by_id_for_update(&mut *tx, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;

        let sum = self.movement_repo.sum_for_card(&mut *tx, card_id).await?;
        let card = self
            .card_repo
            .set_points(&mut *tx, card_id, sum as i32)
            .await?;

        tx.commit().await?;

        Ok(card)
    }
}
