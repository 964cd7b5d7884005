// src/services/establishment_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        CardRepository, EstablishmentRepository, MovementRepository, PaymentRepository,
        UserRepository, VoucherRepository,
    },
    models::establishment::{Establishment, UpdateSettingsPayload},
};

// Ciclo de vida do estabelecimento: configurações, listagem do superadmin e
// a exclusão em cascata.
#[derive(Clone)]
pub struct EstablishmentService {
    establishment_repo: EstablishmentRepository,
    card_repo: CardRepository,
    movement_repo: MovementRepository,
    voucher_repo: VoucherRepository,
    payment_repo: PaymentRepository,
    user_repo: UserRepository,
}

impl EstablishmentService {
    pub fn new(
        establishment_repo: EstablishmentRepository,
        card_repo: CardRepository,
        movement_repo: MovementRepository,
        voucher_repo: VoucherRepository,
        payment_repo: PaymentRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            establishment_repo,
            card_repo,
            movement_repo,
            voucher_repo,
            payment_repo,
            user_repo,
        }
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Establishment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.establishment_repo
            .find_by_id(executor, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)
    }

    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        payload: &UpdateSettingsPayload,
    ) -> Result<Establishment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        self.establishment_repo
            .find_by_id(&mut *conn, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        self.establishment_repo
            .update_settings(
                &mut *conn,
                establishment_id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
                payload.logo_path.as_deref(),
                payload.points_for_voucher,
                payload.voucher_message_template.as_deref(),
            )
            .await
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Establishment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.establishment_repo.list_all(executor).await
    }

    /// Exclusão em cascata do tenant inteiro, em uma transação, na ordem que
    /// as foreign keys exigem: movimentos → vouchers → cartões → clientes
    /// órfãos → pagamentos → usuários → estabelecimento.
    ///
    /// A remoção do arquivo de logo acontece depois do commit e é melhor
    /// esforço: falha vira log, nunca desfaz a exclusão.
    pub async fn delete_establishment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let establishment = self
            .establishment_repo
            .find_by_id(&mut *tx, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        // Capturado antes de apagar os cartões, para depois remover os
        // clientes que ficarem sem nenhum cartão.
        let client_ids = self
            .card_repo
            .client_ids_by_establishment(&mut *tx, establishment_id)
            .await?;

        self.movement_repo
            .delete_by_establishment(&mut *tx, establishment_id)
            .await?;
        self.voucher_repo
            .delete_by_establishment(&mut *tx, establishment_id)
            .await?;
        self.card_repo
            .delete_cards_by_establishment(&mut *tx, establishment_id)
            .await?;
        self.card_repo
            .delete_clients_without_cards(&mut *tx, &client_ids)
            .await?;
        self.payment_repo
            .delete_by_establishment(&mut *tx, establishment_id)
            .await?;
        self.user_repo
            .delete_by_establishment(&mut *tx, establishment_id)
            .await?;
        self.establishment_repo
            .delete(&mut *tx, establishment_id)
            .await?;

        tx.commit().await?;

        if let Some(logo_path) = &establishment.logo_path {
            if let Err(e) = tokio::fs::remove_file(logo_path).await {
                tracing::warn!("Não foi possível remover o logo {logo_path}: {e}");
            }
        }

        tracing::info!("Estabelecimento {establishment_id} removido com todos os dados.");

        Ok(())
    }
}
