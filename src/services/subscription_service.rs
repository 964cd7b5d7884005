// src/services/subscription_service.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EstablishmentRepository, PaymentRepository},
    models::payment::{PaymentConfirmation, SubscriptionStatus},
};

/// Dias de acesso comprados por cada pagamento de mensalidade.
pub const SUBSCRIPTION_DAYS: i64 = 31;

/// O predicado do portão: a assinatura está ativa se existe uma validade e
/// ela ainda não passou. `None` (nunca pagou) conta como vencida.
pub fn is_active(valid_until: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    matches!(valid_until, Some(v) if v >= now)
}

// O portão de assinatura: toda operação que muda estado (cadastro de
// cliente, crédito de pontos, resgate de voucher) passa por `assert_active`
// antes de escrever qualquer coisa. Listagens não passam.
#[derive(Clone)]
pub struct SubscriptionService {
    establishment_repo: EstablishmentRepository,
    payment_repo: PaymentRepository,
}

impl SubscriptionService {
    pub fn new(
        establishment_repo: EstablishmentRepository,
        payment_repo: PaymentRepository,
    ) -> Self {
        Self {
            establishment_repo,
            payment_repo,
        }
    }

    /// Falha com `EstablishmentNotFound` se o estabelecimento não existe e
    /// com `SubscriptionExpired` se a mensalidade venceu ou nunca foi paga.
    /// Checagem pura: não escreve nada.
    pub async fn assert_active<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let valid_until = self
            .establishment_repo
            .subscription_valid_until(executor, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        if !is_active(valid_until, Utc::now()) {
            return Err(AppError::SubscriptionExpired);
        }

        Ok(())
    }

    pub async fn status<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<SubscriptionStatus, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let valid_until = self
            .establishment_repo
            .subscription_valid_until(executor, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        Ok(SubscriptionStatus {
            active: is_active(valid_until, Utc::now()),
            valid_until,
        })
    }

    /// Registro manual do pagamento da mensalidade (superadmin). Grava o
    /// pagamento e recalcula a validade como `paid_at + 31 dias`, tudo na
    /// mesma transação.
    pub async fn confirm_payment<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        payment_date: Option<DateTime<Utc>>,
        amount: Option<Decimal>,
    ) -> Result<PaymentConfirmation, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.establishment_repo
            .find_by_id(&mut *tx, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        let paid_at = payment_date.unwrap_or_else(Utc::now);
        let payment = self
            .payment_repo
            .insert(&mut *tx, establishment_id, amount, paid_at)
            .await?;

        let valid_until = paid_at + Duration::days(SUBSCRIPTION_DAYS);
        self.establishment_repo
            .set_subscription_valid_until(&mut *tx, establishment_id, valid_until)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Mensalidade confirmada para o estabelecimento {establishment_id}, válida até {valid_until}"
        );

        Ok(PaymentConfirmation {
            payment,
            subscription_valid_until: valid_until,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active_validade_futura() {
        let now = Utc::now();
        assert!(is_active(Some(now + Duration::days(1)), now));
    }

    #[test]
    fn test_is_active_na_virada() {
        // Exatamente no instante da validade ainda conta como ativa; só
        // "estritamente antes de agora" vence.
        let now = Utc::now();
        assert!(is_active(Some(now), now));
    }

    #[test]
    fn test_is_active_vencida() {
        let now = Utc::now();
        assert!(!is_active(Some(now - Duration::seconds(1)), now));
        assert!(!is_active(Some(now - Duration::days(30)), now));
    }

    #[test]
    fn test_is_active_sem_pagamento() {
        assert!(!is_active(None, Utc::now()));
    }
}
