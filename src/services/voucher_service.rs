// src/services/voucher_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CardRepository, EstablishmentRepository, MovementRepository, VoucherRepository},
    models::{
        movement::MovementKind,
        voucher::{DeliveryPayload, RedeemVoucherResponse, Voucher, VoucherStatus},
    },
    services::SubscriptionService,
};

// Mensagem usada quando o estabelecimento não configurou um template.
const DEFAULT_VOUCHER_MESSAGE: &str = "Parabéns {cliente}! Você completou seu cartão fidelidade \
     e ganhou um voucher. Apresente esta mensagem para resgatar o seu prêmio.";

/// Renderiza a mensagem do voucher: mensagem customizada > template do
/// estabelecimento > padrão. Substitui só a primeira ocorrência do
/// placeholder literal `{cliente}` — é um replace simples, não um motor de
/// templates.
fn render_message(custom: Option<&str>, template: Option<&str>, client_name: &str) -> String {
    custom
        .or(template)
        .unwrap_or(DEFAULT_VOUCHER_MESSAGE)
        .replacen("{cliente}", client_name, 1)
}

// O motor de resgate: valida a elegibilidade e consome os pontos do cartão
// em troca de um voucher, tudo numa transação só.
#[derive(Clone)]
pub struct VoucherService {
    card_repo: CardRepository,
    movement_repo: MovementRepository,
    voucher_repo: VoucherRepository,
    establishment_repo: EstablishmentRepository,
    subscription_service: SubscriptionService,
}

impl VoucherService {
    pub fn new(
        card_repo: CardRepository,
        movement_repo: MovementRepository,
        voucher_repo: VoucherRepository,
        establishment_repo: EstablishmentRepository,
        subscription_service: SubscriptionService,
    ) -> Self {
        Self {
            card_repo,
            movement_repo,
            voucher_repo,
            establishment_repo,
            subscription_service,
        }
    }

    /// Resgata um voucher: debita exatamente `points_for_voucher` do cartão
    /// (o excedente fica para o próximo voucher), grava o movimento de débito
    /// e o voucher na mesma transação, e devolve o payload que o fluxo
    /// externo usa para montar o deep link do WhatsApp.
    ///
    /// A checagem de saldo e o débito acontecem com a linha do cartão
    /// travada (`FOR UPDATE`): de dois resgates simultâneos no limiar exato,
    /// o segundo relê o saldo já debitado e falha com `InsufficientPoints`
    /// em vez de deixar o cartão negativo.
    pub async fn redeem<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        user_id: Uuid,
        card_id: Uuid,
        custom_message: Option<&str>,
    ) -> Result<RedeemVoucherResponse, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.subscription_service
            .assert_active(&mut *tx, establishment_id)
            .await?;

        let establishment = self
            .establishment_repo
            .find_by_id(&mut *tx, establishment_id)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        let card = self
            .card_repo
            .find_by_id_for_update(&mut *tx, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;
        if card.establishment_id != establishment_id {
            return Err(AppError::Forbidden);
        }

        let threshold = establishment.points_for_voucher;
        if card.points < threshold {
            return Err(AppError::InsufficientPoints {
                available: card.points,
                required: threshold,
            });
        }

        let client = self
            .card_repo
            .find_client(&mut *tx, card.client_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalServerError(anyhow::anyhow!(
                    "cartão {card_id} sem cliente associado"
                ))
            })?;

        let message = render_message(
            custom_message,
            establishment.voucher_message_template.as_deref(),
            &client.name,
        );

        let voucher = self
            .voucher_repo
            .insert(
                &mut *tx,
                establishment_id,
                card_id,
                client.id,
                Some(user_id),
                &message,
                &client.phone,
            )
            .await?;

        // Debita só o limiar, nunca o saldo inteiro.
        self.movement_repo
            .insert(
                &mut *tx,
                card_id,
                MovementKind::Debit,
                -threshold,
                Some("Resgate de voucher"),
            )
            .await?;
        self.card_repo
            .apply_points_delta(&mut *tx, card_id, -threshold)
            .await?;

        let view = self
            .card_repo
            .find_view_by_id(&mut *tx, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;

        tx.commit().await?;

        let delivery = DeliveryPayload {
            recipient_phone: voucher.recipient_phone.clone(),
            message: voucher.message.clone(),
        };

        Ok(RedeemVoucherResponse {
            voucher,
            card: view,
            delivery,
        })
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Vec<Voucher>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.voucher_repo
            .list_by_establishment(executor, establishment_id)
            .await
    }

    /// Confirmação manual de entrega, feita pelo operador depois de mandar a
    /// mensagem. Passo separado do resgate; não mexe em pontos.
    pub async fn confirm<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        voucher_id: Uuid,
    ) -> Result<Voucher, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let voucher = self
            .voucher_repo
            .find_by_id(&mut *conn, voucher_id)
            .await?
            .ok_or(AppError::VoucherNotFound)?;
        if voucher.establishment_id != establishment_id {
            return Err(AppError::Forbidden);
        }

        self.voucher_repo
            .set_status(&mut *conn, voucher_id, VoucherStatus::Confirmed)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_message_padrao() {
        let msg = render_message(None, None, "Maria");
        assert!(msg.starts_with("Parabéns Maria!"));
        assert!(!msg.contains("{cliente}"));
    }

    #[test]
    fn test_render_message_template_do_estabelecimento() {
        let msg = render_message(None, Some("Oi {cliente}, seu voucher chegou."), "Maria");
        assert_eq!(msg, "Oi Maria, seu voucher chegou.");
    }

    #[test]
    fn test_render_message_customizada_vence_template() {
        let msg = render_message(
            Some("Só hoje, {cliente}!"),
            Some("Oi {cliente}, seu voucher chegou."),
            "Maria",
        );
        assert_eq!(msg, "Só hoje, Maria!");
    }

    #[test]
    fn test_render_message_substitui_apenas_primeira_ocorrencia() {
        let msg = render_message(Some("{cliente} e {cliente}"), None, "Maria");
        assert_eq!(msg, "Maria e {cliente}");
    }

    #[test]
    fn test_render_message_sem_placeholder() {
        let msg = render_message(Some("Mensagem fixa."), None, "Maria");
        assert_eq!(msg, "Mensagem fixa.");
    }
}
