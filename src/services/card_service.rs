// src/services/card_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        card_code::generate_card_code, db_utils::is_unique_violation, error::AppError,
        phone::normalize_phone,
    },
    db::{CardRepository, EstablishmentRepository, MovementRepository, VoucherRepository},
    models::{
        card::{CardView, SearchResponse},
        movement::{Movement, MovementKind},
    },
    services::SubscriptionService,
};

// Tentativas de gerar um código de cartão livre antes de desistir.
const MAX_CODE_ATTEMPTS: usize = 5;

// O resolvedor de identidade cliente/cartão: deduplica clientes por telefone
// dentro do escopo de um estabelecimento e cuida do ciclo de vida do par
// cliente + cartão.
#[derive(Clone)]
pub struct CardService {
    card_repo: CardRepository,
    movement_repo: MovementRepository,
    voucher_repo: VoucherRepository,
    establishment_repo: EstablishmentRepository,
    subscription_service: SubscriptionService,
}

impl CardService {
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

    /// Cadastra um cliente no estabelecimento, ou devolve o cartão existente
    /// quando o telefone já está cadastrado (o bool devolvido distingue os
    /// dois casos). No recadastro os `initial_points` NÃO são reaplicados.
    pub async fn register_client<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        name: &str,
        phone: &str,
        initial_points: i32,
    ) -> Result<(CardView, bool), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let phone = normalize_phone(phone);
        if phone.is_empty() {
            return Err(AppError::validation_field(
                "phone",
                "O telefone deve conter dígitos.",
            ));
        }

        let mut tx = executor.begin().await?;

        self.subscription_service
            .assert_active(&mut *tx, establishment_id)
            .await?;

        // Idempotência do cadastro: telefone já conhecido devolve o cartão
        // existente sem tocar em nada.
        if let Some(existing) = self
            .card_repo
            .find_view_by_phone(&mut *tx, establishment_id, &phone)
            .await?
        {
            tx.commit().await?;
            return Ok((existing, true));
        }

        // Cliente escopado por estabelecimento: sempre uma linha nova aqui,
        // mesmo que o telefone exista em outro estabelecimento.
        let client = self.card_repo.create_client(&mut *tx, name, &phone).await?;

        let mut code = generate_card_code();
        let mut attempts = 1;
        while self.card_repo.code_exists(&mut *tx, &code).await? {
            if attempts >= MAX_CODE_ATTEMPTS {
                return Err(AppError::CardCodeConflict);
            }
            code = generate_card_code();
            attempts += 1;
        }

        let card = match self
            .card_repo
            .create_card(&mut *tx, establishment_id, client.id, &code)
            .await
        {
            Ok(card) => card,
            // Corrida entre a checagem e o INSERT: outro cadastro pegou o
            // mesmo código. O cliente pode simplesmente reenviar.
            Err(AppError::DatabaseError(e)) if is_unique_violation(&e) => {
                return Err(AppError::CardCodeConflict);
            }
            Err(e) => return Err(e),
        };

        // Pontos iniciais entram como um movimento de crédito normal, na
        // mesma transação do cadastro.
        if initial_points > 0 {
            self.movement_repo
                .insert(
                    &mut *tx,
                    card.id,
                    MovementKind::Credit,
                    initial_points,
                    Some("Pontos iniciais"),
                )
                .await?;
            self.card_repo
                .apply_points_delta(&mut *tx, card.id, initial_points)
                .await?;
        }

        let view = self
            .card_repo
            .find_view_by_id(&mut *tx, card.id)
            .await?
            .ok_or(AppError::CardNotFound)?;

        tx.commit().await?;

        Ok((view, false))
    }

    /// Cartões do estabelecimento, mais recentes primeiro. Somente leitura:
    /// não passa pelo portão de assinatura.
    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
    ) -> Result<Vec<CardView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.card_repo
            .list_by_establishment(executor, establishment_id)
            .await
    }

    /// Extrato do cartão (linhas do razão, mais recentes primeiro).
    pub async fn movements<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        card_id: Uuid,
    ) -> Result<Vec<Movement>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut conn = executor.acquire().await?;

        let card = self
            .card_repo
            .find_by_id(&mut *conn, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;
        if card.establishment_id != establishment_id {
            return Err(AppError::Forbidden);
        }

        self.movement_repo.list_by_card(&mut *conn, card_id).await
    }

    /// Busca pública por slug do estabelecimento. Exige nome ou telefone;
    /// zero resultados é `NoClientsFound`.
    pub async fn search<'e, E>(
        &self,
        executor: E,
        slug: &str,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<SearchResponse, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let phone_digits = phone.map(normalize_phone).filter(|p| !p.is_empty());
        let name = name.map(str::trim).filter(|n| !n.is_empty());

        if name.is_none() && phone_digits.is_none() {
            return Err(AppError::validation_field(
                "query",
                "Informe um nome ou telefone para a busca.",
            ));
        }

        let mut conn = executor.acquire().await?;

        let establishment = self
            .establishment_repo
            .find_by_slug(&mut *conn, slug)
            .await?
            .ok_or(AppError::EstablishmentNotFound)?;

        let cards = self
            .card_repo
            .search(&mut *conn, establishment.id, name, phone_digits.as_deref())
            .await?;

        if cards.is_empty() {
            return Err(AppError::NoClientsFound);
        }

        Ok(SearchResponse {
            establishment_name: establishment.name,
            cards,
        })
    }

    /// Remove o cartão com seus movimentos e vouchers. Se era o último
    /// cartão do cliente, o cliente sai junto.
    pub async fn delete_card<'e, E>(
        &self,
        executor: E,
        establishment_id: Uuid,
        card_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let card = self
            .card_repo
            .find_by_id(&mut *tx, card_id)
            .await?
            .ok_or(AppError::CardNotFound)?;
        if card.establishment_id != establishment_id {
            return Err(AppError::Forbidden);
        }

        self.movement_repo.delete_by_card(&mut *tx, card_id).await?;
        self.voucher_repo.delete_by_card(&mut *tx, card_id).await?;
        self.card_repo.delete_card(&mut *tx, card_id).await?;

        let remaining = self
            .card_repo
            .count_cards_for_client(&mut *tx, card.client_id)
            .await?;
        if remaining == 0 {
            self.card_repo.delete_client(&mut *tx, card.client_id).await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
