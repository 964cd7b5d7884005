// Infraestrutura compartilhada pelos testes de integração: monta o grafo de
// serviços sobre o pool de teste e semeia um estabelecimento com assinatura
// em dia.
#![allow(dead_code)]

use chrono::{Duration, Utc};
use sqlx::PgPool;

use fidelize_backend::{
    db::{
        CardRepository, EstablishmentRepository, MovementRepository, PaymentRepository,
        UserRepository, VoucherRepository,
    },
    models::{auth::User, auth::UserRole, card::CardView, establishment::Establishment},
    services::{
        CardService, EstablishmentService, PointsService, SubscriptionService, VoucherService,
    },
};

pub struct TestApp {
    pub pool: PgPool,
    pub card_service: CardService,
    pub points_service: PointsService,
    pub voucher_service: VoucherService,
    pub subscription_service: SubscriptionService,
    pub establishment_service: EstablishmentService,
    pub establishment_repo: EstablishmentRepository,
    pub user_repo: UserRepository,
    pub movement_repo: MovementRepository,
    pub establishment: Establishment,
    pub user: User,
}

/// Monta os serviços e registra um estabelecimento com a mensalidade em dia
/// (meta de 10 pontos por voucher) e seu usuário dono.
pub async fn setup(pool: PgPool) -> TestApp {
    setup_named(pool, "padaria-teste", "dono@padaria.com").await
}

/// Variante para testes que precisam de um segundo estabelecimento.
pub async fn setup_named(pool: PgPool, slug: &str, owner_email: &str) -> TestApp {
    let user_repo = UserRepository::new(pool.clone());
    let establishment_repo = EstablishmentRepository::new(pool.clone());
    let card_repo = CardRepository::new(pool.clone());
    let movement_repo = MovementRepository::new(pool.clone());
    let voucher_repo = VoucherRepository::new(pool.clone());
    let payment_repo = PaymentRepository::new(pool.clone());

    let subscription_service =
        SubscriptionService::new(establishment_repo.clone(), payment_repo.clone());
    let card_service = CardService::new(
        card_repo.clone(),
        movement_repo.clone(),
        voucher_repo.clone(),
        establishment_repo.clone(),
        subscription_service.clone(),
    );
    let points_service = PointsService::new(
        card_repo.clone(),
        movement_repo.clone(),
        subscription_service.clone(),
    );
    let voucher_service = VoucherService::new(
        card_repo.clone(),
        movement_repo.clone(),
        voucher_repo.clone(),
        establishment_repo.clone(),
        subscription_service.clone(),
    );
    let establishment_service = EstablishmentService::new(
        establishment_repo.clone(),
        card_repo,
        movement_repo.clone(),
        voucher_repo,
        payment_repo,
        user_repo.clone(),
    );

    let establishment = establishment_repo
        .create(
            &pool,
            "Padaria Teste",
            slug,
            Some(owner_email),
            Some("1133334444"),
            None,
            10,
            None,
        )
        .await
        .expect("falha ao criar o estabelecimento de teste");

    establishment_repo
        .set_subscription_valid_until(&pool, establishment.id, Utc::now() + Duration::days(30))
        .await
        .expect("falha ao ativar a assinatura de teste");

    let user = user_repo
        .create_user(
            &pool,
            Some(establishment.id),
            owner_email,
            "$2b$12$hash-de-teste",
            UserRole::Owner,
        )
        .await
        .expect("falha ao criar o usuário de teste");

    TestApp {
        pool,
        card_service,
        points_service,
        voucher_service,
        subscription_service,
        establishment_service,
        establishment_repo,
        user_repo,
        movement_repo,
        establishment,
        user,
    }
}

impl TestApp {
    /// Vence a mensalidade do estabelecimento semeado.
    pub async fn expire_subscription(&self) {
        self.establishment_repo
            .set_subscription_valid_until(
                &self.pool,
                self.establishment.id,
                Utc::now() - Duration::days(1),
            )
            .await
            .expect("falha ao vencer a assinatura");
    }

    /// Cadastra um cliente e devolve o cartão criado.
    pub async fn register_client(&self, name: &str, phone: &str, initial_points: i32) -> CardView {
        let (card, _) = self
            .card_service
            .register_client(
                &self.pool,
                self.establishment.id,
                name,
                phone,
                initial_points,
            )
            .await
            .expect("falha ao cadastrar o cliente de teste");
        card
    }

    pub async fn count_rows(&self, table: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {table}");
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .expect("falha ao contar linhas")
    }
}
