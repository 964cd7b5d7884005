// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{
        CardRepository, EstablishmentRepository, MovementRepository, PaymentRepository,
        UserRepository, VoucherRepository,
    },
    services::{
        AuthService, CardService, EstablishmentService, PointsService, SubscriptionService,
        VoucherService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub card_service: CardService,
    pub points_service: PointsService,
    pub voucher_service: VoucherService,
    pub subscription_service: SubscriptionService,
    pub establishment_service: EstablishmentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let establishment_repo = EstablishmentRepository::new(db_pool.clone());
        let card_repo = CardRepository::new(db_pool.clone());
        let movement_repo = MovementRepository::new(db_pool.clone());
        let voucher_repo = VoucherRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());

        let subscription_service =
            SubscriptionService::new(establishment_repo.clone(), payment_repo.clone());
        let auth_service = AuthService::new(
            user_repo.clone(),
            establishment_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
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
            establishment_repo,
            card_repo,
            movement_repo,
            voucher_repo,
            payment_repo,
            user_repo,
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            card_service,
            points_service,
            voucher_service,
            subscription_service,
            establishment_service,
        })
    }
}
