//! O portão de assinatura: mensalidade vencida ou ausente bloqueia toda
//! mutação, e a confirmação de pagamento reabre o acesso.

mod common;

use chrono::{Duration, Utc};
use common::setup;
use fidelize_backend::common::error::AppError;
use fidelize_backend::services::subscription_service::SUBSCRIPTION_DAYS;
use rust_decimal::Decimal;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn mensalidade_vencida_bloqueia_cadastro(pool: PgPool) {
    let app = setup(pool).await;
    app.expire_subscription().await;

    let err = app
        .card_service
        .register_client(&app.pool, app.establishment.id, "Maria", "11999998888", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SubscriptionExpired));

    assert_eq!(app.count_rows("clients").await, 0);
    assert_eq!(app.count_rows("loyalty_cards").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn mensalidade_vencida_bloqueia_credito_e_resgate(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria", "11999998888", 10).await;

    app.expire_subscription().await;

    let err = app
        .points_service
        .credit(&app.pool, app.establishment.id, card.id, 5, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SubscriptionExpired));

    let err = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SubscriptionExpired));

    // Nada mudou: só o movimento dos pontos iniciais existe.
    assert_eq!(app.count_rows("point_movements").await, 1);
    assert_eq!(app.count_rows("vouchers").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn sem_nenhum_pagamento_conta_como_vencida(pool: PgPool) {
    let app = setup(pool).await;

    // Estabelecimento recém-criado, sem set_subscription_valid_until.
    let fresh = app
        .establishment_repo
        .create(
            &app.pool,
            "Loja Nova",
            "loja-nova",
            None,
            None,
            None,
            10,
            None,
        )
        .await
        .unwrap();

    let err = app
        .card_service
        .register_client(&app.pool, fresh.id, "Maria", "11999998888", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::SubscriptionExpired));
}

#[sqlx::test(migrations = "./migrations")]
async fn portao_distingue_estabelecimento_inexistente(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .subscription_service
        .assert_active(&app.pool, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EstablishmentNotFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn leituras_ignoram_o_portao(pool: PgPool) {
    let app = setup(pool).await;
    app.register_client("Maria da Silva", "11999998888", 0).await;
    app.expire_subscription().await;

    // Listagem e busca continuam funcionando com a mensalidade vencida.
    let cards = app
        .card_service
        .list_clients(&app.pool, app.establishment.id)
        .await
        .unwrap();
    assert_eq!(cards.len(), 1);

    let response = app
        .card_service
        .search(&app.pool, "padaria-teste", Some("maria"), None)
        .await
        .unwrap();
    assert_eq!(response.cards.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn confirmacao_de_pagamento_reabre_o_acesso(pool: PgPool) {
    let app = setup(pool).await;
    app.expire_subscription().await;

    let paid_at = Utc::now();
    let confirmation = app
        .subscription_service
        .confirm_payment(
            &app.pool,
            app.establishment.id,
            Some(paid_at),
            Some(Decimal::new(9990, 2)),
        )
        .await
        .unwrap();

    // Validade = data do pagamento + 31 dias.
    assert_eq!(
        confirmation.subscription_valid_until,
        paid_at + Duration::days(SUBSCRIPTION_DAYS)
    );
    assert_eq!(confirmation.payment.establishment_id, app.establishment.id);

    let status = app
        .subscription_service
        .status(&app.pool, app.establishment.id)
        .await
        .unwrap();
    assert!(status.active);

    // E as mutações voltam a passar.
    app.register_client("Maria", "11999998888", 0).await;
}

#[sqlx::test(migrations = "./migrations")]
async fn pagamento_para_estabelecimento_inexistente(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .subscription_service
        .confirm_payment(&app.pool, uuid::Uuid::new_v4(), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EstablishmentNotFound));
    assert_eq!(app.count_rows("subscription_payments").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn status_reflete_mensalidade_vencida(pool: PgPool) {
    let app = setup(pool).await;
    app.expire_subscription().await;

    let status = app
        .subscription_service
        .status(&app.pool, app.establishment.id)
        .await
        .unwrap();
    assert!(!status.active);
    assert!(status.valid_until.is_some());
}
