//! Exclusões em cascata: do cartão (com remoção do cliente órfão) e do
//! estabelecimento inteiro.

mod common;

use common::setup;
use fidelize_backend::common::error::AppError;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn excluir_cartao_leva_movimentos_vouchers_e_cliente(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "11999998888", 10).await;
    app.voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap();

    app.card_service
        .delete_card(&app.pool, app.establishment.id, card.id)
        .await
        .unwrap();

    assert_eq!(app.count_rows("loyalty_cards").await, 0);
    assert_eq!(app.count_rows("point_movements").await, 0);
    assert_eq!(app.count_rows("vouchers").await, 0);
    // Era o último cartão do cliente: o cliente sai junto.
    assert_eq!(app.count_rows("clients").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn excluir_cartao_de_outro_estabelecimento_e_forbidden(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let other = common::setup_named(pool, "outra-loja", "dono@outra.com").await;
    let card = other.register_client("Maria da Silva", "11999998888", 0).await;

    let err = app
        .card_service
        .delete_card(&app.pool, app.establishment.id, card.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    assert_eq!(app.count_rows("loyalty_cards").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn excluir_cartao_inexistente_e_not_found(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .card_service
        .delete_card(&app.pool, app.establishment.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CardNotFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn excluir_estabelecimento_remove_tudo(pool: PgPool) {
    let app = setup(pool).await;

    // Popula o tenant: dois clientes, créditos, um voucher e um pagamento.
    let card_a = app.register_client("Maria da Silva", "11999998888", 10).await;
    app.register_client("João Souza", "11988887777", 3).await;
    app.voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card_a.id, None)
        .await
        .unwrap();
    app.subscription_service
        .confirm_payment(&app.pool, app.establishment.id, None, None)
        .await
        .unwrap();

    app.establishment_service
        .delete_establishment(&app.pool, app.establishment.id)
        .await
        .unwrap();

    // Toda a árvore do tenant foi embora.
    assert_eq!(app.count_rows("point_movements").await, 0);
    assert_eq!(app.count_rows("vouchers").await, 0);
    assert_eq!(app.count_rows("loyalty_cards").await, 0);
    assert_eq!(app.count_rows("clients").await, 0);
    assert_eq!(app.count_rows("subscription_payments").await, 0);
    assert_eq!(app.count_rows("users").await, 0);
    assert_eq!(app.count_rows("establishments").await, 0);

    // E não dá mais para buscar.
    let found = app
        .establishment_repo
        .find_by_id(&app.pool, app.establishment.id)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn excluir_estabelecimento_nao_afeta_os_vizinhos(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let other = common::setup_named(pool, "outra-loja", "dono@outra.com").await;

    app.register_client("Maria da Silva", "11999998888", 5).await;
    other.register_client("Maria da Silva", "11999998888", 5).await;

    app.establishment_service
        .delete_establishment(&app.pool, app.establishment.id)
        .await
        .unwrap();

    // O homônimo da outra loja continua lá.
    assert_eq!(other.count_rows("establishments").await, 1);
    assert_eq!(other.count_rows("loyalty_cards").await, 1);
    assert_eq!(other.count_rows("clients").await, 1);
    assert_eq!(other.count_rows("point_movements").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn excluir_estabelecimento_inexistente_e_not_found(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .establishment_service
        .delete_establishment(&app.pool, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EstablishmentNotFound));
    assert_eq!(app.count_rows("establishments").await, 1);
}
