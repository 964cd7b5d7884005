//! O motor de resgate: elegibilidade, débito exato do limiar, renderização
//! da mensagem e a corrida de resgates concorrentes.

mod common;

use common::setup;
use fidelize_backend::common::error::AppError;
use fidelize_backend::models::voucher::VoucherStatus;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn resgate_debita_o_limiar_e_gera_o_voucher(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "(11) 99999-8888", 0).await;

    app.points_service
        .credit(&app.pool, app.establishment.id, card.id, 7, Some("bonus"))
        .await
        .unwrap();
    app.points_service
        .credit(&app.pool, app.establishment.id, card.id, 5, None)
        .await
        .unwrap();

    let response = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap();

    // 7 + 5 - 10 = 2: o excedente fica no cartão.
    assert_eq!(response.card.points, 2);
    assert_eq!(response.voucher.status, VoucherStatus::Sent);
    assert_eq!(response.voucher.issued_by, Some(app.user.id));

    // Snapshot do telefone normalizado e mensagem padrão renderizada.
    assert_eq!(response.delivery.recipient_phone, "11999998888");
    assert!(response.delivery.message.contains("Maria da Silva"));
    assert!(!response.delivery.message.contains("{cliente}"));

    // O débito entrou no razão com o valor do limiar, não do saldo.
    let movements = app.movement_repo.list_by_card(&app.pool, card.id).await.unwrap();
    assert_eq!(movements[0].points, -10);
    let sum = app.movement_repo.sum_for_card(&app.pool, card.id).await.unwrap();
    assert_eq!(sum, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn resgate_sem_pontos_suficientes_nao_grava_nada(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "11999998888", 5).await;

    let err = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AppError::InsufficientPoints {
            available: 5,
            required: 10
        }
    ));

    // Nenhum voucher, nenhum débito, saldo intacto.
    assert_eq!(app.count_rows("vouchers").await, 0);
    let sum = app.movement_repo.sum_for_card(&app.pool, card.id).await.unwrap();
    assert_eq!(sum, 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn resgate_preserva_o_excedente(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "11999998888", 25).await;

    let response = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap();

    assert_eq!(response.card.points, 15);
}

#[sqlx::test(migrations = "./migrations")]
async fn resgate_usa_template_do_estabelecimento(pool: PgPool) {
    let app = setup(pool).await;
    sqlx::query("UPDATE establishments SET voucher_message_template = $2 WHERE id = $1")
        .bind(app.establishment.id)
        .bind("Oi {cliente}, passa aqui buscar seu prêmio!")
        .execute(&app.pool)
        .await
        .unwrap();

    let card = app.register_client("Maria", "11999998888", 10).await;
    let response = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap();

    assert_eq!(
        response.voucher.message,
        "Oi Maria, passa aqui buscar seu prêmio!"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn mensagem_customizada_vence_o_template(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria", "11999998888", 10).await;

    let response = app
        .voucher_service
        .redeem(
            &app.pool,
            app.establishment.id,
            app.user.id,
            card.id,
            Some("Só hoje, {cliente}!"),
        )
        .await
        .unwrap();

    assert_eq!(response.voucher.message, "Só hoje, Maria!");
}

#[sqlx::test(migrations = "./migrations")]
async fn resgates_concorrentes_no_limiar_exato(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "11999998888", 10).await;

    // Dois resgates simultâneos contra o mesmo saldo: o FOR UPDATE serializa
    // as transações e o segundo relê o saldo já debitado.
    let (r1, r2) = tokio::join!(
        app.voucher_service
            .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None),
        app.voucher_service
            .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None),
    );

    let successes = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exatamente um resgate deve passar");

    let failure = if r1.is_err() { r1.unwrap_err() } else { r2.unwrap_err() };
    assert!(matches!(failure, AppError::InsufficientPoints { .. }));

    // Saldo final zero, nunca negativo, e um voucher só.
    let reconciled = app.points_service.reconcile_card(&app.pool, card.id).await.unwrap();
    assert_eq!(reconciled.points, 0);
    assert_eq!(app.count_rows("vouchers").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn confirmacao_manual_de_entrega(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "11999998888", 10).await;

    let response = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap();

    let confirmed = app
        .voucher_service
        .confirm(&app.pool, app.establishment.id, response.voucher.id)
        .await
        .unwrap();
    assert_eq!(confirmed.status, VoucherStatus::Confirmed);

    // A confirmação não mexe em pontos.
    let sum = app.movement_repo.sum_for_card(&app.pool, card.id).await.unwrap();
    assert_eq!(sum, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn confirmacao_respeita_o_escopo_do_tenant(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let other = common::setup_named(pool, "outra-loja", "dono@outra.com").await;

    let card = app.register_client("Maria da Silva", "11999998888", 10).await;
    let response = app
        .voucher_service
        .redeem(&app.pool, app.establishment.id, app.user.id, card.id, None)
        .await
        .unwrap();

    let err = other
        .voucher_service
        .confirm(&other.pool, other.establishment.id, response.voucher.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}
