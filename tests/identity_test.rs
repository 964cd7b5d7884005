//! O resolvedor de identidade: deduplicação por telefone dentro do
//! estabelecimento, recadastro idempotente e a busca pública por slug.

mod common;

use common::setup;
use fidelize_backend::common::error::AppError;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn recadastro_devolve_o_cartao_existente(pool: PgPool) {
    let app = setup(pool).await;

    let (card, already) = app
        .card_service
        .register_client(
            &app.pool,
            app.establishment.id,
            "Maria da Silva",
            "(11) 99999-8888",
            5,
        )
        .await
        .unwrap();
    assert!(!already);
    assert_eq!(card.points, 5);

    // Mesmo telefone com outra formatação: devolve o mesmo cartão e NÃO
    // reaplica os pontos iniciais.
    let (again, already) = app
        .card_service
        .register_client(
            &app.pool,
            app.establishment.id,
            "Maria S.",
            "11 99999 8888",
            5,
        )
        .await
        .unwrap();
    assert!(already);
    assert_eq!(again.id, card.id);
    assert_eq!(again.points, 5);

    assert_eq!(app.count_rows("loyalty_cards").await, 1);
    assert_eq!(app.count_rows("clients").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn telefone_e_armazenado_normalizado(pool: PgPool) {
    let app = setup(pool).await;
    let card = app.register_client("Maria da Silva", "(11) 99999-8888", 0).await;
    assert_eq!(card.phone, "11999998888");
}

#[sqlx::test(migrations = "./migrations")]
async fn telefone_sem_digitos_e_rejeitado(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .card_service
        .register_client(&app.pool, app.establishment.id, "Maria", "telefone", 0)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert_eq!(app.count_rows("clients").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn mesmo_telefone_em_dois_estabelecimentos(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let other = common::setup_named(pool, "outra-loja", "dono@outra.com").await;

    let card_a = app.register_client("Maria da Silva", "11999998888", 0).await;
    let card_b = other.register_client("Maria da Silva", "11999998888", 0).await;

    // Cliente escopado por estabelecimento: dois cartões e dois clientes.
    assert_ne!(card_a.id, card_b.id);
    assert_ne!(card_a.client_id, card_b.client_id);
    assert_eq!(app.count_rows("clients").await, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn cartoes_recebem_codigos_unicos(pool: PgPool) {
    let app = setup(pool).await;

    let card_a = app.register_client("Maria", "11999998888", 0).await;
    let card_b = app.register_client("João", "11988887777", 0).await;

    assert_eq!(card_a.code.len(), 8);
    assert_eq!(card_b.code.len(), 8);
    assert_ne!(card_a.code, card_b.code);
}

#[sqlx::test(migrations = "./migrations")]
async fn listagem_vem_com_os_mais_recentes_primeiro(pool: PgPool) {
    let app = setup(pool).await;

    app.register_client("Primeira", "11911111111", 0).await;
    let last = app.register_client("Segunda", "11922222222", 0).await;

    let cards = app
        .card_service
        .list_clients(&app.pool, app.establishment.id)
        .await
        .unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].id, last.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn busca_por_nome_parcial_sem_caixa(pool: PgPool) {
    let app = setup(pool).await;
    app.register_client("Maria da Silva", "11999998888", 0).await;

    let response = app
        .card_service
        .search(&app.pool, "padaria-teste", Some("maria"), None)
        .await
        .unwrap();

    assert_eq!(response.establishment_name, "Padaria Teste");
    assert_eq!(response.cards.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn busca_por_telefone_tolera_formatacao(pool: PgPool) {
    let app = setup(pool).await;
    app.register_client("Maria da Silva", "11999998888", 0).await;

    // Consulta parcial: o telefone salvo contém o buscado.
    let response = app
        .card_service
        .search(&app.pool, "padaria-teste", None, Some("99999"))
        .await
        .unwrap();
    assert_eq!(response.cards.len(), 1);

    // Consulta com código do país: o buscado contém o telefone salvo.
    let response = app
        .card_service
        .search(&app.pool, "padaria-teste", None, Some("+55 (11) 99999-8888"))
        .await
        .unwrap();
    assert_eq!(response.cards.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn busca_exige_nome_ou_telefone(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .card_service
        .search(&app.pool, "padaria-teste", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[sqlx::test(migrations = "./migrations")]
async fn busca_em_slug_desconhecido_e_not_found(pool: PgPool) {
    let app = setup(pool).await;

    let err = app
        .card_service
        .search(&app.pool, "nao-existe", Some("maria"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EstablishmentNotFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn busca_sem_resultado_e_not_found(pool: PgPool) {
    let app = setup(pool).await;
    app.register_client("Maria da Silva", "11999998888", 0).await;

    let err = app
        .card_service
        .search(&app.pool, "padaria-teste", Some("josé"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoClientsFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn busca_nao_vaza_para_outro_estabelecimento(pool: PgPool) {
    let app = setup(pool.clone()).await;
    let other = common::setup_named(pool, "outra-loja", "dono@outra.com").await;
    other.register_client("Maria da Silva", "11999998888", 0).await;

    // O cliente existe, mas na outra loja.
    let err = app
        .card_service
        .search(&app.pool, "padaria-teste", Some("maria"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoClientsFound));
}
