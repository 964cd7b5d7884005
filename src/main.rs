//src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use fidelize_backend::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::{admin_guard, auth_guard},
};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Garante o superadmin global, se configurado no ambiente
    if let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        app_state
            .auth_service
            .ensure_admin(&email, &password)
            .await
            .expect("Falha ao garantir o superadmin.");
    }

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let client_routes = Router::new()
        .route(
            "/",
            post(handlers::clients::register_client).get(handlers::clients::list_clients),
        )
        .route(
            "/{card_id}/movements",
            get(handlers::clients::card_movements),
        )
        .route("/{card_id}", delete(handlers::clients::delete_card))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let points_routes = Router::new()
        .route("/", post(handlers::points::add_points))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let voucher_routes = Router::new()
        .route(
            "/",
            post(handlers::vouchers::redeem_voucher).get(handlers::vouchers::list_vouchers),
        )
        .route(
            "/{voucher_id}/confirm",
            patch(handlers::vouchers::confirm_voucher),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let establishment_routes = Router::new()
        .route(
            "/",
            get(handlers::establishment::get_establishment)
                .put(handlers::establishment::update_settings),
        )
        .route(
            "/subscription",
            get(handlers::establishment::subscription_status),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // O auth_guard precisa rodar antes do admin_guard, por isso é a última
    // camada adicionada (a mais externa).
    let admin_routes = Router::new()
        .route(
            "/establishments",
            get(handlers::admin::list_establishments),
        )
        .route(
            "/establishments/{establishment_id}",
            delete(handlers::admin::delete_establishment),
        )
        .route(
            "/establishments/{establishment_id}/payments",
            post(handlers::admin::confirm_payment),
        )
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Busca pública por slug, sem autenticação
    let public_routes = Router::new().route("/{slug}/cards", get(handlers::public::search_cards));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/points", points_routes)
        .nest("/api/vouchers", voucher_routes)
        .nest("/api/establishment", establishment_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/public", public_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
