// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Clientes ---
        handlers::clients::register_client,
        handlers::clients::list_clients,
        handlers::clients::card_movements,
        handlers::clients::delete_card,

        // --- Pontos ---
        handlers::points::add_points,

        // --- Vouchers ---
        handlers::vouchers::redeem_voucher,
        handlers::vouchers::list_vouchers,
        handlers::vouchers::confirm_voucher,

        // --- Estabelecimento ---
        handlers::establishment::get_establishment,
        handlers::establishment::update_settings,
        handlers::establishment::subscription_status,

        // --- Público ---
        handlers::public::search_cards,

        // --- Admin ---
        handlers::admin::list_establishments,
        handlers::admin::delete_establishment,
        handlers::admin::confirm_payment,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterEstablishmentPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Clientes ---
            models::card::Client,
            models::card::LoyaltyCard,
            models::card::CardView,
            models::card::RegisterClientPayload,
            models::card::RegisterClientResponse,
            models::card::SearchResponse,

            // --- Pontos ---
            models::movement::MovementKind,
            models::movement::Movement,
            models::movement::AddPointsPayload,
            models::movement::AddPointsResponse,

            // --- Vouchers ---
            models::voucher::VoucherStatus,
            models::voucher::Voucher,
            models::voucher::RedeemVoucherPayload,
            models::voucher::DeliveryPayload,
            models::voucher::RedeemVoucherResponse,

            // --- Estabelecimento ---
            models::establishment::Establishment,
            models::establishment::UpdateSettingsPayload,

            // --- Mensalidade ---
            models::payment::SubscriptionPayment,
            models::payment::ConfirmPaymentPayload,
            models::payment::PaymentConfirmation,
            models::payment::SubscriptionStatus,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Clientes", description = "Cadastro e consulta de clientes/cartões"),
        (name = "Pontos", description = "Crédito de pontos no cartão fidelidade"),
        (name = "Vouchers", description = "Resgate e confirmação de vouchers"),
        (name = "Estabelecimento", description = "Configurações e mensalidade"),
        (name = "Publico", description = "Busca pública por slug, sem autenticação"),
        (name = "Admin", description = "Gestão global dos estabelecimentos (superadmin)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
