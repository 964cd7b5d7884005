pub mod auth_service;
pub use auth_service::AuthService;
pub mod card_service;
pub use card_service::CardService;
pub mod establishment_service;
pub use establishment_service::EstablishmentService;
pub mod points_service;
pub use points_service::PointsService;
pub mod subscription_service;
pub use subscription_service::SubscriptionService;
pub mod voucher_service;
pub use voucher_service::VoucherService;
