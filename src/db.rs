pub mod card_repo;
pub use card_repo::CardRepository;
pub mod establishment_repo;
pub use establishment_repo::EstablishmentRepository;
pub mod movement_repo;
pub use movement_repo::MovementRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod voucher_repo;
pub use voucher_repo::VoucherRepository;
