pub mod auth;
pub mod card;
pub mod establishment;
pub mod movement;
pub mod payment;
pub mod voucher;
