pub mod admin;
pub mod auth;
pub mod clients;
pub mod establishment;
pub mod points;
pub mod public;
pub mod vouchers;
