//! Business logic between the HTTP handlers and the repositories

pub mod contact_service;
pub mod user_service;

pub use contact_service::ContactService;
pub use user_service::UserService;
