//! Address book REST service
//!
//! Users register, log in with JWT bearer tokens and manage their own
//! contacts. Listings accept a single-field filter (13 operators), a sort and
//! a page window.

pub mod config;
pub mod error;
pub mod extract;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod query;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
