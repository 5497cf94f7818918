//! Repositories for database operations
//!
//! Services talk to storage through [`UserRepository`] and
//! [`ContactRepository`]; Postgres and in-memory implementations live in the
//! submodules.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use common::error::{DatabaseError, DatabaseResult};

use crate::models::{Contact, NewContact, NewUser, User};
use crate::query::{Filter, Sort};

pub mod contact;
pub mod memory;
pub mod user;

pub use contact::PgContactRepository;
pub use memory::MemoryStore;
pub use user::PgUserRepository;

/// Table holding users; unique violations name `users_<column>_key`
pub const USERS_TABLE: &str = "users";

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken email is a unique violation
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Write back every mutable column of `user`
    async fn update(&self, user: &User) -> DatabaseResult<User>;
}

/// Contact persistence, always scoped to one owner
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, owner_id: Uuid, new_contact: &NewContact) -> DatabaseResult<Contact>;

    async fn find_by_id(&self, owner_id: Uuid, id: i64) -> DatabaseResult<Option<Contact>>;

    /// Every contact of the owner, unordered
    async fn find_all(&self, owner_id: Uuid) -> DatabaseResult<Vec<Contact>>;

    /// Every contact of the owner matching `filter`, ordered by `sort`
    async fn search(&self, owner_id: Uuid, filter: &Filter, sort: &Sort)
    -> DatabaseResult<Vec<Contact>>;

    async fn update(&self, contact: &Contact) -> DatabaseResult<Contact>;

    /// Delete the owner's contacts with these ids, returning how many went
    async fn delete(&self, owner_id: Uuid, ids: &[i64]) -> DatabaseResult<u64>;
}

/// Apply the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> DatabaseResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    info!("Database migrations applied");
    Ok(())
}
