//! User repository for database operations

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use common::error::DatabaseResult;

use super::UserRepository;
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, email, display_name, password_hash, disabled, is_logged_in, \
     access_token, refresh_token, security_token, created_at, updated_at";

/// User repository backed by Postgres
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.email);

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, disabled)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.display_name)
        .bind(&new_user.password_hash)
        .bind(new_user.disabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by email: {}", email);

        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> DatabaseResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET display_name = $2,
                password_hash = $3,
                disabled = $4,
                is_logged_in = $5,
                access_token = $6,
                refresh_token = $7,
                security_token = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.password_hash)
        .bind(user.disabled)
        .bind(user.is_logged_in)
        .bind(&user.access_token)
        .bind(&user.refresh_token)
        .bind(&user.security_token)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
