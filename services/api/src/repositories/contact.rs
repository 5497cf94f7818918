//! Contact repository for database operations

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use common::error::DatabaseResult;

use super::ContactRepository;
use crate::models::{Contact, NewContact};
use crate::query::{Filter, Sort};

const CONTACT_COLUMNS: &str = "id, owner_id, first_name, last_name, phone, email";

/// Contact repository backed by Postgres
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    /// Create a new contact repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the listing query for one owner
pub fn search_query<'a>(
    owner_id: Uuid,
    filter: &Filter,
    sort: &Sort,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts WHERE owner_id = "
    ));
    qb.push_bind(owner_id);
    qb.push(" AND ");
    filter.push_sql(&mut qb);
    sort.push_sql(&mut qb);
    qb
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn create(&self, owner_id: Uuid, new_contact: &NewContact) -> DatabaseResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (owner_id, first_name, last_name, phone, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(&new_contact.first_name)
        .bind(&new_contact.last_name)
        .bind(&new_contact.phone)
        .bind(&new_contact.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn find_by_id(&self, owner_id: Uuid, id: i64) -> DatabaseResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND owner_id = $2"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn find_all(&self, owner_id: Uuid) -> DatabaseResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE owner_id = $1"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts)
    }

    async fn search(
        &self,
        owner_id: Uuid,
        filter: &Filter,
        sort: &Sort,
    ) -> DatabaseResult<Vec<Contact>> {
        let mut qb = search_query(owner_id, filter, sort);
        let contacts = qb
            .build_query_as::<Contact>()
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    async fn update(&self, contact: &Contact) -> DatabaseResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET first_name = $3, last_name = $4, phone = $5, email = $6
            WHERE id = $1 AND owner_id = $2
            RETURNING {CONTACT_COLUMNS}
            "#
        ))
        .bind(contact.id)
        .bind(contact.owner_id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(contact)
    }

    async fn delete(&self, owner_id: Uuid, ids: &[i64]) -> DatabaseResult<u64> {
        let result = sqlx::query("DELETE FROM contacts WHERE owner_id = $1 AND id = ANY($2)")
            .bind(owner_id)
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
