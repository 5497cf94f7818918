//! In-memory storage for development and tests

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use common::error::{DatabaseError, DatabaseResult};

use super::{ContactRepository, USERS_TABLE, UserRepository};
use crate::models::{Contact, NewContact, NewUser, User};
use crate::query::{Filter, Sort};

/// Users and contacts held in process memory
///
/// Enforces the same email uniqueness as the `users_email_key` constraint.
#[derive(Debug)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    contacts: RwLock<BTreeMap<i64, Contact>>,
    next_contact_id: AtomicI64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            contacts: RwLock::new(BTreeMap::new()),
            next_contact_id: AtomicI64::new(1),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn row_not_found() -> DatabaseError {
    DatabaseError::Query(sqlx::Error::RowNotFound)
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation {
                constraint: format!("{}_email_key", USERS_TABLE),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new_user.email.clone(),
            display_name: new_user.display_name.clone(),
            password_hash: new_user.password_hash.clone(),
            disabled: new_user.disabled,
            is_logged_in: false,
            access_token: None,
            refresh_token: None,
            security_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> DatabaseResult<User> {
        let mut users = self.users.write().await;
        let stored = users.get_mut(&user.id).ok_or_else(row_not_found)?;

        stored.display_name = user.display_name.clone();
        stored.password_hash = user.password_hash.clone();
        stored.disabled = user.disabled;
        stored.is_logged_in = user.is_logged_in;
        stored.access_token = user.access_token.clone();
        stored.refresh_token = user.refresh_token.clone();
        stored.security_token = user.security_token.clone();
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, owner_id: Uuid, new_contact: &NewContact) -> DatabaseResult<Contact> {
        let id = self.next_contact_id.fetch_add(1, Ordering::SeqCst);
        let contact = Contact {
            id,
            owner_id,
            first_name: new_contact.first_name.clone(),
            last_name: new_contact.last_name.clone(),
            phone: new_contact.phone.clone(),
            email: new_contact.email.clone(),
        };
        self.contacts.write().await.insert(id, contact.clone());

        Ok(contact)
    }

    async fn find_by_id(&self, owner_id: Uuid, id: i64) -> DatabaseResult<Option<Contact>> {
        Ok(self
            .contacts
            .read()
            .await
            .get(&id)
            .filter(|c| c.owner_id == owner_id)
            .cloned())
    }

    async fn find_all(&self, owner_id: Uuid) -> DatabaseResult<Vec<Contact>> {
        Ok(self
            .contacts
            .read()
            .await
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn search(
        &self,
        owner_id: Uuid,
        filter: &Filter,
        sort: &Sort,
    ) -> DatabaseResult<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .contacts
            .read()
            .await
            .values()
            .filter(|c| c.owner_id == owner_id && filter.matches(c))
            .cloned()
            .collect();
        contacts.sort_by(|a, b| sort.compare(a, b));

        Ok(contacts)
    }

    async fn update(&self, contact: &Contact) -> DatabaseResult<Contact> {
        let mut contacts = self.contacts.write().await;
        let stored = contacts
            .get_mut(&contact.id)
            .filter(|c| c.owner_id == contact.owner_id)
            .ok_or_else(row_not_found)?;
        *stored = contact.clone();

        Ok(stored.clone())
    }

    async fn delete(&self, owner_id: Uuid, ids: &[i64]) -> DatabaseResult<u64> {
        let mut contacts = self.contacts.write().await;
        let before = contacts.len();
        contacts.retain(|id, c| !(c.owner_id == owner_id && ids.contains(id)));

        Ok((before - contacts.len()) as u64)
    }
}
