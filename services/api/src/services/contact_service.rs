//! Contact operations scoped to the authenticated owner

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Contact, NewContact, UpdateContact};
use crate::query::ContactQuery;
use crate::repositories::ContactRepository;
use crate::validation::{validate_contact_update, validate_new_contact};

/// Contact service
#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    pub async fn create(&self, owner_id: Uuid, new_contact: NewContact) -> ApiResult<Contact> {
        validate_new_contact(&new_contact).map_err(ApiError::Validation)?;
        self.ensure_unique(
            owner_id,
            None,
            Some(new_contact.email.as_str()),
            Some(new_contact.phone.as_str()),
        )
        .await?;

        let contact = self.contacts.create(owner_id, &new_contact).await?;
        info!("Created contact {} for user: {}", contact.id, owner_id);
        Ok(contact)
    }

    pub async fn get(&self, owner_id: Uuid, id: i64) -> ApiResult<Contact> {
        self.contacts
            .find_by_id(owner_id, id)
            .await?
            .ok_or_else(|| ApiError::not_found("Contact", "id", id))
    }

    /// One page of the owner's matching contacts, plus the total match count
    pub async fn list(
        &self,
        owner_id: Uuid,
        query: &ContactQuery,
    ) -> ApiResult<(Vec<Contact>, usize)> {
        let matched = self
            .contacts
            .search(owner_id, &query.filter, &query.sort)
            .await?;
        let total = matched.len();

        Ok((query.pagination.window(matched), total))
    }

    /// Apply a partial update; absent or empty fields keep their values
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: i64,
        update: UpdateContact,
    ) -> ApiResult<Contact> {
        let mut contact = self.get(owner_id, id).await?;

        validate_contact_update(&update).map_err(ApiError::Validation)?;
        let email = update.email.as_deref().filter(|v| !v.is_empty());
        let phone = update.phone.as_deref().filter(|v| !v.is_empty());
        self.ensure_unique(owner_id, Some(id), email, phone).await?;

        update.apply(&mut contact);
        let contact = self.contacts.update(&contact).await?;
        Ok(contact)
    }

    /// Delete every listed contact, or none if any id is unknown
    pub async fn delete(&self, owner_id: Uuid, ids: &[i64]) -> ApiResult<Vec<Contact>> {
        if ids.is_empty() {
            return Err(ApiError::validation("At least one contact id is required"));
        }

        let mut deleted: Vec<Contact> = Vec::with_capacity(ids.len());
        for &id in ids {
            if deleted.iter().any(|c| c.id == id) {
                continue;
            }
            deleted.push(self.get(owner_id, id).await?);
        }

        let ids: Vec<i64> = deleted.iter().map(|c| c.id).collect();
        let removed = self.contacts.delete(owner_id, &ids).await?;
        info!("Deleted {} contacts for user: {}", removed, owner_id);

        Ok(deleted)
    }

    /// Reject an email or phone already used by another of the owner's contacts
    async fn ensure_unique(
        &self,
        owner_id: Uuid,
        exclude_id: Option<i64>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> ApiResult<()> {
        if email.is_none() && phone.is_none() {
            return Ok(());
        }

        let existing = self.contacts.find_all(owner_id).await?;
        for contact in existing.iter().filter(|c| Some(c.id) != exclude_id) {
            if let Some(email) = email.filter(|e| *e == contact.email) {
                return Err(ApiError::conflict("email", email));
            }
            if let Some(phone) = phone.filter(|p| *p == contact.phone) {
                return Err(ApiError::conflict("phone", phone));
            }
        }

        Ok(())
    }
}
