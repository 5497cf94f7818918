//! Contact model and related payloads

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contact entity
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Contact {
    pub id: i64,
    pub owner_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

/// New contact payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

/// Partial contact update; absent or empty fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateContact {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateContact {
    /// Apply the provided fields to `contact`.
    pub fn apply(&self, contact: &mut Contact) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                *target = value.to_string();
            }
        }

        set(&mut contact.first_name, &self.first_name);
        set(&mut contact.last_name, &self.last_name);
        set(&mut contact.phone, &self.phone);
        set(&mut contact.email, &self.email);
    }
}

/// Query string for bulk deletion, e.g. `?ids=1&ids=2`
#[derive(Debug, Default, Deserialize)]
pub struct DeleteContactsParams {
    #[serde(default)]
    pub ids: Vec<i64>,
}

/// Response for contact operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            phone: contact.phone,
            email: contact.email,
        }
    }
}

/// Response for contact listing
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactsResponse {
    pub contacts: Vec<ContactResponse>,
    pub total: usize,
}

/// Response for contact deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub contacts: Vec<ContactResponse>,
}
