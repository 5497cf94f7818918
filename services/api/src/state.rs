//! Application state shared across handlers

use std::sync::Arc;

use crate::jwt::TokenService;
use crate::repositories::{ContactRepository, MemoryStore, UserRepository};
use crate::services::{ContactService, UserService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub contact_service: ContactService,
    pub allowed_hosts: Arc<Vec<String>>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        contacts: Arc<dyn ContactRepository>,
        tokens: TokenService,
        allowed_hosts: Vec<String>,
    ) -> Self {
        Self {
            user_service: UserService::new(users, tokens),
            contact_service: ContactService::new(contacts),
            allowed_hosts: Arc::new(allowed_hosts),
        }
    }

    /// State backed by a fresh [`MemoryStore`]
    pub fn in_memory(tokens: TokenService, allowed_hosts: Vec<String>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, tokens, allowed_hosts)
    }
}
