//! API models for entities, request and response payloads

pub mod contact;
pub mod user;

pub use contact::{
    Contact, ContactResponse, ContactsResponse, DeleteContactsParams, DeleteResponse, NewContact,
    UpdateContact,
};
pub use user::{
    ChangeDisplayNameRequest, ChangePasswordRequest, CreateUserRequest, CredentialsForm, NewUser,
    SecurityTokenRequest, SecurityTokenResponse, TokenResponse, User, UserResponse,
};
