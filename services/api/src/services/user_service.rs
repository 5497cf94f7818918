//! Account lifecycle and token bookkeeping
//!
//! A user holds at most one token per scope. Every issued token is written to
//! the user row and a presented token is only accepted while it is still the
//! stored one, so issuing a new pair, logging out or changing the password
//! revokes whatever was handed out before.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::jwt::{TokenScope, TokenService};
use crate::models::{
    ChangeDisplayNameRequest, ChangePasswordRequest, CreateUserRequest, CredentialsForm, NewUser,
    SecurityTokenRequest, SecurityTokenResponse, TokenResponse, User,
};
use crate::password::{hash_password, verify_password};
use crate::repositories::{USERS_TABLE, UserRepository};
use crate::validation::{validate_display_name, validate_email, validate_password};

/// User service
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: TokenService,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a new, enabled user
    pub async fn register(&self, request: CreateUserRequest) -> ApiResult<User> {
        validate_display_name(&request.display_name).map_err(ApiError::Validation)?;
        validate_email(&request.email).map_err(ApiError::Validation)?;
        validate_password(&request.password).map_err(ApiError::Validation)?;

        let new_user = NewUser {
            email: request.email,
            display_name: request.display_name,
            password_hash: hash(&request.password)?,
            disabled: false,
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                info!("Registered user: {}", user.id);
                Ok(user)
            }
            Err(e) => match e.unique_field(USERS_TABLE) {
                Some(field) => Err(ApiError::conflict(field, &new_user.email)),
                None => Err(e.into()),
            },
        }
    }

    /// Check an email/password pair, ignoring the disabled flag
    async fn authenticate(&self, email: &str, password: &str) -> ApiResult<User> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        if !verify(password, &user.password_hash)? {
            warn!("Failed login attempt for user: {}", user.id);
            return Err(ApiError::Unauthorized);
        }

        Ok(user)
    }

    /// Log in and start a fresh session, replacing any previous one
    pub async fn login(&self, form: CredentialsForm) -> ApiResult<TokenResponse> {
        let user = self.authenticate(&form.username, &form.password).await?;
        if user.disabled {
            return Err(ApiError::InactiveUser);
        }

        let tokens = self.start_session(user).await?;
        Ok(tokens)
    }

    async fn start_session(&self, mut user: User) -> ApiResult<TokenResponse> {
        let access_token = self.issue(user.id, TokenScope::Access)?;
        let refresh_token = self.issue(user.id, TokenScope::Refresh)?;

        user.is_logged_in = true;
        user.access_token = Some(access_token.clone());
        user.refresh_token = Some(refresh_token.clone());
        self.users.update(&user).await?;

        info!("Started session for user: {}", user.id);
        Ok(TokenResponse::bearer(access_token, refresh_token))
    }

    /// Resolve the user behind an access token
    pub async fn authorize_access(&self, token: &str) -> ApiResult<User> {
        self.authorize(token, TokenScope::Access).await
    }

    /// Resolve the user behind a security token
    pub async fn authorize_security(&self, token: &str) -> ApiResult<User> {
        self.authorize(token, TokenScope::Security).await
    }

    /// Verify `token` for `scope` and check it is the one stored on the user
    async fn authorize(&self, token: &str, scope: TokenScope) -> ApiResult<User> {
        let rejected = || match scope {
            TokenScope::Access => ApiError::Unauthorized,
            TokenScope::Refresh | TokenScope::Security => ApiError::InvalidToken,
        };

        let claims = self.tokens.verify(token, scope).map_err(|e| {
            warn!("Rejected {:?} token: {}", scope, e);
            rejected()
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(rejected)?;

        let stored = match scope {
            TokenScope::Access => &user.access_token,
            TokenScope::Refresh => &user.refresh_token,
            TokenScope::Security => &user.security_token,
        };

        if !user.is_logged_in || stored.as_deref() != Some(token) {
            warn!("Superseded {:?} token for user: {}", scope, user.id);
            return Err(rejected());
        }

        if user.disabled {
            return Err(ApiError::InactiveUser);
        }

        Ok(user)
    }

    /// Exchange the current refresh token for a new pair
    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<TokenResponse> {
        let user = self.authorize(refresh_token, TokenScope::Refresh).await?;
        self.start_session(user).await
    }

    /// End the user's session
    pub async fn logout(&self, mut user: User) -> ApiResult<()> {
        user.end_session();
        self.users.update(&user).await?;

        info!("Logged out user: {}", user.id);
        Ok(())
    }

    /// Change the password after re-verifying the old one; ends the session
    pub async fn change_password(
        &self,
        mut user: User,
        request: ChangePasswordRequest,
    ) -> ApiResult<()> {
        if !verify(&request.old_password, &user.password_hash)? {
            return Err(ApiError::IncorrectPassword);
        }
        validate_password(&request.new_password).map_err(ApiError::Validation)?;

        user.password_hash = hash(&request.new_password)?;
        user.end_session();
        self.users.update(&user).await?;

        info!("Changed password for user: {}", user.id);
        Ok(())
    }

    pub async fn change_display_name(
        &self,
        mut user: User,
        request: ChangeDisplayNameRequest,
    ) -> ApiResult<User> {
        validate_display_name(&request.display_name).map_err(ApiError::Validation)?;

        user.display_name = request.display_name;
        let user = self.users.update(&user).await?;
        Ok(user)
    }

    /// Re-verify the password and mint a short-lived security token
    pub async fn issue_security_token(
        &self,
        mut user: User,
        request: SecurityTokenRequest,
    ) -> ApiResult<SecurityTokenResponse> {
        if !verify(&request.password, &user.password_hash)? {
            return Err(ApiError::IncorrectPassword);
        }

        let security_token = self.issue(user.id, TokenScope::Security)?;
        user.security_token = Some(security_token.clone());
        self.users.update(&user).await?;

        Ok(SecurityTokenResponse {
            security_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Disable the account behind a security token and end its session
    pub async fn deactivate(&self, security_token: &str) -> ApiResult<()> {
        let mut user = self.authorize_security(security_token).await?;

        user.disabled = true;
        user.end_session();
        self.users.update(&user).await?;

        info!("Deactivated user: {}", user.id);
        Ok(())
    }

    /// Re-enable an account by its credentials
    pub async fn activate(&self, form: CredentialsForm) -> ApiResult<()> {
        let mut user = self.authenticate(&form.username, &form.password).await?;

        user.disabled = false;
        self.users.update(&user).await?;

        info!("Activated user: {}", user.id);
        Ok(())
    }

    fn issue(&self, user_id: Uuid, scope: TokenScope) -> ApiResult<String> {
        self.tokens.issue(user_id, scope).map_err(|e| {
            error!("Failed to issue {:?} token: {}", scope, e);
            ApiError::InternalServerError
        })
    }
}

fn hash(password: &str) -> ApiResult<String> {
    hash_password(password).map_err(|e| {
        error!("{}", e);
        ApiError::InternalServerError
    })
}

fn verify(password: &str, password_hash: &str) -> ApiResult<bool> {
    verify_password(password, password_hash).map_err(|e| {
        error!("{}", e);
        ApiError::InternalServerError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::test_config;
    use crate::repositories::MemoryStore;

    fn service() -> UserService {
        UserService::new(
            Arc::new(MemoryStore::new()),
            TokenService::new(&test_config()),
        )
    }

    fn registration(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            display_name: "ann_lee".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    fn credentials(email: &str, password: &str) -> CredentialsForm {
        CredentialsForm {
            username: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn logged_in(service: &UserService) -> TokenResponse {
        service.register(registration("ann@example.com")).await.unwrap();
        service
            .login(credentials("ann@example.com", "secret1"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_hashes_and_enables() {
        let service = service();
        let user = service.register(registration("ann@example.com")).await.unwrap();

        assert!(!user.disabled);
        assert!(!user.is_logged_in);
        assert_ne!(user.password_hash, "secret1");
        assert!(user.access_token.is_none());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = service();
        service.register(registration("ann@example.com")).await.unwrap();

        let err = service
            .register(registration("ann@example.com"))
            .await
            .unwrap_err();
        match err {
            ApiError::Conflict { field, value } => {
                assert_eq!(field, "email");
                assert_eq!(value, "ann@example.com");
            }
            other => panic!("expected a conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_validates() {
        let service = service();
        let mut request = registration("ann@example.com");
        request.password = "short".to_string();

        assert!(matches!(
            service.register(request).await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let service = service();
        service.register(registration("ann@example.com")).await.unwrap();

        assert!(matches!(
            service.login(credentials("ann@example.com", "wrong1")).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            service.login(credentials("bob@example.com", "secret1")).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_access_token_authorizes() {
        let service = service();
        let tokens = logged_in(&service).await;

        let user = service.authorize_access(&tokens.access_token).await.unwrap();
        assert_eq!(user.email, "ann@example.com");
        assert!(user.is_logged_in);
        assert_eq!(tokens.token_type, "bearer");

        assert!(matches!(
            service.authorize_access(&tokens.refresh_token).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let service = service();
        let tokens = logged_in(&service).await;

        let rotated = service.refresh(&tokens.refresh_token).await.unwrap();

        assert!(matches!(
            service.authorize_access(&tokens.access_token).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            service.refresh(&tokens.refresh_token).await,
            Err(ApiError::InvalidToken)
        ));
        assert!(service.authorize_access(&rotated.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_second_login_replaces_first_session() {
        let service = service();
        let first = logged_in(&service).await;
        let second = service
            .login(credentials("ann@example.com", "secret1"))
            .await
            .unwrap();

        assert!(service.authorize_access(&first.access_token).await.is_err());
        assert!(service.authorize_access(&second.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_revokes_tokens() {
        let service = service();
        let tokens = logged_in(&service).await;
        let user = service.authorize_access(&tokens.access_token).await.unwrap();

        service.logout(user).await.unwrap();

        assert!(matches!(
            service.authorize_access(&tokens.access_token).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(service.refresh(&tokens.refresh_token).await.is_err());
    }

    #[tokio::test]
    async fn test_change_password_revokes_tokens() {
        let service = service();
        let tokens = logged_in(&service).await;
        let user = service.authorize_access(&tokens.access_token).await.unwrap();

        let wrong = ChangePasswordRequest {
            old_password: "wrong1".to_string(),
            new_password: "secret2".to_string(),
        };
        assert!(matches!(
            service.change_password(user.clone(), wrong).await,
            Err(ApiError::IncorrectPassword)
        ));

        let request = ChangePasswordRequest {
            old_password: "secret1".to_string(),
            new_password: "secret2".to_string(),
        };
        service.change_password(user, request).await.unwrap();

        assert!(service.authorize_access(&tokens.access_token).await.is_err());
        assert!(service.refresh(&tokens.refresh_token).await.is_err());
        assert!(service.login(credentials("ann@example.com", "secret1")).await.is_err());
        assert!(service.login(credentials("ann@example.com", "secret2")).await.is_ok());
    }

    #[tokio::test]
    async fn test_change_display_name() {
        let service = service();
        let tokens = logged_in(&service).await;
        let user = service.authorize_access(&tokens.access_token).await.unwrap();

        let bad = ChangeDisplayNameRequest {
            display_name: "no spaces".to_string(),
        };
        assert!(matches!(
            service.change_display_name(user.clone(), bad).await,
            Err(ApiError::Validation(_))
        ));

        let request = ChangeDisplayNameRequest {
            display_name: "annie".to_string(),
        };
        let user = service.change_display_name(user, request).await.unwrap();
        assert_eq!(user.display_name, "annie");
        assert!(service.authorize_access(&tokens.access_token).await.is_ok());
    }

    #[tokio::test]
    async fn test_deactivate_and_activate() {
        let service = service();
        let tokens = logged_in(&service).await;
        let user = service.authorize_access(&tokens.access_token).await.unwrap();

        let wrong = SecurityTokenRequest {
            password: "wrong1".to_string(),
        };
        assert!(matches!(
            service.issue_security_token(user.clone(), wrong).await,
            Err(ApiError::IncorrectPassword)
        ));

        let request = SecurityTokenRequest {
            password: "secret1".to_string(),
        };
        let security = service
            .issue_security_token(user, request)
            .await
            .unwrap()
            .security_token;

        assert!(matches!(
            service.deactivate(&tokens.access_token).await,
            Err(ApiError::InvalidToken)
        ));
        service.deactivate(&security).await.unwrap();

        assert!(matches!(
            service.login(credentials("ann@example.com", "secret1")).await,
            Err(ApiError::InactiveUser)
        ));
        assert!(matches!(
            service.authorize_access(&tokens.access_token).await,
            Err(ApiError::Unauthorized)
        ));

        assert!(matches!(
            service.activate(credentials("ann@example.com", "wrong1")).await,
            Err(ApiError::Unauthorized)
        ));
        service
            .activate(credentials("ann@example.com", "secret1"))
            .await
            .unwrap();
        assert!(service.login(credentials("ann@example.com", "secret1")).await.is_ok());
    }
}
