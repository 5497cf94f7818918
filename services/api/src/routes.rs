//! Address book routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{ApiError, ApiResult},
    extract::{FormBody, JsonBody, PathParams, QueryParams},
    middleware::{auth_middleware, bearer_token, trusted_host_middleware},
    models::{
        ChangeDisplayNameRequest, ChangePasswordRequest, ContactResponse, ContactsResponse,
        CreateUserRequest, CredentialsForm, DeleteContactsParams, DeleteResponse, NewContact,
        SecurityTokenRequest, UpdateContact, User, UserResponse,
    },
    query::{ContactQuery, ListContactsParams},
    state::AppState,
};

/// Create the router for the address book service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route("/auth/display-name", patch(change_display_name))
        .route("/auth/change-password", patch(change_password))
        .route("/auth/security-token", post(security_token))
        .route("/auth/logout", post(logout))
        .route(
            "/contacts",
            post(create_contact)
                .get(list_contacts)
                .delete(delete_contacts),
        )
        .route(
            "/contacts/:id",
            get(get_contact)
                .patch(update_contact)
                .delete(delete_contact),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/activate", post(activate))
        .route("/auth/refresh-token", get(refresh_token))
        .route("/auth/deactivate", post(deactivate))
        .merge(protected_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trusted_host_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "addressbook"
    }))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_service.register(payload).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange credentials for an access/refresh pair
pub async fn login(
    State(state): State<AppState>,
    FormBody(form): FormBody<CredentialsForm>,
) -> ApiResult<impl IntoResponse> {
    let tokens = state.user_service.login(form).await?;

    Ok(Json(tokens))
}

/// Re-enable a deactivated account
pub async fn activate(
    State(state): State<AppState>,
    FormBody(form): FormBody<CredentialsForm>,
) -> ApiResult<impl IntoResponse> {
    state.user_service.activate(form).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Rotate the token pair using the refresh token
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers).ok_or(ApiError::InvalidToken)?;
    let tokens = state.user_service.refresh(&token).await?;

    Ok(Json(tokens))
}

/// Disable the account using a security token
pub async fn deactivate(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let token = bearer_token(&headers).ok_or(ApiError::InvalidToken)?;
    state.user_service.deactivate(&token).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Current user
pub async fn me(Extension(user): Extension<User>) -> impl IntoResponse {
    Json(UserResponse::from(user))
}

pub async fn change_display_name(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<ChangeDisplayNameRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.user_service.change_display_name(user, payload).await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    state.user_service.change_password(user, payload).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Mint a security token after re-verifying the password
pub async fn security_token(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<SecurityTokenRequest>,
) -> ApiResult<impl IntoResponse> {
    let response = state
        .user_service
        .issue_security_token(user, payload)
        .await?;

    Ok(Json(response))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    state.user_service.logout(user).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Create a contact for the current user
pub async fn create_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(payload): JsonBody<NewContact>,
) -> ApiResult<impl IntoResponse> {
    let contact = state.contact_service.create(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(ContactResponse::from(contact))))
}

/// List contacts with filtering, sorting and pagination
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(params): QueryParams<ListContactsParams>,
) -> ApiResult<impl IntoResponse> {
    let query = ContactQuery::try_from(params).map_err(ApiError::Validation)?;
    let (contacts, total) = state.contact_service.list(user.id, &query).await?;

    Ok(Json(ContactsResponse {
        contacts: contacts.into_iter().map(ContactResponse::from).collect(),
        total,
    }))
}

pub async fn get_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<impl IntoResponse> {
    let contact = state.contact_service.get(user.id, id).await?;

    Ok(Json(ContactResponse::from(contact)))
}

pub async fn update_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    PathParams(id): PathParams<i64>,
    JsonBody(payload): JsonBody<UpdateContact>,
) -> ApiResult<impl IntoResponse> {
    let contact = state.contact_service.update(user.id, id, payload).await?;

    Ok(Json(ContactResponse::from(contact)))
}

pub async fn delete_contact(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<impl IntoResponse> {
    delete_many(&state, &user, &[id]).await
}

/// Delete several contacts; fails without deleting if any id is unknown
pub async fn delete_contacts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    QueryParams(params): QueryParams<DeleteContactsParams>,
) -> ApiResult<impl IntoResponse> {
    delete_many(&state, &user, &params.ids).await
}

async fn delete_many(
    state: &AppState,
    user: &User,
    ids: &[i64],
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = state.contact_service.delete(user.id, ids).await?;

    Ok(Json(DeleteResponse {
        contacts: deleted.into_iter().map(ContactResponse::from).collect(),
    }))
}
