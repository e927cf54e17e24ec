//! Registration, token issuance and profile handlers
use axum::{
    extract::{Query, State},
    response::Json,
    Form,
};
use tracing::{info, instrument};

use crate::auth::{create_access_token, hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::store::{NewUser, StoreError};
use crate::types::*;

const LOGIN_ERROR: &str = "Incorrect email or password";

/// Register a new user
#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<ApiState>,
    Json(body): Json<UserCreate>,
) -> ApiResult<Json<User>> {
    if state.users.find_by_email(&body.email).await.is_some() {
        return Err(ApiError::bad_request(StoreError::DuplicateEmail.to_string()));
    }
    if state.users.find_by_username(&body.username).await.is_some() {
        return Err(ApiError::bad_request(
            StoreError::DuplicateUsername.to_string(),
        ));
    }

    let hashed_password =
        hash_password(&body.password).map_err(|e| ApiError::internal(e.to_string()))?;

    let record = state
        .users
        .create(NewUser {
            email: body.email,
            username: body.username,
            hashed_password,
            full_name: body.full_name,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateEmail | StoreError::DuplicateUsername => {
                ApiError::bad_request(e.to_string())
            }
            StoreError::NotFound(_) => ApiError::internal(e.to_string()),
        })?;

    Ok(Json(record.into()))
}

/// OAuth2 password flow; the form's `username` is the account email
pub async fn login_for_access_token(
    State(state): State<ApiState>,
    Form(form): Form<TokenForm>,
) -> ApiResult<Json<Token>> {
    issue_token(&state, &form.username, &form.password).await
}

/// Email/password login
pub async fn login(
    State(state): State<ApiState>,
    Json(body): Json<UserLogin>,
) -> ApiResult<Json<Token>> {
    issue_token(&state, &body.email, &body.password).await
}

async fn issue_token(state: &ApiState, email: &str, password: &str) -> ApiResult<Json<Token>> {
    let user = state
        .users
        .find_by_email(email)
        .await
        .filter(|user| verify_password(password, &user.hashed_password))
        .ok_or_else(|| ApiError::unauthorized(LOGIN_ERROR))?;

    let token = create_access_token(
        &user.id,
        &state.settings.secret_key,
        state.settings.access_token_expire_minutes,
    )
    .map_err(|e| ApiError::internal(e.to_string()))?;

    info!("Issued access token for {}", user.id);
    Ok(Json(Token::bearer(token)))
}

/// Current user information
pub async fn read_users_me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user.into())
}

/// Connect a wallet address to the current account
pub async fn connect_wallet(
    State(state): State<ApiState>,
    AuthUser(user): AuthUser,
    Query(query): Query<WalletQuery>,
) -> ApiResult<Json<User>> {
    let updated = state
        .users
        .set_wallet(&user.id, &query.wallet_address)
        .await
        .map_err(|_| ApiError::not_found("User not found"))?;

    info!("Connected wallet for {}", updated.id);
    Ok(Json(updated.into()))
}
