use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::Router;
use domain::{Account, LoginRequest, ProfileUpdate, Session, SignupRequest};

use crate::auth::CurrentAccount;
use crate::error::ApiError;
use crate::response::{Envelope, JsonBody};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/check", get(check))
        .route("/update-profile", put(update_profile))
}

async fn signup(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<(StatusCode, Envelope<Session>), ApiError> {
    let session = state
        .marketplace
        .account_service
        .signup(request)
        .await
        .map_err(ApiError::write)?;
    Ok((
        StatusCode::CREATED,
        Envelope::data(session).message("Account created successfully"),
    ))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Envelope<Session>, ApiError> {
    let session = state.marketplace.account_service.login(request).await?;
    Ok(Envelope::data(session).message("Login successful"))
}

async fn check(CurrentAccount(account): CurrentAccount) -> Envelope<Account> {
    Envelope::data(account)
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> Result<Envelope<Account>, ApiError> {
    let account = state
        .marketplace
        .account_service
        .update_profile(&caller, update)
        .await
        .map_err(ApiError::write)?;
    Ok(Envelope::data(account).message("Profile updated successfully"))
}
