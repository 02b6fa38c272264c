use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domain::Account;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, resolved from the `token` or `Authorization` header.
pub struct CurrentAccount(pub Account);

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get("token").and_then(|v| v.to_str().ok());
        let authorization = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

        let account = state
            .marketplace
            .auth_guard
            .authenticate(raw, authorization)
            .await?;
        Ok(Self(account))
    }
}
