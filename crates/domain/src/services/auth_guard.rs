use crate::entities::Account;
use crate::errors::DomainError;
use crate::repositories::AccountRepository;
use crate::security::CredentialService;
use std::sync::Arc;
use tracing::warn;

/// Picks the bearer token out of the request headers.
///
/// The raw `token` header wins over `Authorization: Bearer <token>`.
pub fn bearer_token<'a>(raw: Option<&'a str>, authorization: Option<&'a str>) -> Option<&'a str> {
    let raw = raw.map(str::trim).filter(|t| !t.is_empty());
    raw.or_else(|| {
        authorization
            .and_then(|value| value.trim().strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
    })
}

/// Resolves request credentials to a live account.
pub struct AuthGuard {
    account_repository: Arc<dyn AccountRepository>,
    credentials: Arc<dyn CredentialService>,
}

impl AuthGuard {
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        credentials: Arc<dyn CredentialService>,
    ) -> Self {
        Self {
            account_repository,
            credentials,
        }
    }

    pub async fn authenticate(
        &self,
        raw_token: Option<&str>,
        authorization: Option<&str>,
    ) -> Result<Account, DomainError> {
        let token = bearer_token(raw_token, authorization)
            .ok_or_else(|| DomainError::unauthenticated("No token provided"))?;

        let account_id = self.credentials.verify(token).inspect_err(|e| {
            warn!(error = %e, "rejected bearer token");
        })?;

        self.account_repository
            .find_by_id(&account_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{account, InMemoryAccounts, PlainCredentials};
    use rstest::rstest;

    #[rstest]
    #[case::raw_only(Some("abc"), None, Some("abc"))]
    #[case::bearer_only(None, Some("Bearer xyz"), Some("xyz"))]
    #[case::raw_wins(Some("abc"), Some("Bearer xyz"), Some("abc"))]
    #[case::blank_raw_falls_back(Some(" "), Some("Bearer xyz"), Some("xyz"))]
    #[case::other_scheme(None, Some("Basic xyz"), None)]
    #[case::empty_bearer(None, Some("Bearer "), None)]
    #[case::nothing(None, None, None)]
    fn token_extraction(
        #[case] raw: Option<&str>,
        #[case] authorization: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(bearer_token(raw, authorization), expected);
    }

    fn guard(accounts: &[&Account]) -> AuthGuard {
        AuthGuard::new(Arc::new(InMemoryAccounts::with(accounts)), Arc::new(PlainCredentials))
    }

    #[tokio::test]
    async fn valid_token_resolves_the_account() {
        let ada = account("Ada");
        let header = format!("Bearer token:{}", ada.id);

        let resolved = guard(&[&ada]).authenticate(None, Some(&header)).await;
        assert_eq!(resolved, Ok(ada));
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() {
        assert_eq!(
            guard(&[]).authenticate(None, None).await,
            Err(DomainError::unauthenticated("No token provided"))
        );
    }

    #[tokio::test]
    async fn bad_token_is_unauthenticated() {
        assert!(matches!(
            guard(&[]).authenticate(Some("forged"), None).await,
            Err(DomainError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn deleted_account_is_not_found() {
        let ghost = account("Ghost");
        let token = format!("token:{}", ghost.id);

        assert_eq!(
            guard(&[]).authenticate(Some(&token), None).await,
            Err(DomainError::not_found("User not found"))
        );
    }
}
