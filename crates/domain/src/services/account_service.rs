use crate::entities::{Account, LoginRequest, ProfileUpdate, Session, SignupRequest, StoredAccount};
use crate::errors::DomainError;
use crate::repositories::AccountRepository;
use crate::security::{CredentialService, PasswordHasher};
use std::sync::Arc;
use tracing::{info, warn};

/// Identity directory - signup, login and profile maintenance.
pub struct AccountService {
    account_repository: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    credentials: Arc<dyn CredentialService>,
}

/// Surrounding whitespace is dropped; case is kept as submitted.
fn clean_email(email: &str) -> String {
    email.trim().to_string()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl AccountService {
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        credentials: Arc<dyn CredentialService>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
            credentials,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<Session, DomainError> {
        let (Some(email), Some(display_name), Some(password)) = (
            present(request.email),
            present(request.display_name),
            present(request.password),
        ) else {
            return Err(DomainError::validation("Missing Details"));
        };

        let email = clean_email(&email);
        if self.account_repository.find_by_email(&email).await?.is_some() {
            return Err(DomainError::validation("Account already exists"));
        }

        let password_hash = self.password_hasher.hash(&password).await?;
        let stored = StoredAccount::new(email, display_name.trim().to_string(), password_hash);
        let account = self.account_repository.insert(&stored).await?;

        info!(account_id = %account.id, "account created");
        self.session(account)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Session, DomainError> {
        let invalid = || DomainError::unauthenticated("Invalid credentials");

        let (Some(email), Some(password)) = (present(request.email), request.password) else {
            return Err(invalid());
        };

        let Some(stored) = self
            .account_repository
            .find_by_email(&clean_email(&email))
            .await?
        else {
            warn!("login for unknown email");
            return Err(invalid());
        };

        if !self.password_hasher.verify(&password, &stored.password_hash).await? {
            warn!(account_id = %stored.account.id, "login with wrong password");
            return Err(invalid());
        }

        self.session(stored.account)
    }

    pub async fn update_profile(
        &self,
        caller: &Account,
        update: ProfileUpdate,
    ) -> Result<Account, DomainError> {
        update.validate()?;
        let update = ProfileUpdate {
            display_name: update.display_name.map(|n| n.trim().to_string()),
            ..update
        };

        self.account_repository
            .update_profile(&caller.id, &update)
            .await?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    fn session(&self, user: Account) -> Result<Session, DomainError> {
        let token = self.credentials.issue(&user.id)?;
        Ok(Session { user, token })
    }
}
