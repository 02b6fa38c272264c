use crate::entities::{Account, ObjectId, ProfileUpdate, StoredAccount};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Identity directory - defines what we need from the account store.
/// Reads hand out [`Account`], which carries no password credential.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>, DomainError>;
    /// The only lookup that returns the stored password hash.
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, DomainError>;
    async fn insert(&self, account: &StoredAccount) -> Result<Account, DomainError>;
    async fn update_profile(
        &self,
        id: &ObjectId,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, DomainError>;
}
