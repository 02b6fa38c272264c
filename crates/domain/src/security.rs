use crate::entities::ObjectId;
use crate::errors::DomainError;
use async_trait::async_trait;

/// One-way password hashing. Hashing is CPU bound, so implementations are
/// free to move the work off the async executor.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, DomainError>;
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, DomainError>;
}

/// Issues and checks bearer tokens bound to an account identifier.
pub trait CredentialService: Send + Sync {
    fn issue(&self, account: &ObjectId) -> Result<String, DomainError>;
    /// Fails with [`DomainError::Unauthenticated`] for expired, malformed or
    /// tampered tokens.
    fn verify(&self, token: &str) -> Result<ObjectId, DomainError>;
}
