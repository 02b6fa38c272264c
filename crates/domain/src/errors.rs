use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Every problem found in a product submission, in check order.
    #[error("Invalid listing: {}", .0.join("; "))]
    InvalidListing(Vec<String>),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Credential error: {0}")]
    CredentialError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::RepositoryError(message.into())
    }

    /// The text a caller is allowed to see.
    ///
    /// Storage and credential failures collapse to a generic message so that
    /// driver details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            Self::ValidationError(msg)
            | Self::InvalidIdentifier(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::InvalidListing(errors) => errors.join("; "),
            Self::RepositoryError(_) => "Storage operation failed".to_string(),
            Self::CredentialError(_) => "Credential processing failed".to_string(),
        }
    }
}
