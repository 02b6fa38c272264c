use super::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered marketplace account as seen by the rest of the system.
/// The password credential never travels with this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    pub display_name: String,
    pub profile_pic: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account together with its stored password hash, only handed out for login.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAccount {
    pub account: Account,
    pub password_hash: String,
}

impl StoredAccount {
    pub fn new(email: String, display_name: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            account: Account {
                id: ObjectId::generate(),
                email,
                display_name,
                profile_pic: None,
                bio: None,
                created_at: now,
                updated_at: now,
            },
            password_hash,
        }
    }
}

/// Buyer details expanded into a single order view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub display_name: String,
    pub email: String,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.clone(),
            display_name: account.display_name.clone(),
            email: account.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if let Some(name) = &self.display_name {
            if name.trim().is_empty() {
                return Err(crate::DomainError::validation("Display name cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Account plus a freshly issued bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: Account,
    pub token: String,
}
