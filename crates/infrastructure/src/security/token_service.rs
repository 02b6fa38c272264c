use chrono::{DateTime, Duration, Utc};
use domain::{CredentialService, DomainError, ObjectId};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Bearer tokens of the form `<account id>.<expiry unix seconds>.<signature>`,
/// signed with HMAC-SHA256 over the first two parts.
pub struct HmacTokenService {
    secret: Vec<u8>,
    ttl: Duration,
}

fn invalid() -> DomainError {
    DomainError::unauthenticated("Invalid token")
}

impl HmacTokenService {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, DomainError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| DomainError::CredentialError(e.to_string()))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    fn issue_at(&self, account: &ObjectId, now: DateTime<Utc>) -> Result<String, DomainError> {
        let payload = format!("{account}.{}", (now + self.ttl).timestamp());
        let signature = self.mac(&payload)?.finalize().into_bytes();
        Ok(format!("{payload}.{}", hex::encode(signature)))
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<ObjectId, DomainError> {
        let (payload, signature) = token.rsplit_once('.').ok_or_else(invalid)?;
        let signature = hex::decode(signature).map_err(|_| invalid())?;
        self.mac(payload)?
            .verify_slice(&signature)
            .map_err(|_| invalid())?;

        let (account, expiry) = payload.split_once('.').ok_or_else(invalid)?;
        let expiry: i64 = expiry.parse().map_err(|_| invalid())?;
        if now.timestamp() >= expiry {
            return Err(DomainError::unauthenticated("Token expired"));
        }

        ObjectId::parse(account).ok_or_else(invalid)
    }
}

impl CredentialService for HmacTokenService {
    fn issue(&self, account: &ObjectId) -> Result<String, DomainError> {
        self.issue_at(account, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<ObjectId, DomainError> {
        self.verify_at(token, Utc::now())
    }
}
