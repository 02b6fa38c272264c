use async_trait::async_trait;
use domain::{DomainError, PasswordHasher};
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::error;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

pub const DEFAULT_ROUNDS: u32 = 600_000;

/// PBKDF2-HMAC-SHA256 hashes stored as `pbkdf2-sha256$<rounds>$<salt>$<key>`
/// with hex-encoded salt and key. The round count travels with the hash, so
/// raising it later keeps old hashes verifiable.
#[derive(Debug, Clone)]
pub struct Pbkdf2PasswordHasher {
    rounds: u32,
}

impl Pbkdf2PasswordHasher {
    pub fn new(rounds: u32) -> Self {
        Self { rounds: rounds.max(1) }
    }
}

impl Default for Pbkdf2PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ROUNDS)
    }
}

fn derive(password: &[u8], salt: &[u8], rounds: u32) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, rounds, &mut key);
    key
}

struct Encoded {
    rounds: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

fn decode(stored: &str) -> Option<Encoded> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let rounds = parts.next()?.parse::<u32>().ok().filter(|r| *r > 0)?;
    let salt = hex::decode(parts.next()?).ok()?;
    let key = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Encoded { rounds, salt, key })
}

fn credential_failure(err: impl std::fmt::Display) -> DomainError {
    error!(error = %err, "password hashing failed");
    DomainError::CredentialError(err.to_string())
}

#[async_trait]
impl PasswordHasher for Pbkdf2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_owned();
        let rounds = self.rounds;

        tokio::task::spawn_blocking(move || {
            let mut salt = [0u8; SALT_LEN];
            rand::thread_rng().fill_bytes(&mut salt);
            let key = derive(password.as_bytes(), &salt, rounds);
            format!("{SCHEME}${rounds}${}${}", hex::encode(salt), hex::encode(key))
        })
        .await
        .map_err(credential_failure)
    }

    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, DomainError> {
        let encoded = decode(password_hash)
            .ok_or_else(|| credential_failure("stored password hash is malformed"))?;
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let key = derive(password.as_bytes(), &encoded.salt, encoded.rounds);
            bool::from(key.as_slice().ct_eq(&encoded.key))
        })
        .await
        .map_err(credential_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn hasher() -> Pbkdf2PasswordHasher {
        Pbkdf2PasswordHasher::new(2)
    }

    #[tokio::test]
    async fn hash_verifies_only_the_original_password() {
        let hasher = hasher();
        let hash = hasher.hash("hunter22").await.expect("hash");

        assert!(hash.starts_with("pbkdf2-sha256$2$"));
        assert!(hasher.verify("hunter22", &hash).await.expect("verify"));
        assert!(!hasher.verify("hunter23", &hash).await.expect("verify"));
    }

    #[tokio::test]
    async fn salts_differ_between_hashes() {
        let hasher = hasher();
        let a = hasher.hash("same").await.expect("hash");
        let b = hasher.hash("same").await.expect("hash");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn rounds_are_read_from_the_hash() {
        let old = Pbkdf2PasswordHasher::new(3).hash("pw").await.expect("hash");
        assert!(hasher().verify("pw", &old).await.expect("verify"));
    }

    #[tokio::test]
    async fn truncated_key_never_matches() {
        let hasher = hasher();
        let hash = hasher.hash("hunter22").await.expect("hash");
        let truncated = &hash[..hash.len() - 2];

        assert!(!hasher.verify("hunter22", truncated).await.expect("verify"));
    }

    #[rstest]
    #[case::wrong_scheme("bcrypt$2$00$00")]
    #[case::zero_rounds("pbkdf2-sha256$0$00$00")]
    #[case::bad_hex("pbkdf2-sha256$2$zz$00")]
    #[case::extra_field("pbkdf2-sha256$2$00$00$00")]
    #[case::empty("")]
    #[tokio::test]
    async fn malformed_hashes_are_errors(#[case] stored: &str) {
        assert!(matches!(
            hasher().verify("pw", stored).await,
            Err(DomainError::CredentialError(_))
        ));
    }
}
