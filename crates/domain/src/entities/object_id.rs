use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

const ID_LEN: usize = 24;

/// Record identifier: 24 lowercase hex characters.
///
/// The first 4 bytes encode the creation second, the remaining 8 are random,
/// so identifiers minted by this process sort roughly by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    pub fn generate() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&(seconds as u32).to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);
        Self(hex::encode(bytes))
    }

    /// Accepts exactly 24 hex digits in either case; anything else is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("'{value}' is not a 24 character hex id"))
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}
