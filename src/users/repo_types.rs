use std::fmt;

use rand::RngCore;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use super::repo::StoreError;

/// Store-assigned record identifier: 4 bytes of unix seconds then 8 random bytes, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(String);

impl UserId {
    pub const LEN: usize = 24;

    pub fn generate() -> Self {
        let secs = OffsetDateTime::now_utc().unix_timestamp() as u32;
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Rejects anything that is not 24 hex characters, the way a document driver refuses to
    /// cast a malformed object id.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        if raw.len() == Self::LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(StoreError::InvalidId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User record as persisted and as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password: String, // stored as submitted
    pub age: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Caller-supplied fields; identifier and timestamps belong to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: i32,
}
