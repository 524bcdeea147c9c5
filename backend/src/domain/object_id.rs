//! Twelve-byte document identifiers rendered as 24 hexadecimal characters.
//!
//! Layout: a 4-byte big-endian Unix timestamp in seconds, 5 bytes of
//! per-process randomness, then a 3-byte counter seeded randomly at start-up.
//! Identifiers generated by one process therefore sort roughly by creation
//! time and never repeat within a second until the counter wraps.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const OBJECT_ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

/// Validation errors raised when parsing an [`ObjectId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectIdError {
    /// The input did not contain exactly 24 characters.
    #[error("object id must be 24 hexadecimal characters, got {length}")]
    InvalidLength { length: usize },
    /// The input contained non-hexadecimal characters.
    #[error("object id must only contain hexadecimal characters")]
    InvalidHex,
}

/// Document identifier used by companies and applications.
///
/// # Examples
/// ```
/// use tracker_backend::domain::ObjectId;
///
/// let id: ObjectId = "65A1F0C2E4B0A1B2C3D4E5F6".parse().expect("valid id");
/// assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

fn process_entropy() -> &'static [u8; 5] {
    static ENTROPY: OnceLock<[u8; 5]> = OnceLock::new();
    ENTROPY.get_or_init(|| rand::thread_rng().r#gen())
}

fn next_counter() -> u32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER
        .get_or_init(|| AtomicU32::new(rand::thread_rng().gen_range(0..=COUNTER_MASK)))
        .fetch_add(1, Ordering::Relaxed)
        & COUNTER_MASK
}

impl ObjectId {
    /// Generate a fresh identifier stamped with the given creation time.
    pub fn generate_at(now: DateTime<Utc>) -> Self {
        let seconds = u32::try_from(now.timestamp()).unwrap_or(u32::MAX);
        let counter = next_counter();

        let mut bytes = [0_u8; OBJECT_ID_LEN];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(process_entropy());
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);
        Self(bytes)
    }

    /// Generate a fresh identifier stamped with the current time.
    pub fn generate() -> Self {
        Self::generate_at(Utc::now())
    }

    /// Timestamp embedded in the identifier, truncated to seconds.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let [a, b, c, d, ..] = self.0;
        let seconds = u32::from_be_bytes([a, b, c, d]);
        DateTime::from_timestamp(i64::from(seconds), 0)
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.len() != OBJECT_ID_LEN * 2 {
            return Err(ObjectIdError::InvalidLength { length: raw.len() });
        }
        let mut bytes = [0_u8; OBJECT_ID_LEN];
        hex::decode_to_slice(raw, &mut bytes).map_err(|_| ObjectIdError::InvalidHex)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for ObjectId {
    type Error = ObjectIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ObjectId> for String {
    fn from(value: ObjectId) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
