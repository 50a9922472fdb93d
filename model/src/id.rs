//! Resource ids.
//!
//! Ids are 24 lowercase hex characters: a 4 byte big-endian timestamp (seconds
//! since the unix epoch) followed by 8 random bytes. Template placeholders use
//! the same shape, which is what the config translator keys on.

use rand::RngCore;
use std::time::{SystemTime, UNIX_EPOCH};

/// Length of every id, placeholder or real
pub const ID_LENGTH: usize = 24;

pub fn new_id() -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default() as u32;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&seconds.to_be_bytes());
    rand::thread_rng().fill_bytes(&mut bytes[4..]);

    hex::encode(bytes)
}

pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_hexdigit())
}
