use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

const PREFIX: &str = "KP";
const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const SUFFIX_LEN: usize = 6;

/// Draws a candidate tracking number. Uniqueness is enforced by the shipment store.
pub fn generate(now: DateTime<Utc>) -> String {
    // Low bits of a v4 uuid are fully random.
    let mut bits = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);

    for _ in 0..SUFFIX_LEN {
        suffix.push(ALPHABET[(bits % 36) as usize] as char);
        bits /= 36;
    }

    format!("{PREFIX}-{:04}-{suffix}", now.year())
}

pub fn is_well_formed(candidate: &str) -> bool {
    let mut parts = candidate.splitn(3, '-');
    let (Some(prefix), Some(year), Some(suffix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == PREFIX
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == SUFFIX_LEN
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
}
