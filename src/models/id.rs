//! External id generation.

use chrono::Utc;

const SUFFIX_LEN: usize = 7;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate an id of the form `<prefix>_<unix millis>_<7 base36 chars>`.
///
/// There is no retry on collision; the unique index rejects a clash at
/// write time.
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let random = uuid::Uuid::new_v4().as_u128();
    format!("{}_{}_{}", prefix, millis, base36_suffix(random))
}

fn base36_suffix(mut value: u128) -> String {
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(ALPHABET[(value % 36) as usize] as char);
        value /= 36;
    }
    out
}
