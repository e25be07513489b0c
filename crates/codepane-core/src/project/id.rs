use crate::constants::project::{ID_SUFFIX_LEN, SHORT_ID_LEN};
use chrono::Utc;
use uuid::Uuid;

/// Source of identifiers for files and chat messages.
///
/// The reconciler and file set take one of these so tests can swap in a
/// deterministic sequence.
pub trait IdSource {
    /// A session-unique identifier.
    fn next_id(&mut self) -> String;

    /// A short random tag used in generated file names.
    fn short_id(&mut self) -> String;
}

/// Time + randomness identifiers, the production source.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> String {
        generate_id()
    }

    fn short_id(&mut self) -> String {
        short_id()
    }
}

/// Base-36 millisecond timestamp followed by a random base-36 suffix.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("{}{}", to_base36(millis), random_suffix(ID_SUFFIX_LEN))
}

pub fn short_id() -> String {
    random_suffix(SHORT_ID_LEN)
}

fn random_suffix(len: usize) -> String {
    let mut bits = Uuid::new_v4().as_u128();
    (0..len)
        .map(|_| {
            let digit = (bits % 36) as u32;
            bits /= 36;
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect()
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(char::from_digit((n % 36) as u32, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}
