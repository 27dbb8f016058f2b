use super::random::fill_random;
use chrono::{DateTime, Utc};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MAX_GENERATION_ATTEMPTS: usize = 16;

pub const WORKFLOW_ID_LEN: usize = 9;
pub const LOG_ID_SUFFIX_LEN: usize = 4;

pub fn validate_identifier_value(kind: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{kind} must be non-empty"));
    }
    if value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Ok(());
    }
    Err(format!(
        "{kind} must use only ASCII letters, digits, '-' or '_'"
    ))
}

pub fn random_base36(len: usize) -> String {
    let mut bytes = vec![0_u8; len];
    fill_random(&mut bytes);
    bytes
        .iter()
        .map(|byte| BASE36_ALPHABET[usize::from(*byte) % BASE36_ALPHABET.len()] as char)
        .collect()
}

pub fn generate_workflow_id(is_taken: impl Fn(&str) -> bool) -> String {
    let mut candidate = random_base36(WORKFLOW_ID_LEN);
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        if !is_taken(&candidate) {
            return candidate;
        }
        candidate = random_base36(WORKFLOW_ID_LEN);
    }
    // Still colliding after every retry: widen the id until it is free.
    while is_taken(&candidate) {
        candidate.push_str(&random_base36(1));
    }
    candidate
}

pub fn generate_log_id(at: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        at.timestamp_millis(),
        random_base36(LOG_ID_SUFFIX_LEN)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn workflow_ids_are_lowercase_base36() {
        let id = generate_workflow_id(|_| false);
        assert_eq!(id.len(), WORKFLOW_ID_LEN);
        assert!(id
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch.is_ascii_lowercase()));
    }

    #[test]
    fn workflow_id_generation_retries_on_collision() {
        let calls = Cell::new(0);
        let id = generate_workflow_id(|_| {
            calls.set(calls.get() + 1);
            calls.get() <= 3
        });
        assert_eq!(calls.get(), 4);
        assert_eq!(id.len(), WORKFLOW_ID_LEN);
    }

    #[test]
    fn log_ids_carry_timestamp_prefix() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).expect("timestamp");
        let id = generate_log_id(at);
        assert!(id.starts_with("1700000000000-"), "{id}");
        assert_eq!(id.len(), "1700000000000-".len() + LOG_ID_SUFFIX_LEN);
    }

    #[test]
    fn identifier_validation_rejects_spaces() {
        assert!(validate_identifier_value("worker id", "w-01").is_ok());
        assert!(validate_identifier_value("worker id", "").is_err());
        assert!(validate_identifier_value("worker id", "w 01").is_err());
    }
}
