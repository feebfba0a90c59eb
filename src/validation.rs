//! Input validators for addresses, hex strings and block selectors
//!
//! All request validation runs through these helpers before any network
//! call is issued, so a malformed input never reaches the wire.

use crate::errors::ValidationError;

/// Known block tags accepted wherever a block selector is expected
const BLOCK_TAGS: [&str; 5] = ["latest", "earliest", "pending", "safe", "finalized"];

fn hex_digits(s: &str) -> Option<&str> {
    let digits = s.strip_prefix("0x")?;
    digits.chars().all(|c| c.is_ascii_hexdigit()).then_some(digits)
}

/// Validates a 20-byte account or contract address (`0x` + 40 hex chars)
pub fn validate_address(s: &str) -> Result<(), ValidationError> {
    match hex_digits(s) {
        Some(digits) if digits.len() == 40 => Ok(()),
        _ => Err(ValidationError::InvalidAddress(s.to_string())),
    }
}

/// Validates hex-encoded byte data (`0x` prefix, even number of hex chars)
///
/// The empty payload `0x` is valid.
pub fn validate_hex_data(s: &str) -> Result<(), ValidationError> {
    match hex_digits(s) {
        Some(digits) if digits.len() % 2 == 0 => Ok(()),
        _ => Err(ValidationError::InvalidHex(s.to_string())),
    }
}

/// Validates a hex-encoded numeric quantity (`0x` prefix, at least one digit)
pub fn validate_quantity(s: &str) -> Result<(), ValidationError> {
    match hex_digits(s) {
        Some(digits) if !digits.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidQuantity(s.to_string())),
    }
}

/// Validates a 32-byte transaction hash (`0x` + 64 hex chars)
pub fn validate_hash(s: &str) -> Result<(), ValidationError> {
    match hex_digits(s) {
        Some(digits) if digits.len() == 64 => Ok(()),
        _ => Err(ValidationError::InvalidHash(s.to_string())),
    }
}

/// Validates a block selector: a named tag or a hex-encoded block number
pub fn validate_block_selector(s: &str) -> Result<(), ValidationError> {
    if BLOCK_TAGS.contains(&s) {
        return Ok(());
    }
    validate_quantity(s).map_err(|_| ValidationError::InvalidBlockSelector(s.to_string()))
}
