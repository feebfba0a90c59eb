//! Wire types for the Altitrace API
//!
//! This module defines the request and response shapes exchanged with the
//! service:
//! - Transaction calls and EIP-2930 access lists
//! - Simulation requests and results
//! - Trace requests, tracer configuration and tracer responses
//! - State and block overrides shared by both domains
//! - The response envelope every endpoint wraps its payload in
//!
//! All numeric blockchain values travel as `0x`-prefixed hex strings; field
//! names are camelCase on the wire.

pub mod access_list;
pub mod call;
pub mod envelope;
pub mod shared;
pub mod simulate;
pub mod trace;

pub use access_list::*;
pub use call::*;
pub use envelope::*;
pub use shared::*;
pub use simulate::*;
pub use trace::*;

use crate::errors::ValidationError;
use alloy_primitives::U256;

/// Parses a `0x`-prefixed hex quantity into an arbitrary-precision integer
pub fn parse_u256(s: &str) -> Result<U256, ValidationError> {
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::InvalidQuantity(s.to_string()))?;
    if digits.is_empty() {
        return Err(ValidationError::InvalidQuantity(s.to_string()));
    }
    U256::from_str_radix(digits, 16).map_err(|_| ValidationError::InvalidQuantity(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_quantities() {
        assert_eq!(parse_u256("0x5208").unwrap(), U256::from(21000u64));
        assert_eq!(parse_u256("0x0").unwrap(), U256::ZERO);
        assert!(parse_u256("5208").is_err());
        assert!(parse_u256("0x").is_err());
        assert!(parse_u256("0xzz").is_err());
    }
}
