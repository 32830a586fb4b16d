//! Helpers for working safely with Ethereum addresses.

use alloy::primitives::Address;

use crate::error::{AppError, Result};

/// Parse and validate an Ethereum address from a string.
///
/// Validates:
/// - lowercase `0x` prefix
/// - length (0x + 40 hex chars)
/// - hex digits only
///
/// The input is taken as-is: surrounding whitespace is an error. Mixed-case
/// input is not required to carry a valid checksum; it is normalized instead.
pub fn parse_address(s: &str) -> Result<Address> {
    if s.is_empty() {
        return Err(AppError::InvalidAddress("address cannot be empty".into()));
    }

    let Some(digits) = s.strip_prefix("0x") else {
        return Err(AppError::InvalidAddress(format!("missing 0x prefix: {:?}", s)));
    };

    if s.len() != 42 {
        return Err(AppError::InvalidAddress(format!(
            "address must be 42 characters (0x + 40 hex chars), got {}: {:?}",
            s.len(),
            s
        )));
    }

    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AppError::InvalidAddress(format!("non-hex characters: {:?}", s)));
    }

    let mut bytes = [0u8; 20];
    alloy::hex::decode_to_slice(digits, &mut bytes)?;
    Ok(Address::from(bytes))
}

/// Convert a hex address string to its EIP-55 checksummed form.
pub fn to_checksum(s: &str) -> Result<String> {
    parse_address(s).map(|address| address.to_checksum(None))
}

/// Validate an address string, discarding the checksummed result.
pub fn validate_address(s: &str) -> Result<()> {
    to_checksum(s).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WETH_LOWER: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const WETH_CHECKSUM: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";

    #[test]
    fn test_to_checksum_lowercase_input() {
        assert_eq!(to_checksum(WETH_LOWER).unwrap(), WETH_CHECKSUM);
    }

    #[test]
    fn test_to_checksum_uppercase_input() {
        let upper = format!("0x{}", WETH_LOWER[2..].to_uppercase());
        assert_eq!(to_checksum(&upper).unwrap(), WETH_CHECKSUM);
    }

    #[test]
    fn test_to_checksum_idempotent() {
        let samples = [
            WETH_LOWER,
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "0x0000000000000000000000000000000000000000",
            "0xffffffffffffffffffffffffffffffffffffffff",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
        ];
        for sample in samples {
            let once = to_checksum(sample).unwrap();
            let twice = to_checksum(&once).unwrap();
            assert_eq!(once, twice);
            assert_eq!(once.len(), 42);
            assert!(once.starts_with("0x"));
        }
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        let samples =
            [format!("  {}", WETH_LOWER), format!("{}\n", WETH_LOWER), format!(" {} ", WETH_CHECKSUM)];
        for bad in samples {
            let result = to_checksum(&bad);
            assert!(matches!(result, Err(AppError::InvalidAddress(_))), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_uppercase_prefix_rejected() {
        let result = to_checksum(&format!("0X{}", &WETH_LOWER[2..]));
        assert!(matches!(result, Err(AppError::InvalidAddress(msg)) if msg.contains("prefix")));
    }

    #[test]
    fn test_missing_prefix_rejected() {
        let result = to_checksum(&WETH_LOWER[2..]);
        assert!(matches!(result, Err(AppError::InvalidAddress(msg)) if msg.contains("prefix")));
    }

    #[test]
    fn test_wrong_length_rejected() {
        for bad in ["0x1234", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2ff", "0x"] {
            let result = to_checksum(bad);
            assert!(matches!(result, Err(AppError::InvalidAddress(_))), "accepted {bad}");
        }
    }

    #[test]
    fn test_non_hex_rejected() {
        let result = to_checksum("0xZZ2aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
        assert!(matches!(result, Err(AppError::InvalidAddress(msg)) if msg.contains("non-hex")));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(to_checksum(""), Err(AppError::InvalidAddress(msg)) if msg.contains("empty")));
    }

    #[test]
    fn test_validate_address() {
        assert!(validate_address(WETH_CHECKSUM).is_ok());
        assert!(validate_address("not-an-address").is_err());
    }
}
