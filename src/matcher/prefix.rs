//! Prefix matching implementation.

use std::fmt;

use crate::crypto::Address;

/// Maximum number of hex digits in a prefix (a full address).
pub const MAX_PREFIX_DIGITS: usize = 40;

/// Errors raised while parsing a prefix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrefixError {
    #[error("Invalid hex prefix: {0}")]
    NotHex(String),
    #[error("Prefix cannot be longer than 40 hex characters (full address), got {0}")]
    TooLong(usize),
}

/// A compiled checksum prefix.
///
/// `bytes` and `half_nibble` describe the prefix without case and drive the
/// cheap filter. `checksum` holds the exact casing, including `0x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    /// `0x` followed by the digits exactly as requested
    checksum: String,
    /// Whole bytes covered by the prefix
    bytes: Vec<u8>,
    /// Value of a trailing odd digit, compared against the next high nibble
    half_nibble: Option<u8>,
}

impl Prefix {
    /// Parses a prefix with or without a leading `0x`.
    ///
    /// The case of each letter is kept: it is the casing the checksum
    /// address has to show.
    pub fn parse(input: &str) -> Result<Self, PrefixError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);

        if digits.len() > MAX_PREFIX_DIGITS {
            return Err(PrefixError::TooLong(digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(PrefixError::NotHex(format!("0x{}", digits)));
        }

        let even = digits.len() & !1;
        let bytes = hex::decode(&digits[..even])
            .map_err(|_| PrefixError::NotHex(format!("0x{}", digits)))?;
        let half_nibble = digits[even..]
            .chars()
            .next()
            .and_then(|c| c.to_digit(16))
            .map(|d| d as u8);

        Ok(Self {
            checksum: format!("0x{}", digits),
            bytes,
            half_nibble,
        })
    }

    /// Number of hex digits in the prefix.
    pub fn len(&self) -> usize {
        self.checksum.len() - 2
    }

    /// Returns true for the empty prefix, which matches every address.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stage one: compares raw bytes, ignoring letter case.
    ///
    /// Never rejects an address whose checksum starts with the prefix.
    #[inline]
    pub fn matches_bytes(&self, address: &Address) -> bool {
        let addr = address.as_bytes();
        if addr[..self.bytes.len()] != self.bytes[..] {
            return false;
        }
        match self.half_nibble {
            Some(nibble) => addr[self.bytes.len()] >> 4 == nibble,
            None => true,
        }
    }

    /// Runs both stages. The checksum is only computed when stage one passes.
    #[inline]
    pub fn matches(&self, address: &Address) -> bool {
        self.matches_bytes(address) && address.to_checksum().starts_with(&self.checksum)
    }

    /// Expected number of candidates per match.
    ///
    /// Every digit has 16 values and every letter must also land on the
    /// requested case, which halves the odds again.
    pub fn estimated_difficulty(&self) -> f64 {
        let letters = self.checksum[2..]
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .count();
        16f64.powi(self.len() as i32) * 2f64.powi(letters as i32)
    }

    /// Returns a human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        match self.estimated_difficulty() {
            d if d <= 1e3 => "Very Easy (< 1 second)".into(),
            d if d <= 1e5 => "Easy (seconds)".into(),
            d if d <= 1e7 => "Medium (minutes)".into(),
            d if d <= 1e9 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksum)
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore;

    use super::*;

    fn eip55_sample() -> Address {
        "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap()
    }

    #[test]
    fn test_parse_with_and_without_marker() {
        let a = Prefix::parse("0xFFff00").unwrap();
        let b = Prefix::parse("FFff00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "0xFFff00");
        assert_eq!(a.len(), 6);
    }

    #[test]
    fn test_invalid_prefix() {
        assert!(matches!(Prefix::parse("0xdeadbeeg"), Err(PrefixError::NotHex(_))));
        assert!(matches!(Prefix::parse("xyz"), Err(PrefixError::NotHex(_))));
        assert_eq!(
            Prefix::parse(&"a".repeat(41)),
            Err(PrefixError::TooLong(41))
        );
    }

    #[test]
    fn test_exact_case_match() {
        let addr = eip55_sample();
        assert!(Prefix::parse("0x5aAeb6").unwrap().matches(&addr));
        assert!(Prefix::parse("0x5aAeb60").unwrap().matches(&addr));
    }

    #[test]
    fn test_wrong_case_passes_bytes_but_not_checksum() {
        let addr = eip55_sample();
        let prefix = Prefix::parse("0x5AAEB6").unwrap();
        assert!(prefix.matches_bytes(&addr));
        assert!(!prefix.matches(&addr));
    }

    #[test]
    fn test_odd_length_checks_high_nibble() {
        let addr = eip55_sample();
        assert!(Prefix::parse("5").unwrap().matches(&addr));
        assert!(!Prefix::parse("6").unwrap().matches_bytes(&addr));
        assert!(!Prefix::parse("5aAeb7").unwrap().matches_bytes(&addr));
    }

    #[test]
    fn test_empty_prefix_matches_everything() {
        let prefix = Prefix::parse("0x").unwrap();
        assert!(prefix.is_empty());
        assert!(prefix.matches(&Address::from_bytes([0u8; 20])));
        assert!(prefix.matches(&eip55_sample()));
    }

    #[test]
    fn test_full_length_prefix() {
        let addr = eip55_sample();
        let prefix = Prefix::parse(&addr.to_checksum()).unwrap();
        assert!(prefix.matches(&addr));
    }

    #[test]
    fn test_filter_soundness_random() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let mut bytes = [0u8; 20];
            rng.fill_bytes(&mut bytes);
            let addr = Address::from_bytes(bytes);
            let checksum = addr.to_checksum();

            // A true match is never rejected by either stage.
            let len = 2 + (rng.next_u32() as usize % 41);
            let own = Prefix::parse(&checksum[..len]).unwrap();
            assert!(own.matches_bytes(&addr));
            assert!(own.matches(&addr));

            // Whatever passes both stages really is a checksum prefix.
            for candidate in ["0xA", "0xa", "0xAb", "0x0", "0xfF"] {
                let prefix = Prefix::parse(candidate).unwrap();
                assert_eq!(prefix.matches(&addr), checksum.starts_with(candidate));
            }
        }
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(Prefix::parse("0000").unwrap().estimated_difficulty(), 65536.0);
        assert_eq!(Prefix::parse("00aB").unwrap().estimated_difficulty(), 65536.0 * 4.0);
    }
}
