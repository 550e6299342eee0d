//! Checksum prefix matching for derived addresses.
//!
//! Matching is two-stage: a byte comparison that ignores case, then an
//! exact comparison against the EIP-55 checksum string.

mod prefix;

pub use prefix::{Prefix, PrefixError};
