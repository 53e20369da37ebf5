//! Shared primitives: money and age parsing/formatting, and canonical
//! fingerprints.

pub mod fingerprint;
pub mod money;

pub use fingerprint::canonical_sha256;
pub use money::{format_amount, format_total, parse_age, parse_amount};
