//! Utility functions for the portfolio core
//!
//! This module contains common utility functions used throughout the portfolio core.

use crate::shared::constants::ADDRESS_KEY_SEPARATOR;
use crate::shared::types::Address;
use std::cmp::Ordering;

/// Lower-case an address so that checksummed and plain forms collide
pub fn normalize_address(address: &str) -> Address {
    address.trim().to_lowercase()
}

/// Normalize an address set: lower-cased, sorted, de-duplicated, empties dropped
pub fn normalize_addresses<S: AsRef<str>>(addresses: &[S]) -> Vec<Address> {
    let mut normalized: Vec<Address> = addresses
        .iter()
        .map(|address| normalize_address(address.as_ref()))
        .filter(|address| !address.is_empty())
        .collect();
    normalized.sort();
    normalized.dedup();
    normalized
}

/// Escape backslashes and separator characters so that joined key parts
/// can never run into each other
pub fn escape_key_part(part: &str) -> String {
    let mut escaped = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | ':' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Key fragment for an already normalized address set
pub fn addresses_key(addresses: &[Address]) -> String {
    addresses
        .iter()
        .map(|address| escape_key_part(address))
        .collect::<Vec<_>>()
        .join(ADDRESS_KEY_SEPARATOR)
}

/// Treat empty optional strings as absent
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Key fragment for a boolean flag
pub fn flag_key(flag: bool) -> &'static str {
    if flag {
        "1"
    } else {
        "0"
    }
}

/// Descending order for USD amounts; NaN counts as zero
pub fn compare_value_desc(a: f64, b: f64) -> Ordering {
    let zero_nan = |value: f64| if value.is_nan() { 0.0 } else { value };
    zero_nan(b).partial_cmp(&zero_nan(a)).unwrap_or(Ordering::Equal)
}
