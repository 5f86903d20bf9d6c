//! Network address predicates.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde_json::Value;

use crate::foundation::ValidationResult;
use crate::validators::with_text;

/// Dotted-quad IPv4 address.
#[must_use]
pub fn ipv4(data: &Value) -> ValidationResult {
    with_text(data, |s| match s.parse::<Ipv4Addr>() {
        Ok(_) => ValidationResult::pass().with_detail("version", 4),
        Err(_) => ValidationResult::fail(format!("'{s}' is not a valid IPv4 address")),
    })
}

/// IPv6 address in any textual form the standard parser accepts.
#[must_use]
pub fn ipv6(data: &Value) -> ValidationResult {
    with_text(data, |s| match s.parse::<Ipv6Addr>() {
        Ok(_) => ValidationResult::pass().with_detail("version", 6),
        Err(_) => ValidationResult::fail(format!("'{s}' is not a valid IPv6 address")),
    })
}

/// Either address family.
#[must_use]
pub fn ip_address(data: &Value) -> ValidationResult {
    with_text(data, |s| match s.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => ValidationResult::pass().with_detail("version", 4),
        Ok(IpAddr::V6(_)) => ValidationResult::pass().with_detail("version", 6),
        Err(_) => ValidationResult::fail(format!("'{s}' is not a valid IP address")),
    })
}

// ============================================================================
// MAC ADDRESS
// ============================================================================

fn hex_groups(input: &str, separator: char, groups: usize, width: usize) -> bool {
    let parts: Vec<&str> = input.split(separator).collect();
    parts.len() == groups
        && parts
            .iter()
            .all(|p| p.len() == width && p.chars().all(|c| c.is_ascii_hexdigit()))
}

/// `AA:BB:CC:DD:EE:FF`, `AA-BB-CC-DD-EE-FF` or Cisco `AABB.CCDD.EEFF`.
#[must_use]
pub fn mac_address(data: &Value) -> ValidationResult {
    with_text(data, |s| {
        let format = if s.contains(':') {
            hex_groups(s, ':', 6, 2).then_some("colon")
        } else if s.contains('-') {
            hex_groups(s, '-', 6, 2).then_some("hyphen")
        } else if s.contains('.') {
            hex_groups(s, '.', 3, 4).then_some("dot")
        } else {
            None
        };
        match format {
            Some(format) => ValidationResult::pass().with_detail("format", format),
            None => ValidationResult::fail(format!("'{s}' is not a valid MAC address")),
        }
    })
}
