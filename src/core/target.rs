// src/core/target.rs

use crate::core::error::ReconError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::Display;

// Statically compiled target grammars. The IPv4 pattern checks shape only;
// octets are not bounds-checked to 0-255.
static RE_HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9_-]+\.)*[a-zA-Z0-9][a-zA-Z0-9_-]+\.[a-zA-Z]{2,11}$").unwrap()
});
static RE_IPV4: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").unwrap());

/// Which grammar a target was accepted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TargetKind {
    #[strum(serialize = "hostname")]
    Hostname,
    #[strum(serialize = "IPv4")]
    Ipv4,
}

/// A target that passed validation. Immutable for the lifetime of an engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    raw: String,
    kind: TargetKind,
}

impl Target {
    /// Validates `input` and wraps it. No trimming is applied.
    pub fn parse(input: &str) -> Result<Self, ReconError> {
        let kind = classify_input(input).ok_or_else(|| ReconError::InvalidTarget(input.to_string()))?;
        Ok(Self { raw: input.to_string(), kind })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Returns `true` if `input` is a syntactically valid hostname or dotted-quad.
///
/// Pure and deterministic. A leading `://` is rejected explicitly; anything
/// else that is not in the grammar (spaces, schemes, wrong group counts) falls
/// out of the regexes.
pub fn validate(input: &str) -> bool {
    classify_input(input).is_some()
}

fn classify_input(input: &str) -> Option<TargetKind> {
    if input.is_empty() || input.starts_with("://") {
        return None;
    }
    if RE_IPV4.is_match(input) {
        Some(TargetKind::Ipv4)
    } else if RE_HOSTNAME.is_match(input) {
        Some(TargetKind::Hostname)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_hostnames() {
        assert!(validate("example.com"));
        assert!(validate("sub.example.co.uk"));
        assert!(validate("scanme.nmap.org"));
        assert!(validate("my_host-01.internal.lab"));
        assert!(validate("a.b.example.technology"));
    }

    #[test]
    fn accepts_ipv4_shapes_without_range_check() {
        assert!(validate("10.0.0.5"));
        assert!(validate("127.0.0.1"));
        assert!(validate("999.999.999.999"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(!validate(""));
        assert!(!validate("not a host"));
        assert!(!validate("://example.com"));
        assert!(!validate("http://example.com"));
        assert!(!validate("localhost"));
        assert!(!validate("1.2.3"));
        assert!(!validate("1.2.3.4.5"));
        assert!(!validate("1234.1.1.1"));
        assert!(!validate("example.c"));
        assert!(!validate("example.abcdefghijkl"));
        assert!(!validate("example.com "));
    }

    #[test]
    fn single_character_label_before_tld_is_rejected() {
        // The label right before the TLD must be at least two characters long.
        assert!(!validate("a.com"));
        assert!(validate("x.ab.com"));
    }

    #[test]
    fn parse_records_kind() {
        let host = Target::parse("example.com").unwrap();
        assert_eq!(host.kind(), TargetKind::Hostname);
        assert_eq!(host.as_str(), "example.com");

        let ip = Target::parse("10.0.0.5").unwrap();
        assert_eq!(ip.kind(), TargetKind::Ipv4);
        assert_eq!(ip.to_string(), "10.0.0.5");
    }

    #[test]
    fn parse_rejects_with_invalid_target() {
        match Target::parse("not a host") {
            Err(ReconError::InvalidTarget(raw)) => assert_eq!(raw, "not a host"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
