//! Host classification and domain name validation.
//!
//! A [`Host`] is the validated host portion of a URL: either a strict IPv4
//! dotted-quad literal or a punycode-normalized [`DomainName`]. The
//! classifier is deliberately conservative: a string of digits and dots is
//! only treated as an address when it matches the full dotted-quad grammar;
//! everything else must survive domain-name validation.
//!
//! # Example
//!
//! ```
//! use pagenet::host::Host;
//!
//! let ip = Host::new("192.168.1.1").unwrap();
//! assert!(ip.is_ip());
//!
//! let domain = Host::new("bücher.example").unwrap();
//! assert_eq!(domain.raw_string(), "xn--bcher-kva.example");
//! ```

pub mod domain;
pub mod punycode;

pub use domain::{DomainName, DomainNameError};

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Strict dotted-quad grammar: four octets 0-255, no leading zeros.
static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])$")
        .expect("ipv4 pattern is valid")
});

/// True when `raw` is a strict IPv4 dotted-quad literal.
pub(crate) fn is_ipv4_literal(raw: &str) -> bool {
    IPV4_RE.is_match(raw)
}

/// Errors produced by [`Host`] construction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[error("host string contains a scheme separator")]
    ContainsScheme,
    #[error("invalid domain name: {0}")]
    InvalidDomainName(#[from] DomainNameError),
}

/// The validated host portion of a URL.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Host {
    /// A strict IPv4 dotted-quad literal, stored as entered.
    Ipv4Address(String),
    /// A validated DNS domain name.
    Domain(DomainName),
}

impl Host {
    /// Classifies and validates `raw` as a host.
    ///
    /// Strings containing `://` are rejected outright: the caller passed a
    /// URL where a bare host was expected.
    pub fn new(raw: &str) -> Result<Self, HostError> {
        if raw.contains("://") {
            return Err(HostError::ContainsScheme);
        }

        // Only digit-and-dot strings are candidates for the address form.
        let digits_only = raw.chars().filter(|c| *c != '.').all(|c| c.is_ascii_digit());
        if digits_only && !raw.is_empty() && is_ipv4_literal(raw) {
            return Ok(Host::Ipv4Address(raw.to_owned()));
        }

        Ok(Host::Domain(DomainName::new(raw)?))
    }

    /// The validated host string: the literal for addresses, the
    /// normalized ASCII form for domains.
    pub fn raw_string(&self) -> &str {
        match self {
            Host::Ipv4Address(ip) => ip,
            Host::Domain(name) => name.as_str(),
        }
    }

    /// True for the IPv4 literal variant.
    pub fn is_ip(&self) -> bool {
        matches!(self, Host::Ipv4Address(_))
    }
}

impl FromStr for Host {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw_string())
    }
}
