//! DNS domain name validation and normalization.

use super::punycode;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced by [`DomainName`] construction.
///
/// The first violated rule wins; a failed construction never yields a
/// partially-valid value.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("domain name is empty")]
    EmptyString,
    #[error("domain name starts with a dot")]
    DotAtBeginning,
    #[error("domain name contains consecutive dots")]
    DoubleDots,
    #[error("domain name length {0} is outside 1..=253")]
    WrongLength(usize),
    #[error("label could not be punycode-encoded")]
    PunycodingFailed,
    #[error("label length {0} exceeds 63 octets")]
    WrongPartSize(usize),
}

/// A validated, punycode-normalized DNS domain name.
///
/// Construction validates DNS name syntax and converts every non-ASCII
/// label to its `xn--` ACE form. ASCII-only labels pass through verbatim;
/// the raw punycode algorithm is never applied to them because it would
/// append a spurious trailing delimiter.
///
/// Values are immutable and cheap to clone.
///
/// # Example
///
/// ```
/// use pagenet::host::DomainName;
///
/// let name = DomainName::new("bücher.example").unwrap();
/// assert_eq!(name.as_str(), "xn--bcher-kva.example");
/// assert_eq!(name.original(), "bücher.example");
/// ```
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct DomainName {
    original: Box<str>,
    ascii: Box<str>,
}

/// Total length bounds for a DNS name, in octets.
const MAX_NAME_LENGTH: usize = 253;
/// Maximum octets in one label after punycode conversion.
const MAX_LABEL_LENGTH: usize = 63;

impl DomainName {
    /// Validates `raw` and produces a normalized domain name.
    ///
    /// Validation order: non-empty, no leading dot, no `..`, total length
    /// 1..=253, per-label punycode conversion, per-label length <= 63.
    pub fn new(raw: &str) -> Result<Self, DomainNameError> {
        if raw.is_empty() {
            return Err(DomainNameError::EmptyString);
        }
        if raw.starts_with('.') {
            return Err(DomainNameError::DotAtBeginning);
        }
        if raw.contains("..") {
            return Err(DomainNameError::DoubleDots);
        }
        let len = raw.len();
        if len > MAX_NAME_LENGTH {
            return Err(DomainNameError::WrongLength(len));
        }

        let mut labels = Vec::new();
        for label in raw.split('.') {
            let converted = if label.is_ascii() {
                label.to_owned()
            } else {
                let encoded =
                    punycode::encode(label).ok_or(DomainNameError::PunycodingFailed)?;
                format!("xn--{encoded}")
            };
            if converted.len() > MAX_LABEL_LENGTH {
                return Err(DomainNameError::WrongPartSize(converted.len()));
            }
            labels.push(converted);
        }

        Ok(Self {
            original: raw.into(),
            ascii: labels.join(".").into(),
        })
    }

    /// The normalized ASCII form, labels rejoined with `.`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.ascii
    }

    /// The input string the name was constructed from.
    #[inline]
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for DomainName {
    type Err = DomainNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.ascii, f)
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.ascii, f)
    }
}
