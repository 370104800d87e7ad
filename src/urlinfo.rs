//! Canonical URL composition with resolved-IP substitution.
//!
//! [`URLInfo`] pairs a validated [`DomainName`] with the rest of a URL's
//! components and, optionally, the IP address a resolver produced for that
//! domain. The canonical URL is computed once at construction and never
//! reflects the IP: display surfaces (address bar, history, logs) keep the
//! human-readable hostname, and only the explicitly IP-aware accessor
//! substitutes the address for the early-connection privacy path.

use crate::host::{self, DomainName, Host, HostError};
use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors produced when deriving a [`URLInfo`] from a platform URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlInfoError {
    #[error("url has no host component")]
    MissingHost,
    #[error("invalid host: {0}")]
    InvalidHost(#[from] HostError),
    #[error("url could not be recomposed: {0}")]
    Malformed(#[from] url::ParseError),
}

/// A URL whose host has passed domain validation, with an optional
/// resolver-provided IP address riding alongside.
///
/// Instances are immutable; "setting" the IP address produces a fresh value
/// sharing every other component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct URLInfo {
    canonical: Url,
    domain: DomainName,
    ip_address: Option<IpAddr>,
}

impl URLInfo {
    /// Composes a canonical URL from parts.
    ///
    /// The path is rooted if it does not already start with `/`; the port
    /// is included only when given (default scheme ports are normalized
    /// away by the `url` crate).
    pub fn new(
        scheme: &str,
        domain: DomainName,
        path: &str,
        query: Option<&str>,
        port: Option<u16>,
    ) -> Result<Self, UrlInfoError> {
        let mut raw = format!("{scheme}://{}", domain.as_str());
        if let Some(port) = port {
            raw.push(':');
            raw.push_str(&port.to_string());
        }
        if !path.starts_with('/') {
            raw.push('/');
        }
        raw.push_str(path);
        if let Some(query) = query {
            raw.push('?');
            raw.push_str(query);
        }

        Ok(Self {
            canonical: Url::parse(&raw)?,
            domain,
            ip_address: None,
        })
    }

    /// Derives a [`URLInfo`] from an already-parsed platform URL.
    pub fn from_url(url: &Url) -> Result<Self, UrlInfoError> {
        let raw_host = url.host_str().ok_or(UrlInfoError::MissingHost)?;
        let domain = match Host::new(raw_host)? {
            Host::Domain(domain) => domain,
            // Dotted-quad hosts still satisfy domain syntax; keep the
            // literal so the canonical URL round-trips.
            Host::Ipv4Address(ip) => DomainName::new(&ip).map_err(HostError::from)?,
        };

        Ok(Self {
            canonical: url.clone(),
            domain,
            ip_address: None,
        })
    }

    /// The canonical URL. Never contains a substituted IP address.
    #[inline]
    pub fn url(&self) -> &Url {
        &self.canonical
    }

    /// The canonical URL with the host replaced by the resolved IP, or the
    /// canonical URL unchanged when no address is known.
    ///
    /// Scheme, port, path, and query are preserved.
    pub fn url_with_resolved_domain(&self) -> Url {
        let Some(ip) = self.ip_address else {
            return self.canonical.clone();
        };
        let mut resolved = self.canonical.clone();
        if resolved.set_ip_host(ip).is_err() {
            tracing::warn!(url = %self.canonical, "could not substitute ip host");
            return self.canonical.clone();
        }
        resolved
    }

    /// Returns a new value with the resolved address attached; the
    /// receiver is left untouched.
    pub fn with_ip_address(&self, ip: IpAddr) -> Self {
        Self {
            canonical: self.canonical.clone(),
            domain: self.domain.clone(),
            ip_address: Some(ip),
        }
    }

    /// Re-wraps the stored domain as a [`Host`], reclassifying dotted-quad
    /// literals as addresses. Total: validated input cannot fail here.
    pub fn host(&self) -> Host {
        if host::is_ipv4_literal(self.domain.as_str()) {
            Host::Ipv4Address(self.domain.as_str().to_owned())
        } else {
            Host::Domain(self.domain.clone())
        }
    }

    /// The validated domain name.
    #[inline]
    pub fn domain(&self) -> &DomainName {
        &self.domain
    }

    /// The resolver-provided address, if any.
    #[inline]
    pub fn ip_address(&self) -> Option<IpAddr> {
        self.ip_address
    }

    /// The URL scheme.
    #[inline]
    pub fn scheme(&self) -> &str {
        self.canonical.scheme()
    }

    /// The explicit port, if the canonical URL carries one.
    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.canonical.port()
    }
}
