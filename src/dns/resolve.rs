//! Core resolution types and traits.
//!
//! This module defines the [`ResolutionStrategy`] trait and supporting
//! types that form the seam between the navigation pipeline and whatever
//! actually answers DNS questions.

use crate::host::Host;
use std::{collections::HashMap, fmt, future::Future, net::IpAddr, pin::Pin, sync::Arc};
use thiserror::Error;
use url::Url;

/// Errors produced by resolution strategies.
#[derive(Debug, Error)]
pub enum DnsError {
    #[error("url has no host component")]
    MissingHost,
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed resolver response: {0}")]
    BadResponse(#[from] serde_json::Error),
    #[error("resolver answered with status {0}")]
    ServerFailure(u16),
    #[error("no address records for {0}")]
    NoRecords(String),
    #[error("resolved url could not be recomposed")]
    UrlRewriteFailed,
}

/// Alias for the `Future` type returned by a resolution strategy.
pub type Resolving = Pin<Box<dyn Future<Output = Result<Url, DnsError>> + Send>>;

/// Trait for URL-level DNS resolution.
///
/// A strategy consumes a URL and yields the same URL with its host replaced
/// by a resolved IP literal; every other component is preserved. The single
/// boxed-future contract is the one cancellable-async seam of the page-load
/// pipeline: callers spawn the future and abort the task to cancel.
///
/// # Design Notes
///
/// - Resolution is assumed to always be ready (no backpressure).
/// - Uses `&self` for concurrent resolution without mutable access.
/// - Returns boxed futures for trait object compatibility.
pub trait ResolutionStrategy: Send + Sync {
    /// Resolves the URL's host and returns the URL with an IP-literal host.
    fn resolve(&self, url: Url) -> Resolving;

    /// Whether this strategy can resolve the given host at all.
    ///
    /// The default declines IP literals (nothing to resolve), single-label
    /// names, and mDNS `.local` names, which public DoH endpoints cannot
    /// answer.
    fn supports(&self, host: &Host) -> bool {
        if host.is_ip() {
            return false;
        }
        let raw = host.raw_string();
        raw.contains('.') && !raw.ends_with(".local")
    }
}

/// Blanket implementation for Arc-wrapped strategies.
impl<S: ResolutionStrategy + ?Sized> ResolutionStrategy for Arc<S> {
    fn resolve(&self, url: Url) -> Resolving {
        (**self).resolve(url)
    }

    fn supports(&self, host: &Host) -> bool {
        (**self).supports(host)
    }
}

/// Returns `url` with its host swapped for `ip`, preserving scheme, port,
/// path, and query.
pub fn url_with_ip_host(url: &Url, ip: IpAddr) -> Result<Url, DnsError> {
    let mut resolved = url.clone();
    resolved
        .set_ip_host(ip)
        .map_err(|()| DnsError::UrlRewriteFailed)?;
    Ok(resolved)
}

/// Strategy wrapper that consults a hostname-to-address map before asking
/// the inner strategy.
///
/// Useful for:
/// - Testing without real DNS
/// - Forcing specific IPs for certain domains
/// - Local development with custom hostnames
pub struct StrategyWithOverrides {
    inner: Arc<dyn ResolutionStrategy>,
    overrides: Arc<HashMap<String, IpAddr>>,
}

impl StrategyWithOverrides {
    /// Creates a new strategy with the given overrides.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fallback strategy for non-overridden hostnames.
    /// * `overrides` - Map of hostnames to their resolved addresses.
    pub fn new(inner: Arc<dyn ResolutionStrategy>, overrides: HashMap<String, IpAddr>) -> Self {
        Self {
            inner,
            overrides: Arc::new(overrides),
        }
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl ResolutionStrategy for StrategyWithOverrides {
    fn resolve(&self, url: Url) -> Resolving {
        let host = url.host_str().map(str::to_owned);
        if let Some(ip) = host.and_then(|h| self.overrides.get(&h).copied()) {
            return Box::pin(std::future::ready(url_with_ip_host(&url, ip)));
        }
        self.inner.resolve(url)
    }

    fn supports(&self, host: &Host) -> bool {
        self.overrides.contains_key(host.raw_string()) || self.inner.supports(host)
    }
}

impl fmt::Debug for StrategyWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    struct MockStrategy {
        ip: IpAddr,
    }

    impl ResolutionStrategy for MockStrategy {
        fn resolve(&self, url: Url) -> Resolving {
            let ip = self.ip;
            Box::pin(async move { url_with_ip_host(&url, ip) })
        }
    }

    #[test]
    fn test_url_host_swap_preserves_components() {
        let url = Url::parse("https://example.com:8443/a/b?q=1").unwrap();
        let resolved = url_with_ip_host(&url, IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4))).unwrap();
        assert_eq!(resolved.as_str(), "https://1.2.3.4:8443/a/b?q=1");
    }

    #[test]
    fn test_default_eligibility() {
        let strategy = MockStrategy {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        assert!(strategy.supports(&Host::new("example.com").unwrap()));
        assert!(!strategy.supports(&Host::new("192.168.1.1").unwrap()));
        assert!(!strategy.supports(&Host::new("localhost").unwrap()));
        assert!(!strategy.supports(&Host::new("printer.local").unwrap()));
    }

    #[tokio::test]
    async fn test_override_hit() {
        let mock = Arc::new(MockStrategy {
            ip: IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
        });
        let mut overrides = HashMap::new();
        overrides.insert(
            "override.example".to_owned(),
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        );

        let strategy = StrategyWithOverrides::new(mock, overrides);
        let resolved = strategy
            .resolve(Url::parse("https://override.example/x").unwrap())
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "https://127.0.0.1/x");
    }

    #[tokio::test]
    async fn test_override_miss_falls_through() {
        let mock = Arc::new(MockStrategy {
            ip: IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)),
        });
        let strategy = StrategyWithOverrides::new(mock, HashMap::new());
        let resolved = strategy
            .resolve(Url::parse("https://example.com/").unwrap())
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "https://8.8.8.8/");
    }
}
