//! System resolver strategy backed by hickory-dns.
//!
//! Fully async resolution without DoH: used when the DNS-over-HTTPS flag is
//! off for the strategy slot, or as a fallback strategy in embedders that
//! want IP substitution without a public JSON API dependency.

use super::resolve::{url_with_ip_host, DnsError, ResolutionStrategy, Resolving};
use hickory_resolver::{
    config::{LookupIpStrategy, ResolverConfig},
    name_server::TokioConnectionProvider,
    TokioResolver,
};
use std::sync::LazyLock;

/// Resolution strategy using the system's DNS configuration via hickory.
///
/// The underlying resolver is lazily initialized on first use and shared
/// across all instances via a static `LazyLock`. It automatically configures
/// itself based on the system's DNS settings.
#[derive(Debug, Clone)]
pub struct HickoryStrategy {
    resolver: &'static LazyLock<TokioResolver>,
}

impl HickoryStrategy {
    /// Creates a new `HickoryStrategy`.
    ///
    /// The underlying resolver is lazily initialized on first DNS query.
    /// It will attempt to read system DNS configuration; if that fails,
    /// it falls back to sensible defaults.
    pub fn new() -> Self {
        static RESOLVER: LazyLock<TokioResolver> = LazyLock::new(|| {
            let mut builder = match TokioResolver::builder_tokio() {
                Ok(builder) => {
                    tracing::debug!("Using system DNS configuration");
                    builder
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Failed to read system DNS config, using defaults"
                    );
                    TokioResolver::builder_with_config(
                        ResolverConfig::default(),
                        TokioConnectionProvider::default(),
                    )
                }
            };

            // Dual-stack lookup; IPv4 answers are preferred below.
            builder.options_mut().ip_strategy = LookupIpStrategy::Ipv4AndIpv6;

            builder.build()
        });

        Self {
            resolver: &RESOLVER,
        }
    }
}

impl Default for HickoryStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionStrategy for HickoryStrategy {
    fn resolve(&self, url: url::Url) -> Resolving {
        let strategy = self.clone();
        Box::pin(async move {
            let host = url
                .host_str()
                .map(str::to_owned)
                .ok_or(DnsError::MissingHost)?;
            tracing::debug!(domain = %host, "resolving via hickory-dns");

            let lookup = strategy.resolver.lookup_ip(&host).await.map_err(|e| {
                tracing::debug!(domain = %host, error = %e, "hickory-dns lookup failed");
                DnsError::Transport(e.to_string())
            })?;

            let ip = lookup
                .iter()
                .find(|ip| ip.is_ipv4())
                .or_else(|| lookup.iter().next())
                .ok_or_else(|| DnsError::NoRecords(host.clone()))?;

            tracing::debug!(domain = %host, ip = %ip, "hickory-dns resolution complete");
            url_with_ip_host(&url, ip)
        })
    }
}
