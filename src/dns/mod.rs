//! DNS Resolution Module
//!
//! Provides pluggable URL-level resolution with support for:
//! - DNS-over-HTTPS via the Google DNS JSON API
//! - System resolver via hickory-dns
//! - Hostname-to-IP override mechanism
//!
//! # Architecture
//!
//! The [`ResolutionStrategy`] trait is the core abstraction: a strategy
//! takes the URL being loaded and returns the same URL with its host
//! replaced by a resolved IP literal. Strategies are interchangeable and
//! the navigation pipeline treats any strategy error as "load with the
//! original URL" rather than a page failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagenet::dns::{GoogleDnsStrategy, ResolutionStrategy};
//!
//! let strategy = GoogleDnsStrategy::new(transport);
//! let resolved = strategy.resolve(url).await?;
//! ```

mod google;
mod hickory;
mod resolve;

pub use google::{DohTransport, GoogleDnsStrategy};
pub use hickory::HickoryStrategy;
pub use resolve::{
    url_with_ip_host, DnsError, ResolutionStrategy, Resolving, StrategyWithOverrides,
};
