//! # pagenet
//!
//! A browser-inspired page-load orchestration library for Rust.
//!
//! `pagenet` implements the resolution core that sits between a browser's
//! address bar and its WebView: hostname validation, IDNA punycode encoding,
//! privacy-preserving DNS-over-HTTPS resolution, and the navigation state
//! machine that drives a page load from a `Site` to a concrete request.
//!
//! ## Features
//!
//! - **Domain Validation**: RFC-compliant DNS name syntax with typed errors
//! - **Punycode**: bit-exact RFC 3492 bootstring encoder and decoder
//! - **Host Classification**: strict IPv4 literal vs. domain-name sum type
//! - **Canonical URLs**: IP substitution that never leaks into the display URL
//! - **DoH Resolution**: pluggable strategies (Google DNS JSON API, system)
//! - **Navigation Pipeline**: closed state machine with strict transitions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagenet::navigation::PageLoadJob;
//! use pagenet::site::{Site, SiteSettings};
//!
//! #[tokio::main]
//! async fn main() {
//!     let site = Site::from_url_str("https://example.com", SiteSettings::default()).unwrap();
//!     let mut job = PageLoadJob::new(site, plugins, features, strategy, webview);
//!     job.load_site().await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`host`] - Domain name validation, punycode, and host classification
//! - [`urlinfo`] - Canonical URL composition with resolved-IP substitution
//! - [`site`] - Site records and per-tab browsing settings
//! - [`features`] - Injected feature-flag source
//! - [`plugins`] - JavaScript plugin descriptors and evaluation handles
//! - [`dns`] - Resolution strategies and the DoH wire format
//! - [`navigation`] - The page-load state machine and its driver
//!
//! ## Privacy
//!
//! When DNS-over-HTTPS is enabled, the request handed to the WebView carries
//! an IP-literal host so the hostname never appears in a plaintext DNS query,
//! while every user-facing accessor keeps reporting the original hostname.

pub mod dns;
pub mod features;
pub mod host;
pub mod navigation;
pub mod plugins;
pub mod site;
pub mod urlinfo;
