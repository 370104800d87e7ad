//! DNS-over-HTTPS strategy backed by the Google DNS JSON API.
//!
//! Queries `https://dns.google/resolve?name=<host>&type=1` and substitutes
//! the first A record into the URL being loaded. The HTTPS GET itself goes
//! through the [`DohTransport`] seam so the embedder supplies whatever HTTP
//! stack it already has; this module owns only the wire format.

use super::resolve::{url_with_ip_host, DnsError, ResolutionStrategy, Resolving};
use futures::future::BoxFuture;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use url::Url;

/// DNS RR type number for an A record.
const RR_TYPE_A: u16 = 1;
/// RCODE 0 (NOERROR) in the JSON API's `Status` field.
const STATUS_NOERROR: u16 = 0;

/// Performs the HTTPS GET for a DoH query. Implemented by the embedder; the
/// returned string is the raw JSON response body.
pub trait DohTransport: Send + Sync {
    fn fetch(&self, url: Url) -> BoxFuture<'static, Result<String, DnsError>>;
}

/// One resource record in a Google DNS JSON answer.
#[derive(Debug, Deserialize)]
struct DnsAnswer {
    #[serde(rename = "type")]
    rr_type: u16,
    data: String,
}

/// The subset of the Google DNS JSON response the strategy consumes.
#[derive(Debug, Deserialize)]
struct DnsResponse {
    #[serde(rename = "Status")]
    status: u16,
    #[serde(rename = "Answer", default)]
    answer: Vec<DnsAnswer>,
}

/// Resolution strategy speaking the Google DNS JSON API.
pub struct GoogleDnsStrategy {
    endpoint: Url,
    transport: Arc<dyn DohTransport>,
}

impl GoogleDnsStrategy {
    /// Creates a strategy against the public `dns.google` endpoint.
    pub fn new(transport: Arc<dyn DohTransport>) -> Self {
        let endpoint = Url::parse("https://dns.google/resolve")
            .expect("well-known endpoint parses");
        Self {
            endpoint,
            transport,
        }
    }

    /// Creates a strategy against a custom JSON-API endpoint.
    pub fn with_endpoint(endpoint: Url, transport: Arc<dyn DohTransport>) -> Self {
        Self {
            endpoint,
            transport,
        }
    }

    /// Builds the query URL for one hostname.
    fn query_url(&self, host: &str) -> Url {
        let mut query = self.endpoint.clone();
        query
            .query_pairs_mut()
            .append_pair("name", host)
            .append_pair("type", &RR_TYPE_A.to_string());
        query
    }

    /// Picks the first A-record address out of a decoded response.
    fn first_address(host: &str, response: DnsResponse) -> Result<Ipv4Addr, DnsError> {
        if response.status != STATUS_NOERROR {
            return Err(DnsError::ServerFailure(response.status));
        }
        response
            .answer
            .iter()
            .filter(|a| a.rr_type == RR_TYPE_A)
            .find_map(|a| a.data.parse::<Ipv4Addr>().ok())
            .ok_or_else(|| DnsError::NoRecords(host.to_owned()))
    }
}

impl ResolutionStrategy for GoogleDnsStrategy {
    fn resolve(&self, url: Url) -> Resolving {
        let transport = self.transport.clone();
        let host = url.host_str().map(str::to_owned);
        let query = host.as_deref().map(|h| self.query_url(h));

        Box::pin(async move {
            let host = host.ok_or(DnsError::MissingHost)?;
            let query = query.ok_or(DnsError::MissingHost)?;

            tracing::debug!(host = %host, "resolving via doh json api");
            let body = transport.fetch(query).await?;
            let response: DnsResponse = serde_json::from_str(&body)?;
            let ip = Self::first_address(&host, response)?;

            tracing::debug!(host = %host, ip = %ip, "doh resolution complete");
            url_with_ip_host(&url, IpAddr::V4(ip))
        })
    }
}

impl std::fmt::Debug for GoogleDnsStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDnsStrategy")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}
