//! The realized request handed to the WebView.

use crate::urlinfo::URLInfo;
use url::Url;

/// A navigable request: the URL the WebView should actually fetch plus the
/// [`URLInfo`] that keeps the human-readable hostname view.
///
/// When DoH resolution ran, `url` carries an IP-literal host while `info`
/// still reports the hostname for the address bar and history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    url: Url,
    info: URLInfo,
}

impl NavigationRequest {
    pub fn new(url: Url, info: URLInfo) -> Self {
        Self { url, info }
    }

    /// The URL to fetch, possibly IP-substituted.
    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The hostname-preserving URL data.
    #[inline]
    pub fn info(&self) -> &URLInfo {
        &self.info
    }

    /// Builds a platform request for the fetch URL.
    pub fn to_http(&self) -> Result<http::Request<()>, http::Error> {
        http::Request::builder()
            .method(http::Method::GET)
            .uri(self.url.as_str())
            .body(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_http() {
        let url = Url::parse("https://example.com/a?b=c").unwrap();
        let info = URLInfo::from_url(&url).unwrap();
        let request = NavigationRequest::new(url, info);

        let http = request.to_http().unwrap();
        assert_eq!(http.method(), http::Method::GET);
        assert_eq!(http.uri(), "https://example.com/a?b=c");
    }
}
