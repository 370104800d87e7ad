//! Site records and per-tab browsing settings.
//!
//! A [`Site`] is the read-only input the tab-management layer hands to the
//! page-load core: a validated URL plus the toggles the user set for that
//! tab. The core never mutates either; setting changes produce fresh values.

use crate::urlinfo::{URLInfo, UrlInfoError};
use url::Url;

/// Per-tab browsing toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteSettings {
    /// Private (ephemeral) browsing mode.
    pub is_private: bool,
    /// Block window.open-style popups.
    pub block_popups: bool,
    /// JavaScript execution enabled.
    pub js_enabled: bool,
    /// JS plugin injection enabled.
    pub can_load_plugins: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            is_private: false,
            block_popups: true,
            js_enabled: true,
            can_load_plugins: true,
        }
    }
}

impl SiteSettings {
    /// Copy of these settings with the JavaScript toggle replaced.
    pub fn with_js_enabled(self, enabled: bool) -> Self {
        Self {
            js_enabled: enabled,
            ..self
        }
    }
}

/// An application-level record pairing a URL with its tab settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    url_info: URLInfo,
    title: Option<String>,
    settings: SiteSettings,
}

impl Site {
    /// Creates a site from an already-validated URL.
    pub fn new(url_info: URLInfo, settings: SiteSettings) -> Self {
        Self {
            url_info,
            title: None,
            settings,
        }
    }

    /// Parses and validates `raw` into a site.
    pub fn from_url_str(raw: &str, settings: SiteSettings) -> Result<Self, UrlInfoError> {
        let url = Url::parse(raw)?;
        Ok(Self::new(URLInfo::from_url(&url)?, settings))
    }

    /// Copy of this site with a display title attached.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    #[inline]
    pub fn url_info(&self) -> &URLInfo {
        &self.url_info
    }

    #[inline]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[inline]
    pub fn settings(&self) -> SiteSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_str() {
        let site = Site::from_url_str("https://example.com/", SiteSettings::default()).unwrap();
        assert_eq!(site.url_info().url().as_str(), "https://example.com/");
        assert!(site.settings().js_enabled);
    }

    #[test]
    fn test_with_js_enabled_is_a_copy() {
        let settings = SiteSettings::default();
        let disabled = settings.with_js_enabled(false);
        assert!(settings.js_enabled);
        assert!(!disabled.js_enabled);
        assert_eq!(settings.block_popups, disabled.block_popups);
    }

    #[test]
    fn test_invalid_host_rejected() {
        assert!(Site::from_url_str("https://exa mple.com/", SiteSettings::default()).is_err());
    }
}
