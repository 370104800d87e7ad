//! Injected feature-flag source.
//!
//! The page-load pipeline consults exactly one flag: whether DNS-over-HTTPS
//! is enabled. The source is a constructed, injected collaborator rather
//! than ambient global state, so tests and embedders can swap it freely.

/// Read access to the feature flags the page-load core consults.
pub trait FeatureSource: Send + Sync {
    /// Whether DNS-over-HTTPS resolution is enabled.
    fn doh_enabled(&self) -> bool;
}

/// Plain value-backed flag source, constructed once at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct Features {
    pub doh_enabled: bool,
}

impl Features {
    pub fn new(doh_enabled: bool) -> Self {
        Self { doh_enabled }
    }
}

impl FeatureSource for Features {
    fn doh_enabled(&self) -> bool {
        self.doh_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_backed_source() {
        assert!(Features::new(true).doh_enabled());
        assert!(!Features::default().doh_enabled());
    }
}
