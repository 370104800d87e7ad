//! JavaScript plugin descriptors and evaluation handles.
//!
//! Plugins are small scripts injected into a page before navigation (ad-block
//! cosmetic filters, instance-specific shims, and so on). The core only
//! needs their ordered list and an opaque handle through which the WebView
//! evaluates JavaScript; loading and caching the scripts belongs to the
//! embedder.

use crate::host::Host;
use crate::site::SiteSettings;
use std::fmt;
use std::sync::Arc;

/// One injectable script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsPlugin {
    pub name: String,
    pub script: String,
}

impl JsPlugin {
    pub fn new(name: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: script.into(),
        }
    }
}

/// A non-empty, ordered set of plugins to inject for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginsProgram {
    plugins: Vec<JsPlugin>,
}

impl PluginsProgram {
    /// Returns `None` for an empty list: the pipeline treats "no plugins"
    /// and "empty program" identically, so an empty program cannot exist.
    pub fn new(plugins: Vec<JsPlugin>) -> Option<Self> {
        if plugins.is_empty() {
            None
        } else {
            Some(Self { plugins })
        }
    }

    pub fn plugins(&self) -> &[JsPlugin] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

/// Supplies the plugin program for a given host and settings.
///
/// Returning `None` (plugins disabled for the tab, or nothing matches the
/// host) makes the pipeline skip injection entirely.
pub trait PluginsSource: Send + Sync {
    fn plugins_for(&self, host: &Host, settings: &SiteSettings) -> Option<PluginsProgram>;
}

/// A source with no plugins at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPlugins;

impl PluginsSource for NoPlugins {
    fn plugins_for(&self, _host: &Host, _settings: &SiteSettings) -> Option<PluginsProgram> {
        None
    }
}

/// Evaluates JavaScript inside the WebView. Implemented by the embedder.
pub trait JsEvaluator: Send + Sync {
    fn evaluate(&self, script: &str);
}

/// Cloneable opaque handle to a WebView's JavaScript context.
#[derive(Clone)]
pub struct JsHandle {
    evaluator: Arc<dyn JsEvaluator>,
}

impl JsHandle {
    pub fn new(evaluator: Arc<dyn JsEvaluator>) -> Self {
        Self { evaluator }
    }

    pub fn evaluate(&self, script: &str) {
        self.evaluator.evaluate(script);
    }
}

impl fmt::Debug for JsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsHandle").finish_non_exhaustive()
    }
}
