//! The page-load driver.
//!
//! [`PageLoadJob`] owns one tab's [`NavigationState`] and walks it through
//! the pipeline, consulting the injected collaborators between transitions:
//! plugins source, feature flags, resolution strategy, and the WebView
//! delegate. One job per tab; all calls must come from that tab's single
//! owner, the job is `&mut self` throughout and never shared.
//!
//! Only the resolution step suspends. It runs as a spawned task so that a
//! caller abandoning the driving future leaves an abortable handle behind:
//! the next navigation entry point aborts the stale task and the state
//! machine rewinds the abandoned load to the head of the pipeline.

use super::request::NavigationRequest;
use super::state::{NavigationAction, NavigationError, NavigationState};
use crate::dns::ResolutionStrategy;
use crate::features::FeatureSource;
use crate::plugins::{JsHandle, PluginsProgram, PluginsSource};
use crate::site::Site;
use crate::urlinfo::URLInfo;
use std::sync::Arc;
use tokio::task::AbortHandle;
use url::Url;

/// The WebView collaborator, implemented by the embedder.
pub trait WebViewDelegate: Send + Sync {
    /// Begin navigating to the given request.
    fn load(&self, request: &NavigationRequest);
    /// Attach a plugin program before the upcoming navigation.
    fn inject_plugins(&self, program: &PluginsProgram);
    /// Re-display current content.
    fn reload(&self);
    /// Navigate back in history.
    fn go_back(&self);
    /// Navigate forward in history.
    fn go_forward(&self);
    /// Apply a changed JavaScript toggle to the live page.
    fn apply_js(&self, handle: &JsHandle, enabled: bool);
}

/// Drives one tab's page loads.
pub struct PageLoadJob {
    state: NavigationState,
    plugins: Arc<dyn PluginsSource>,
    features: Arc<dyn FeatureSource>,
    strategy: Arc<dyn ResolutionStrategy>,
    webview: Arc<dyn WebViewDelegate>,
    inflight: Option<AbortHandle>,
}

impl PageLoadJob {
    pub fn new(
        site: Site,
        plugins: Arc<dyn PluginsSource>,
        features: Arc<dyn FeatureSource>,
        strategy: Arc<dyn ResolutionStrategy>,
        webview: Arc<dyn WebViewDelegate>,
    ) -> Self {
        Self {
            state: NavigationState::Initialized(site),
            plugins,
            features,
            strategy,
            webview,
            inflight: None,
        }
    }

    /// The current state, for display accessors and tests.
    #[inline]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Starts loading the site the job was created with.
    ///
    /// If a previous load was abandoned mid-resolution, its task is aborted
    /// and this load supersedes it.
    pub async fn load_site(&mut self) -> Result<(), NavigationError> {
        self.cancel_inflight();
        self.apply(NavigationAction::LoadSite)?;
        self.run_pipeline().await
    }

    /// Starts loading an in-page link activated from the viewed page.
    pub async fn load_next_link(&mut self, info: URLInfo) -> Result<(), NavigationError> {
        self.cancel_inflight();
        self.apply(NavigationAction::LoadNextLink(info))?;
        self.run_pipeline().await
    }

    /// Re-displays the current content.
    pub fn reload(&mut self) -> Result<(), NavigationError> {
        self.cancel_inflight();
        self.apply(NavigationAction::Reload)?;
        self.webview.reload();
        Ok(())
    }

    /// Navigates back in history.
    pub fn go_back(&mut self) -> Result<(), NavigationError> {
        self.cancel_inflight();
        self.apply(NavigationAction::GoBack)?;
        self.webview.go_back();
        Ok(())
    }

    /// Navigates forward in history.
    pub fn go_forward(&mut self) -> Result<(), NavigationError> {
        self.cancel_inflight();
        self.apply(NavigationAction::GoForward)?;
        self.webview.go_forward();
        Ok(())
    }

    /// Called by the WebView when navigation completed.
    pub fn finish_loading(
        &mut self,
        final_url: Url,
        js_handle: JsHandle,
        js_enabled: bool,
    ) -> Result<(), NavigationError> {
        self.apply(NavigationAction::FinishLoading {
            final_url,
            js_handle,
            js_enabled,
        })
    }

    /// Settles a finished load into stable viewing.
    pub fn start_view(&mut self) -> Result<(), NavigationError> {
        self.apply(NavigationAction::StartView)
    }

    /// Applies a changed JavaScript toggle; a toggle to the current value
    /// is a no-op and the delegate is not notified.
    pub fn change_javascript(
        &mut self,
        handle: JsHandle,
        enabled: bool,
    ) -> Result<(), NavigationError> {
        self.apply(NavigationAction::ChangeJavaScript {
            handle: handle.clone(),
            enabled,
        })?;
        if matches!(self.state, NavigationState::UpdatingJs(..)) {
            self.webview.apply_js(&handle, enabled);
        }
        Ok(())
    }

    fn apply(&mut self, action: NavigationAction) -> Result<(), NavigationError> {
        self.state = self.state.clone().transition(action)?;
        tracing::debug!(state = self.state.name(), "transitioned");
        Ok(())
    }

    fn cancel_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            tracing::debug!("aborting abandoned resolution");
            handle.abort();
        }
    }

    /// Walks synchronous stages until the pipeline needs an external
    /// signal, running the one asynchronous stage (resolution) in between.
    async fn run_pipeline(&mut self) -> Result<(), NavigationError> {
        loop {
            // What to do next is decided against a shared borrow of the
            // state; the state is only replaced once the borrow ends.
            let step = match &self.state {
                NavigationState::PendingPlugins(info, settings) => {
                    let program = if settings.can_load_plugins {
                        self.plugins.plugins_for(&info.host(), settings)
                    } else {
                        None
                    };
                    Step::Apply(NavigationAction::InjectPlugins(program))
                }
                NavigationState::InjectingPlugins(program, _, _) => {
                    self.webview.inject_plugins(program);
                    Step::Apply(NavigationAction::FetchDohStatus)
                }
                NavigationState::PendingDohStatus(..) => {
                    Step::Apply(NavigationAction::ResolveDomainName(self.features.doh_enabled()))
                }
                NavigationState::CheckingResolveSupport(info, _) => {
                    let needed =
                        info.ip_address().is_none() && self.strategy.supports(&info.host());
                    Step::Apply(NavigationAction::CheckResolveSupport(needed))
                }
                NavigationState::ResolvingDomainName(info, _) => Step::Resolve(info.url().clone()),
                NavigationState::CreatingRequest(url, info, _) => {
                    Step::Request(url.clone(), info.clone())
                }
                // Everything else waits for an external signal
                // (finish_loading / start_view / a navigation action).
                _ => Step::Wait,
            };

            match step {
                Step::Apply(action) => self.apply(action)?,
                Step::Resolve(original) => {
                    let url = self.resolve_or_fallback(original).await;
                    self.apply(NavigationAction::CreateRequestAnyway(url))?;
                }
                Step::Request(url, info) => {
                    let request = NavigationRequest::new(url, info);
                    self.apply(NavigationAction::LoadWebView(request.clone()))?;
                    self.webview.load(&request);
                }
                Step::Wait => return Ok(()),
            }
        }
    }

    /// Runs the resolution strategy for `url` as an abortable task.
    ///
    /// Returns the resolved URL, or `url` unchanged on any resolution
    /// error (DoH is an enhancement, never a reason to fail the load). The
    /// abort handle only fires when the caller abandons the driving future;
    /// this method never resumes afterwards, so a completed await is always
    /// current.
    async fn resolve_or_fallback(&mut self, url: Url) -> Url {
        let task = tokio::spawn(self.strategy.resolve(url.clone()));
        self.inflight = Some(task.abort_handle());
        let outcome = task.await;
        self.inflight = None;

        match outcome {
            Ok(Ok(resolved)) => resolved,
            Ok(Err(e)) => {
                tracing::warn!(url = %url, error = %e, "resolution failed, loading unresolved url");
                url
            }
            Err(join) => {
                tracing::warn!(url = %url, error = %join, "resolution task failed");
                url
            }
        }
    }
}

/// One iteration of the pipeline loop.
enum Step {
    Apply(NavigationAction),
    Resolve(Url),
    Request(Url, URLInfo),
    Wait,
}

impl Drop for PageLoadJob {
    // A resolution must not outlive its tab.
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}
