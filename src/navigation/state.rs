//! The page-load state machine.
//!
//! [`NavigationState`] is a closed tagged union covering every phase of a
//! page load, from a freshly-triggered `Site` to a stable `Viewing` page.
//! Transitions are pure: `state.transition(action)` consumes the current
//! state and returns the next one, or an [`NavigationError`] when the
//! (state, action) pair is not in the table. Nothing is ever mutated in
//! place and nothing is silently ignored; a misplaced action means the UI
//! and the core have desynchronized, and that must be loud.
//!
//! Every state answers [`url`](NavigationState::url),
//! [`host`](NavigationState::host), [`url_data`](NavigationState::url_data)
//! and [`settings`](NavigationState::settings) so display surfaces never
//! need to care which phase a tab is in.

use super::request::NavigationRequest;
use crate::host::Host;
use crate::plugins::{JsHandle, PluginsProgram};
use crate::site::{Site, SiteSettings};
use crate::urlinfo::URLInfo;
use thiserror::Error;
use url::Url;

/// Errors produced by [`NavigationState::transition`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    /// The requested action has no transition from the current state.
    /// Indicates a UI/core desynchronization, never a user error.
    #[error("action {action} is not applicable in state {state}")]
    UnexpectedStateForAction {
        state: &'static str,
        action: &'static str,
    },
}

/// An input to the state machine.
#[derive(Debug, Clone)]
pub enum NavigationAction {
    /// Begin loading the site a tab was initialized with.
    LoadSite,
    /// Begin loading an in-page link from a viewed page.
    LoadNextLink(URLInfo),
    /// Re-display the current content.
    Reload,
    /// Navigate back in history.
    GoBack,
    /// Navigate forward in history.
    GoForward,
    /// Plugin lookup finished; `None` skips injection.
    InjectPlugins(Option<PluginsProgram>),
    /// Plugin injection handed off; consult the DoH flag next.
    FetchDohStatus,
    /// DoH flag read; `true` means evaluate resolve eligibility.
    ResolveDomainName(bool),
    /// Eligibility evaluated; `true` means the host needs resolving.
    CheckResolveSupport(bool),
    /// Resolution finished (or failed); build a request for this URL.
    CreateRequestAnyway(Url),
    /// Hand the realized request to the WebView.
    LoadWebView(NavigationRequest),
    /// The WebView signaled navigation completion.
    FinishLoading {
        final_url: Url,
        js_handle: JsHandle,
        js_enabled: bool,
    },
    /// Settle into stable viewing.
    StartView,
    /// The JavaScript toggle changed while viewing.
    ChangeJavaScript { handle: JsHandle, enabled: bool },
}

impl NavigationAction {
    /// Stable action name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NavigationAction::LoadSite => "loadSite",
            NavigationAction::LoadNextLink(_) => "loadNextLink",
            NavigationAction::Reload => "reload",
            NavigationAction::GoBack => "goBack",
            NavigationAction::GoForward => "goForward",
            NavigationAction::InjectPlugins(_) => "injectPlugins",
            NavigationAction::FetchDohStatus => "fetchDoHStatus",
            NavigationAction::ResolveDomainName(_) => "resolveDomainName",
            NavigationAction::CheckResolveSupport(_) => "checkDNResolvingSupport",
            NavigationAction::CreateRequestAnyway(_) => "createRequestAnyway",
            NavigationAction::LoadWebView(_) => "loadWebView",
            NavigationAction::FinishLoading { .. } => "finishLoading",
            NavigationAction::StartView => "startView",
            NavigationAction::ChangeJavaScript { .. } => "changeJavaScript",
        }
    }
}

/// One phase of a page load. Each variant carries exactly the data that
/// phase needs; "updating" a state means replacing the whole value.
#[derive(Debug, Clone)]
pub enum NavigationState {
    /// Entry point: a tab's page load was triggered.
    Initialized(Site),
    /// Waiting for the plugin lookup.
    PendingPlugins(URLInfo, SiteSettings),
    /// A non-empty plugin program is being attached.
    InjectingPlugins(PluginsProgram, URLInfo, SiteSettings),
    /// Plugin decision made; waiting for the DoH feature flag.
    PendingDohStatus(URLInfo, SiteSettings),
    /// DoH is on; evaluating whether this host needs resolving.
    CheckingResolveSupport(URLInfo, SiteSettings),
    /// Resolution strategy invoked; the only asynchronous phase.
    ResolvingDomainName(URLInfo, SiteSettings),
    /// A concrete request is about to be built for the load URL. The
    /// `URLInfo` keeps the hostname view regardless of what the load
    /// URL's host is.
    CreatingRequest(Url, URLInfo, SiteSettings),
    /// Request handed to the WebView; navigation starting.
    UpdatingWebView(NavigationRequest, SiteSettings),
    /// Reload/back/forward re-entry, bypassing plugins and DoH since the
    /// content is already known-good.
    WaitingForNavigation(NavigationRequest, SiteSettings),
    /// The WebView signaled navigation completion.
    FinishingLoading {
        request: NavigationRequest,
        settings: SiteSettings,
        final_url: Url,
        js_handle: JsHandle,
        js_enabled: bool,
    },
    /// Stable state until the next navigation action.
    Viewing(NavigationRequest, SiteSettings),
    /// The JS toggle flipped mid-view; the WebView is re-evaluating.
    UpdatingJs(NavigationRequest, SiteSettings, JsHandle),
}

impl NavigationState {
    /// Stable state name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NavigationState::Initialized(_) => "initialized",
            NavigationState::PendingPlugins(..) => "pendingPlugins",
            NavigationState::InjectingPlugins(..) => "injectingPlugins",
            NavigationState::PendingDohStatus(..) => "pendingDoHStatus",
            NavigationState::CheckingResolveSupport(..) => "checkingDNResolveSupport",
            NavigationState::ResolvingDomainName(..) => "resolvingDN",
            NavigationState::CreatingRequest(..) => "creatingRequest",
            NavigationState::UpdatingWebView(..) => "updatingWebView",
            NavigationState::WaitingForNavigation(..) => "waitingForNavigation",
            NavigationState::FinishingLoading { .. } => "finishingLoading",
            NavigationState::Viewing(..) => "viewing",
            NavigationState::UpdatingJs(..) => "updatingJS",
        }
    }

    /// Applies `action`, producing the next state.
    ///
    /// Any (state, action) pair outside the transition table yields
    /// [`NavigationError::UnexpectedStateForAction`]. The failure is logged
    /// at error level before returning; the caller still owns the decision
    /// of what to do with a desynchronized UI.
    pub fn transition(self, action: NavigationAction) -> Result<Self, NavigationError> {
        use NavigationAction as A;
        use NavigationState as S;

        let next = match (self, action) {
            (S::Initialized(site), A::LoadSite) => {
                S::PendingPlugins(site.url_info().clone(), site.settings())
            }
            (S::Viewing(_, settings), A::LoadNextLink(info)) => S::PendingPlugins(info, settings),
            // A load abandoned mid-resolution (the caller dropped the driving
            // future) can be superseded by a fresh navigation.
            (S::ResolvingDomainName(info, settings), A::LoadSite) => {
                S::PendingPlugins(info, settings)
            }
            (S::ResolvingDomainName(_, settings), A::LoadNextLink(info)) => {
                S::PendingPlugins(info, settings)
            }
            (S::Viewing(request, settings), A::Reload | A::GoBack | A::GoForward) => {
                S::WaitingForNavigation(request, settings)
            }
            (S::PendingPlugins(info, settings), A::InjectPlugins(Some(program))) => {
                S::InjectingPlugins(program, info, settings)
            }
            (S::PendingPlugins(info, settings), A::InjectPlugins(None)) => {
                S::PendingDohStatus(info, settings)
            }
            (S::InjectingPlugins(_, info, settings), A::FetchDohStatus) => {
                S::PendingDohStatus(info, settings)
            }
            (S::PendingDohStatus(info, settings), A::ResolveDomainName(true)) => {
                S::CheckingResolveSupport(info, settings)
            }
            (S::PendingDohStatus(info, settings), A::ResolveDomainName(false)) => {
                S::CreatingRequest(info.url().clone(), info, settings)
            }
            (S::CheckingResolveSupport(info, settings), A::CheckResolveSupport(true)) => {
                S::ResolvingDomainName(info, settings)
            }
            (S::CheckingResolveSupport(info, settings), A::CheckResolveSupport(false)) => {
                S::CreatingRequest(info.url_with_resolved_domain(), info, settings)
            }
            (S::ResolvingDomainName(info, settings), A::CreateRequestAnyway(url)) => {
                S::CreatingRequest(url, info, settings)
            }
            (S::CreatingRequest(_, _, settings), A::LoadWebView(request)) => {
                S::UpdatingWebView(request, settings)
            }
            (
                S::UpdatingWebView(request, settings) | S::WaitingForNavigation(request, settings),
                A::FinishLoading {
                    final_url,
                    js_handle,
                    js_enabled,
                },
            ) => S::FinishingLoading {
                request,
                settings,
                final_url,
                js_handle,
                js_enabled,
            },
            (
                S::FinishingLoading {
                    request, settings, ..
                },
                A::StartView,
            ) => S::Viewing(request, settings),
            (S::Viewing(request, settings), A::ChangeJavaScript { handle, enabled }) => {
                if enabled == settings.js_enabled {
                    // Toggling to the current value is a true no-op.
                    S::Viewing(request, settings)
                } else {
                    S::UpdatingJs(request, settings.with_js_enabled(enabled), handle)
                }
            }
            (S::UpdatingJs(request, settings, _), A::FinishLoading { .. }) => {
                S::Viewing(request, settings)
            }
            (state, action) => {
                let err = NavigationError::UnexpectedStateForAction {
                    state: state.name(),
                    action: action.name(),
                };
                tracing::error!(state = state.name(), action = action.name(), "{err}");
                return Err(err);
            }
        };

        Ok(next)
    }

    /// The URL data being processed, in any phase.
    pub fn url_data(&self) -> &URLInfo {
        match self {
            NavigationState::Initialized(site) => site.url_info(),
            NavigationState::PendingPlugins(info, _)
            | NavigationState::InjectingPlugins(_, info, _)
            | NavigationState::PendingDohStatus(info, _)
            | NavigationState::CheckingResolveSupport(info, _)
            | NavigationState::ResolvingDomainName(info, _)
            | NavigationState::CreatingRequest(_, info, _) => info,
            NavigationState::UpdatingWebView(request, _)
            | NavigationState::WaitingForNavigation(request, _)
            | NavigationState::Viewing(request, _)
            | NavigationState::UpdatingJs(request, _, _)
            | NavigationState::FinishingLoading { request, .. } => request.info(),
        }
    }

    /// The display URL, in any phase. Never shows a substituted IP.
    pub fn url(&self) -> &Url {
        self.url_data().url()
    }

    /// The host being loaded, in any phase.
    pub fn host(&self) -> Host {
        self.url_data().host()
    }

    /// The tab settings in effect, in any phase.
    pub fn settings(&self) -> SiteSettings {
        match self {
            NavigationState::Initialized(site) => site.settings(),
            NavigationState::PendingPlugins(_, settings)
            | NavigationState::InjectingPlugins(_, _, settings)
            | NavigationState::PendingDohStatus(_, settings)
            | NavigationState::CheckingResolveSupport(_, settings)
            | NavigationState::ResolvingDomainName(_, settings)
            | NavigationState::CreatingRequest(_, _, settings)
            | NavigationState::UpdatingWebView(_, settings)
            | NavigationState::WaitingForNavigation(_, settings)
            | NavigationState::Viewing(_, settings)
            | NavigationState::UpdatingJs(_, settings, _)
            | NavigationState::FinishingLoading { settings, .. } => *settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{JsEvaluator, JsPlugin};
    use crate::site::Site;
    use std::sync::Arc;

    struct NullEvaluator;

    impl JsEvaluator for NullEvaluator {
        fn evaluate(&self, _script: &str) {}
    }

    fn handle() -> JsHandle {
        JsHandle::new(Arc::new(NullEvaluator))
    }

    fn site() -> Site {
        Site::from_url_str("https://example.com/", SiteSettings::default()).unwrap()
    }

    fn finish_action() -> NavigationAction {
        NavigationAction::FinishLoading {
            final_url: Url::parse("https://example.com/").unwrap(),
            js_handle: handle(),
            js_enabled: true,
        }
    }

    #[test]
    fn test_happy_path_without_doh() {
        let mut state = NavigationState::Initialized(site());
        let request = NavigationRequest::new(
            state.url().clone(),
            state.url_data().clone(),
        );

        for action in [
            NavigationAction::LoadSite,
            NavigationAction::InjectPlugins(None),
            NavigationAction::ResolveDomainName(false),
            NavigationAction::LoadWebView(request),
            finish_action(),
            NavigationAction::StartView,
        ] {
            state = state.transition(action).unwrap();
        }
        assert!(matches!(state, NavigationState::Viewing(..)));

        // Reload re-enters via waitingForNavigation, not pendingPlugins.
        let state = state.transition(NavigationAction::Reload).unwrap();
        assert!(matches!(state, NavigationState::WaitingForNavigation(..)));
    }

    #[test]
    fn test_plugins_branch() {
        let state = NavigationState::Initialized(site())
            .transition(NavigationAction::LoadSite)
            .unwrap();
        let program = PluginsProgram::new(vec![JsPlugin::new("base", "1")]).unwrap();
        let state = state
            .transition(NavigationAction::InjectPlugins(Some(program)))
            .unwrap();
        assert!(matches!(state, NavigationState::InjectingPlugins(..)));

        let state = state.transition(NavigationAction::FetchDohStatus).unwrap();
        assert!(matches!(state, NavigationState::PendingDohStatus(..)));
    }

    #[test]
    fn test_doh_branch_resolution_needed() {
        let state = NavigationState::Initialized(site())
            .transition(NavigationAction::LoadSite)
            .unwrap()
            .transition(NavigationAction::InjectPlugins(None))
            .unwrap()
            .transition(NavigationAction::ResolveDomainName(true))
            .unwrap();
        assert!(matches!(state, NavigationState::CheckingResolveSupport(..)));

        let state = state
            .transition(NavigationAction::CheckResolveSupport(true))
            .unwrap();
        assert!(matches!(state, NavigationState::ResolvingDomainName(..)));

        let resolved = Url::parse("https://93.184.216.34/").unwrap();
        let state = state
            .transition(NavigationAction::CreateRequestAnyway(resolved.clone()))
            .unwrap();
        match &state {
            NavigationState::CreatingRequest(url, info, _) => {
                assert_eq!(*url, resolved);
                // Display data keeps the hostname.
                assert_eq!(info.url().host_str(), Some("example.com"));
            }
            other => panic!("unexpected state {}", other.name()),
        }
    }

    #[test]
    fn test_unexpected_action_is_an_error() {
        let state = NavigationState::Initialized(site());
        let err = state.clone().transition(finish_action()).unwrap_err();
        assert_eq!(
            err,
            NavigationError::UnexpectedStateForAction {
                state: "initialized",
                action: "finishLoading",
            }
        );
    }

    #[test]
    fn test_abandoned_resolution_superseded_by_new_load() {
        let s = site();
        let info = s.url_info().clone();
        let state = NavigationState::ResolvingDomainName(info, s.settings());

        // Restarting the same load rewinds to the head of the pipeline.
        let state = state.transition(NavigationAction::LoadSite).unwrap();
        assert!(matches!(state, NavigationState::PendingPlugins(..)));

        // A different link replaces the abandoned load's URL data.
        let s = site();
        let state = NavigationState::ResolvingDomainName(s.url_info().clone(), s.settings());
        let next = URLInfo::from_url(&Url::parse("https://example.com/next").unwrap()).unwrap();
        let state = state
            .transition(NavigationAction::LoadNextLink(next))
            .unwrap();
        assert_eq!(state.url().as_str(), "https://example.com/next");
    }

    #[test]
    fn test_stale_resolution_result_is_rejected() {
        // A resolution result arriving outside resolvingDN must not apply.
        let state = NavigationState::Initialized(site());
        let url = Url::parse("https://93.184.216.34/").unwrap();
        assert!(state
            .transition(NavigationAction::CreateRequestAnyway(url))
            .is_err());
    }

    #[test]
    fn test_change_javascript_same_value_is_noop() {
        let request = {
            let s = site();
            NavigationRequest::new(s.url_info().url().clone(), s.url_info().clone())
        };
        let state = NavigationState::Viewing(request, SiteSettings::default());

        let state = state
            .transition(NavigationAction::ChangeJavaScript {
                handle: handle(),
                enabled: true,
            })
            .unwrap();
        assert!(matches!(state, NavigationState::Viewing(..)));

        let state = state
            .transition(NavigationAction::ChangeJavaScript {
                handle: handle(),
                enabled: false,
            })
            .unwrap();
        assert!(matches!(state, NavigationState::UpdatingJs(..)));
        assert!(!state.settings().js_enabled);

        let state = state.transition(finish_action()).unwrap();
        assert!(matches!(state, NavigationState::Viewing(..)));
        assert!(!state.settings().js_enabled);
    }

    #[test]
    fn test_accessors_are_total() {
        let s = site();
        let info = s.url_info().clone();
        let request = NavigationRequest::new(info.url().clone(), info.clone());
        let program = PluginsProgram::new(vec![JsPlugin::new("p", "1")]).unwrap();
        let settings = SiteSettings::default();

        let states = vec![
            NavigationState::Initialized(s),
            NavigationState::PendingPlugins(info.clone(), settings),
            NavigationState::InjectingPlugins(program, info.clone(), settings),
            NavigationState::PendingDohStatus(info.clone(), settings),
            NavigationState::CheckingResolveSupport(info.clone(), settings),
            NavigationState::ResolvingDomainName(info.clone(), settings),
            NavigationState::CreatingRequest(info.url().clone(), info.clone(), settings),
            NavigationState::UpdatingWebView(request.clone(), settings),
            NavigationState::WaitingForNavigation(request.clone(), settings),
            NavigationState::FinishingLoading {
                request: request.clone(),
                settings,
                final_url: info.url().clone(),
                js_handle: handle(),
                js_enabled: true,
            },
            NavigationState::Viewing(request.clone(), settings),
            NavigationState::UpdatingJs(request, settings, handle()),
        ];

        for state in states {
            assert_eq!(state.url().host_str(), Some("example.com"), "{}", state.name());
            assert_eq!(state.host().raw_string(), "example.com", "{}", state.name());
            assert!(state.settings().js_enabled, "{}", state.name());
        }
    }
}
