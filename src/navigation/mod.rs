//! The page-load state machine and its driver.
//!
//! The pipeline a page load walks through:
//!
//! ```text
//! initialized -> pendingPlugins -> [injectingPlugins] -> pendingDoHStatus
//!   -> [checkingDNResolveSupport -> [resolvingDN]] -> creatingRequest
//!   -> updatingWebView -> finishingLoading -> viewing
//! ```
//!
//! Bracketed stages are conditional: plugin injection only runs when a
//! program exists, and resolution only runs when the DoH flag is on and
//! the host is eligible. Reload/back/forward re-enter through
//! `waitingForNavigation`, bypassing plugins and DoH entirely. A load
//! abandoned in `resolvingDN` is superseded by the next `loadSite` or
//! `loadNextLink`, which rewinds to `pendingPlugins`.
//!
//! [`NavigationState`] is the pure machine; [`PageLoadJob`] drives it
//! against the injected collaborators.

mod job;
mod request;
mod state;

pub use job::{PageLoadJob, WebViewDelegate};
pub use request::NavigationRequest;
pub use state::{NavigationAction, NavigationError, NavigationState};
