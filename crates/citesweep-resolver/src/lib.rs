//! citesweep Redirect Resolver
//!
//! Resolves search-grounding indirection URLs to their destinations by
//! watching a real browser follow them.
//!
//! # Overview
//!
//! - URLs outside the configured indirection prefixes are returned as-is,
//!   without starting a browser
//! - Indirection URLs get a fresh, isolated browser session that loads only
//!   the main document; the first redirect (or terminal document) observed
//!   on the event stream is the answer
//! - Every outcome, including failures, is cached for the process lifetime
//! - Concurrent sessions are bounded by a semaphore
//!
//! Resolution never fails: problems become `ResolutionResult::Unresolved`
//! with a reason of `timeout`, `navigation_error` or `no_redirect_observed`.
//!
//! # Architecture
//!
//! ```text
//! BrowserRedirectResolver
//!   ├─ ResolutionCache        (single-flight map)
//!   ├─ Semaphore              (session bound)
//!   └─ BrowserLauncher ──→ BrowserSession ──events──→ RedirectCapture
//!        ├─ ChromiumLauncher  (DevTools protocol)
//!        └─ ScriptedLauncher  (tests)
//! ```

#![warn(missing_docs)]

mod cache;
mod capture;
mod chromium;
mod config;
mod error;
pub mod mock;
mod resolver;
mod session;

pub use cache::ResolutionCache;
pub use capture::{capture_redirect, CaptureOutcome, RedirectCapture};
pub use chromium::{ChromiumLauncher, ChromiumSession};
pub use config::{ResolverConfig, GROUNDING_REDIRECT_PREFIX};
pub use error::ResolverError;
pub use resolver::{BrowserRedirectResolver, ResolverStats};
pub use session::{BrowserLauncher, BrowserSession, NavigationEvent, ResourceKind, REDIRECT_STATUSES};
