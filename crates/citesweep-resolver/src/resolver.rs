//! Redirect resolver
//!
//! Resolves indirection URLs to the destination they redirect to.
//!
//! ```text
//! resolve(url)
//!   ├─ not an indirection prefix ──→ Resolved(url)        (no browser)
//!   ├─ cached or in flight ────────→ shared result
//!   └─ launch session → subscribe → capture_redirect → close → cache
//! ```

use crate::cache::ResolutionCache;
use crate::capture::{capture_redirect, CaptureOutcome};
use crate::config::ResolverConfig;
use crate::error::ResolverError;
use crate::session::{BrowserLauncher, BrowserSession};
use async_trait::async_trait;
use citesweep_domain::traits::RedirectResolver;
use citesweep_domain::{ResolutionResult, UnresolvedReason};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

/// Counters describing resolver activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Browser sessions launched
    pub launches: usize,

    /// Lookups answered from the cache
    pub cache_hits: usize,

    /// URLs currently cached
    pub cached: usize,
}

/// Browser-backed redirect resolver
///
/// # Examples
///
/// ```no_run
/// use citesweep_resolver::{BrowserRedirectResolver, ChromiumLauncher, ResolverConfig};
/// use citesweep_domain::traits::RedirectResolver;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ResolverConfig::default();
/// let resolver = BrowserRedirectResolver::new(ChromiumLauncher::new(&config), config)?;
///
/// let result = resolver
///     .resolve("https://vertexaisearch.cloud.google.com/grounding-api-redirect/AUZIYQ")
///     .await;
/// println!("{}", result.url());
/// # Ok(())
/// # }
/// ```
pub struct BrowserRedirectResolver<L> {
    launcher: L,
    config: ResolverConfig,
    cache: ResolutionCache,
    sessions: Semaphore,
    launches: AtomicUsize,
    cache_hits: AtomicUsize,
}

impl<L: BrowserLauncher> BrowserRedirectResolver<L> {
    /// Create a resolver with the given launcher and configuration
    pub fn new(launcher: L, config: ResolverConfig) -> Result<Self, ResolverError> {
        config.validate().map_err(ResolverError::Config)?;
        Ok(Self {
            launcher,
            sessions: Semaphore::new(config.max_concurrent_sessions),
            config,
            cache: ResolutionCache::new(),
            launches: AtomicUsize::new(0),
            cache_hits: AtomicUsize::new(0),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Get the launcher
    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Get the result cache
    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Current activity counters
    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            launches: self.launches.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cached: self.cache.len(),
        }
    }

    async fn resolve_in_browser(&self, url: &str) -> ResolutionResult {
        let _permit = match self.sessions.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                warn!(url, "session semaphore closed");
                return ResolutionResult::unresolved(url, UnresolvedReason::NavigationError);
            }
        };

        // One budget for launch, subscription and navigation
        let deadline = Instant::now() + self.config.timeout();

        self.launches.fetch_add(1, Ordering::Relaxed);
        let mut session = match timeout_at(deadline, self.launcher.launch()).await {
            Ok(Ok(session)) => session,
            Ok(Err(e)) => {
                warn!(url, "{}", e);
                return ResolutionResult::unresolved(url, UnresolvedReason::NavigationError);
            }
            Err(_) => {
                warn!(url, timeout_secs = self.config.timeout_secs, "browser launch timed out");
                return ResolutionResult::unresolved(url, UnresolvedReason::Timeout);
            }
        };

        let subscribed = timeout_at(deadline, session.subscribe()).await;
        let outcome = match subscribed {
            Ok(Ok(events)) => capture_redirect(&session, events, url, &self.config, deadline).await,
            Ok(Err(e)) => CaptureOutcome::NavigationFailed(e.to_string()),
            Err(_) => CaptureOutcome::TimedOut,
        };

        if let Err(e) = session.close().await {
            warn!(url, "{}", e);
        }

        match outcome {
            CaptureOutcome::Captured(final_url) => {
                info!(url, final_url = %final_url, "redirect resolved");
                ResolutionResult::Resolved(final_url)
            }
            CaptureOutcome::NavigationFailed(reason) => {
                warn!(url, reason = %reason, "resolution failed");
                ResolutionResult::unresolved(url, UnresolvedReason::NavigationError)
            }
            CaptureOutcome::TimedOut => {
                warn!(url, timeout_secs = self.config.timeout_secs, "resolution timed out");
                ResolutionResult::unresolved(url, UnresolvedReason::Timeout)
            }
            CaptureOutcome::NoRedirect => {
                warn!(url, "no redirect observed");
                ResolutionResult::unresolved(url, UnresolvedReason::NoRedirectObserved)
            }
        }
    }
}

#[async_trait]
impl<L: BrowserLauncher> RedirectResolver for BrowserRedirectResolver<L> {
    async fn resolve(&self, url: &str) -> ResolutionResult {
        if !self.config.is_indirection(url) {
            return ResolutionResult::Resolved(url.to_string());
        }

        let (result, launched) = self
            .cache
            .get_or_resolve(url, || self.resolve_in_browser(url))
            .await;
        if !launched {
            debug!(url, "resolution cache hit");
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        }
        result
    }
}
