//! Resolution module - outcome of resolving an indirection URL

use std::fmt;

/// Why an indirection URL could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnresolvedReason {
    /// The per-resolution deadline elapsed before any redirect was captured
    Timeout,

    /// The browser session could not be created or navigation failed
    NavigationError,

    /// Navigation finished without any redirect or destination change
    NoRedirectObserved,
}

impl UnresolvedReason {
    /// Get the reason as a snake_case string
    pub fn as_str(&self) -> &'static str {
        match self {
            UnresolvedReason::Timeout => "timeout",
            UnresolvedReason::NavigationError => "navigation_error",
            UnresolvedReason::NoRedirectObserved => "no_redirect_observed",
        }
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of attempting to resolve one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    /// The final destination URL
    Resolved(String),

    /// Resolution failed; the original URL is kept
    Unresolved {
        /// URL as it was handed to the resolver
        original_url: String,
        /// Failure category
        reason: UnresolvedReason,
    },
}

impl ResolutionResult {
    /// Shorthand for an unresolved outcome
    pub fn unresolved(original_url: impl Into<String>, reason: UnresolvedReason) -> Self {
        ResolutionResult::Unresolved {
            original_url: original_url.into(),
            reason,
        }
    }

    /// Whether the result is `Resolved`
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionResult::Resolved(_))
    }

    /// The URL to persist: final URL if resolved, original otherwise
    pub fn url(&self) -> &str {
        match self {
            ResolutionResult::Resolved(url) => url,
            ResolutionResult::Unresolved { original_url, .. } => original_url,
        }
    }

    /// The failure reason, if any
    pub fn reason(&self) -> Option<UnresolvedReason> {
        match self {
            ResolutionResult::Resolved(_) => None,
            ResolutionResult::Unresolved { reason, .. } => Some(*reason),
        }
    }
}
