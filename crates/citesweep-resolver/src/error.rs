//! Error types for the Resolver

use thiserror::Error;

/// Errors raised inside a resolution attempt
///
/// These never leave [`RedirectResolver::resolve`](citesweep_domain::traits::RedirectResolver);
/// they are folded into an `Unresolved` outcome.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// Browser process or page could not be started
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// Event stream could not be set up
    #[error("Event subscription failed: {0}")]
    Subscribe(String),

    /// Navigation failed
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Browser did not shut down cleanly
    #[error("Browser close failed: {0}")]
    Close(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

