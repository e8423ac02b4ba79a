//! Browser session abstraction
//!
//! A session is one isolated, short-lived browser. The resolver launches a
//! session per indirection URL, subscribes to its navigation events, starts
//! the navigation and closes the session when it has an answer.

use crate::error::ResolverError;
use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedReceiver;

/// Redirect status codes that carry a `Location`
pub const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// What kind of resource an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Main-frame document navigation
    Document,

    /// Anything else (scripts, images, XHR, ...)
    Other,
}

/// One response observed during navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    /// URL that produced the response
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// `Location` header, if any
    pub location: Option<String>,

    /// Resource kind
    pub kind: ResourceKind,
}

impl NavigationEvent {
    /// A document response without a `Location`
    pub fn document(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            location: None,
            kind: ResourceKind::Document,
        }
    }

    /// A document redirect response
    pub fn redirect(url: impl Into<String>, status: u16, location: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            location: Some(location.into()),
            kind: ResourceKind::Document,
        }
    }

    /// Whether the status is a redirect
    pub fn is_redirect(&self) -> bool {
        REDIRECT_STATUSES.contains(&self.status)
    }
}

/// A live browser session
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Start receiving navigation events
    ///
    /// Must be called before [`navigate`](Self::navigate) so that no event
    /// is missed.
    async fn subscribe(&mut self) -> Result<UnboundedReceiver<NavigationEvent>, ResolverError>;

    /// Navigate the main frame, completing when the page has loaded
    async fn navigate(&self, url: &str) -> Result<(), ResolverError>;

    /// Tear the session down
    async fn close(self) -> Result<(), ResolverError>;
}

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    /// Session type produced by this launcher
    type Session: BrowserSession;

    /// Launch a fresh, isolated session
    async fn launch(&self) -> Result<Self::Session, ResolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_statuses() {
        for status in [301, 302, 303, 307, 308] {
            assert!(NavigationEvent::redirect("https://a", status, "/b").is_redirect());
        }
        for status in [200, 204, 304, 404, 500] {
            assert!(!NavigationEvent::document("https://a", status).is_redirect());
        }
    }
}
