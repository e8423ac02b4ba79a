//! Redirect capture
//!
//! The navigation future and the session's event stream feed one loop. The
//! loop owns a single slot holding the best final URL seen so far and stops
//! as soon as that slot is settled, the deadline passes, or navigation has
//! completed and the event stream has gone quiet.

use crate::config::ResolverConfig;
use crate::error::ResolverError;
use crate::session::{BrowserSession, NavigationEvent, ResourceKind};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};
use url::Url;

/// How a capture attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// A final URL was observed
    Captured(String),

    /// Navigation failed before anything was captured
    NavigationFailed(String),

    /// The deadline passed before anything was captured
    TimedOut,

    /// Navigation finished without leaving the original URL
    NoRedirect,
}

/// Holds the best final URL observed for one navigation
#[derive(Debug)]
pub struct RedirectCapture {
    original: String,
    follow_chain: bool,
    best: Option<String>,
    settled: bool,
}

impl RedirectCapture {
    /// Start capturing for a navigation to `original`
    pub fn new(original: impl Into<String>, follow_chain: bool) -> Self {
        Self {
            original: original.into(),
            follow_chain,
            best: None,
            settled: false,
        }
    }

    /// Feed one event into the slot
    ///
    /// Only main-document http(s) responses count. A redirect stores its
    /// `Location` joined against the responding URL; in single-hop mode that
    /// settles the slot. A non-redirect response away from the original URL
    /// is the terminal destination and always settles it.
    pub fn observe(&mut self, event: &NavigationEvent) {
        if self.settled || event.kind != ResourceKind::Document {
            return;
        }
        let Ok(base) = Url::parse(&event.url) else {
            return;
        };
        if !matches!(base.scheme(), "http" | "https") {
            return;
        }

        if event.is_redirect() {
            let Some(location) = event.location.as_deref() else {
                trace!(url = %event.url, "redirect without Location");
                return;
            };
            match base.join(location) {
                Ok(target) => {
                    debug!(from = %event.url, to = %target, status = event.status, "redirect captured");
                    self.best = Some(target.to_string());
                    if !self.follow_chain {
                        self.settled = true;
                    }
                }
                Err(e) => trace!(location, "unusable Location: {}", e),
            }
        } else if event.url != self.original {
            debug!(url = %event.url, status = event.status, "final document reached");
            self.best = Some(event.url.clone());
            self.settled = true;
        }
    }

    /// The URL captured so far
    pub fn captured(&self) -> Option<&str> {
        self.best.as_deref()
    }

    /// Whether no later event can change the outcome
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Consume the capture and return the final URL, if any
    pub fn into_final(self) -> Option<String> {
        self.best
    }
}

/// Navigate `session` to `url` and capture where it ends up
///
/// `events` must come from `session.subscribe()`, taken before this call.
/// Capturing stops at `deadline` at the latest.
pub async fn capture_redirect<S: BrowserSession>(
    session: &S,
    mut events: UnboundedReceiver<NavigationEvent>,
    url: &str,
    config: &ResolverConfig,
    deadline: Instant,
) -> CaptureOutcome {
    let mut capture = RedirectCapture::new(url, config.follow_redirect_chain);

    let navigation = session.navigate(url);
    tokio::pin!(navigation);
    let deadline = sleep_until(deadline);
    tokio::pin!(deadline);

    let mut navigation_result: Option<Result<(), ResolverError>> = None;
    let mut events_open = true;
    let mut timed_out = false;

    while !capture.is_settled() {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => capture.observe(&event),
                None => {
                    events_open = false;
                    if navigation_result.is_some() {
                        break;
                    }
                }
            },
            result = &mut navigation, if navigation_result.is_none() => {
                if let Err(e) = &result {
                    debug!(url, "navigation error: {}", e);
                }
                navigation_result = Some(result);
                if !events_open {
                    break;
                }
                // Late events may still be queued; give them a short window
                let settle_at = Instant::now() + config.settle();
                if settle_at < deadline.deadline() {
                    deadline.as_mut().reset(settle_at);
                }
            },
            _ = &mut deadline => {
                timed_out = navigation_result.is_none();
                break;
            }
        }
    }

    match (capture.into_final(), navigation_result) {
        (Some(final_url), _) => CaptureOutcome::Captured(final_url),
        (None, Some(Err(e))) => CaptureOutcome::NavigationFailed(e.to_string()),
        (None, _) if timed_out => CaptureOutcome::TimedOut,
        (None, _) => CaptureOutcome::NoRedirect,
    }
}
