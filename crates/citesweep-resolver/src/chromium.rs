//! Chromium sessions over the DevTools protocol
//!
//! Each session is a separate browser process with its own throwaway profile
//! directory. Request interception lets only document navigations through;
//! every sub-resource is failed with `BlockedByClient` so a resolution costs
//! one round trip per hop.

use crate::config::ResolverConfig;
use crate::error::ResolverError;
use crate::session::{BrowserLauncher, BrowserSession, NavigationEvent, ResourceKind};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::fetch::{
    self, ContinueRequestParams, EventRequestPaused, FailRequestParams, RequestPattern,
    RequestStage,
};
use chromiumoxide::cdp::browser_protocol::network::{
    self, ErrorReason, EventRequestWillBeSent, EventResponseReceived, Headers, ResourceType,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, trace};
use uuid::Uuid;

/// Launches headless Chromium sessions
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    headless: bool,
    no_sandbox: bool,
    executable: Option<PathBuf>,
    request_timeout: Duration,
}

impl ChromiumLauncher {
    /// Create a launcher from resolver settings
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            headless: config.headless,
            no_sandbox: config.no_sandbox,
            executable: config.chrome_executable.clone(),
            request_timeout: config.timeout(),
        }
    }

    fn browser_config(&self, profile_dir: &Path) -> Result<BrowserConfig, ResolverError> {
        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir)
            .request_timeout(self.request_timeout)
            .arg("--no-first-run")
            .arg("--disable-extensions")
            .arg("--disable-background-networking");

        if let Some(executable) = &self.executable {
            builder = builder.chrome_executable(executable);
        }
        if self.no_sandbox {
            builder = builder.no_sandbox();
        }
        if !self.headless {
            builder = builder.with_head();
        }

        builder
            .build()
            .map_err(|e| ResolverError::Launch(format!("Config failed: {}", e)))
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<Self::Session, ResolverError> {
        let profile_dir = std::env::temp_dir().join(format!("citesweep-{}", Uuid::now_v7()));
        let config = self.browser_config(&profile_dir)?;

        debug!(profile = %profile_dir.display(), "launching chromium");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ResolverError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
            trace!("chromium handler loop exited");
        });

        let mut session = ChromiumSession {
            browser,
            page: None,
            handler_task,
            tasks: Vec::new(),
            profile_dir,
        };

        match session.browser.new_page("about:blank").await {
            Ok(page) => {
                session.page = Some(page);
                Ok(session)
            }
            Err(e) => {
                if let Err(close_error) = session.close().await {
                    trace!("teardown after page failure failed: {}", close_error);
                }
                Err(ResolverError::Launch(format!("Failed to open page: {}", e)))
            }
        }
    }
}

/// One Chromium process with a single page
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    tasks: Vec<JoinHandle<()>>,
    profile_dir: PathBuf,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, ResolverError> {
        self.page
            .as_ref()
            .ok_or_else(|| ResolverError::Navigation("Session has no page".to_string()))
    }
}

fn subscribe_error(e: impl std::fmt::Display) -> ResolverError {
    ResolverError::Subscribe(e.to_string())
}

/// Case-insensitive header lookup
fn header(headers: &Headers, name: &str) -> Option<String> {
    headers
        .inner()
        .as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.as_str())
        .map(str::to_string)
}

fn resource_kind(kind: Option<&ResourceType>) -> ResourceKind {
    match kind {
        Some(ResourceType::Document) => ResourceKind::Document,
        _ => ResourceKind::Other,
    }
}

fn status_code(status: i64) -> u16 {
    u16::try_from(status).unwrap_or(0)
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn subscribe(&mut self) -> Result<UnboundedReceiver<NavigationEvent>, ResolverError> {
        let page = self.page()?.clone();

        page.execute(network::EnableParams::default())
            .await
            .map_err(subscribe_error)?;

        let mut paused = page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(subscribe_error)?;
        let mut requests = page
            .event_listener::<EventRequestWillBeSent>()
            .await
            .map_err(subscribe_error)?;
        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(subscribe_error)?;

        let pattern = RequestPattern::builder()
            .url_pattern("*")
            .request_stage(RequestStage::Request)
            .build();
        page.execute(fetch::EnableParams::builder().pattern(pattern).build())
            .await
            .map_err(subscribe_error)?;

        // Only documents get through
        let blocker = page.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let result = if event.resource_type == ResourceType::Document {
                    blocker
                        .execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                } else {
                    blocker
                        .execute(FailRequestParams::new(
                            event.request_id.clone(),
                            ErrorReason::BlockedByClient,
                        ))
                        .await
                        .map(|_| ())
                };
                if let Err(e) = result {
                    trace!(url = %event.request.url, "interception reply failed: {}", e);
                }
            }
        }));

        let (tx, rx) = mpsc::unbounded_channel();

        // Redirect hops only surface as the redirect_response of the next request
        let redirect_tx = tx.clone();
        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = requests.next().await {
                let Some(redirect) = &event.redirect_response else {
                    continue;
                };
                let navigation = NavigationEvent {
                    url: redirect.url.clone(),
                    status: status_code(redirect.status),
                    location: header(&redirect.headers, "location")
                        .or_else(|| Some(event.request.url.clone())),
                    kind: resource_kind(event.r#type.as_ref()),
                };
                if redirect_tx.send(navigation).is_err() {
                    break;
                }
            }
        }));

        self.tasks.push(tokio::spawn(async move {
            while let Some(event) = responses.next().await {
                let navigation = NavigationEvent {
                    url: event.response.url.clone(),
                    status: status_code(event.response.status),
                    location: header(&event.response.headers, "location"),
                    kind: resource_kind(Some(&event.r#type)),
                };
                if tx.send(navigation).is_err() {
                    break;
                }
            }
        }));

        Ok(rx)
    }

    async fn navigate(&self, url: &str) -> Result<(), ResolverError> {
        self.page()?
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| ResolverError::Navigation(e.to_string()))
    }

    async fn close(self) -> Result<(), ResolverError> {
        let ChromiumSession {
            mut browser,
            page,
            handler_task,
            tasks,
            profile_dir,
        } = self;

        for task in tasks {
            task.abort();
        }
        if let Some(page) = page {
            if let Err(e) = page.close().await {
                trace!("page close failed: {}", e);
            }
        }

        let closed = browser.close().await.map(|_| ());
        if let Err(e) = browser.wait().await {
            trace!("browser wait failed: {}", e);
        }
        handler_task.abort();

        if let Err(e) = tokio::fs::remove_dir_all(&profile_dir).await {
            trace!(profile = %profile_dir.display(), "profile cleanup failed: {}", e);
        }

        closed.map_err(|e| ResolverError::Close(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let headers = Headers::new(json!({"Location": "https://a.example/", "Content-Type": "text/html"}));
        assert_eq!(header(&headers, "location").as_deref(), Some("https://a.example/"));
        assert_eq!(header(&headers, "x-missing"), None);
    }

    #[test]
    fn test_resource_kind() {
        assert_eq!(resource_kind(Some(&ResourceType::Document)), ResourceKind::Document);
        assert_eq!(resource_kind(Some(&ResourceType::Script)), ResourceKind::Other);
        assert_eq!(resource_kind(None), ResourceKind::Other);
    }

    #[test]
    fn test_status_code_bounds() {
        assert_eq!(status_code(302), 302);
        assert_eq!(status_code(-1), 0);
        assert_eq!(status_code(70_000), 0);
    }

    #[tokio::test]
    #[ignore] // Requires a local Chromium and network access
    async fn test_chromium_follows_http_redirect() {
        use crate::capture::{capture_redirect, CaptureOutcome};

        let config = ResolverConfig::default();
        let mut session = ChromiumLauncher::new(&config).launch().await.unwrap();
        let events = session.subscribe().await.unwrap();
        let deadline = tokio::time::Instant::now() + config.timeout();
        let outcome =
            capture_redirect(&session, events, "http://example.com/", &config, deadline).await;
        session.close().await.unwrap();

        assert!(matches!(
            outcome,
            CaptureOutcome::NoRedirect | CaptureOutcome::Captured(_)
        ));
    }
}
