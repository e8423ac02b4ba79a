//! Scripted browser sessions for deterministic testing
//!
//! A [`ScriptedLauncher`] holds one [`NavigationScript`] per URL. Navigating
//! a scripted session plays the script: events are pushed into the
//! subscription, delays sleep on the tokio clock (so paused-clock tests run
//! instantly), and the script's ending decides how navigation finishes.
//! Unknown URLs complete immediately without events.

use crate::error::ResolverError;
use crate::session::{BrowserLauncher, BrowserSession, NavigationEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum ScriptStep {
    Event(NavigationEvent),
    Delay(Duration),
}

#[derive(Debug, Clone, Default)]
enum ScriptEnd {
    #[default]
    Completes,
    Fails(String),
    Hangs,
}

/// What a scripted navigation does
#[derive(Debug, Clone, Default)]
pub struct NavigationScript {
    steps: Vec<ScriptStep>,
    end: ScriptEnd,
}

impl NavigationScript {
    /// An empty script that completes immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// A single redirect followed by successful completion
    pub fn redirect(from: &str, status: u16, to: &str) -> Self {
        Self::new()
            .event(NavigationEvent::redirect(from, status, to))
            .completes()
    }

    /// Emit an event
    pub fn event(mut self, event: NavigationEvent) -> Self {
        self.steps.push(ScriptStep::Event(event));
        self
    }

    /// Wait before the next step
    pub fn delay(mut self, duration: Duration) -> Self {
        self.steps.push(ScriptStep::Delay(duration));
        self
    }

    /// Finish navigation successfully
    pub fn completes(mut self) -> Self {
        self.end = ScriptEnd::Completes;
        self
    }

    /// Finish navigation with an error
    pub fn fails(mut self, message: impl Into<String>) -> Self {
        self.end = ScriptEnd::Fails(message.into());
        self
    }

    /// Never finish navigation
    pub fn hangs(mut self) -> Self {
        self.end = ScriptEnd::Hangs;
        self
    }
}

/// Launcher producing [`ScriptedSession`]s
#[derive(Debug, Clone, Default)]
pub struct ScriptedLauncher {
    scripts: Arc<HashMap<String, NavigationScript>>,
    launch_failure: Option<String>,
    launch_delay: Duration,
    launches: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedLauncher {
    /// A launcher with no scripts
    pub fn new() -> Self {
        Self::default()
    }

    /// Play `script` when a session navigates to `url`
    pub fn with_script(mut self, url: impl Into<String>, script: NavigationScript) -> Self {
        Arc::make_mut(&mut self.scripts).insert(url.into(), script);
        self
    }

    /// Make every launch fail
    pub fn failing_launch(mut self, message: impl Into<String>) -> Self {
        self.launch_failure = Some(message.into());
        self
    }

    /// Make every launch take `delay` before it succeeds or fails
    pub fn launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    /// Number of launch attempts
    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Number of sessions closed
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedLauncher {
    type Session = ScriptedSession;

    async fn launch(&self) -> Result<Self::Session, ResolverError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if !self.launch_delay.is_zero() {
            tokio::time::sleep(self.launch_delay).await;
        }
        if let Some(message) = &self.launch_failure {
            return Err(ResolverError::Launch(message.clone()));
        }
        Ok(ScriptedSession {
            scripts: Arc::clone(&self.scripts),
            sender: Mutex::new(None),
            closes: Arc::clone(&self.closes),
        })
    }
}

/// Session that plays navigation scripts
#[derive(Debug)]
pub struct ScriptedSession {
    scripts: Arc<HashMap<String, NavigationScript>>,
    sender: Mutex<Option<UnboundedSender<NavigationEvent>>>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn subscribe(&mut self) -> Result<UnboundedReceiver<NavigationEvent>, ResolverError> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().await = Some(tx);
        Ok(rx)
    }

    async fn navigate(&self, url: &str) -> Result<(), ResolverError> {
        let script = self.scripts.get(url).cloned().unwrap_or_default();
        let sender = self.sender.lock().await.clone();

        for step in script.steps {
            match step {
                ScriptStep::Event(event) => {
                    if let Some(tx) = &sender {
                        let _ = tx.send(event);
                    }
                }
                ScriptStep::Delay(duration) => tokio::time::sleep(duration).await,
            }
        }
        drop(sender);

        match script.end {
            ScriptEnd::Completes => {
                self.sender.lock().await.take();
                Ok(())
            }
            ScriptEnd::Fails(message) => {
                self.sender.lock().await.take();
                Err(ResolverError::Navigation(message))
            }
            ScriptEnd::Hangs => std::future::pending().await,
        }
    }

    async fn close(self) -> Result<(), ResolverError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
