//! Timed toast engine
//!
//! One promotional popup per mount: fetch a candidate, show it after a delay,
//! hide it after a second delay. Both delays start together once the
//! candidate arrives, so the visible time is `hide_delay - show_delay`.
//!
//! ```text
//! Hidden --candidate--> Pending --show_delay--> Visible --hide_delay--> Dismissed
//!    \                     \                       \
//!     `------------------ dismiss() ----------------`--> Dismissed
//! ```
//!
//! A failed fetch or an empty selection leaves the toast `Hidden` for good.
//! Nothing is replayed until the next mount.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::backend::{extract_list, Backend};
use crate::models::{Event, Toast};
use crate::store::DEFAULT_REQUEST_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Hidden,
    Pending,
    Visible,
    Dismissed,
}

/// Show/hide delays, both measured from when the candidate arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastTiming {
    pub show_delay_ms: u64,
    pub hide_delay_ms: u64,
}

impl ToastTiming {
    pub fn show_delay(&self) -> Duration {
        Duration::from_millis(self.show_delay_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

/// Where the toast candidate comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastSource {
    /// First toast flagged active on `/toast`
    #[default]
    FirstActiveToast,
    /// First upcoming event on `/events`
    FirstUpcomingEvent,
}

impl ToastSource {
    pub fn path(&self) -> &'static str {
        match self {
            ToastSource::FirstActiveToast => "/toast",
            ToastSource::FirstUpcomingEvent => "/events",
        }
    }

    pub fn default_timing(&self) -> ToastTiming {
        match self {
            ToastSource::FirstActiveToast => ToastTiming {
                show_delay_ms: 2000,
                hide_delay_ms: 12000,
            },
            ToastSource::FirstUpcomingEvent => ToastTiming {
                show_delay_ms: 3000,
                hide_delay_ms: 13000,
            },
        }
    }

    /// Pick the candidate out of a list response
    pub fn select(&self, body: Value) -> Option<ToastCandidate> {
        match self {
            ToastSource::FirstActiveToast => extract_list::<Toast>(body, "toast")
                .into_iter()
                .find(|t| t.is_active)
                .map(ToastCandidate::Notice),
            ToastSource::FirstUpcomingEvent => extract_list::<Event>(body, "events")
                .into_iter()
                .find(Event::is_upcoming)
                .map(ToastCandidate::Event),
        }
    }
}

/// What the toast is about
#[derive(Debug, Clone, PartialEq)]
pub enum ToastCandidate {
    Notice(Toast),
    Event(Event),
}

/// What a click on the toast leads to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastAction {
    /// Scroll the page to a section anchor
    ScrollTo(&'static str),
    /// Open an external link
    Open(String),
}

/// Presentation data for a visible toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastCard {
    pub badge: Option<&'static str>,
    pub headline: String,
    pub image: Option<String>,
    pub details: Vec<String>,
    pub action_label: Option<&'static str>,
}

impl ToastCandidate {
    pub fn card(&self) -> ToastCard {
        match self {
            ToastCandidate::Notice(toast) => ToastCard {
                badge: None,
                headline: toast.message.clone(),
                image: toast.photo.clone(),
                details: toast
                    .event_id
                    .as_ref()
                    .and_then(|r| r.title())
                    .map(|title| vec![format!("Related Event: {title}")])
                    .unwrap_or_default(),
                action_label: toast.link.as_ref().map(|_| "Open"),
            },
            ToastCandidate::Event(event) => {
                let mut details = vec![event.display_date()];
                details.extend(event.time.clone());
                ToastCard {
                    badge: Some("Upcoming Event"),
                    headline: event.title.clone(),
                    image: event.image.clone(),
                    details,
                    action_label: Some("Learn More"),
                }
            }
        }
    }

    fn action(&self) -> Option<ToastAction> {
        match self {
            ToastCandidate::Notice(toast) => toast.link.clone().map(ToastAction::Open),
            ToastCandidate::Event(_) => Some(ToastAction::ScrollTo("events")),
        }
    }
}

struct ToastState {
    phase: ToastPhase,
    candidate: Option<ToastCandidate>,
}

struct Shared {
    state: Mutex<ToastState>,
    phase_tx: watch::Sender<ToastPhase>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ToastState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `to` if the current phase is one of `from`
    fn transition(&self, from: &[ToastPhase], to: ToastPhase) -> bool {
        let mut state = self.lock();
        if !from.contains(&state.phase) {
            return false;
        }
        state.phase = to;
        drop(state);
        self.phase_tx.send_replace(to);
        true
    }
}

/// A mounted toast. Dropping it cancels every pending timer.
pub struct TimedToast {
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl TimedToast {
    /// Mount with the source's default timing and request timeout
    pub fn mount<B: Backend + 'static>(backend: B, source: ToastSource) -> Self {
        Self::mount_with(backend, source, source.default_timing(), DEFAULT_REQUEST_TIMEOUT)
    }

    /// Mount and start fetching. Must be called inside a tokio runtime.
    pub fn mount_with<B: Backend + 'static>(
        backend: B,
        source: ToastSource,
        timing: ToastTiming,
        request_timeout: Duration,
    ) -> Self {
        let (phase_tx, _) = watch::channel(ToastPhase::Hidden);
        let shared = Arc::new(Shared {
            state: Mutex::new(ToastState {
                phase: ToastPhase::Hidden,
                candidate: None,
            }),
            phase_tx,
        });
        let task = tokio::spawn(drive(
            backend,
            source,
            timing,
            request_timeout,
            shared.clone(),
        ));
        Self { shared, task }
    }

    pub fn phase(&self) -> ToastPhase {
        self.shared.lock().phase
    }

    pub fn is_visible(&self) -> bool {
        self.phase() == ToastPhase::Visible
    }

    pub fn subscribe(&self) -> watch::Receiver<ToastPhase> {
        self.shared.phase_tx.subscribe()
    }

    pub fn candidate(&self) -> Option<ToastCandidate> {
        self.shared.lock().candidate.clone()
    }

    /// Card to draw, only while visible
    pub fn card(&self) -> Option<ToastCard> {
        let state = self.shared.lock();
        match (&state.phase, &state.candidate) {
            (ToastPhase::Visible, Some(candidate)) => Some(candidate.card()),
            _ => None,
        }
    }

    /// Close button. Cancels the outstanding timers.
    pub fn dismiss(&self) -> bool {
        self.task.abort();
        let dismissed = self.shared.transition(
            &[ToastPhase::Hidden, ToastPhase::Pending, ToastPhase::Visible],
            ToastPhase::Dismissed,
        );
        if dismissed {
            debug!("Toast dismissed");
        }
        dismissed
    }

    /// Click on the toast body: dismiss and report where to go
    pub fn click_through(&self) -> Option<ToastAction> {
        if !self.is_visible() {
            return None;
        }
        let action = self.candidate().and_then(|c| c.action());
        self.dismiss();
        action
    }
}

impl Drop for TimedToast {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive<B: Backend>(
    backend: B,
    source: ToastSource,
    timing: ToastTiming,
    request_timeout: Duration,
    shared: Arc<Shared>,
) {
    let body = match tokio::time::timeout(request_timeout, backend.get_json(source.path())).await
    {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            warn!(source = source.path(), error = %e, "Failed to fetch toast candidate");
            return;
        }
        Err(_) => {
            warn!(source = source.path(), timeout = ?request_timeout, "Toast candidate fetch timed out");
            return;
        }
    };

    let Some(candidate) = source.select(body) else {
        debug!(source = source.path(), "No toast candidate");
        return;
    };

    {
        let mut state = shared.lock();
        if state.phase != ToastPhase::Hidden {
            return;
        }
        state.candidate = Some(candidate);
    }
    if !shared.transition(&[ToastPhase::Hidden], ToastPhase::Pending) {
        return;
    }

    let scheduled = Instant::now();
    if timing.hide_delay() > timing.show_delay() {
        sleep_until(scheduled + timing.show_delay()).await;
        if !shared.transition(&[ToastPhase::Pending], ToastPhase::Visible) {
            return;
        }
        info!("Toast shown");
    }

    sleep_until(scheduled + timing.hide_delay()).await;
    if shared.transition(&[ToastPhase::Pending, ToastPhase::Visible], ToastPhase::Dismissed) {
        debug!("Toast auto-hidden");
    }
}
