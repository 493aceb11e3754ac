//! Debounced search pipeline.
//!
//! Input edits are debounced; each search that actually runs takes a sequence
//! number, and only the completion carrying the latest number is allowed to
//! touch [`SearchState`]. A late answer to an older search is dropped.

use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    error::QueryError,
    model::{SearchState, WeatherReading},
    provider::{WeatherProvider, normalize_city},
    timer::{CancelHandle, schedule_after},
};

/// Owns the search input and the single [`SearchState`].
///
/// Presentation code reads state through [`SearchController::subscribe`]; only
/// the controller writes it.
#[derive(Debug)]
pub struct SearchController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    provider: Arc<dyn WeatherProvider>,
    debounce: Duration,
    latest_seq: AtomicU64,
    scheduled: Mutex<Option<CancelHandle>>,
    state: watch::Sender<SearchState>,
}

impl SearchController {
    pub fn new(provider: Arc<dyn WeatherProvider>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::default());

        Self {
            inner: Arc::new(Inner {
                provider,
                debounce,
                latest_seq: AtomicU64::new(0),
                scheduled: Mutex::new(None),
                state,
            }),
        }
    }

    /// Create a controller and immediately search for `default_city`.
    pub fn start(
        provider: Arc<dyn WeatherProvider>,
        debounce: Duration,
        default_city: &str,
    ) -> Self {
        let controller = Self::new(provider, debounce);
        info!(city = default_city, "initial search");
        controller.on_explicit_search(default_city);
        controller
    }

    /// Text edit: (re)schedule a search once input has been quiet for the debounce period.
    pub fn on_input_change(&self, raw_text: &str) {
        let inner = Arc::clone(&self.inner);
        let text = raw_text.to_owned();

        // Old timer is cancelled before the new one exists.
        let mut scheduled = self.inner.scheduled();
        if let Some(previous) = scheduled.take() {
            previous.cancel();
        }
        *scheduled = Some(schedule_after(self.inner.debounce, async move {
            inner.launch(text);
        }));
        drop(scheduled);

        debug!(text = raw_text, delay_ms = self.inner.debounce.as_millis() as u64, "search scheduled");
    }

    /// Search right away, dropping any debounced search that has not fired yet.
    ///
    /// The returned handle resolves once the search has settled (or been superseded).
    pub fn on_explicit_search(&self, raw_text: &str) -> JoinHandle<()> {
        self.cancel_pending();
        self.inner.launch(raw_text.to_owned())
    }

    /// Cancel a scheduled search that has not fired. Returns `true` if one was pending.
    pub fn cancel_pending(&self) -> bool {
        match self.inner.scheduled().take() {
            Some(handle) if !handle.is_finished() => {
                handle.cancel();
                debug!("scheduled search cancelled");
                true
            }
            _ => false,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

impl Inner {
    fn scheduled(&self) -> std::sync::MutexGuard<'_, Option<CancelHandle>> {
        self.scheduled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim a sequence number, mark the state pending and run the query in its own task.
    fn launch(self: &Arc<Self>, text: String) -> JoinHandle<()> {
        let seq = self.latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.pending = true);

        let inner = Arc::clone(self);
        tokio::spawn(async move { inner.run_search(seq, text).await })
    }

    async fn run_search(&self, seq: u64, text: String) {
        let result = match normalize_city(&text) {
            Ok(city) => self.provider.fetch_weather(city).await,
            Err(err) => Err(err),
        };
        self.settle(seq, text.trim(), result);
    }

    fn settle(&self, seq: u64, query: &str, result: Result<WeatherReading, QueryError>) {
        let applied = self.state.send_if_modified(|state| {
            // Compared under the channel lock so a concurrent launch cannot slip in between.
            let latest = self.latest_seq.load(Ordering::SeqCst);
            if seq != latest {
                return false;
            }

            state.pending = false;
            state.query = Some(query.to_owned());
            match &result {
                Ok(reading) => {
                    state.reading = Some(reading.clone());
                    state.last_error = None;
                }
                Err(err) => state.last_error = Some(err.clone()),
            }
            true
        });

        if !applied {
            debug!(seq, query, "discarding superseded search result");
            return;
        }

        match result {
            Ok(reading) => info!(
                seq,
                query,
                location = %reading.location_name,
                temperature = reading.temperature,
                "search settled"
            ),
            Err(QueryError::EmptyInput) => debug!(seq, "search skipped: empty input"),
            Err(err) => warn!(seq, query, kind = err.kind(), error = ?err, "search failed"),
        }
    }
}
