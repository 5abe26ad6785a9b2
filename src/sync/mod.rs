mod dispatch;
#[cfg(test)]
pub(crate) mod fake;

use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::client::StatusRepository;
use crate::error::{ActionError, FetchError};
use crate::model::{CommandRequest, DetailContent, DetailView, ServiceStatusRecord};
use crate::normalize::normalize;
use crate::snapshot::{SnapshotEvent, SnapshotState, transition};

pub use dispatch::CommandOutcome;

/// Completion reports from background tasks.
enum SyncMessage {
    Fetched {
        token: u64,
        result: Result<Vec<ServiceStatusRecord>, FetchError>,
    },
    CommandDone {
        request: CommandRequest,
        result: Result<(), ActionError>,
    },
    DetailLoaded {
        token: u64,
        content: DetailContent,
    },
}

/// Owns the session's [`SnapshotState`] and keeps it in step with the monitor.
///
/// Network calls run on the tokio runtime; their results come back over a
/// channel and are applied on the owning thread by [`poll`](Self::poll) or
/// [`wait`](Self::wait), so the state itself is never shared.
///
/// Every fetch carries a request token. Only the most recently issued token is
/// applied; a slower, older response that lands afterwards is dropped.
pub struct StatusSync<R: StatusRepository> {
    repo: Arc<R>,
    rt: Arc<tokio::runtime::Runtime>,
    state: SnapshotState,
    tx: mpsc::Sender<SyncMessage>,
    rx: mpsc::Receiver<SyncMessage>,
    latest_token: u64,
    in_flight: Option<u64>,
    generation: u64,
    commands_in_flight: usize,
    detail_token: u64,
    pub detail: Option<DetailView>,
    pub last_outcome: Option<CommandOutcome>,
    pub status_message: Option<String>,
}

impl<R: StatusRepository> StatusSync<R> {
    pub fn new(repo: Arc<R>, rt: Arc<tokio::runtime::Runtime>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            repo,
            rt,
            state: SnapshotState::initial(),
            tx,
            rx,
            latest_token: 0,
            in_flight: None,
            generation: 0,
            commands_in_flight: 0,
            detail_token: 0,
            detail: None,
            last_outcome: None,
            status_message: None,
        }
    }

    pub fn state(&self) -> &SnapshotState {
        &self.state
    }

    /// True while the latest fetch has not reported back.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of fetch results that have been applied to the snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn commands_in_flight(&self) -> usize {
        self.commands_in_flight
    }

    /// Start a load if one was requested and none is running.
    /// Returns true if a fetch was started.
    pub fn drive(&mut self) -> bool {
        if self.state.trigger_load && self.in_flight.is_none() {
            self.resync();
            return true;
        }
        false
    }

    /// Re-run the full fetch-and-normalize cycle. Supersedes any outstanding fetch.
    pub fn resync(&mut self) {
        self.apply(SnapshotEvent::FetchInit);

        self.latest_token += 1;
        let token = self.latest_token;
        self.in_flight = Some(token);

        let repo = Arc::clone(&self.repo);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = repo.fetch_snapshot().await;
            let _ = tx.send(SyncMessage::Fetched { token, result });
        });
        debug!(token, "snapshot fetch started");
    }

    /// Local notice that a host went away: stop loading and flag the view.
    pub fn remove_host_notice(&mut self) {
        self.apply(SnapshotEvent::RemoveHost);
    }

    /// Apply any finished background work without blocking.
    /// Returns true if anything visible changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        // Bounded so a burst of completions cannot stall the UI loop
        for _ in 0..100 {
            match self.rx.try_recv() {
                Ok(msg) => changed |= self.handle(msg),
                Err(_) => break,
            }
        }
        changed
    }

    /// Block until at least one completion arrives (or `timeout` passes), then
    /// drain whatever else is ready.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(msg) => {
                let changed = self.handle(msg);
                self.poll() || changed
            }
            Err(_) => false,
        }
    }

    /// Wait until no fetch or command is outstanding. False if `timeout` ran out first.
    pub fn settle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_fetching() || self.commands_in_flight > 0 {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            self.wait(left);
        }
        true
    }

    fn handle(&mut self, msg: SyncMessage) -> bool {
        match msg {
            SyncMessage::Fetched { token, result } => self.finish_fetch(token, result),
            SyncMessage::CommandDone { request, result } => {
                self.finish_command(request, result);
                true
            }
            SyncMessage::DetailLoaded { token, content } => self.finish_detail(token, content),
        }
    }

    fn finish_fetch(
        &mut self,
        token: u64,
        result: Result<Vec<ServiceStatusRecord>, FetchError>,
    ) -> bool {
        if token != self.latest_token {
            debug!(token, latest = self.latest_token, "discarding stale snapshot response");
            return false;
        }
        self.in_flight = None;
        self.generation += 1;

        match result {
            Ok(records) => {
                let count = records.len();
                let hosts = normalize(records);
                info!(records = count, hosts = hosts.len(), "snapshot loaded");
                self.apply(SnapshotEvent::FetchSuccess(hosts));
            }
            Err(e) => {
                warn!(error = %e, "snapshot fetch failed");
                self.apply(SnapshotEvent::FetchFailure(e.to_string()));
            }
        }
        true
    }

    fn apply(&mut self, event: SnapshotEvent) {
        debug!(event = event.name(), "snapshot transition");
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, event);
    }
}
