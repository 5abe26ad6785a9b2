use std::time::Instant;

use crate::client::StatusRepository;
use crate::confirm::Decision;

use super::state::{clamp_selection, dashboard_rows};
use super::App;

impl<R: StatusRepository> App<R> {
    /// Periodic refresh. Skipped while a fetch is still out.
    pub fn process_tick(&mut self) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_refresh) < self.refresh_interval {
            return false;
        }
        self.last_refresh = now;
        if self.sync.is_fetching() {
            return false;
        }
        self.sync.resync();
        true
    }

    /// Start a requested load, apply finished background work, rebuild rows.
    pub fn poll_sync(&mut self) -> bool {
        let started = self.sync.drive();
        let changed = self.sync.poll();
        if changed {
            self.rebuild_rows();
        }
        started || changed
    }

    /// Manual refresh.
    pub fn refresh_now(&mut self) {
        self.last_refresh = Instant::now();
        self.sync.resync();
    }

    pub fn rebuild_rows(&mut self) {
        self.rows = dashboard_rows(&self.sync.state().data, &self.ui_state);
        clamp_selection(&mut self.ui_state, self.rows.len());
    }

    /// Expire pending confirmation if timed out.
    pub fn expire_pending_action(&mut self) -> bool {
        let expired = self
            .pending_action
            .as_ref()
            .is_some_and(|pa| pa.is_expired(Instant::now()));
        if expired {
            if let Some(pa) = self.pending_action.take() {
                pa.resolve(Decision::Cancel, |_| ());
            }
        }
        expired
    }
}
