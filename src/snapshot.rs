//! Reducer for the fleet-wide status snapshot.

use crate::model::HostView;

/// Everything the dashboard renders about the fleet.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotState {
    pub data: Vec<HostView>,
    pub is_loading: bool,
    pub is_error: bool,
    pub error: String,
    /// A (re)load should be started. Not the same as "a load is running".
    pub trigger_load: bool,
}

impl SnapshotState {
    /// Session start: nothing loaded yet, first load requested.
    pub fn initial() -> Self {
        Self {
            data: Vec::new(),
            is_loading: false,
            is_error: false,
            error: String::new(),
            trigger_load: true,
        }
    }
}

impl Default for SnapshotState {
    fn default() -> Self {
        Self::initial()
    }
}

/// The only ways a snapshot changes.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotEvent {
    FetchInit,
    /// Payload must already be normalized.
    FetchSuccess(Vec<HostView>),
    FetchFailure(String),
    /// Local removal notice: stop loading and flag the view without a message.
    RemoveHost,
}

impl SnapshotEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SnapshotEvent::FetchInit => "fetch_init",
            SnapshotEvent::FetchSuccess(_) => "fetch_success",
            SnapshotEvent::FetchFailure(_) => "fetch_failure",
            SnapshotEvent::RemoveHost => "remove_host",
        }
    }
}

/// Apply one event. Failures and removal notices leave `data` untouched so the
/// last good snapshot stays on screen next to the error.
pub fn transition(state: SnapshotState, event: SnapshotEvent) -> SnapshotState {
    match event {
        SnapshotEvent::FetchInit => SnapshotState {
            trigger_load: true,
            is_loading: true,
            is_error: false,
            error: String::new(),
            ..state
        },
        SnapshotEvent::FetchSuccess(data) => SnapshotState {
            data,
            trigger_load: false,
            is_loading: false,
            is_error: false,
            error: String::new(),
        },
        SnapshotEvent::FetchFailure(message) => SnapshotState {
            trigger_load: false,
            is_loading: false,
            is_error: true,
            error: message,
            ..state
        },
        SnapshotEvent::RemoveHost => SnapshotState {
            trigger_load: false,
            is_loading: false,
            is_error: true,
            error: String::new(),
            ..state
        },
    }
}
