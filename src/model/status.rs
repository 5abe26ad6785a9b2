use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the monitor's latest-status table: a single service on a single host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatusRecord {
    pub hostname: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub active_status: Option<String>,
    #[serde(default)]
    pub last_check: Option<NaiveDateTime>,
}

/// Display form of the remote `enabled` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnabledState {
    Enabled,
    Disabled,
}

impl EnabledState {
    pub fn as_str(self) -> &'static str {
        match self {
            EnabledState::Enabled => "enabled",
            EnabledState::Disabled => "disabled",
        }
    }
}

impl From<bool> for EnabledState {
    fn from(enabled: bool) -> Self {
        if enabled { EnabledState::Enabled } else { EnabledState::Disabled }
    }
}

impl fmt::Display for EnabledState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service as shown under its host.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceView {
    pub name: String,
    pub description: String,
    pub enabled: EnabledState,
    pub active_status: String,
    pub last_check: Option<NaiveDateTime>,
}

impl ServiceView {
    /// Only the literal `"active"` counts; every other remote state is flagged.
    pub fn is_active(&self) -> bool {
        self.active_status == "active"
    }
}

/// A host and its services in arrival order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostView {
    pub hostname: String,
    pub services: Vec<ServiceView>,
}

impl HostView {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self { hostname: hostname.into(), services: Vec::new() }
    }

    /// Number of services on this host that are not `"active"`.
    pub fn unhealthy_count(&self) -> usize {
        self.services.iter().filter(|s| !s.is_active()).count()
    }
}
