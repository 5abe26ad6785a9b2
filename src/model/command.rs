use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

/// Remote lifecycle operation on a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

impl ServiceAction {
    /// Path segment under `/api/systemctl/`.
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            ServiceAction::Start => "Start",
            ServiceAction::Stop => "Stop",
            ServiceAction::Restart => "Restart",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            ServiceAction::Start => "started",
            ServiceAction::Stop => "stopped",
            ServiceAction::Restart => "restarted",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything the dispatcher can do to a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Action(ServiceAction),
    /// Drop the service from the monitored set.
    Unfollow,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Command::Action(action) => action.as_str(),
            Command::Unfollow => "unfollow",
        }
    }
}

/// A command bound to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandRequest {
    pub hostname: String,
    pub service: String,
    pub command: Command,
}

impl CommandRequest {
    pub fn new(hostname: &str, service: &str, command: Command) -> Self {
        Self {
            hostname: hostname.to_string(),
            service: service.to_string(),
            command,
        }
    }

    /// Question shown before the command is committed.
    pub fn prompt(&self) -> String {
        match self.command {
            Command::Action(action) => {
                format!("{} {} on {}?", action.verb(), self.service, self.hostname)
            }
            Command::Unfollow => {
                format!("Stop following {} on {}?", self.service, self.hostname)
            }
        }
    }

    /// Status line once the remote call has succeeded.
    pub fn done_message(&self) -> String {
        match self.command {
            Command::Action(action) => {
                format!("{} {} on {}", capitalize(action.past_tense()), self.service, self.hostname)
            }
            Command::Unfollow => {
                format!("No longer following {} on {}", self.service, self.hostname)
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}
