use thiserror::Error;

/// Failure to retrieve the fleet-wide status snapshot.
///
/// The `Display` text is what ends up in `SnapshotState::error`, so keep it
/// readable on a single status line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("malformed payload: {0}")]
    Decode(String),
}

/// Failure of a per-service call (start/stop/restart/unfollow/status/show).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{operation} {service} on {hostname}: request failed: {reason}")]
    Transport {
        operation: String,
        hostname: String,
        service: String,
        reason: String,
    },
    #[error("{operation} {service} on {hostname}: server returned {code}: {message}")]
    Status {
        operation: String,
        hostname: String,
        service: String,
        code: u16,
        message: String,
    },
    #[error("{operation} {service} on {hostname}: malformed payload: {reason}")]
    Decode {
        operation: String,
        hostname: String,
        service: String,
        reason: String,
    },
}

impl ActionError {
    /// The remote operation that failed, e.g. `restart` or `unfollow`.
    pub fn operation(&self) -> &str {
        match self {
            ActionError::Transport { operation, .. }
            | ActionError::Status { operation, .. }
            | ActionError::Decode { operation, .. } => operation,
        }
    }
}

/// Configuration could not be loaded or is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
