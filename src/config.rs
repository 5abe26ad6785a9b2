use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::model::ServiceAction;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "svcmon.toml";

/// Terminal dashboard for systemd services across a fleet of hosts.
#[derive(Parser, Debug)]
#[command(name = "svcmon", version, about)]
pub struct Cli {
    /// Path to a TOML config file (default: ./svcmon.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the service monitor API, e.g. http://monitor:8000
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Seconds between automatic refreshes of the dashboard
    #[arg(long, global = true)]
    pub refresh: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Directory for the dashboard's log files
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Interactive dashboard (default)
    Dashboard,
    /// Print the current fleet snapshot
    Snapshot {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Start, stop or restart a service
    Action {
        action: ServiceAction,
        host: String,
        service: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Stop following a service
    Unfollow {
        host: String,
        service: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show `systemctl status` output for a service
    Status { host: String, service: String },
    /// Show `systemctl show` properties for a service
    Show { host: String, service: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_refresh")]
    pub refresh_secs: u64,
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_refresh() -> u64 {
    30
}

fn default_confirm_timeout() -> u64 {
    5
}

fn default_log_dir() -> PathBuf {
    std::env::temp_dir().join("svcmon")
}

fn default_filter() -> String {
    "svcmon=info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout() }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self { refresh_secs: default_refresh(), confirm_timeout_secs: default_confirm_timeout() }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { dir: default_log_dir(), filter: default_filter() }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// File (explicit, or `./svcmon.toml` if it exists), then CLI overrides, then validation.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.api.base_url = url.clone();
        }
        if let Some(secs) = cli.timeout {
            self.api.timeout_secs = secs;
        }
        if let Some(secs) = cli.refresh {
            self.dashboard.refresh_secs = secs;
        }
        if let Some(dir) = &cli.log_dir {
            self.logging.dir = dir.clone();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {}", self.api.base_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.dashboard.refresh_secs == 0 {
            return Err(ConfigError::Invalid("refresh_secs must be at least 1".into()));
        }
        if self.dashboard.confirm_timeout_secs == 0 {
            return Err(ConfigError::Invalid("confirm_timeout_secs must be at least 1".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_secs)
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.dashboard.confirm_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("svcmon").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.confirm_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn partial_file_keeps_section_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"https://monitor.lan\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://monitor.lan");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.dashboard.refresh_secs, 30);
        assert_eq!(config.logging.filter, "svcmon=info");
    }

    #[test]
    fn cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nbase_url = \"http://from-file:8000\"\ntimeout_secs = 3").unwrap();
        writeln!(file, "[dashboard]\nrefresh_secs = 60").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = Config::resolve(&cli(&["--config", &path, "--refresh", "5"])).unwrap();
        assert_eq!(config.api.base_url, "http://from-file:8000");
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.dashboard.refresh_secs, 5);

        let config = Config::resolve(&cli(&["--config", &path, "--url", "http://cli:9000"])).unwrap();
        assert_eq!(config.api.base_url, "http://cli:9000");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = Config::resolve(&cli(&["--config", "/nonexistent/svcmon.toml"])).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn rejects_unusable_values() {
        let mut config = Config::default();
        config.api.base_url = "ftp://monitor".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.dashboard.refresh_secs = 0;
        assert!(config.validate().is_err());

        // A zero window would cancel every prompt before it could be answered.
        let mut config = Config::default();
        config.dashboard.confirm_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn parses_subcommands() {
        assert_eq!(cli(&[]).command, None);
        assert_eq!(
            cli(&["action", "restart", "web1", "nginx", "--yes"]).command,
            Some(CliCommand::Action {
                action: ServiceAction::Restart,
                host: "web1".into(),
                service: "nginx".into(),
                yes: true,
            })
        );
        assert_eq!(
            cli(&["unfollow", "db1", "postgres"]).command,
            Some(CliCommand::Unfollow { host: "db1".into(), service: "postgres".into(), yes: false })
        );
    }
}
