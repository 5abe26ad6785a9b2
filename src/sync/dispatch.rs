use std::sync::Arc;

use tracing::{info, warn};

use crate::client::StatusRepository;
use crate::error::ActionError;
use crate::model::{Command, CommandRequest, DetailContent, DetailView, ServiceAction};

use super::{StatusSync, SyncMessage};

/// How the most recent command ended, for the status line.
#[derive(Clone, Debug, PartialEq)]
pub struct CommandOutcome {
    pub request: CommandRequest,
    pub error: Option<String>,
}

impl CommandOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn message(&self) -> String {
        match &self.error {
            None => self.request.done_message(),
            Some(e) => format!("Error: {}", e),
        }
    }
}

impl<R: StatusRepository> StatusSync<R> {
    /// Start/stop/restart a service (non-blocking).
    pub fn perform_action(&mut self, hostname: &str, service: &str, action: ServiceAction) {
        self.execute(CommandRequest::new(hostname, service, Command::Action(action)));
    }

    /// Stop following a service (non-blocking).
    pub fn unfollow(&mut self, hostname: &str, service: &str) {
        self.execute(CommandRequest::new(hostname, service, Command::Unfollow));
    }

    /// Send a command to the monitor. When it finishes, successfully or not, the
    /// whole snapshot is fetched again; nothing in `data` is patched locally
    /// because the outcome of a start/stop on the remote host is not knowable
    /// from the request.
    pub fn execute(&mut self, request: CommandRequest) {
        info!(
            command = request.command.name(),
            host = %request.hostname,
            service = %request.service,
            "dispatching command"
        );
        self.commands_in_flight += 1;
        self.status_message = Some(format!(
            "{} {} on {}...",
            request.command.name(),
            request.service,
            request.hostname
        ));

        let repo = Arc::clone(&self.repo);
        let tx = self.tx.clone();
        self.rt.spawn(async move {
            let result = match request.command {
                Command::Action(action) => repo
                    .invoke_action(&request.hostname, &request.service, action)
                    .await
                    .map(|_| ()),
                Command::Unfollow => {
                    repo.unfollow_service(&request.hostname, &request.service).await
                }
            };
            let _ = tx.send(SyncMessage::CommandDone { request, result });
        });
    }

    pub(super) fn finish_command(&mut self, request: CommandRequest, result: Result<(), ActionError>) {
        self.commands_in_flight = self.commands_in_flight.saturating_sub(1);

        let outcome = match result {
            Ok(()) => {
                info!(command = request.command.name(), host = %request.hostname, service = %request.service, "command delivered");
                CommandOutcome { request, error: None }
            }
            Err(e) => {
                warn!(error = %e, "command failed");
                CommandOutcome { request, error: Some(e.to_string()) }
            }
        };
        self.status_message = Some(outcome.message());
        self.last_outcome = Some(outcome);

        self.resync();
    }

    /// Load `systemctl status` lines into the detail view.
    pub fn request_status_lines(&mut self, hostname: &str, service: &str) {
        let token = self.open_detail(hostname, service);
        let repo = Arc::clone(&self.repo);
        let tx = self.tx.clone();
        let (host, svc) = (hostname.to_string(), service.to_string());
        self.rt.spawn(async move {
            let content = match repo.service_status(&host, &svc).await {
                Ok(lines) => DetailContent::StatusLines(lines),
                Err(e) => DetailContent::Failed(e.to_string()),
            };
            let _ = tx.send(SyncMessage::DetailLoaded { token, content });
        });
    }

    /// Load `systemctl show` properties into the detail view as sorted `key: value` lines.
    pub fn request_properties(&mut self, hostname: &str, service: &str) {
        let token = self.open_detail(hostname, service);
        let repo = Arc::clone(&self.repo);
        let tx = self.tx.clone();
        let (host, svc) = (hostname.to_string(), service.to_string());
        self.rt.spawn(async move {
            let content = match repo.service_properties(&host, &svc).await {
                Ok(props) => DetailContent::Properties(
                    props.into_iter().map(|(k, v)| format!("{}: {}", k, v)).collect(),
                ),
                Err(e) => DetailContent::Failed(e.to_string()),
            };
            let _ = tx.send(SyncMessage::DetailLoaded { token, content });
        });
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.detail_token += 1;
    }

    fn open_detail(&mut self, hostname: &str, service: &str) -> u64 {
        self.detail_token += 1;
        self.detail = Some(DetailView::loading(hostname, service));
        self.detail_token
    }

    pub(super) fn finish_detail(&mut self, token: u64, content: DetailContent) -> bool {
        if token != self.detail_token {
            return false;
        }
        if let DetailContent::Failed(ref e) = content {
            warn!(error = %e, "detail request failed");
        }
        match self.detail.as_mut() {
            Some(detail) => {
                detail.content = content;
                detail.scroll_offset = 0;
                true
            }
            None => false,
        }
    }
}
