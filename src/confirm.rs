//! Confirm-before-commit for every command that changes remote state.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use tracing::info;

use crate::model::CommandRequest;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Cancel,
}

/// Something that can ask the operator a yes/no question.
pub trait ConfirmationGate {
    fn request_confirmation(&mut self, prompt: &str) -> Decision;
}

/// Run `commit` only if the gate says yes.
pub fn gated<G, T>(gate: &mut G, prompt: &str, commit: impl FnOnce() -> T) -> Option<T>
where
    G: ConfirmationGate + ?Sized,
{
    match gate.request_confirmation(prompt) {
        Decision::Confirm => Some(commit()),
        Decision::Cancel => {
            info!(prompt, "cancelled by operator");
            None
        }
    }
}

/// Line-oriented prompt: `y`/`yes` (any case) confirms, anything else cancels.
pub struct PromptGate<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> PromptGate<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl PromptGate<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<I: BufRead, O: Write> ConfirmationGate for PromptGate<I, O> {
    fn request_confirmation(&mut self, prompt: &str) -> Decision {
        if write!(self.output, "{} [y/N] ", prompt).and_then(|_| self.output.flush()).is_err() {
            return Decision::Cancel;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) if matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") => {
                Decision::Confirm
            }
            _ => Decision::Cancel,
        }
    }
}

/// `--yes`: the operator confirmed up front.
pub struct AssumeYes;

impl ConfirmationGate for AssumeYes {
    fn request_confirmation(&mut self, _prompt: &str) -> Decision {
        Decision::Confirm
    }
}

/// A command waiting on an interactive yes/no, dropped when it expires.
pub struct PendingCommand {
    pub request: CommandRequest,
    pub description: String,
    pub expires: Instant,
}

impl PendingCommand {
    pub fn new(request: CommandRequest, ttl: Duration) -> Self {
        let description = request.prompt();
        Self {
            request,
            description,
            expires: Instant::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires
    }

    /// Settle the question; `commit` receives the request only on `Confirm`.
    pub fn resolve<T>(self, decision: Decision, commit: impl FnOnce(CommandRequest) -> T) -> Option<T> {
        match decision {
            Decision::Confirm => Some(commit(self.request)),
            Decision::Cancel => {
                info!(prompt = %self.description, "cancelled by operator");
                None
            }
        }
    }
}
