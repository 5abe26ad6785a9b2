use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;

use svcmon::client::{StatusClient, StatusRepository};
use svcmon::config::{Cli, CliCommand, Config};
use svcmon::confirm::{AssumeYes, ConfirmationGate, PromptGate, gated};
use svcmon::model::{Command, CommandRequest};
use svcmon::sync::StatusSync;
use svcmon::view::{format_last_check, truncate_str};
use svcmon::{app, logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(&cli).context("failed to load configuration")?;

    match cli.command.clone().unwrap_or(CliCommand::Dashboard) {
        CliCommand::Dashboard => run_dashboard(&config),
        command => {
            logging::init_stderr(&config.logging.filter);
            run_command(&config, command)
        }
    }
}

fn run_dashboard(config: &Config) -> anyhow::Result<()> {
    let _guard = logging::init_file(&config.logging.dir, &config.logging.filter)
        .with_context(|| format!("cannot open log directory {}", config.logging.dir.display()))?;

    let should_quit = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&should_quit))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&should_quit))?;

    // Put the terminal back before the panic message is printed.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        app::restore_terminal();
        default_hook(info);
    }));

    app::run(config, should_quit).context("dashboard terminated with an error")
}

fn run_command(config: &Config, command: CliCommand) -> anyhow::Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()
            .context("failed to start async runtime")?,
    );
    let client = Arc::new(StatusClient::new(&config.api.base_url, config.request_timeout()));
    // Enough for one command plus the resync that follows it.
    let budget = config.request_timeout() * 2 + Duration::from_secs(1);

    match command {
        CliCommand::Dashboard => run_dashboard(config),
        CliCommand::Snapshot { json } => {
            let mut sync = StatusSync::new(client, rt);
            sync.drive();
            if !sync.settle(budget) {
                bail!("timed out waiting for {}", config.api.base_url);
            }
            let state = sync.state();
            if state.is_error {
                bail!("{}", state.error);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&state.data)?);
            } else {
                for host in &state.data {
                    println!("{}", host.hostname);
                    for svc in &host.services {
                        println!(
                            "  {:<24} {:<12} {:<9} {:<20} {}",
                            truncate_str(&svc.name, 24),
                            truncate_str(&svc.active_status, 12),
                            svc.enabled,
                            format_last_check(svc.last_check),
                            svc.description,
                        );
                    }
                }
            }
            Ok(())
        }
        CliCommand::Action { action, host, service, yes } => {
            let request = CommandRequest::new(&host, &service, Command::Action(action));
            dispatch(client, rt, request, yes, budget)
        }
        CliCommand::Unfollow { host, service, yes } => {
            let request = CommandRequest::new(&host, &service, Command::Unfollow);
            dispatch(client, rt, request, yes, budget)
        }
        CliCommand::Status { host, service } => {
            let lines = rt.block_on(client.service_status(&host, &service))?;
            for line in lines {
                println!("{}", line);
            }
            Ok(())
        }
        CliCommand::Show { host, service } => {
            let properties = rt.block_on(client.service_properties(&host, &service))?;
            for (key, value) in properties {
                println!("{}: {}", key, value);
            }
            Ok(())
        }
    }
}

/// Confirm, send, then wait for the command and the resync behind it.
fn dispatch(
    client: Arc<StatusClient>,
    rt: Arc<tokio::runtime::Runtime>,
    request: CommandRequest,
    assume_yes: bool,
    budget: Duration,
) -> anyhow::Result<()> {
    let mut gate: Box<dyn ConfirmationGate> = if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptGate::stdio())
    };

    let mut sync = StatusSync::new(client, rt);
    let prompt = request.prompt();
    if gated(gate.as_mut(), &prompt, || sync.execute(request)).is_none() {
        eprintln!("Cancelled");
        return Ok(());
    }

    if !sync.settle(budget) {
        bail!("timed out waiting for the command to finish");
    }
    let outcome = sync.last_outcome.take().context("command finished without an outcome")?;
    if let Some(reason) = &outcome.error {
        bail!("{}", reason);
    }
    println!("{}", outcome.message());
    info!(generation = sync.generation(), "resynced after command");
    Ok(())
}
