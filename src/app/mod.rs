mod state;
mod event_loop;
mod render;
mod input;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, Clear, ClearType},
};
use tracing::info;

use crate::client::{StatusClient, StatusRepository};
use crate::config::Config;
use crate::confirm::PendingCommand;
use crate::model::{AppView, DashboardUIState};
use crate::sync::StatusSync;
use crate::view::Presenter;

pub use input::{handle_key, InputResult};
pub use state::{clamp_selection, dashboard_rows, DashboardRow};

/// Restore the terminal to normal mode. Safe to call multiple times.
pub fn restore_terminal() {
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
    let _ = disable_raw_mode();
}

/// Dashboard state and event loop.
pub struct App<R: StatusRepository> {
    pub sync: StatusSync<R>,
    pub app_view: AppView,
    pub ui_state: DashboardUIState,
    pub rows: Vec<DashboardRow>,
    pub pending_action: Option<PendingCommand>,
    pub last_refresh: Instant,
    pub refresh_interval: Duration,
    pub confirm_timeout: Duration,
}

impl<R: StatusRepository> App<R> {
    pub fn new(sync: StatusSync<R>, refresh_interval: Duration, confirm_timeout: Duration) -> Self {
        Self {
            sync,
            app_view: AppView::Dashboard,
            ui_state: DashboardUIState::default(),
            rows: Vec::new(),
            pending_action: None,
            last_refresh: Instant::now(),
            refresh_interval,
            confirm_timeout,
        }
    }

    /// Row under the cursor, if any.
    pub fn selected_row(&self) -> Option<&DashboardRow> {
        self.rows.get(self.ui_state.selected_index)
    }
}

/// Run the dashboard. Sets up terminal, runs the main loop, restores terminal on exit.
pub fn run(config: &Config, should_quit: Arc<AtomicBool>) -> io::Result<()> {
    let rt = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .worker_threads(2)
            .build()?,
    );
    let client = Arc::new(StatusClient::new(&config.api.base_url, config.request_timeout()));
    let sync = StatusSync::new(client, rt);
    let mut app = App::new(sync, config.refresh_interval(), config.confirm_timeout());
    info!(url = %config.api.base_url, "dashboard started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Clear(ClearType::All))?;

    let tick = Duration::from_millis(100);
    let mut needs_render = true;

    loop {
        if should_quit.load(Ordering::Relaxed) {
            break;
        }

        if app.expire_pending_action() {
            needs_render = true;
        }
        if app.process_tick() {
            needs_render = true;
        }
        if app.poll_sync() {
            needs_render = true;
        }

        if needs_render {
            if Presenter::render_size_guard()? {
                needs_render = false;
                if crossterm::event::poll(tick)? {
                    let _ = crossterm::event::read()?;
                    needs_render = true;
                }
                continue;
            }

            render::render(&app)?;

            if let Some(ref pa) = app.pending_action {
                Presenter::render_confirmation(&pa.description)?;
            }

            needs_render = false;
        }

        if crossterm::event::poll(tick)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key_event) => match handle_key(&mut app, key_event) {
                    Some(InputResult::Quit) => break,
                    Some(InputResult::Consumed) => needs_render = true,
                    None => {}
                },
                crossterm::event::Event::Resize(_, _) => needs_render = true,
                _ => {}
            }
        }
    }

    restore_terminal();
    info!("dashboard stopped");
    Ok(())
}
