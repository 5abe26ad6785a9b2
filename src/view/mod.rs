mod shared;
mod header;
mod hosts;
mod detail;
mod confirmation;

use std::io::{self, Write};
use crossterm::{execute, cursor, queue, style::{Color, SetForegroundColor, ResetColor}, terminal};

use crate::model::{DashboardUIState, DetailView};
use crate::snapshot::SnapshotState;

pub use shared::{truncate_str, safe_truncate, format_last_check};

pub struct Presenter;

/// Minimum terminal dimensions for usable rendering.
pub const MIN_COLS: u16 = 80;
pub const MIN_ROWS: u16 = 10;

impl Presenter {
    /// Check if the terminal is large enough. If not, render a "too small"
    /// message and return `true` (meaning "skip normal rendering").
    pub fn render_size_guard() -> io::Result<bool> {
        let (cols, rows) = terminal::size()?;
        if cols < MIN_COLS || rows < MIN_ROWS {
            let mut out = std::io::stdout();
            execute!(out, terminal::Clear(terminal::ClearType::All), cursor::MoveTo(0, 0))?;
            let msg = format!(
                "Terminal too small ({}x{}). Resize to at least {}x{}.",
                cols, rows, MIN_COLS, MIN_ROWS
            );
            let y = rows / 2;
            let x = cols.saturating_sub(msg.len() as u16) / 2;
            queue!(out, cursor::MoveTo(x, y), SetForegroundColor(Color::Yellow))?;
            write!(out, "{}", msg)?;
            queue!(out, ResetColor)?;
            out.flush()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn render_header(
        out: &mut impl Write,
        state: &SnapshotState,
        commands_in_flight: usize,
        time: &str,
    ) -> io::Result<()> {
        header::render_header(out, state, commands_in_flight, time)
    }

    pub fn render_hosts(
        state: &SnapshotState,
        ui_state: &DashboardUIState,
        status_message: &Option<String>,
    ) -> io::Result<()> {
        hosts::render_hosts(state, ui_state, status_message)
    }

    pub fn render_detail(title: &str, detail: Option<&DetailView>) -> io::Result<()> {
        detail::render_detail(title, detail)
    }

    pub fn render_confirmation(prompt: &str) -> io::Result<()> {
        confirmation::render_confirmation(prompt)
    }
}
