use std::io::{self, Write};
use crossterm::{
    cursor, queue,
    style::{Color, SetForegroundColor, SetBackgroundColor, ResetColor},
    terminal,
};

use crate::snapshot::SnapshotState;

pub fn render_header(
    out: &mut impl Write,
    state: &SnapshotState,
    commands_in_flight: usize,
    time: &str,
) -> io::Result<()> {
    let host_count = state.data.len();
    let service_count: usize = state.data.iter().map(|h| h.services.len()).sum();
    let unhealthy: usize = state.data.iter().map(|h| h.unhealthy_count()).sum();

    write!(out, "  ")?;
    queue!(io::stdout(), SetBackgroundColor(Color::DarkBlue), SetForegroundColor(Color::White))?;
    write!(out, " Services ")?;
    queue!(io::stdout(), ResetColor)?;
    write!(out, "  {} hosts, {} services", host_count, service_count)?;

    if unhealthy > 0 {
        queue!(io::stdout(), SetForegroundColor(Color::Red))?;
        write!(out, "  {} not active", unhealthy)?;
        queue!(io::stdout(), ResetColor)?;
    }

    if state.is_loading {
        queue!(io::stdout(), SetForegroundColor(Color::Cyan))?;
        write!(out, "  Loading...")?;
        queue!(io::stdout(), ResetColor)?;
    }

    if commands_in_flight > 0 {
        queue!(io::stdout(), SetForegroundColor(Color::Yellow))?;
        write!(out, "  {} command(s) running", commands_in_flight)?;
        queue!(io::stdout(), ResetColor)?;
    }

    // Right-align the time
    let size = terminal::size()?;
    let time_str = format!("svcmon - {} ", time);
    let col = (size.0 as usize).saturating_sub(time_str.len());
    queue!(io::stdout(), cursor::MoveTo(col as u16, 0))?;
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}", time_str)?;
    queue!(io::stdout(), ResetColor)?;

    write!(out, "\r\n")?;
    // Separator
    let sep: String = "─".repeat(size.0 as usize);
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}\r\n", sep)?;
    queue!(io::stdout(), ResetColor)?;

    Ok(())
}
