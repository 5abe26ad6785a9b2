use std::io::{self, Write, stdout};
use crossterm::{cursor, queue, style::{Color, SetForegroundColor, ResetColor, SetAttribute, Attribute}};

use crate::model::{DashboardUIState, HostView};
use crate::snapshot::SnapshotState;
use super::shared::{format_last_check, status_color, truncate_str, writeln, write_section_header, write_selectable};

/// Header, separator, error line and column header.
const TOP_ROWS: usize = 4;
/// Footer plus the line the last `\r\n` moves the cursor onto.
const BOTTOM_ROWS: usize = 2;
/// Blank spacer and the status message itself.
const MESSAGE_ROWS: usize = 2;

/// Table rows that fit without pushing the screen up.
pub(crate) fn visible_rows(height: u16, has_message: bool) -> usize {
    let message = if has_message { MESSAGE_ROWS } else { 0 };
    (height as usize).saturating_sub(TOP_ROWS + BOTTOM_ROWS + message).max(1)
}

pub fn render_hosts(
    state: &SnapshotState,
    ui_state: &DashboardUIState,
    status_message: &Option<String>,
) -> io::Result<()> {
    let mut out = stdout();
    queue!(out, cursor::MoveTo(0, 2))?;

    let size = crossterm::terminal::size()?;
    let visible = visible_rows(size.1, status_message.is_some());

    if state.is_error {
        let msg = if state.error.is_empty() { "Something went wrong" } else { state.error.as_str() };
        queue!(io::stdout(), SetForegroundColor(Color::Red))?;
        writeln(&mut out, &format!("  {}", msg))?;
        queue!(io::stdout(), ResetColor)?;
    } else {
        writeln(&mut out, "")?;
    }

    if state.data.is_empty() {
        if state.is_loading {
            writeln(&mut out, "  Loading service statuses...")?;
        } else {
            writeln(&mut out, "  No hosts reported.")?;
            writeln(&mut out, "")?;
            writeln(&mut out, "  Nothing is being followed yet, or the status API returned no records.")?;
        }
    } else {
        queue!(io::stdout(), SetAttribute(Attribute::Bold))?;
        write!(out, "    {:<24} {:<14} {:<10} {:<20} {}",
            "NAME", "STATUS", "ENABLED", "LAST CHECK", "DESCRIPTION")?;
        queue!(io::stdout(), SetAttribute(Attribute::Reset))?;
        write!(out, "\r\n")?;

        // Keep the cursor inside the window.
        let first = ui_state.selected_index.saturating_sub(visible.saturating_sub(1));
        let last = first + visible;
        let mut row = 0usize;

        for host in &state.data {
            if (first..last).contains(&row) {
                write_host(&mut out, host, ui_state, row == ui_state.selected_index)?;
            }
            row += 1;
            if ui_state.is_collapsed(&host.hostname) {
                continue;
            }
            for svc in &host.services {
                if (first..last).contains(&row) {
                    let selected = row == ui_state.selected_index;
                    let line = format!("    {:<24} {:<14} {:<10} {:<20} {}",
                        truncate_str(&svc.name, 22),
                        truncate_str(&svc.active_status, 12),
                        svc.enabled,
                        format_last_check(svc.last_check),
                        truncate_str(&svc.description, 40),
                    );
                    if !selected && !svc.is_active() {
                        queue!(io::stdout(), SetForegroundColor(status_color(&svc.active_status)))?;
                        writeln(&mut out, &line)?;
                        queue!(io::stdout(), ResetColor)?;
                    } else {
                        write_selectable(&mut out, &line, selected)?;
                    }
                }
                row += 1;
            }
        }
    }

    if let Some(msg) = status_message {
        writeln(&mut out, "")?;
        queue!(io::stdout(), SetForegroundColor(Color::Yellow))?;
        writeln(&mut out, &format!("  {}", msg))?;
        queue!(io::stdout(), ResetColor)?;
    }

    let help = "q: Quit | ↑/↓: Navigate | ←/→: Collapse/Expand | Enter: Status | i: Properties | S: Start | T: Stop | R: Restart | U: Unfollow | r: Refresh (confirm with y)";
    let help_y = size.1.saturating_sub(1);
    queue!(
        out,
        cursor::MoveTo(1, help_y),
        SetForegroundColor(Color::DarkGrey),
        crossterm::style::Print(format!("{:<width$}", help, width = size.0 as usize)),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}

fn write_host(out: &mut impl Write, host: &HostView, ui_state: &DashboardUIState, selected: bool) -> io::Result<()> {
    let marker = if ui_state.is_collapsed(&host.hostname) { "▸" } else { "▾" };
    let unhealthy = host.unhealthy_count();
    let summary = if unhealthy > 0 {
        format!("{} services, {} not active", host.services.len(), unhealthy)
    } else {
        format!("{} services", host.services.len())
    };
    write_section_header(out, &format!("  {} {}  ({})", marker, host.hostname, summary), selected)
}
