use std::io::{self, Write, stdout};
use crossterm::{cursor::MoveTo, execute, queue, style::{Color, SetForegroundColor, ResetColor, SetAttribute, Attribute}, terminal::{self, Clear, ClearType}};

use crate::model::{DetailContent, DetailView};
use super::shared::safe_truncate;

pub fn render_detail(title: &str, detail: Option<&DetailView>) -> io::Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    let size = terminal::size()?;
    let width = size.0 as usize;
    let height = size.1 as usize;

    let header = match detail {
        Some(d) => format!("  {} › {} on {}", title, d.service, d.hostname),
        None => format!("  {}", title),
    };
    queue!(io::stdout(), SetAttribute(Attribute::Bold))?;
    write!(out, "{}\r\n", header)?;
    queue!(io::stdout(), SetAttribute(Attribute::Reset))?;

    let sep: String = "─".repeat(width);
    queue!(io::stdout(), SetForegroundColor(Color::DarkGrey))?;
    write!(out, "{}\r\n", sep)?;
    queue!(io::stdout(), ResetColor)?;

    let area_height = height.saturating_sub(4);
    match detail.map(|d| &d.content) {
        None | Some(DetailContent::Loading) => {
            queue!(io::stdout(), SetForegroundColor(Color::Cyan))?;
            write!(out, "  Loading...\r\n")?;
            queue!(io::stdout(), ResetColor)?;
        }
        Some(DetailContent::Failed(reason)) => {
            queue!(io::stdout(), SetForegroundColor(Color::Red))?;
            write!(out, "  {}\r\n", safe_truncate(reason, width.saturating_sub(2)))?;
            queue!(io::stdout(), ResetColor)?;
        }
        Some(DetailContent::StatusLines(lines)) | Some(DetailContent::Properties(lines)) => {
            let offset = detail.map(|d| d.scroll_offset).unwrap_or(0);
            if lines.is_empty() {
                write!(out, "  (no output)\r\n")?;
            }
            for line in lines.iter().skip(offset).take(area_height) {
                write!(out, "{}\r\n", safe_truncate(line, width))?;
            }
        }
    }

    let help = "q/Esc/←: Back | ↑/↓: Scroll | r: Reload";
    let help_y = (height.saturating_sub(1)) as u16;
    queue!(
        out,
        MoveTo(1, help_y),
        SetForegroundColor(Color::DarkGrey),
        crossterm::style::Print(format!("{:<width$}", help, width = width)),
        ResetColor
    )?;

    out.flush()?;
    Ok(())
}
