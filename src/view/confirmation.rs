use std::io::{self, Write, stdout};
use crossterm::{cursor::MoveTo, queue, style::{Color, SetBackgroundColor, SetForegroundColor, SetAttribute, Attribute, ResetColor}, terminal};

/// Banner above the footer while a command waits for y/N.
pub fn render_confirmation(prompt: &str) -> io::Result<()> {
    let mut out = stdout();
    let (cols, rows) = terminal::size()?;
    let width = cols as usize;

    queue!(out, MoveTo(0, rows.saturating_sub(3)))?;
    queue!(out, SetBackgroundColor(Color::DarkRed), SetForegroundColor(Color::White), SetAttribute(Attribute::Bold))?;
    let line = format!("  {} [y/N]  ", prompt);
    write!(out, "{:<width$}", line, width = width)?;
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    out.flush()?;
    Ok(())
}
