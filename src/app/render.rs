use std::io;

use crossterm::{execute, cursor::MoveTo, terminal::Clear, terminal::ClearType};

use crate::client::StatusRepository;
use crate::model::AppView;
use crate::view::Presenter;

use super::App;

pub fn render<R: StatusRepository>(app: &App<R>) -> io::Result<()> {
    let time_str = chrono::Local::now().format("%H:%M:%S").to_string();
    let mut out = io::stdout();

    match &app.app_view {
        AppView::Dashboard => {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
            Presenter::render_header(
                &mut out,
                app.sync.state(),
                app.sync.commands_in_flight(),
                &time_str,
            )?;
            Presenter::render_hosts(
                app.sync.state(),
                &app.ui_state,
                &app.sync.status_message,
            )?;
        }
        AppView::ServiceStatus(_, _) => {
            Presenter::render_detail("Status", app.sync.detail.as_ref())?;
        }
        AppView::ServiceProperties(_, _) => {
            Presenter::render_detail("Properties", app.sync.detail.as_ref())?;
        }
    }

    Ok(())
}
