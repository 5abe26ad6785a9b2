use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::client::StatusRepository;
use crate::confirm::{Decision, PendingCommand};
use crate::model::{AppView, Command, CommandRequest, ServiceAction};

use super::state::DashboardRow;
use super::App;

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was handled and
/// a render is needed, None if the key was not handled.
pub fn handle_key<R: StatusRepository>(app: &mut App<R>, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }

    if let Some(pa) = app.pending_action.take() {
        let decision = match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Decision::Confirm,
            _ => Decision::Cancel,
        };
        pa.resolve(decision, |request| app.sync.execute(request));
        return Some(InputResult::Consumed);
    }

    match &app.app_view {
        AppView::Dashboard => handle_dashboard(app, code),
        AppView::ServiceStatus(_, _) | AppView::ServiceProperties(_, _) => handle_detail(app, code),
    }
}

fn handle_dashboard<R: StatusRepository>(app: &mut App<R>, code: KeyCode) -> Option<InputResult> {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(InputResult::Quit),
        KeyCode::Up => {
            if app.ui_state.selected_index > 0 {
                app.ui_state.selected_index -= 1;
                return Some(InputResult::Consumed);
            }
        }
        KeyCode::Down => {
            if app.ui_state.selected_index + 1 < app.rows.len() {
                app.ui_state.selected_index += 1;
                return Some(InputResult::Consumed);
            }
        }
        KeyCode::Char('r') => {
            app.refresh_now();
            return Some(InputResult::Consumed);
        }
        KeyCode::Left => {
            if let Some(DashboardRow::Host(hostname)) = app.selected_row().cloned() {
                if !app.ui_state.is_collapsed(&hostname) {
                    app.ui_state.toggle_host(&hostname);
                    app.rebuild_rows();
                    return Some(InputResult::Consumed);
                }
            }
        }
        KeyCode::Right | KeyCode::Enter => match app.selected_row().cloned() {
            Some(DashboardRow::Host(hostname)) => {
                if app.ui_state.is_collapsed(&hostname) {
                    app.ui_state.toggle_host(&hostname);
                    app.rebuild_rows();
                    return Some(InputResult::Consumed);
                }
            }
            Some(DashboardRow::Service(hostname, service)) => {
                app.sync.request_status_lines(&hostname, &service);
                app.app_view = AppView::ServiceStatus(hostname, service);
                return Some(InputResult::Consumed);
            }
            None => {}
        },
        KeyCode::Char('i') => {
            if let Some(DashboardRow::Service(hostname, service)) = app.selected_row().cloned() {
                app.sync.request_properties(&hostname, &service);
                app.app_view = AppView::ServiceProperties(hostname, service);
                return Some(InputResult::Consumed);
            }
        }
        KeyCode::Char('S') => return ask(app, Command::Action(ServiceAction::Start)),
        KeyCode::Char('T') => return ask(app, Command::Action(ServiceAction::Stop)),
        KeyCode::Char('R') => return ask(app, Command::Action(ServiceAction::Restart)),
        KeyCode::Char('U') => return ask(app, Command::Unfollow),
        _ => {}
    }
    None
}

/// Queue a command for the selected service behind the confirmation prompt.
fn ask<R: StatusRepository>(app: &mut App<R>, command: Command) -> Option<InputResult> {
    let Some(DashboardRow::Service(hostname, service)) = app.selected_row().cloned() else {
        return None;
    };
    let request = CommandRequest::new(&hostname, &service, command);
    app.pending_action = Some(PendingCommand::new(request, app.confirm_timeout));
    Some(InputResult::Consumed)
}

fn handle_detail<R: StatusRepository>(app: &mut App<R>, code: KeyCode) -> Option<InputResult> {
    let visible = crossterm::terminal::size()
        .map(|(_, h)| h as usize)
        .unwrap_or(24)
        .saturating_sub(4);

    match code {
        KeyCode::Char('q') | KeyCode::Esc | KeyCode::Left => {
            app.sync.close_detail();
            app.app_view = AppView::Dashboard;
            Some(InputResult::Consumed)
        }
        KeyCode::Up => {
            if let Some(ref mut detail) = app.sync.detail {
                detail.scroll_up();
            }
            Some(InputResult::Consumed)
        }
        KeyCode::Down => {
            if let Some(ref mut detail) = app.sync.detail {
                detail.scroll_down(visible);
            }
            Some(InputResult::Consumed)
        }
        KeyCode::Char('r') => {
            if let Some((hostname, service)) = app.app_view.target() {
                let (hostname, service) = (hostname.to_string(), service.to_string());
                match app.app_view {
                    AppView::ServiceProperties(_, _) => app.sync.request_properties(&hostname, &service),
                    _ => app.sync.request_status_lines(&hostname, &service),
                }
            }
            Some(InputResult::Consumed)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::sync::StatusSync;
    use crate::sync::fake::{FakeRepository, record, runtime};

    const WAIT: Duration = Duration::from_secs(5);

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_app(repo: &Arc<FakeRepository>) -> App<FakeRepository> {
        repo.push_snapshot(Ok(vec![
            record("web1", "nginx", "active"),
            record("web1", "cron", "failed"),
            record("db1", "postgres", "active"),
        ]));
        let sync = StatusSync::new(Arc::clone(repo), runtime());
        let mut app = App::new(sync, Duration::from_secs(60), Duration::from_secs(5));
        app.sync.drive();
        app.sync.wait(WAIT);
        app.rebuild_rows();
        app
    }

    #[test]
    fn command_needs_confirmation() {
        let repo = FakeRepository::new();
        let mut app = loaded_app(&repo);
        app.ui_state.selected_index = 1; // web1/nginx

        assert_eq!(handle_key(&mut app, key(KeyCode::Char('R'))), Some(InputResult::Consumed));
        let pending = app.pending_action.as_ref().unwrap();
        assert_eq!(pending.description, "Restart nginx on web1?");
        assert_eq!(app.sync.commands_in_flight(), 0);

        handle_key(&mut app, key(KeyCode::Char('y')));
        assert!(app.pending_action.is_none());
        assert_eq!(app.sync.commands_in_flight(), 1);
        app.sync.wait(WAIT);
        assert!(repo.calls().contains(&"restart web1/nginx".to_string()));
    }

    #[test]
    fn any_other_key_cancels() {
        let repo = FakeRepository::new();
        let mut app = loaded_app(&repo);
        app.ui_state.selected_index = 4; // db1/postgres

        handle_key(&mut app, key(KeyCode::Char('U')));
        assert_eq!(app.pending_action.as_ref().unwrap().description, "Stop following postgres on db1?");
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert!(app.pending_action.is_none());
        assert_eq!(app.sync.commands_in_flight(), 0);
        assert_eq!(repo.calls(), vec!["fetch"]);
    }

    #[test]
    fn commands_ignore_host_rows() {
        let repo = FakeRepository::new();
        let mut app = loaded_app(&repo);
        app.ui_state.selected_index = 0; // web1 header
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('S'))), None);
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn collapse_and_expand_host() {
        let repo = FakeRepository::new();
        let mut app = loaded_app(&repo);
        assert_eq!(app.rows.len(), 5);

        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(app.rows.len(), 3);
        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.rows.len(), 5);
    }

    #[test]
    fn opening_a_service_loads_status_lines() {
        let repo = FakeRepository::new();
        let mut app = loaded_app(&repo);
        app.ui_state.selected_index = 2; // web1/cron

        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.app_view, AppView::ServiceStatus("web1".into(), "cron".into()));
        app.sync.wait(WAIT);
        assert_eq!(app.sync.detail.as_ref().unwrap().lines().len(), 2);

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.app_view, AppView::Dashboard);
        assert!(app.sync.detail.is_none());
    }

    #[test]
    fn manual_refresh_starts_a_fetch() {
        let repo = FakeRepository::new();
        let mut app = loaded_app(&repo);
        repo.push_snapshot(Ok(vec![record("web2", "nginx", "active")]));

        handle_key(&mut app, key(KeyCode::Char('r')));
        assert!(app.sync.state().is_loading);
        app.sync.wait(WAIT);
        app.rebuild_rows();
        assert_eq!(app.rows, vec![
            DashboardRow::Host("web2".into()),
            DashboardRow::Service("web2".into(), "nginx".into()),
        ]);
    }
}
