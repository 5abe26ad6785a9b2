use crate::model::{DashboardUIState, HostView};

/// What kind of item is at a given row index on the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub enum DashboardRow {
    Host(String),
    Service(String, String), // (hostname, service)
}

/// Flatten the snapshot into the rows the dashboard shows, skipping the
/// services of collapsed hosts.
pub fn dashboard_rows(hosts: &[HostView], ui_state: &DashboardUIState) -> Vec<DashboardRow> {
    let mut rows = Vec::new();
    for host in hosts {
        rows.push(DashboardRow::Host(host.hostname.clone()));
        if ui_state.is_collapsed(&host.hostname) {
            continue;
        }
        for svc in &host.services {
            rows.push(DashboardRow::Service(host.hostname.clone(), svc.name.clone()));
        }
    }
    rows
}

/// Clamp the selection after the row count changed.
pub fn clamp_selection(ui_state: &mut DashboardUIState, total_rows: usize) {
    if ui_state.selected_index >= total_rows {
        ui_state.selected_index = total_rows.saturating_sub(1);
    }
}
