// Re-export all model types from submodules.

pub use app::AppView;
pub use command::{Command, CommandRequest, ServiceAction};
pub use dashboard::{DashboardUIState, DetailContent, DetailView};
pub use status::{EnabledState, HostView, ServiceStatusRecord, ServiceView};

mod app;
mod command;
mod dashboard;
mod status;
