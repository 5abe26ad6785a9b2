/// App-level view state
#[derive(Clone, Debug, PartialEq)]
pub enum AppView {
    Dashboard,
    ServiceStatus(String, String),     // (hostname, service)
    ServiceProperties(String, String), // (hostname, service)
}

impl AppView {
    /// The (hostname, service) pair a detail view is about.
    pub fn target(&self) -> Option<(&str, &str)> {
        match self {
            AppView::Dashboard => None,
            AppView::ServiceStatus(h, s) | AppView::ServiceProperties(h, s) => {
                Some((h.as_str(), s.as_str()))
            }
        }
    }
}
