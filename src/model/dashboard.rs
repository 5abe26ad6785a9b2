use std::collections::HashSet;

// --- Detail view state ---

/// What a detail request brought back.
#[derive(Clone, Debug, PartialEq)]
pub enum DetailContent {
    Loading,
    /// `systemctl status` output, one line per entry.
    StatusLines(Vec<String>),
    /// `systemctl show` properties rendered as sorted `key: value` lines.
    Properties(Vec<String>),
    Failed(String),
}

/// Status/properties screen for one service.
#[derive(Clone, Debug)]
pub struct DetailView {
    pub hostname: String,
    pub service: String,
    pub content: DetailContent,
    pub scroll_offset: usize,
}

impl DetailView {
    pub fn loading(hostname: &str, service: &str) -> Self {
        Self {
            hostname: hostname.to_string(),
            service: service.to_string(),
            content: DetailContent::Loading,
            scroll_offset: 0,
        }
    }

    pub fn is_for(&self, hostname: &str, service: &str) -> bool {
        self.hostname == hostname && self.service == service
    }

    pub fn lines(&self) -> &[String] {
        match &self.content {
            DetailContent::StatusLines(lines) | DetailContent::Properties(lines) => lines,
            DetailContent::Loading | DetailContent::Failed(_) => &[],
        }
    }

    pub fn scroll_down(&mut self, visible: usize) {
        let max = self.lines().len().saturating_sub(visible);
        if self.scroll_offset < max {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

// --- Dashboard UI state ---

#[derive(Default)]
pub struct DashboardUIState {
    pub selected_index: usize,
    pub collapsed_hosts: HashSet<String>,
}

impl DashboardUIState {
    pub fn toggle_host(&mut self, hostname: &str) {
        if !self.collapsed_hosts.remove(hostname) {
            self.collapsed_hosts.insert(hostname.to_string());
        }
    }

    pub fn is_collapsed(&self, hostname: &str) -> bool {
        self.collapsed_hosts.contains(hostname)
    }
}
