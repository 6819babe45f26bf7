//! Page state.
//!
//! Every screen is one [`Page`] variant carrying exactly the ids it shows.
//! Moving between screens replaces the whole value; there is no history.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Dashboard,
    Clients,
    Jobs,
    Invoices,
    Inventory,
    #[serde(rename_all = "camelCase")]
    ClientDetail { client_id: String },
    #[serde(rename_all = "camelCase")]
    JobDetail { job_id: String },
    #[serde(rename_all = "camelCase")]
    InventoryDetail { inventory_id: String },
    AddClient,
    #[serde(rename_all = "camelCase")]
    EditClient { client_id: String },
    #[serde(rename_all = "camelCase")]
    EditJob { job_id: String },
    ScheduleJob,
}

impl Page {
    /// Bottom navigation bar, left to right.
    pub const TABS: [Page; 5] = [
        Page::Clients,
        Page::Jobs,
        Page::Dashboard,
        Page::Invoices,
        Page::Inventory,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Clients => "Clients",
            Self::Jobs => "Jobs",
            Self::Invoices => "Invoices",
            Self::Inventory => "Inventory",
            Self::ClientDetail { .. } => "Client",
            Self::JobDetail { .. } => "Job",
            Self::InventoryDetail { .. } => "Inventory Item",
            Self::AddClient => "Add Client",
            Self::EditClient { .. } => "Edit Client",
            Self::EditJob { .. } => "Edit Job",
            Self::ScheduleJob => "Schedule Job",
        }
    }

    /// The list page a detail or form page belongs to. Top-level pages own themselves.
    pub fn owning_list(&self) -> Page {
        match self {
            Self::ClientDetail { .. } | Self::AddClient | Self::EditClient { .. } => Self::Clients,
            Self::JobDetail { .. } | Self::EditJob { .. } | Self::ScheduleJob => Self::Jobs,
            Self::InventoryDetail { .. } => Self::Inventory,
            Self::Dashboard | Self::Clients | Self::Jobs | Self::Invoices | Self::Inventory => {
                self.clone()
            }
        }
    }

    /// Where "back" goes from this screen. Fixed per screen, not a pop.
    pub fn back(&self) -> Page {
        if self.is_top_level() {
            Self::Dashboard
        } else {
            self.owning_list()
        }
    }

    pub fn is_top_level(&self) -> bool {
        Self::TABS.contains(self)
    }

    /// Whether the tab `tab` should render as selected while on this page.
    pub fn is_tab_active(&self, tab: &Page) -> bool {
        self.owning_list() == *tab
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientDetail { client_id } | Self::EditClient { client_id } => {
                write!(f, "{} ({})", self.label(), client_id)
            }
            Self::JobDetail { job_id } | Self::EditJob { job_id } => {
                write!(f, "{} ({})", self.label(), job_id)
            }
            Self::InventoryDetail { inventory_id } => write!(f, "{} ({})", self.label(), inventory_id),
            _ => f.write_str(self.label()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_dashboard() {
        assert_eq!(Page::default(), Page::Dashboard);
    }

    #[test]
    fn back_targets_are_fixed() {
        let job = Page::JobDetail { job_id: "job-1".into() };
        assert_eq!(job.back(), Page::Jobs);
        assert_eq!(Page::EditJob { job_id: "job-1".into() }.back(), Page::Jobs);
        assert_eq!(Page::ScheduleJob.back(), Page::Jobs);
        assert_eq!(Page::AddClient.back(), Page::Clients);
        assert_eq!(Page::EditClient { client_id: "c".into() }.back(), Page::Clients);
        assert_eq!(Page::ClientDetail { client_id: "c".into() }.back(), Page::Clients);
        assert_eq!(Page::InventoryDetail { inventory_id: "i".into() }.back(), Page::Inventory);
        assert_eq!(Page::Invoices.back(), Page::Dashboard);
        assert_eq!(Page::Dashboard.back(), Page::Dashboard);
    }

    #[test]
    fn tab_highlight_follows_owning_list() {
        let page = Page::EditClient { client_id: "c".into() };
        assert!(page.is_tab_active(&Page::Clients));
        assert!(!page.is_tab_active(&Page::Jobs));
        assert!(Page::Dashboard.is_tab_active(&Page::Dashboard));
    }

    #[test]
    fn serializes_as_tagged_record() {
        let page = Page::JobDetail { job_id: "job-7".into() };
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json, serde_json::json!({"type": "job-detail", "jobId": "job-7"}));

        let back: Page = serde_json::from_value(serde_json::json!({"type": "schedule-job"})).unwrap();
        assert_eq!(back, Page::ScheduleJob);
    }

    #[test]
    fn display_includes_the_id() {
        assert_eq!(Page::JobDetail { job_id: "job-7".into() }.to_string(), "Job (job-7)");
        assert_eq!(Page::Invoices.to_string(), "Invoices");
    }
}
