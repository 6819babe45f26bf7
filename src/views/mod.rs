//! Terminal rendering.
//!
//! Each list view pairs a query (search, filters, sort) that works on the
//! controller's snapshots with a `comfy-table` renderer. Queries are plain
//! values so the interactive session and the one-shot subcommands share them.

pub mod clients;
pub mod dashboard;
pub mod inventory;
pub mod invoices;
pub mod jobs;

use comfy_table::{Attribute, Cell, Color};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::app::{Notice, NoticeLevel};
use crate::navigation::Page;

pub const PAID_GREEN: Color = Color::Rgb { r: 4, g: 120, b: 87 };
pub const UNPAID_RED: Color = Color::Rgb { r: 185, g: 28, b: 28 };
pub const WARN_AMBER: Color = Color::Rgb { r: 180, g: 83, b: 9 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "ascending",
            Self::Desc => "descending",
        })
    }
}

pub fn money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Green when `paid`, red otherwise. Zero amounts stay uncolored.
pub fn money_cell(amount: f64, paid: bool) -> Cell {
    let cell = Cell::new(money(amount));
    if amount <= 0.0 {
        cell
    } else if paid {
        cell.fg(PAID_GREEN)
    } else {
        cell.fg(UNPAID_RED)
    }
}

pub fn bold(text: impl fmt::Display) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

/// Case-insensitive substring match; an empty needle matches everything.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn notice_line(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("✅ {}", notice.message),
        NoticeLevel::Error => format!("❌ {}", notice.message),
    }
}

/// Bottom navigation with the active tab bracketed.
pub fn tab_bar(page: &Page) -> String {
    Page::TABS
        .iter()
        .map(|tab| {
            if page.is_tab_active(tab) {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_bar_marks_owning_list() {
        let bar = tab_bar(&Page::JobDetail { job_id: "job-1".into() });
        assert_eq!(bar, "Clients  [Jobs]  Dashboard  Invoices  Inventory");
    }

    #[test]
    fn search_ignores_case() {
        assert!(contains_ci("Emily Johnson", "emily"));
        assert!(contains_ci("anything", ""));
        assert!(!contains_ci("Emily", "roberts"));
    }

    #[test]
    fn direction_reverses_ordering() {
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(money(1234.5), "$1234.50");
    }
}
