use comfy_table::{Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::{PAID_GREEN, UNPAID_RED, WARN_AMBER, bold, contains_ci};
use crate::dashboard::stock_percentage;
use crate::model::InventoryItem;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    Low,
    InStock,
    OutOfStock,
}

impl StockFilter {
    pub const ALL: [StockFilter; 3] = [Self::Low, Self::InStock, Self::OutOfStock];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Stock",
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }

    fn matches(self, item: &InventoryItem) -> bool {
        match self {
            Self::Low => item.is_low_stock(),
            Self::InStock => !item.is_low_stock(),
            Self::OutOfStock => item.is_out_of_stock(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryQuery {
    pub search: String,
    pub category: Option<String>,
    pub stock: Option<StockFilter>,
}

impl InventoryQuery {
    /// Archived items never show; rows come back sorted by name.
    pub fn apply<'a>(&self, items: &'a [InventoryItem]) -> Vec<&'a InventoryItem> {
        let needle = self.search.trim();
        let mut rows: Vec<&InventoryItem> = items
            .iter()
            .filter(|i| !i.archived)
            .filter(|i| contains_ci(&i.name, needle))
            .filter(|i| self.category.as_deref().is_none_or(|c| i.category.eq_ignore_ascii_case(c)))
            .filter(|i| self.stock.is_none_or(|s| s.matches(i)))
            .collect();
        rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        rows
    }
}

/// Distinct categories of the active items, in alphabetical order.
pub fn categories(items: &[InventoryItem]) -> Vec<String> {
    items
        .iter()
        .filter(|i| !i.archived)
        .map(|i| i.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn stock_bar(item: &InventoryItem) -> String {
    let filled = (stock_percentage(item) / 100.0 * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)))
}

fn stock_cell(item: &InventoryItem) -> Cell {
    let cell = Cell::new(format!("{} {}", item.current_stock, item.unit));
    if item.is_out_of_stock() {
        cell.fg(UNPAID_RED)
    } else if item.is_low_stock() {
        cell.fg(WARN_AMBER)
    } else {
        cell.fg(PAID_GREEN)
    }
}

pub fn inventory_table(items: &[&InventoryItem]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Item", "Category", "Stock", "Minimum", "Level", "Updated"]);
    for item in items {
        table.add_row(vec![
            bold(&item.name),
            Cell::new(&item.category),
            stock_cell(item),
            Cell::new(format!("{} {}", item.min_stock, item.unit)),
            Cell::new(stock_bar(item)),
            Cell::new(
                item.last_updated
                    .map_or_else(|| "-".to_string(), |d| d.format("%m/%d/%Y").to_string()),
            ),
        ]);
    }
    table
}

pub fn inventory_detail(item: &InventoryItem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", item.name, item.category);
    let _ = writeln!(
        out,
        "Stock:   {} {} (minimum {})",
        item.current_stock, item.unit, item.min_stock
    );
    let _ = writeln!(out, "Level:   {} {:.0}%", stock_bar(item), stock_percentage(item));
    if item.is_out_of_stock() {
        let _ = writeln!(out, "⚠️  Out of stock");
    } else if item.is_low_stock() {
        let _ = writeln!(out, "⚠️  Low stock, reorder soon");
    }
    if let Some(day) = item.last_updated {
        let _ = writeln!(out, "Updated: {}", day.format("%m/%d/%Y"));
    }
    if let Some(notes) = &item.notes {
        let _ = writeln!(out, "Notes:   {notes}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_data;
    use chrono::NaiveDate;

    fn items() -> Vec<InventoryItem> {
        demo_data(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()).inventory
    }

    fn names(rows: &[&InventoryItem]) -> Vec<String> {
        rows.iter().map(|i| i.name.clone()).collect()
    }

    #[test]
    fn stock_filters() {
        let items = items();
        let low = InventoryQuery {
            stock: Some(StockFilter::Low),
            ..InventoryQuery::default()
        };
        assert_eq!(names(&low.apply(&items)), ["All-Purpose Cleaner", "Mop Heads", "Vacuum Cleaner"]);

        let out = InventoryQuery {
            stock: Some(StockFilter::OutOfStock),
            ..InventoryQuery::default()
        };
        assert_eq!(names(&out.apply(&items)), ["Mop Heads"]);

        let in_stock = InventoryQuery {
            stock: Some(StockFilter::InStock),
            ..InventoryQuery::default()
        };
        assert_eq!(names(&in_stock.apply(&items)), ["Glass Cleaner", "Microfiber Cloths"]);
    }

    #[test]
    fn category_and_search() {
        let mut items = items();
        items[1].archived = true;
        let query = InventoryQuery {
            search: "cleaner".into(),
            category: Some("cleaning supplies".into()),
            stock: None,
        };
        assert_eq!(names(&query.apply(&items)), ["All-Purpose Cleaner", "Glass Cleaner"]);
        assert_eq!(categories(&items), ["Cleaning Supplies", "Equipment", "Tools"]);
    }

    #[test]
    fn bar_tracks_percentage() {
        let mut items = items();
        let cleaner = &mut items[0];
        assert_eq!(stock_bar(cleaner).chars().filter(|c| *c == '█').count(), 16);
        cleaner.current_stock = 0;
        assert_eq!(stock_bar(cleaner).chars().filter(|c| *c == '░').count(), BAR_WIDTH);
        assert!(inventory_detail(cleaner).contains("Out of stock"));
    }
}
