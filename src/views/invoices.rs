use chrono::{Datelike, NaiveDate};
use comfy_table::{Attribute, Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{PAID_GREEN, UNPAID_RED, WARN_AMBER, bold, contains_ci, money, money_cell};
use crate::model::{Client, Invoice, InvoiceStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceQuery {
    pub search: String,
    /// `None` shows every non-archived invoice.
    pub status: Option<InvoiceStatus>,
}

impl InvoiceQuery {
    pub fn apply<'a>(&self, invoices: &'a [Invoice], clients: &[Client]) -> Vec<&'a Invoice> {
        let names: HashMap<&str, &str> = clients
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        let needle = self.search.trim();

        let mut rows: Vec<&Invoice> = invoices
            .iter()
            .filter(|i| match self.status {
                Some(status) => i.status == status,
                None => !i.archived,
            })
            .filter(|i| {
                contains_ci(&i.id, needle)
                    || names
                        .get(i.client_id.as_str())
                        .is_some_and(|name| contains_ci(name, needle))
            })
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows
    }
}

pub fn status_cell(status: InvoiceStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        InvoiceStatus::Paid => cell.fg(PAID_GREEN),
        InvoiceStatus::Overdue => cell.fg(UNPAID_RED),
        InvoiceStatus::Pending => cell.fg(WARN_AMBER),
        InvoiceStatus::Archived => cell,
    }
}

pub fn invoice_table(invoices: &[&Invoice], clients: &[Client]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Invoice", "Client", "Date", "Due", "Amount", "Status"]);
    for invoice in invoices {
        let client = clients
            .iter()
            .find(|c| c.id == invoice.client_id)
            .map_or("Unknown Client", |c| c.name.as_str());
        table.add_row(vec![
            Cell::new(&invoice.id),
            bold(client),
            Cell::new(invoice.date.format("%m/%d/%Y")),
            Cell::new(invoice.due_date.format("%m/%d/%Y")),
            money_cell(invoice.amount, invoice.status == InvoiceStatus::Paid),
            status_cell(invoice.status),
        ]);
    }
    table
}

pub fn invoice_items_table(invoice: &Invoice) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Description", "Job", "Amount"]);
    for item in &invoice.items {
        table.add_row(vec![
            Cell::new(&item.description),
            Cell::new(&item.job_id),
            Cell::new(money(item.amount)),
        ]);
    }
    table.add_row(vec![bold("Total"), Cell::new(""), bold(money(invoice.item_total()))]);
    table
}

/// Paid and outstanding amounts for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaidSplit {
    pub paid: f64,
    pub unpaid: f64,
}

impl PaidSplit {
    fn add(&mut self, invoice: &Invoice) {
        if invoice.status == InvoiceStatus::Paid {
            self.paid += invoice.amount;
        } else {
            self.unpaid += invoice.amount;
        }
    }

    pub fn total(&self) -> f64 {
        self.paid + self.unpaid
    }
}

/// Yearly roll-up of invoice amounts by month and by client. Archived
/// invoices are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSummary {
    pub year: i32,
    pub months: BTreeMap<u32, PaidSplit>,
    /// Largest total first.
    pub clients: Vec<(String, PaidSplit)>,
    pub total: PaidSplit,
}

impl InvoiceSummary {
    pub fn compute(invoices: &[Invoice], clients: &[Client], year: i32) -> Self {
        let mut months: BTreeMap<u32, PaidSplit> = BTreeMap::new();
        let mut by_client: HashMap<String, PaidSplit> = HashMap::new();
        let mut total = PaidSplit::default();

        for invoice in invoices.iter().filter(|i| !i.archived && i.date.year() == year) {
            months.entry(invoice.date.month()).or_default().add(invoice);
            let name = clients
                .iter()
                .find(|c| c.id == invoice.client_id)
                .map_or_else(|| "Unknown Client".to_string(), |c| c.name.clone());
            by_client.entry(name).or_default().add(invoice);
            total.add(invoice);
        }

        let mut clients: Vec<(String, PaidSplit)> = by_client.into_iter().collect();
        clients.sort_by(|a, b| b.1.total().total_cmp(&a.1.total()).then_with(|| a.0.cmp(&b.0)));
        Self {
            year,
            months,
            clients,
            total,
        }
    }

    pub fn month_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["Month", "Paid", "Unpaid", "Total"]);
        for (month, split) in self.months.iter().rev() {
            let label = NaiveDate::from_ymd_opt(self.year, *month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| month.to_string());
            table.add_row(vec![
                Cell::new(label),
                money_cell(split.paid, true),
                money_cell(split.unpaid, false),
                Cell::new(money(split.total())),
            ]);
        }
        table.add_row(vec![
            bold(format!("Total ({})", self.year)),
            money_cell(self.total.paid, true).add_attribute(Attribute::Bold),
            money_cell(self.total.unpaid, false).add_attribute(Attribute::Bold),
            bold(money(self.total.total())),
        ]);
        table
    }

    pub fn client_table(&self) -> Table {
        let mut table = Table::new();
        table.set_header(vec!["Client", "Paid", "Unpaid", "Total"]);
        for (client, split) in &self.clients {
            table.add_row(vec![
                Cell::new(client),
                money_cell(split.paid, true),
                money_cell(split.unpaid, false),
                Cell::new(money(split.total())),
            ]);
        }
        table
    }
}
