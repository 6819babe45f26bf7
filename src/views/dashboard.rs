use comfy_table::{Cell, Table};
use std::fmt::Write as _;

use super::{bold, inventory::stock_bar, jobs::payment_cell, money};
use crate::app::DashboardView;
use crate::dashboard::Tally;
use crate::settings::AppSettings;

/// How many low-stock items the dashboard lists.
pub const ALERT_LIMIT: usize = 3;

fn paid_line(tally: &Tally) -> String {
    format!(
        "{} of {} jobs paid ({:.0}%)",
        tally.paid,
        tally.count,
        tally.paid_ratio() * 100.0
    )
}

pub fn earnings_table(view: &DashboardView<'_>) -> Table {
    let summary = &view.summary;
    let mut table = Table::new();
    table.set_header(vec!["", "Amount", "Paid"]);
    table.add_row(vec![
        Cell::new(format!(
            "Money made this week (since {})",
            summary.week_start.format("%a %m/%d")
        )),
        bold(money(summary.week_before_today.total)),
        Cell::new(paid_line(&summary.week_before_today)),
    ]);
    table.add_row(vec![
        Cell::new("Money made today"),
        bold(money(summary.today_tally.total)),
        Cell::new(paid_line(&summary.today_tally)),
    ]);
    table.add_row(vec![
        Cell::new("Potential earnings this week"),
        bold(money(summary.week_to_date.total)),
        Cell::new(paid_line(&summary.week_to_date)),
    ]);
    table
}

pub fn todays_jobs_table(view: &DashboardView<'_>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Time", "Client", "Type", "Price", "Payment"]);
    for (job, client) in &view.todays_jobs {
        table.add_row(vec![
            Cell::new(job.scheduled_date.format("%H:%M")),
            bold(client.map_or("Unknown Client", |c| c.name.as_str())),
            Cell::new(job.kind.as_str()),
            Cell::new(money(job.price)),
            payment_cell(job.payment_status),
        ]);
    }
    table
}

/// Full dashboard text: greeting, optional overview, cards, today's jobs, alerts.
pub fn render(view: &DashboardView<'_>, settings: &AppSettings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", settings.business_name);
    let _ = writeln!(
        out,
        "Hello, {}. Today is {}.",
        settings.operator_name,
        view.summary.today.format("%A, %B %-d")
    );
    if view.show_overview {
        let _ = writeln!(
            out,
            "\nWelcome! Track clients, schedule jobs, bill from finished work and keep \
             an eye on supplies. Choose \"Dismiss overview\" to hide this note."
        );
    }
    let _ = writeln!(out, "\n{}", earnings_table(view));

    if view.todays_jobs.is_empty() {
        let _ = writeln!(out, "\nNo jobs today.");
    } else {
        let _ = writeln!(out, "\nToday's jobs\n{}", todays_jobs_table(view));
    }

    if !view.alerts.is_empty() {
        let _ = writeln!(out, "\nLow stock");
        for item in view.alerts.iter().take(ALERT_LIMIT) {
            let _ = writeln!(
                out,
                "  {:<22} {} {}/{} {}",
                item.name,
                stock_bar(item),
                item.current_stock,
                item.min_stock,
                item.unit
            );
        }
        if view.alerts.len() > ALERT_LIMIT {
            let _ = writeln!(out, "  ...and {} more", view.alerts.len() - ALERT_LIMIT);
        }
    }
    out
}
