use comfy_table::{Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use tracing::warn;

use super::{PAID_GREEN, SortDirection, UNPAID_RED, WARN_AMBER, bold, contains_ci, money};
use crate::model::{Client, Job, JobStatus, PaymentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JobSort {
    #[default]
    Date,
    Client,
    Status,
}

impl JobSort {
    pub const ALL: [JobSort; 3] = [Self::Date, Self::Client, Self::Status];

    pub fn label(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Client => "Client Name",
            Self::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobQuery {
    pub search: String,
    /// Empty means every status.
    pub statuses: BTreeSet<JobStatus>,
    pub sort: JobSort,
    pub direction: SortDirection,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            statuses: BTreeSet::from([JobStatus::Scheduled, JobStatus::InProgress]),
            sort: JobSort::Date,
            direction: SortDirection::Desc,
        }
    }
}

/// A job paired with the client it belongs to.
pub type JobRow<'a> = (&'a Job, &'a Client);

impl JobQuery {
    /// Jobs whose client cannot be found are dropped with a warning.
    pub fn apply<'a>(&self, jobs: &'a [Job], clients: &'a [Client]) -> Vec<JobRow<'a>> {
        let by_id: HashMap<&str, &Client> = clients.iter().map(|c| (c.id.as_str(), c)).collect();
        let needle = self.search.trim();

        let mut rows: Vec<JobRow<'a>> = jobs
            .iter()
            .filter_map(|job| match by_id.get(job.client_id.as_str()) {
                Some(client) => Some((job, *client)),
                None => {
                    warn!(job_id = %job.id, client_id = %job.client_id, "job references a missing client");
                    None
                }
            })
            .filter(|(job, client)| {
                contains_ci(job.kind.as_str(), needle)
                    || contains_ci(job.status.as_str(), needle)
                    || contains_ci(&client.name, needle)
                    || job.notes.as_deref().is_some_and(|n| contains_ci(n, needle))
            })
            .filter(|(job, _)| self.statuses.is_empty() || self.statuses.contains(&job.status))
            .collect();

        rows.sort_by(|(a, a_client), (b, b_client)| {
            let ordering = match self.sort {
                JobSort::Date => a.scheduled_date.cmp(&b.scheduled_date),
                JobSort::Client => a_client.name.to_lowercase().cmp(&b_client.name.to_lowercase()),
                JobSort::Status => a.status.as_str().cmp(b.status.as_str()),
            };
            self.direction.apply(ordering)
        });
        rows
    }
}

pub fn status_cell(status: JobStatus) -> Cell {
    let cell = Cell::new(status.as_str());
    match status {
        JobStatus::Completed => cell.fg(PAID_GREEN),
        JobStatus::InProgress => cell.fg(WARN_AMBER),
        JobStatus::Cancelled => cell.fg(UNPAID_RED),
        JobStatus::Scheduled | JobStatus::Archived => cell,
    }
}

pub fn payment_cell(status: PaymentStatus) -> Cell {
    match status {
        PaymentStatus::Paid => Cell::new("Paid").fg(PAID_GREEN),
        PaymentStatus::Unpaid => Cell::new("Unpaid").fg(UNPAID_RED),
    }
}

pub fn job_table(rows: &[JobRow<'_>]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Client", "Type", "Status", "Price", "Payment", "Address"]);
    for (job, client) in rows {
        table.add_row(vec![
            Cell::new(job.scheduled_date.format("%m/%d/%Y %H:%M")),
            bold(&client.name),
            Cell::new(job.kind.as_str()),
            status_cell(job.status),
            Cell::new(money(job.price)),
            payment_cell(job.payment_status),
            Cell::new(job.address.one_line()),
        ]);
    }
    table
}

pub fn job_detail(job: &Job, client: &Client) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} for {}", job.kind, client.name);
    let _ = writeln!(out, "When:     {}", job.scheduled_date.format("%A, %B %-d %Y at %H:%M"));
    if let Some(duration) = &job.duration {
        let _ = writeln!(out, "Duration: {duration}");
    }
    let _ = writeln!(out, "Where:    {}", job.address.one_line());
    let _ = writeln!(out, "Status:   {}", job.status);
    if let Some(done) = job.completed_date {
        let _ = writeln!(out, "Finished: {}", done.format("%m/%d/%Y %H:%M"));
    }
    let _ = writeln!(out, "Price:    {} ({})", money(job.price), job.payment_status);
    if let Some(amount) = job.amount {
        let _ = writeln!(out, "Billed:   {}", money(amount));
    }
    if let Some(phone) = client.mobile_phone() {
        let _ = writeln!(out, "Contact:  {}", phone.number);
    }
    if let Some(notes) = &job.notes {
        let _ = writeln!(out, "Notes:    {notes}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{DemoData, demo_data};
    use chrono::NaiveDate;

    fn data() -> DemoData {
        demo_data(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap())
    }

    fn ids(rows: &[JobRow<'_>]) -> Vec<String> {
        rows.iter().map(|(job, _)| job.id.clone()).collect()
    }

    #[test]
    fn default_shows_open_jobs_newest_first() {
        let data = data();
        let rows = JobQuery::default().apply(&data.jobs, &data.clients);
        assert_eq!(ids(&rows), ["job-2", "job-1", "job-3", "job-5"]);
    }

    #[test]
    fn empty_status_set_means_all() {
        let data = data();
        let query = JobQuery {
            statuses: BTreeSet::new(),
            ..JobQuery::default()
        };
        assert_eq!(query.apply(&data.jobs, &data.clients).len(), data.jobs.len());
    }

    #[test]
    fn search_matches_client_name_and_notes() {
        let data = data();
        let mut query = JobQuery {
            search: "sofia".into(),
            statuses: BTreeSet::new(),
            ..JobQuery::default()
        };
        assert_eq!(ids(&query.apply(&data.jobs, &data.clients)), ["job-6", "job-5"]);

        query.search = "bi-weekly".into();
        assert_eq!(ids(&query.apply(&data.jobs, &data.clients)), ["job-1"]);
    }

    #[test]
    fn orphaned_jobs_are_skipped() {
        let data = data();
        let rows = JobQuery {
            statuses: BTreeSet::new(),
            ..JobQuery::default()
        }
        .apply(&data.jobs, &data.clients[..1]);
        assert!(rows.iter().all(|(job, _)| job.client_id == "1"));
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn sort_by_client_ascending() {
        let data = data();
        let query = JobQuery {
            statuses: BTreeSet::new(),
            sort: JobSort::Client,
            direction: SortDirection::Asc,
            ..JobQuery::default()
        };
        let rows = query.apply(&data.jobs, &data.clients);
        let names: Vec<&str> = rows.iter().map(|(_, c)| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn detail_mentions_price_and_address() {
        let data = data();
        let text = job_detail(&data.jobs[0], &data.clients[0]);
        assert!(text.contains("$120.00 (Unpaid)"));
        assert!(text.contains("123 Maple Street, Springfield, IL"));
        assert!(text.contains("Bi-weekly cleaning"));
    }
}
