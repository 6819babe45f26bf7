//! Earnings roll-ups for the dashboard cards.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::model::{InventoryItem, Job};

/// Sum and paid count for one card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Tally {
    pub total: f64,
    pub paid: usize,
    pub count: usize,
}

impl Tally {
    fn add(&mut self, job: &Job) {
        self.total += job.price;
        self.count += 1;
        if job.is_paid() {
            self.paid += 1;
        }
    }

    /// Share of paid jobs, 0 for an empty card.
    pub fn paid_ratio(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.paid as f64 / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub today: NaiveDate,
    pub week_start: NaiveDate,
    /// "Money made this week": Sunday up to, not including, today.
    pub week_before_today: Tally,
    /// "Money made today".
    pub today_tally: Tally,
    /// "Potential earnings this week": Sunday through today.
    pub week_to_date: Tally,
}

/// Most recent Sunday, `day` itself when it is a Sunday.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_sunday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

impl DashboardSummary {
    pub fn compute<'a>(jobs: impl IntoIterator<Item = &'a Job>, today: NaiveDate) -> Self {
        let start = week_start(today);
        let mut summary = Self {
            today,
            week_start: start,
            week_before_today: Tally::default(),
            today_tally: Tally::default(),
            week_to_date: Tally::default(),
        };

        for job in jobs {
            let day = job.scheduled_day();
            if day < start || day > today {
                continue;
            }
            summary.week_to_date.add(job);
            if day == today {
                summary.today_tally.add(job);
            } else {
                summary.week_before_today.add(job);
            }
        }
        summary
    }
}

pub fn todays_jobs<'a>(jobs: impl IntoIterator<Item = &'a Job>, today: NaiveDate) -> Vec<&'a Job> {
    jobs.into_iter().filter(|j| j.scheduled_day() == today).collect()
}

/// Items at or under their minimum. Callers decide how many to show.
pub fn low_stock_alerts<'a>(
    items: impl IntoIterator<Item = &'a InventoryItem>,
) -> Vec<&'a InventoryItem> {
    items.into_iter().filter(|i| i.is_low_stock()).collect()
}

/// Fill level of a stock bar, capped at 100.
pub fn stock_percentage(item: &InventoryItem) -> f64 {
    if item.min_stock == 0 {
        return 100.0;
    }
    (f64::from(item.current_stock) / f64::from(item.min_stock) * 100.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JobStatus, PaymentStatus};
    use chrono::Utc;

    fn job(id: &str, day: NaiveDate, price: f64, payment_status: PaymentStatus) -> Job {
        let now = Utc::now();
        Job {
            id: id.into(),
            client_id: "c1".into(),
            kind: Default::default(),
            status: JobStatus::Scheduled,
            scheduled_date: day.and_hms_opt(12, 0, 0).unwrap(),
            completed_date: None,
            duration: None,
            amount: None,
            price,
            payment_status,
            address: Default::default(),
            notes: None,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2025-03-05 is a Wednesday.
        assert_eq!(week_start(date(2025, 3, 5)), date(2025, 3, 2));
        assert_eq!(week_start(date(2025, 3, 2)), date(2025, 3, 2));
        assert_eq!(week_start(date(2025, 3, 8)), date(2025, 3, 2));
    }

    #[test]
    fn yesterday_and_today_scenario() {
        let today = date(2025, 3, 5);
        let yesterday = date(2025, 3, 4);
        let jobs = vec![
            job("j1", yesterday, 50.0, PaymentStatus::Paid),
            job("j2", today, 100.0, PaymentStatus::Unpaid),
            job("j3", today, 75.0, PaymentStatus::Paid),
        ];

        let summary = DashboardSummary::compute(&jobs, today);

        assert_eq!(summary.today_tally.total, 175.0);
        assert_eq!((summary.today_tally.paid, summary.today_tally.count), (1, 2));
        assert_eq!(summary.today_tally.paid_ratio(), 0.5);

        assert_eq!(summary.week_before_today.total, 50.0);
        assert_eq!((summary.week_before_today.paid, summary.week_before_today.count), (1, 1));

        assert_eq!(summary.week_to_date.total, 225.0);
        assert_eq!(summary.week_to_date.count, 3);
    }

    #[test]
    fn ignores_jobs_outside_the_week_window() {
        let today = date(2025, 3, 5);
        let jobs = vec![
            job("last-week", date(2025, 3, 1), 80.0, PaymentStatus::Paid),
            job("tomorrow", date(2025, 3, 6), 90.0, PaymentStatus::Unpaid),
        ];
        let summary = DashboardSummary::compute(&jobs, today);
        assert_eq!(summary.week_to_date, Tally::default());
        assert_eq!(summary.week_to_date.paid_ratio(), 0.0);
    }

    #[test]
    fn sunday_has_nothing_before_today() {
        let sunday = date(2025, 3, 2);
        let jobs = vec![job("j1", sunday, 60.0, PaymentStatus::Unpaid)];
        let summary = DashboardSummary::compute(&jobs, sunday);
        assert_eq!(summary.week_before_today.count, 0);
        assert_eq!(summary.today_tally.count, 1);
        assert_eq!(todays_jobs(&jobs, sunday).len(), 1);
    }

    #[test]
    fn stock_bar_caps_at_full() {
        let now = Utc::now();
        let mut item = InventoryItem {
            id: "item-1".into(),
            name: "Gloves".into(),
            category: "Tools".into(),
            current_stock: 5,
            min_stock: 10,
            unit: "pairs".into(),
            last_updated: None,
            notes: None,
            created_at: now,
            updated_at: now,
            archived: false,
        };
        assert_eq!(stock_percentage(&item), 50.0);
        assert_eq!(low_stock_alerts([&item]).len(), 1);
        item.current_stock = 40;
        assert_eq!(stock_percentage(&item), 100.0);
        assert!(low_stock_alerts([&item]).is_empty());
        item.min_stock = 0;
        assert_eq!(stock_percentage(&item), 100.0);
    }
}
