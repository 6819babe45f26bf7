use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};

use super::{Entity, EntityService, ServiceResult};
use crate::model::{Invoice, InvoiceDraft, InvoiceItem, InvoicePatch, InvoiceStatus, Job};

impl Entity for Invoice {
    type Draft = InvoiceDraft;
    type Patch = InvoicePatch;

    const KIND: &'static str = "invoice";
    const ID_PREFIX: &'static str = "inv";

    fn from_draft(id: String, draft: InvoiceDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: draft.client_id,
            job_ids: draft.job_ids,
            date: draft.date,
            due_date: draft.due_date,
            amount: draft.amount,
            status: draft.status,
            items: draft.items,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
            archived: false,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn is_archived(&self) -> bool {
        self.archived
    }

    fn apply_patch(&mut self, patch: InvoicePatch) {
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(job_ids) = patch.job_ids {
            self.job_ids = job_ids;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(items) = patch.items {
            self.items = items;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
        if archived {
            self.status = InvoiceStatus::Archived;
        } else if self.status == InvoiceStatus::Archived {
            self.status = InvoiceStatus::Pending;
        }
    }
}

/// Builds a one-line invoice billing `job` at its price, due `terms_days` after `date`.
pub fn invoice_for_job(job: &Job, date: NaiveDate, terms_days: u32) -> InvoiceDraft {
    let description = format!("{} - {}", job.kind, job.scheduled_date.format("%B %-d"));
    InvoiceDraft {
        client_id: job.client_id.clone(),
        job_ids: vec![job.id.clone()],
        date,
        due_date: date
            .checked_add_days(Days::new(u64::from(terms_days)))
            .unwrap_or(date),
        amount: job.price,
        status: InvoiceStatus::Pending,
        items: vec![InvoiceItem {
            description,
            amount: job.price,
            job_id: job.id.clone(),
        }],
        notes: None,
    }
}

#[async_trait]
pub trait InvoiceQueries: EntityService<Invoice> {
    async fn by_client(&self, client_id: &str) -> ServiceResult<Vec<Invoice>> {
        let invoices = self.list_all().await?;
        Ok(invoices.into_iter().filter(|i| i.client_id == client_id).collect())
    }

    async fn by_status(&self, status: InvoiceStatus) -> ServiceResult<Vec<Invoice>> {
        let invoices = self.list_all().await?;
        Ok(invoices.into_iter().filter(|i| i.status == status).collect())
    }

    /// Invoices dated within `start..=end`.
    async fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<Vec<Invoice>> {
        let invoices = self.list_all().await?;
        Ok(invoices
            .into_iter()
            .filter(|i| (start..=end).contains(&i.date))
            .collect())
    }

    async fn revenue(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<f64> {
        let invoices = self.by_date_range(start, end).await?;
        Ok(invoices.iter().map(|i| i.amount).sum())
    }
}

impl<S: EntityService<Invoice> + ?Sized> InvoiceQueries for S {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JobDraft, JobStatus};
    use crate::services::MemoryService;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn draft(client_id: &str, date: NaiveDate, amount: f64, status: InvoiceStatus) -> InvoiceDraft {
        InvoiceDraft {
            client_id: client_id.into(),
            job_ids: vec![],
            date,
            due_date: date,
            amount,
            status,
            items: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn revenue_sums_amounts_in_range() {
        let service = MemoryService::<Invoice>::new();
        service.create(draft("c1", day(1), 240.0, InvoiceStatus::Pending)).await.unwrap();
        service.create(draft("c2", day(10), 180.0, InvoiceStatus::Paid)).await.unwrap();
        service.create(draft("c1", day(28), 90.0, InvoiceStatus::Overdue)).await.unwrap();

        assert_eq!(service.revenue(day(1), day(10)).await.unwrap(), 420.0);
        assert_eq!(service.by_client("c1").await.unwrap().len(), 2);
        assert_eq!(service.by_status(InvoiceStatus::Paid).await.unwrap().len(), 1);
        assert!(service.by_date_range(day(11), day(27)).await.unwrap().is_empty());
    }

    #[test]
    fn job_invoice_bills_the_price() {
        let now = Utc::now();
        let job = Job::from_draft(
            "job-1".into(),
            JobDraft {
                client_id: "c1".into(),
                kind: Default::default(),
                status: JobStatus::Completed,
                scheduled_date: day(25).and_hms_opt(12, 0, 0).unwrap(),
                completed_date: None,
                duration: None,
                amount: None,
                price: 120.0,
                payment_status: Default::default(),
                address: Default::default(),
                notes: None,
            },
            now,
        );

        let invoice = invoice_for_job(&job, day(26), 14);
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
        assert_eq!(invoice.amount, 120.0);
        assert_eq!(invoice.job_ids, vec!["job-1".to_string()]);
        assert_eq!(invoice.items[0].description, "Regular Cleaning - March 25");
        assert_eq!(invoice.status, InvoiceStatus::Pending);
    }
}
