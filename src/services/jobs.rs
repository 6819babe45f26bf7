use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::{Entity, EntityService, ServiceResult};
use crate::model::{Job, JobDraft, JobPatch, JobStatus};

impl Entity for Job {
    type Draft = JobDraft;
    type Patch = JobPatch;

    const KIND: &'static str = "job";
    const ID_PREFIX: &'static str = "job";

    fn from_draft(id: String, draft: JobDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            client_id: draft.client_id,
            kind: draft.kind,
            status: draft.status,
            scheduled_date: draft.scheduled_date,
            completed_date: draft.completed_date,
            duration: draft.duration,
            amount: draft.amount,
            price: draft.price,
            payment_status: draft.payment_status,
            address: draft.address,
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

    fn apply_patch(&mut self, patch: JobPatch) {
        if let Some(client_id) = patch.client_id {
            self.client_id = client_id;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(scheduled_date) = patch.scheduled_date {
            self.scheduled_date = scheduled_date;
        }
        if patch.completed_date.is_some() {
            self.completed_date = patch.completed_date;
        }
        if patch.duration.is_some() {
            self.duration = patch.duration;
        }
        if patch.amount.is_some() {
            self.amount = patch.amount;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(address) = patch.address {
            self.address = address;
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
            self.status = JobStatus::Archived;
        } else if self.status == JobStatus::Archived {
            self.status = JobStatus::Scheduled;
        }
    }
}

#[async_trait]
pub trait JobQueries: EntityService<Job> {
    async fn by_client(&self, client_id: &str) -> ServiceResult<Vec<Job>> {
        let jobs = self.list_all().await?;
        Ok(jobs.into_iter().filter(|j| j.client_id == client_id).collect())
    }

    async fn by_status(&self, status: JobStatus) -> ServiceResult<Vec<Job>> {
        let jobs = self.list_all().await?;
        Ok(jobs.into_iter().filter(|j| j.status == status).collect())
    }

    /// Jobs whose scheduled day falls in `start..=end`.
    async fn by_date_range(&self, start: NaiveDate, end: NaiveDate) -> ServiceResult<Vec<Job>> {
        let jobs = self.list_all().await?;
        Ok(jobs
            .into_iter()
            .filter(|j| (start..=end).contains(&j.scheduled_day()))
            .collect())
    }
}

impl<S: EntityService<Job> + ?Sized> JobQueries for S {}
