//! Root controller.
//!
//! [`App`] owns the current page, the snapshots of all four collections and
//! the notice banner. Views read from it through [`App::screen`]; user actions
//! come back in as the async intent methods below. Snapshots only change after
//! a service call has succeeded.

use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use crate::dashboard::{DashboardSummary, low_stock_alerts, todays_jobs};
use crate::model::{
    Client, ClientDraft, InventoryDraft, InventoryItem, Invoice, InvoicePatch, InvoiceStatus, Job,
    JobDraft, JobPatch, JobStatus, PaymentStatus,
};
use crate::navigation::Page;
use crate::services::{
    Entity, InventoryQueries, ServiceError, ServiceResult, Services, invoice_for_job,
};
use crate::settings::{AppSettings, SettingsStore};
use crate::validation::{
    FieldErrors, ValidationErrors, validate_client, validate_inventory_item, validate_job,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One-line banner shown above the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

pub struct DashboardView<'a> {
    pub summary: DashboardSummary,
    /// Client is `None` when the job points at a client that no longer exists.
    pub todays_jobs: Vec<(&'a Job, Option<&'a Client>)>,
    pub alerts: Vec<&'a InventoryItem>,
    pub show_overview: bool,
}

/// What the current page renders, with its entities already looked up.
pub enum Screen<'a> {
    Dashboard(DashboardView<'a>),
    Clients {
        clients: &'a [Client],
    },
    Jobs {
        jobs: &'a [Job],
        clients: &'a [Client],
    },
    Invoices {
        invoices: &'a [Invoice],
        clients: &'a [Client],
    },
    Inventory {
        items: &'a [InventoryItem],
    },
    ClientDetail {
        client: &'a Client,
        scheduled: Vec<&'a Job>,
        completed: Vec<&'a Job>,
    },
    JobDetail {
        job: &'a Job,
        client: &'a Client,
    },
    InventoryDetail {
        item: &'a InventoryItem,
    },
    AddClient,
    EditClient {
        client: &'a Client,
    },
    EditJob {
        job: &'a Job,
        clients: Vec<&'a Client>,
    },
    ScheduleJob {
        clients: Vec<&'a Client>,
    },
}

pub struct App {
    services: Services,
    settings: AppSettings,
    settings_store: Option<SettingsStore>,
    page: Page,
    clients: Vec<Client>,
    jobs: Vec<Job>,
    invoices: Vec<Invoice>,
    inventory: Vec<InventoryItem>,
    notice: Option<Notice>,
    today: Option<NaiveDate>,
}

fn upsert<E: Entity>(list: &mut Vec<E>, record: E) {
    match list.iter_mut().find(|r| r.id() == record.id()) {
        Some(slot) => *slot = record,
        None => list.push(record),
    }
}

fn remove<E: Entity>(list: &mut Vec<E>, id: &str) {
    list.retain(|r| r.id() != id);
}

impl App {
    pub fn new(services: Services, settings: AppSettings, settings_store: Option<SettingsStore>) -> Self {
        Self {
            services,
            settings,
            settings_store,
            page: Page::default(),
            clients: Vec::new(),
            jobs: Vec::new(),
            invoices: Vec::new(),
            inventory: Vec::new(),
            notice: None,
            today: None,
        }
    }

    /// Pins "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn find_client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn find_job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn find_invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    pub fn find_item(&self, id: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id == id)
    }

    // ==========================================
    // Loading & navigation
    // ==========================================

    /// Replaces every snapshot with a fresh listing. On failure nothing changes.
    pub async fn load(&mut self) {
        match self.fetch_all().await {
            Ok(()) => info!(
                clients = self.clients.len(),
                jobs = self.jobs.len(),
                invoices = self.invoices.len(),
                inventory = self.inventory.len(),
                "data loaded"
            ),
            Err(err) => self.report("load data", err),
        }
    }

    async fn fetch_all(&mut self) -> ServiceResult<()> {
        let clients = self.services.clients.list_all().await?;
        let jobs = self.services.jobs.list_all().await?;
        let invoices = self.services.invoices.list_all().await?;
        let inventory = self.services.inventory.list_all().await?;
        self.clients = clients;
        self.jobs = jobs;
        self.invoices = invoices;
        self.inventory = inventory;
        Ok(())
    }

    /// Switches to `page`, or to its owning list when the entity it names is gone.
    pub fn navigate(&mut self, page: Page) {
        let page = self.resolve(page);
        debug!(page = %page, "page changed");
        self.page = page;
    }

    pub fn back(&mut self) {
        let target = self.page.back();
        self.navigate(target);
    }

    fn resolve(&mut self, page: Page) -> Page {
        let missing = match &page {
            Page::ClientDetail { client_id } | Page::EditClient { client_id } => self
                .find_client(client_id)
                .is_none()
                .then(|| ("client", client_id.clone())),
            Page::JobDetail { job_id } => match self.find_job(job_id) {
                None => Some(("job", job_id.clone())),
                Some(job) if self.find_client(&job.client_id).is_none() => {
                    Some(("client", job.client_id.clone()))
                }
                Some(_) => None,
            },
            Page::EditJob { job_id } => self
                .find_job(job_id)
                .is_none()
                .then(|| ("job", job_id.clone())),
            Page::InventoryDetail { inventory_id } => self
                .find_item(inventory_id)
                .is_none()
                .then(|| ("inventory item", inventory_id.clone())),
            _ => None,
        };

        match missing {
            Some((kind, id)) => {
                let fallback = page.owning_list();
                warn!(requested = %page, kind, id = %id, fallback = %fallback, "page target missing, redirecting");
                self.notice = Some(Notice::error(format!("That {kind} no longer exists ({id}).")));
                fallback
            }
            None => page,
        }
    }

    /// The current page with its data looked up.
    pub fn screen(&self) -> Screen<'_> {
        match &self.page {
            Page::Dashboard => Screen::Dashboard(self.dashboard_view()),
            Page::ClientDetail { client_id } => match self.find_client(client_id) {
                Some(client) => {
                    let (scheduled, completed) = self
                        .jobs
                        .iter()
                        .filter(|j| j.client_id == client.id && !j.archived)
                        .filter(|j| matches!(j.status, JobStatus::Scheduled | JobStatus::Completed))
                        .partition(|j| j.status == JobStatus::Scheduled);
                    Screen::ClientDetail {
                        client,
                        scheduled,
                        completed,
                    }
                }
                None => self.list_screen(&Page::Clients),
            },
            Page::JobDetail { job_id } => {
                let found = self
                    .find_job(job_id)
                    .and_then(|job| Some((job, self.find_client(&job.client_id)?)));
                match found {
                    Some((job, client)) => Screen::JobDetail { job, client },
                    None => self.list_screen(&Page::Jobs),
                }
            }
            Page::InventoryDetail { inventory_id } => match self.find_item(inventory_id) {
                Some(item) => Screen::InventoryDetail { item },
                None => self.list_screen(&Page::Inventory),
            },
            Page::AddClient => Screen::AddClient,
            Page::EditClient { client_id } => match self.find_client(client_id) {
                Some(client) => Screen::EditClient { client },
                None => self.list_screen(&Page::Clients),
            },
            Page::EditJob { job_id } => match self.find_job(job_id) {
                Some(job) => Screen::EditJob {
                    job,
                    clients: self.active_clients(),
                },
                None => self.list_screen(&Page::Jobs),
            },
            Page::ScheduleJob => Screen::ScheduleJob {
                clients: self.active_clients(),
            },
            list => self.list_screen(list),
        }
    }

    fn list_screen(&self, page: &Page) -> Screen<'_> {
        match page {
            Page::Clients => Screen::Clients {
                clients: &self.clients,
            },
            Page::Jobs => Screen::Jobs {
                jobs: &self.jobs,
                clients: &self.clients,
            },
            Page::Invoices => Screen::Invoices {
                invoices: &self.invoices,
                clients: &self.clients,
            },
            Page::Inventory => Screen::Inventory {
                items: &self.inventory,
            },
            _ => Screen::Dashboard(self.dashboard_view()),
        }
    }

    fn active_clients(&self) -> Vec<&Client> {
        self.clients.iter().filter(|c| !c.archived).collect()
    }

    /// The active job set: everything not archived.
    fn active_jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(|j| !j.archived)
    }

    pub fn dashboard_view(&self) -> DashboardView<'_> {
        let today = self.today();
        DashboardView {
            summary: DashboardSummary::compute(self.active_jobs(), today),
            todays_jobs: todays_jobs(self.active_jobs(), today)
                .into_iter()
                .map(|job| (job, self.find_client(&job.client_id)))
                .collect(),
            alerts: low_stock_alerts(self.inventory.iter().filter(|i| !i.archived)),
            show_overview: !self.settings.overview_dismissed,
        }
    }

    // ==========================================
    // Outcome helpers
    // ==========================================

    fn report(&mut self, action: &str, err: ServiceError) {
        error!(action, error = %err, "service call failed");
        self.notice = Some(Notice::error(format!("Could not {action}: {err}")));
    }

    fn not_found(&mut self, kind: &str, id: &str) {
        let fallback = self.page.owning_list();
        warn!(kind, id, fallback = %fallback, "entity not found");
        self.notice = Some(Notice::error(format!("That {kind} no longer exists ({id}).")));
        self.page = fallback;
    }

    fn settle<E: Entity>(&mut self, action: &str, id: &str, result: ServiceResult<Option<E>>) -> Option<E> {
        match result {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                self.not_found(E::KIND, id);
                None
            }
            Err(err) => {
                self.report(action, err);
                None
            }
        }
    }

    // ==========================================
    // Clients
    // ==========================================

    /// `Err` only for validation problems; service failures land in the notice.
    pub async fn add_client(&mut self, draft: ClientDraft) -> Result<(), ValidationErrors> {
        let errors = validate_client(&draft);
        if !errors.is_empty() {
            debug!(count = errors.len(), "client form rejected");
            return Err(errors);
        }
        match self.services.clients.create(draft).await {
            Ok(client) => {
                self.notice = Some(Notice::info(format!("Added {}.", client.name)));
                self.clients.push(client);
                self.page = Page::Clients;
            }
            Err(err) => self.report("add client", err),
        }
        Ok(())
    }

    pub async fn update_client(&mut self, id: &str, draft: ClientDraft) -> Result<(), ValidationErrors> {
        let errors = validate_client(&draft);
        if !errors.is_empty() {
            return Err(errors);
        }
        let result = self.services.clients.update(id, draft.into()).await;
        if let Some(client) = self.settle("update client", id, result) {
            self.notice = Some(Notice::info(format!("Saved {}.", client.name)));
            self.page = Page::ClientDetail {
                client_id: client.id.clone(),
            };
            upsert(&mut self.clients, client);
        }
        Ok(())
    }

    pub async fn archive_client(&mut self, id: &str) {
        let result = self.services.clients.archive(id).await;
        if let Some(client) = self.settle("archive client", id, result) {
            self.notice = Some(Notice::info(format!("Archived {}.", client.name)));
            upsert(&mut self.clients, client);
            self.page = Page::Clients;
        }
    }

    pub async fn unarchive_client(&mut self, id: &str) {
        let result = self.services.clients.unarchive(id).await;
        if let Some(client) = self.settle("restore client", id, result) {
            self.notice = Some(Notice::info(format!("Restored {}.", client.name)));
            upsert(&mut self.clients, client);
        }
    }

    pub async fn delete_client(&mut self, id: &str) {
        match self.services.clients.delete(id).await {
            Ok(true) => {
                remove(&mut self.clients, id);
                self.notice = Some(Notice::info("Client deleted."));
                self.page = Page::Clients;
            }
            Ok(false) => self.not_found("client", id),
            Err(err) => self.report("delete client", err),
        }
    }

    // ==========================================
    // Jobs
    // ==========================================

    pub async fn schedule_job(&mut self, draft: JobDraft) -> Result<(), FieldErrors> {
        let errors = validate_job(&draft);
        if !errors.is_empty() {
            return Err(errors);
        }
        match self.services.jobs.create(draft).await {
            Ok(job) => {
                self.notice = Some(Notice::info(format!(
                    "Scheduled {} for {}.",
                    job.kind,
                    job.scheduled_date.format("%m/%d/%Y")
                )));
                self.jobs.push(job);
                self.page = Page::Jobs;
            }
            Err(err) => self.report("schedule job", err),
        }
        Ok(())
    }

    pub async fn edit_job(&mut self, id: &str, draft: JobDraft) -> Result<(), FieldErrors> {
        let errors = validate_job(&draft);
        if !errors.is_empty() {
            return Err(errors);
        }
        if self.patch_job("update job", id, draft.into()).await.is_some() {
            self.notice = Some(Notice::info("Job saved."));
            self.page = Page::Jobs;
        }
        Ok(())
    }

    async fn patch_job(&mut self, action: &str, id: &str, patch: JobPatch) -> Option<()> {
        let result = self.services.jobs.update(id, patch).await;
        let job = self.settle(action, id, result)?;
        upsert(&mut self.jobs, job);
        Some(())
    }

    /// Moving to `Completed` also stamps the completion time.
    pub async fn set_job_status(&mut self, id: &str, status: JobStatus) {
        let patch = JobPatch {
            status: Some(status),
            completed_date: (status == JobStatus::Completed).then(|| Local::now().naive_local()),
            ..JobPatch::default()
        };
        if self.patch_job("change job status", id, patch).await.is_some() {
            self.notice = Some(Notice::info(format!("Job marked {status}.")));
        }
    }

    pub async fn record_payment(&mut self, id: &str) {
        let patch = JobPatch {
            payment_status: Some(PaymentStatus::Paid),
            ..JobPatch::default()
        };
        if self.patch_job("record payment", id, patch).await.is_some() {
            self.notice = Some(Notice::info("Payment recorded."));
        }
    }

    pub async fn archive_job(&mut self, id: &str) {
        let result = self.services.jobs.archive(id).await;
        if let Some(job) = self.settle("archive job", id, result) {
            upsert(&mut self.jobs, job);
            self.notice = Some(Notice::info("Job archived."));
            self.page = Page::Jobs;
        }
    }

    pub async fn unarchive_job(&mut self, id: &str) {
        let result = self.services.jobs.unarchive(id).await;
        if let Some(job) = self.settle("restore job", id, result) {
            upsert(&mut self.jobs, job);
            self.notice = Some(Notice::info("Job restored."));
        }
    }

    pub async fn delete_job(&mut self, id: &str) {
        match self.services.jobs.delete(id).await {
            Ok(true) => {
                remove(&mut self.jobs, id);
                self.notice = Some(Notice::info("Job deleted."));
                self.page = Page::Jobs;
            }
            Ok(false) => self.not_found("job", id),
            Err(err) => self.report("delete job", err),
        }
    }

    /// Bills a single job at its price, dated today.
    pub async fn generate_invoice(&mut self, job_id: &str) {
        let Some(job) = self.find_job(job_id) else {
            self.not_found("job", job_id);
            return;
        };
        let draft = invoice_for_job(job, self.today(), self.settings.invoice_terms_days);
        match self.services.invoices.create(draft).await {
            Ok(invoice) => {
                self.notice = Some(Notice::info(format!(
                    "Invoice {} created for ${:.2}, due {}.",
                    invoice.id,
                    invoice.amount,
                    invoice.due_date.format("%m/%d/%Y")
                )));
                self.invoices.push(invoice);
                self.page = Page::Invoices;
            }
            Err(err) => self.report("create invoice", err),
        }
    }

    // ==========================================
    // Invoices
    // ==========================================

    pub async fn mark_invoice_paid(&mut self, id: &str) {
        let patch = InvoicePatch {
            status: Some(InvoiceStatus::Paid),
            ..InvoicePatch::default()
        };
        let result = self.services.invoices.update(id, patch).await;
        if let Some(invoice) = self.settle("mark invoice paid", id, result) {
            self.notice = Some(Notice::info(format!("Invoice {} marked paid.", invoice.id)));
            upsert(&mut self.invoices, invoice);
        }
    }

    pub async fn archive_invoice(&mut self, id: &str) {
        let result = self.services.invoices.archive(id).await;
        if let Some(invoice) = self.settle("archive invoice", id, result) {
            upsert(&mut self.invoices, invoice);
            self.notice = Some(Notice::info("Invoice archived."));
        }
    }

    pub async fn unarchive_invoice(&mut self, id: &str) {
        let result = self.services.invoices.unarchive(id).await;
        if let Some(invoice) = self.settle("restore invoice", id, result) {
            upsert(&mut self.invoices, invoice);
            self.notice = Some(Notice::info("Invoice restored."));
        }
    }

    /// Paid invoices are kept; archive them instead.
    pub async fn delete_invoice(&mut self, id: &str) {
        if self.find_invoice(id).is_some_and(|i| i.status == InvoiceStatus::Paid) {
            self.notice = Some(Notice::error("Paid invoices cannot be deleted. Archive it instead."));
            return;
        }
        match self.services.invoices.delete(id).await {
            Ok(true) => {
                remove(&mut self.invoices, id);
                self.notice = Some(Notice::info("Invoice deleted."));
            }
            Ok(false) => self.not_found("invoice", id),
            Err(err) => self.report("delete invoice", err),
        }
    }

    // ==========================================
    // Inventory
    // ==========================================

    pub async fn add_inventory_item(&mut self, draft: InventoryDraft) -> Result<(), FieldErrors> {
        let errors = validate_inventory_item(&draft);
        if !errors.is_empty() {
            return Err(errors);
        }
        match self.services.inventory.create(draft).await {
            Ok(item) => {
                self.notice = Some(Notice::info(format!("Added {}.", item.name)));
                self.inventory.push(item);
                self.page = Page::Inventory;
            }
            Err(err) => self.report("add inventory item", err),
        }
        Ok(())
    }

    pub async fn adjust_stock(&mut self, id: &str, delta: i64) {
        let Some(item) = self.find_item(id) else {
            self.not_found("inventory item", id);
            return;
        };
        let next = i64::from(item.current_stock).checked_add(delta);
        if next.is_none_or(|n| n < 0) {
            self.notice = Some(Notice::error(format!(
                "Only {} {} of {} in stock.",
                item.current_stock, item.unit, item.name
            )));
            return;
        }
        if next.is_none_or(|n| n > i64::from(u32::MAX)) {
            self.notice = Some(Notice::error(format!(
                "{} can hold at most {} {}.",
                item.name,
                u32::MAX,
                item.unit
            )));
            return;
        }
        let result = self.services.inventory.adjust_stock(id, delta).await;
        if let Some(item) = self.settle("adjust stock", id, result) {
            self.notice = Some(Notice::info(format!(
                "{} now at {} {}.",
                item.name, item.current_stock, item.unit
            )));
            upsert(&mut self.inventory, item);
        }
    }

    pub async fn archive_inventory_item(&mut self, id: &str) {
        let result = self.services.inventory.archive(id).await;
        if let Some(item) = self.settle("archive inventory item", id, result) {
            self.notice = Some(Notice::info(format!("Archived {}.", item.name)));
            upsert(&mut self.inventory, item);
            self.page = Page::Inventory;
        }
    }

    pub async fn delete_inventory_item(&mut self, id: &str) {
        match self.services.inventory.delete(id).await {
            Ok(true) => {
                remove(&mut self.inventory, id);
                self.notice = Some(Notice::info("Item deleted."));
                self.page = Page::Inventory;
            }
            Ok(false) => self.not_found("inventory item", id),
            Err(err) => self.report("delete inventory item", err),
        }
    }

    // ==========================================
    // Settings
    // ==========================================

    /// Hides the welcome panel for good. The flag sticks for this session
    /// even if it cannot be written.
    pub fn dismiss_overview(&mut self) {
        self.settings.overview_dismissed = true;
        let Some(store) = &self.settings_store else {
            return;
        };
        if let Err(err) = store.save(&self.settings) {
            error!(error = %err, "failed to persist overview flag");
            self.notice = Some(Notice::error(format!("Could not save settings: {err}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, AddressKind, JobAddress, JobKind, PhoneKind, PhoneNumber};
    use crate::seed::demo_data;
    use crate::services::EntityService;
    use crate::settings::SettingsStore;
    use async_trait::async_trait;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    async fn demo_app() -> App {
        let services = demo_data(today()).into_services();
        let mut app = App::new(services, AppSettings::default(), None).with_today(today());
        app.load().await;
        app
    }

    fn valid_client() -> ClientDraft {
        ClientDraft {
            name: "Dana Lee".into(),
            addresses: vec![Address {
                street: "7 Willow Way".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                kind: AddressKind::Primary,
            }],
            phone_numbers: vec![PhoneNumber {
                number: "(555) 222-3333".into(),
                kind: PhoneKind::Mobile,
            }],
            email: "dana@example.com".into(),
            ..ClientDraft::default()
        }
    }

    fn job_for(client: &Client) -> JobDraft {
        JobDraft {
            client_id: client.id.clone(),
            kind: JobKind::DeepCleaning,
            status: JobStatus::Scheduled,
            scheduled_date: today().and_hms_opt(12, 0, 0).unwrap(),
            completed_date: None,
            duration: Some("4 hours".into()),
            amount: None,
            price: 200.0,
            payment_status: PaymentStatus::Unpaid,
            address: client.primary_address().map(JobAddress::from).unwrap_or_default(),
            notes: None,
        }
    }

    /// Jobs backend that is always down.
    struct DownJobs;

    fn down() -> ServiceError {
        ServiceError::Unavailable {
            entity: "job",
            message: "connection refused".into(),
        }
    }

    #[async_trait]
    impl EntityService<Job> for DownJobs {
        async fn list_active(&self) -> ServiceResult<Vec<Job>> {
            Err(down())
        }
        async fn list_all(&self) -> ServiceResult<Vec<Job>> {
            Err(down())
        }
        async fn get_by_id(&self, _id: &str) -> ServiceResult<Option<Job>> {
            Err(down())
        }
        async fn create(&self, _draft: JobDraft) -> ServiceResult<Job> {
            Err(down())
        }
        async fn update(&self, _id: &str, _patch: JobPatch) -> ServiceResult<Option<Job>> {
            Err(down())
        }
        async fn delete(&self, _id: &str) -> ServiceResult<bool> {
            Err(down())
        }
        async fn archive(&self, _id: &str) -> ServiceResult<Option<Job>> {
            Err(down())
        }
        async fn unarchive(&self, _id: &str) -> ServiceResult<Option<Job>> {
            Err(down())
        }
    }

    #[tokio::test]
    async fn starts_on_dashboard_with_data() {
        let app = demo_app().await;
        assert_eq!(app.page(), &Page::Dashboard);
        assert_eq!(app.clients().len(), 3);
        assert!(!app.jobs().is_empty());
        assert!(matches!(app.screen(), Screen::Dashboard(_)));
    }

    #[tokio::test]
    async fn unknown_job_redirects_to_jobs() {
        let mut app = demo_app().await;
        app.navigate(Page::JobDetail {
            job_id: "job-missing".into(),
        });
        assert_eq!(app.page(), &Page::Jobs);
        assert!(matches!(app.screen(), Screen::Jobs { .. }));
        let notice = app.take_notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(app.take_notice().is_none());
    }

    #[tokio::test]
    async fn job_with_missing_client_redirects_to_jobs() {
        let mut app = demo_app().await;
        app.delete_client("2").await;
        app.navigate(Page::JobDetail { job_id: "job-3".into() });
        assert_eq!(app.page(), &Page::Jobs);
    }

    #[tokio::test]
    async fn unknown_ids_redirect_to_their_lists() {
        let mut app = demo_app().await;
        app.navigate(Page::EditClient { client_id: "nope".into() });
        assert_eq!(app.page(), &Page::Clients);
        app.navigate(Page::InventoryDetail { inventory_id: "nope".into() });
        assert_eq!(app.page(), &Page::Inventory);
        app.navigate(Page::EditJob { job_id: "nope".into() });
        assert_eq!(app.page(), &Page::Jobs);
    }

    #[tokio::test]
    async fn known_pages_resolve_to_detail_screens() {
        let mut app = demo_app().await;
        app.navigate(Page::ClientDetail { client_id: "1".into() });
        match app.screen() {
            Screen::ClientDetail { client, scheduled, completed } => {
                assert_eq!(client.name, "Emily Johnson");
                assert_eq!(scheduled.len(), 2);
                assert!(completed.is_empty());
            }
            _ => panic!("expected client detail"),
        }
        app.back();
        assert_eq!(app.page(), &Page::Clients);
    }

    #[tokio::test]
    async fn invalid_client_is_rejected_without_service_call() {
        let mut app = demo_app().await;
        app.navigate(Page::AddClient);
        let errors = app.add_client(ClientDraft::default()).await.unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(app.clients().len(), 3);
        assert_eq!(app.page(), &Page::AddClient);
    }

    #[tokio::test]
    async fn adding_a_client_updates_snapshot_and_page() {
        let mut app = demo_app().await;
        app.navigate(Page::AddClient);
        app.add_client(valid_client()).await.unwrap();
        assert_eq!(app.page(), &Page::Clients);
        assert_eq!(app.clients().len(), 4);
        assert_eq!(app.notice().unwrap().level, NoticeLevel::Info);
    }

    #[tokio::test]
    async fn job_address_is_a_copy() {
        let mut app = demo_app().await;
        app.add_client(valid_client()).await.unwrap();
        let client = app.clients().last().unwrap().clone();
        app.schedule_job(job_for(&client)).await.unwrap();
        let job_id = app.jobs().last().unwrap().id.clone();

        let mut moved = ClientDraft::from(&client);
        moved.addresses[0].street = "99 New Street".into();
        app.update_client(&client.id, moved).await.unwrap();

        assert_eq!(app.find_job(&job_id).unwrap().address.street, "7 Willow Way");
        assert_eq!(app.find_client(&client.id).unwrap().addresses[0].street, "99 New Street");
    }

    #[tokio::test]
    async fn archive_then_delete_a_job() {
        let mut app = demo_app().await;
        app.navigate(Page::JobDetail { job_id: "job-1".into() });
        app.archive_job("job-1").await;
        assert_eq!(app.page(), &Page::Jobs);
        assert_eq!(app.find_job("job-1").unwrap().status, JobStatus::Archived);

        app.delete_job("job-1").await;
        assert!(app.find_job("job-1").is_none());

        app.delete_job("job-1").await;
        assert_eq!(app.notice().unwrap().level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn status_and_payment_changes_stay_on_detail() {
        let mut app = demo_app().await;
        app.navigate(Page::JobDetail { job_id: "job-1".into() });
        app.set_job_status("job-1", JobStatus::Completed).await;
        app.record_payment("job-1").await;

        let job = app.find_job("job-1").unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_date.is_some());
        assert!(job.is_paid());
        assert_eq!(app.page(), &Page::JobDetail { job_id: "job-1".into() });
    }

    #[tokio::test]
    async fn generating_an_invoice_bills_the_job() {
        let mut app = demo_app().await;
        let before = app.invoices().len();
        app.generate_invoice("job-2").await;
        assert_eq!(app.invoices().len(), before + 1);
        let invoice = app.invoices().last().unwrap();
        assert_eq!(invoice.amount, 250.0);
        assert_eq!(invoice.due_date, NaiveDate::from_ymd_opt(2025, 3, 19).unwrap());
        assert_eq!(app.page(), &Page::Invoices);
    }

    #[tokio::test]
    async fn paid_invoices_cannot_be_deleted() {
        let mut app = demo_app().await;
        app.delete_invoice("inv-2").await;
        assert!(app.find_invoice("inv-2").is_some());
        assert_eq!(app.notice().unwrap().level, NoticeLevel::Error);

        app.delete_invoice("inv-1").await;
        assert!(app.find_invoice("inv-1").is_none());
    }

    #[tokio::test]
    async fn invoice_archive_round_trip() {
        let mut app = demo_app().await;
        app.archive_invoice("inv-3").await;
        assert_eq!(app.find_invoice("inv-3").unwrap().status, InvoiceStatus::Archived);
        app.unarchive_invoice("inv-3").await;
        assert_eq!(app.find_invoice("inv-3").unwrap().status, InvoiceStatus::Pending);
        app.mark_invoice_paid("inv-3").await;
        assert_eq!(app.find_invoice("inv-3").unwrap().status, InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn stock_adjustments_refuse_to_go_negative() {
        let mut app = demo_app().await;
        app.adjust_stock("item-1", -20).await;
        assert_eq!(app.find_item("item-1").unwrap().current_stock, 8);
        assert_eq!(app.take_notice().unwrap().level, NoticeLevel::Error);

        app.adjust_stock("item-1", 5).await;
        assert_eq!(app.find_item("item-1").unwrap().current_stock, 13);
        assert!(!app.find_item("item-1").unwrap().is_low_stock());
    }

    #[tokio::test]
    async fn huge_stock_changes_are_refused_in_place() {
        let mut app = demo_app().await;
        app.navigate(Page::InventoryDetail {
            inventory_id: "item-1".into(),
        });

        app.adjust_stock("item-1", i64::MAX).await;
        assert_eq!(app.find_item("item-1").unwrap().current_stock, 8);
        assert_eq!(app.take_notice().unwrap().level, NoticeLevel::Error);

        app.adjust_stock("item-1", i64::MIN).await;
        assert_eq!(app.find_item("item-1").unwrap().current_stock, 8);

        app.adjust_stock("item-1", 5_000_000_000).await;
        let notice = app.take_notice().unwrap();
        assert!(notice.message.contains("at most"), "{}", notice.message);
        assert_eq!(app.find_item("item-1").unwrap().current_stock, 8);
        assert_eq!(
            app.page(),
            &Page::InventoryDetail {
                inventory_id: "item-1".into()
            }
        );
    }

    #[tokio::test]
    async fn saving_a_client_returns_to_its_detail() {
        let mut app = demo_app().await;
        app.navigate(Page::EditClient { client_id: "2".into() });
        let mut draft = ClientDraft::from(app.find_client("2").unwrap());
        draft.email = "michael.r@example.com".into();
        app.update_client("2", draft).await.unwrap();
        assert_eq!(app.page(), &Page::ClientDetail { client_id: "2".into() });
        assert_eq!(app.find_client("2").unwrap().email, "michael.r@example.com");
    }

    #[tokio::test]
    async fn dashboard_counts_todays_earnings() {
        let app = demo_app().await;
        let view = app.dashboard_view();
        // job-1 ($120 unpaid) and job-3 ($95 paid) are today; job-5 ($180 paid) was yesterday.
        assert_eq!(view.summary.today_tally.total, 215.0);
        assert_eq!(view.summary.today_tally.paid, 1);
        assert_eq!(view.todays_jobs.len(), 2);
        assert!(view.todays_jobs.iter().all(|(_, client)| client.is_some()));
        assert!(view.show_overview);
        assert_eq!(view.alerts.len(), 3);
    }

    #[tokio::test]
    async fn dashboard_counts_every_active_job() {
        let mut app = demo_app().await;
        app.set_job_status("job-1", JobStatus::Cancelled).await;
        app.set_job_status("job-3", JobStatus::Completed).await;
        let view = app.dashboard_view();
        assert_eq!(view.summary.today_tally.total, 215.0);
        assert_eq!(view.todays_jobs.len(), 2);

        app.archive_job("job-3").await;
        let view = app.dashboard_view();
        assert_eq!(view.summary.today_tally.total, 120.0);
        assert_eq!(view.summary.today_tally.paid, 0);
        assert_eq!(view.todays_jobs.len(), 1);
    }

    #[tokio::test]
    async fn failed_service_call_leaves_state_unchanged() {
        let mut services = demo_data(today()).into_services();
        services.jobs = Arc::new(DownJobs);
        let mut app = App::new(services, AppSettings::default(), None).with_today(today());
        app.load().await;

        assert!(app.jobs().is_empty());
        assert!(app.clients().is_empty());
        assert_eq!(app.take_notice().unwrap().level, NoticeLevel::Error);

        let mut services = demo_data(today()).into_services();
        services.jobs = Arc::new(DownJobs);
        let mut app = App::new(services, AppSettings::default(), None).with_today(today());
        app.add_client(valid_client()).await.unwrap();
        let client = app.clients()[0].clone();
        app.navigate(Page::ScheduleJob);
        app.schedule_job(job_for(&client)).await.unwrap();

        assert!(app.jobs().is_empty());
        assert_eq!(app.page(), &Page::ScheduleJob);
        let notice = app.take_notice().unwrap();
        assert!(notice.message.contains("connection refused"), "{}", notice.message);
    }

    #[tokio::test]
    async fn dismissing_the_overview_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.toml"));
        let mut app = App::new(Services::in_memory(), store.load().unwrap(), Some(store.clone()));
        assert!(app.dashboard_view().show_overview);

        app.dismiss_overview();
        assert!(!app.dashboard_view().show_overview);
        assert!(store.load().unwrap().overview_dismissed);
    }
}
