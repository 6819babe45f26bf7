//! Interactive front desk.
//!
//! Each turn prints the current page, then offers a menu of what can be done
//! from it. Every choice turns into one controller call or one navigation.
//! Esc on a prompt backs out of that prompt; Ctrl-C ends the session.

mod forms;

use anyhow::Result;
use chrono::Datelike;
use inquire::{Confirm, CustomType, InquireError, MultiSelect, Select, Text};
use std::fmt;
use tracing::info;

use crate::app::{App, Screen};
use crate::model::{InvoiceStatus, JobStatus, PaymentStatus};
use crate::navigation::Page;
use crate::views::clients::{ClientFilter, ClientQuery, ClientSort, client_detail, client_table};
use crate::views::inventory::{
    InventoryQuery, StockFilter, categories, inventory_detail, inventory_table,
};
use crate::views::invoices::{InvoiceQuery, InvoiceSummary, invoice_items_table, invoice_table};
use crate::views::jobs::{JobQuery, JobSort, job_detail, job_table};
use crate::views::{self, SortDirection, money};

/// A menu entry: shown as `label`, answers with `value`.
pub(crate) struct Labeled<T> {
    label: String,
    value: T,
}

impl<T> Labeled<T> {
    pub(crate) fn new(label: impl Into<String>, value: T) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

impl<T> fmt::Display for Labeled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Esc becomes `None`; every other prompt failure is an error.
pub(crate) fn optional<T>(result: Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn pick<T>(message: &str, options: Vec<Labeled<T>>) -> Result<Option<T>> {
    if options.is_empty() {
        println!("(nothing to choose from)");
        return Ok(None);
    }
    let choice = optional(Select::new(message, options).with_page_size(12).prompt())?;
    Ok(choice.map(|c| c.value))
}

pub(crate) fn confirm(message: &str) -> Result<bool> {
    Ok(optional(Confirm::new(message).with_default(false).prompt())?.unwrap_or(false))
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationInterrupted)
    )
}

enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
enum Action {
    Go(Page),
    Back,
    Refresh,
    Quit,
    DismissOverview,
    InvoiceSummary,
    Search,
    Filter,
    Sort,
    PickClient,
    PickJob,
    PickInvoice,
    PickItem,
    AddItem,
    ArchiveClient(String, bool),
    DeleteClient(String),
    ChangeStatus(String),
    RecordPayment(String),
    GenerateInvoice(String),
    ArchiveJob(String, bool),
    DeleteJob(String),
    AdjustStock(String),
    ArchiveItem(String),
    DeleteItem(String),
}

/// List settings that survive page changes for the length of a session.
#[derive(Debug, Default)]
pub struct Session {
    clients: ClientQuery,
    jobs: JobQuery,
    invoices: InvoiceQuery,
    inventory: InventoryQuery,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run(&mut self, app: &mut App) -> Result<()> {
        loop {
            self.show(app);
            match self.step(app).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) if is_interrupt(&err) => break,
                Err(err) => return Err(err),
            }
        }
        info!("session ended");
        Ok(())
    }

    fn show(&self, app: &mut App) {
        println!("\n========== {} ==========", app.page());
        if let Some(notice) = app.take_notice() {
            println!("{}", views::notice_line(&notice));
        }
        let body = self.render(app);
        if !body.is_empty() {
            println!("{body}");
        }
        println!("{}", views::tab_bar(app.page()));
    }

    fn render(&self, app: &App) -> String {
        match app.screen() {
            Screen::Dashboard(view) => views::dashboard::render(&view, app.settings()),
            Screen::Clients { clients } => {
                let rows = self.clients.apply(clients);
                format!("{} client(s)\n{}", rows.len(), client_table(&rows))
            }
            Screen::Jobs { jobs, clients } => {
                let rows = self.jobs.apply(jobs, clients);
                format!("{} job(s)\n{}", rows.len(), job_table(&rows))
            }
            Screen::Invoices { invoices, clients } => {
                let rows = self.invoices.apply(invoices, clients);
                let outstanding: f64 = rows
                    .iter()
                    .filter(|i| i.status != InvoiceStatus::Paid)
                    .map(|i| i.amount)
                    .sum();
                format!(
                    "{} invoice(s), {} outstanding\n{}",
                    rows.len(),
                    money(outstanding),
                    invoice_table(&rows, clients)
                )
            }
            Screen::Inventory { items } => {
                let rows = self.inventory.apply(items);
                format!("{} item(s)\n{}", rows.len(), inventory_table(&rows))
            }
            Screen::ClientDetail {
                client,
                scheduled,
                completed,
            } => client_detail(client, &scheduled, &completed),
            Screen::JobDetail { job, client } => job_detail(job, client),
            Screen::InventoryDetail { item } => inventory_detail(item),
            Screen::AddClient
            | Screen::EditClient { .. }
            | Screen::EditJob { .. }
            | Screen::ScheduleJob { .. } => String::new(),
        }
    }

    async fn step(&mut self, app: &mut App) -> Result<Flow> {
        match app.page().clone() {
            Page::AddClient => forms::add_client(app).await?,
            Page::EditClient { client_id } => forms::edit_client(app, &client_id).await?,
            Page::ScheduleJob => forms::schedule_job(app).await?,
            Page::EditJob { job_id } => forms::edit_job(app, &job_id).await?,
            _ => {
                let actions = self.actions_for(app);
                match pick("What next?", actions)? {
                    Some(action) => return self.perform(app, action).await,
                    None => app.back(),
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn actions_for(&self, app: &App) -> Vec<Labeled<Action>> {
        let mut items = Vec::new();
        let mut add = |label: &str, action: Action| items.push(Labeled::new(label, action));

        match app.screen() {
            Screen::Dashboard(view) => {
                if !view.todays_jobs.is_empty() {
                    add("Open one of today's jobs", Action::PickJob);
                }
                add("Schedule a job", Action::Go(Page::ScheduleJob));
                add("Invoice summary", Action::InvoiceSummary);
                if view.show_overview {
                    add("Dismiss overview", Action::DismissOverview);
                }
            }
            Screen::Clients { .. } => {
                add("Open a client", Action::PickClient);
                add("Add client", Action::Go(Page::AddClient));
                add("Search", Action::Search);
                add("Filter", Action::Filter);
                add("Sort", Action::Sort);
            }
            Screen::Jobs { .. } => {
                add("Open a job", Action::PickJob);
                add("Schedule a job", Action::Go(Page::ScheduleJob));
                add("Search", Action::Search);
                add("Filter by status", Action::Filter);
                add("Sort", Action::Sort);
            }
            Screen::Invoices { .. } => {
                add("Open an invoice", Action::PickInvoice);
                add("Search", Action::Search);
                add("Filter by status", Action::Filter);
                add("Invoice summary", Action::InvoiceSummary);
            }
            Screen::Inventory { .. } => {
                add("Open an item", Action::PickItem);
                add("Add item", Action::AddItem);
                add("Search", Action::Search);
                add("Filter", Action::Filter);
            }
            Screen::ClientDetail {
                client,
                scheduled,
                completed,
            } => {
                let id = client.id.clone();
                if !scheduled.is_empty() || !completed.is_empty() {
                    add("Open a job", Action::PickJob);
                }
                add("Edit client", Action::Go(Page::EditClient { client_id: id.clone() }));
                if client.archived {
                    add("Restore client", Action::ArchiveClient(id.clone(), false));
                } else {
                    add("Archive client", Action::ArchiveClient(id.clone(), true));
                }
                add("Delete client", Action::DeleteClient(id));
            }
            Screen::JobDetail { job, client } => {
                let id = job.id.clone();
                add("Change status", Action::ChangeStatus(id.clone()));
                if job.payment_status == PaymentStatus::Unpaid {
                    add("Record payment", Action::RecordPayment(id.clone()));
                }
                add("Generate invoice", Action::GenerateInvoice(id.clone()));
                add("Edit job", Action::Go(Page::EditJob { job_id: id.clone() }));
                add(
                    &format!("View {}", client.name),
                    Action::Go(Page::ClientDetail {
                        client_id: client.id.clone(),
                    }),
                );
                if job.archived {
                    add("Restore job", Action::ArchiveJob(id.clone(), false));
                } else {
                    add("Archive job", Action::ArchiveJob(id.clone(), true));
                }
                add("Delete job", Action::DeleteJob(id));
            }
            Screen::InventoryDetail { item } => {
                add("Adjust stock", Action::AdjustStock(item.id.clone()));
                add("Archive item", Action::ArchiveItem(item.id.clone()));
                add("Delete item", Action::DeleteItem(item.id.clone()));
            }
            Screen::AddClient
            | Screen::EditClient { .. }
            | Screen::EditJob { .. }
            | Screen::ScheduleJob { .. } => {}
        }

        let page = app.page();
        add("Refresh", Action::Refresh);
        for tab in Page::TABS {
            if !page.is_tab_active(&tab) {
                add(&format!("Go to {}", tab.label()), Action::Go(tab));
            }
        }
        if !page.is_top_level() {
            add("Back", Action::Back);
        }
        add("Quit", Action::Quit);
        items
    }

    async fn perform(&mut self, app: &mut App, action: Action) -> Result<Flow> {
        match action {
            Action::Go(page) => app.navigate(page),
            Action::Back => app.back(),
            Action::Refresh => app.load().await,
            Action::Quit => return Ok(Flow::Quit),
            Action::DismissOverview => app.dismiss_overview(),
            Action::InvoiceSummary => print_summary(app)?,
            Action::Search => self.edit_search(app.page())?,
            Action::Filter => self.edit_filter(app)?,
            Action::Sort => self.edit_sort(app.page())?,
            Action::PickClient => {
                let options = self
                    .clients
                    .apply(app.clients())
                    .into_iter()
                    .map(|c| Labeled::new(format!("{} ({})", c.name, c.primary_city()), c.id.clone()))
                    .collect();
                if let Some(client_id) = pick("Client:", options)? {
                    app.navigate(Page::ClientDetail { client_id });
                }
            }
            Action::PickJob => {
                if let Some(job_id) = pick("Job:", self.job_options(app))? {
                    app.navigate(Page::JobDetail { job_id });
                }
            }
            Action::PickInvoice => self.invoice_actions(app).await?,
            Action::PickItem => {
                let options = self
                    .inventory
                    .apply(app.inventory())
                    .into_iter()
                    .map(|i| Labeled::new(i.name.clone(), i.id.clone()))
                    .collect();
                if let Some(inventory_id) = pick("Item:", options)? {
                    app.navigate(Page::InventoryDetail { inventory_id });
                }
            }
            Action::AddItem => forms::add_inventory_item(app).await?,
            Action::ArchiveClient(id, true) => app.archive_client(&id).await,
            Action::ArchiveClient(id, false) => app.unarchive_client(&id).await,
            Action::DeleteClient(id) => {
                if confirm("Delete this client for good? Their jobs stay but lose their client.")? {
                    app.delete_client(&id).await;
                }
            }
            Action::ChangeStatus(id) => {
                let current = app.find_job(&id).map(|j| j.status);
                let options: Vec<Labeled<JobStatus>> = JobStatus::ALL
                    .into_iter()
                    .filter(|s| *s != JobStatus::Archived)
                    .map(|s| Labeled::new(s.as_str(), s))
                    .collect();
                let cursor = options
                    .iter()
                    .position(|o| Some(o.value) == current)
                    .unwrap_or(0);
                let choice = optional(Select::new("New status:", options).with_starting_cursor(cursor).prompt())?;
                if let Some(choice) = choice {
                    app.set_job_status(&id, choice.value).await;
                }
            }
            Action::RecordPayment(id) => app.record_payment(&id).await,
            Action::GenerateInvoice(id) => app.generate_invoice(&id).await,
            Action::ArchiveJob(id, true) => app.archive_job(&id).await,
            Action::ArchiveJob(id, false) => app.unarchive_job(&id).await,
            Action::DeleteJob(id) => {
                if confirm("Delete this job for good?")? {
                    app.delete_job(&id).await;
                }
            }
            Action::AdjustStock(id) => {
                let delta = optional(
                    CustomType::<i64>::new("Change by (negative to use stock):")
                        .with_error_message("Enter a whole number, e.g. 5 or -2")
                        .prompt(),
                )?;
                if let Some(delta) = delta.filter(|d| *d != 0) {
                    app.adjust_stock(&id, delta).await;
                }
            }
            Action::ArchiveItem(id) => app.archive_inventory_item(&id).await,
            Action::DeleteItem(id) => {
                if confirm("Delete this item for good?")? {
                    app.delete_inventory_item(&id).await;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn job_options(&self, app: &App) -> Vec<Labeled<String>> {
        let label = |job: &crate::model::Job, who: &str| {
            Labeled::new(
                format!(
                    "{} {} for {} ({})",
                    job.scheduled_date.format("%m/%d %H:%M"),
                    job.kind,
                    who,
                    job.status
                ),
                job.id.clone(),
            )
        };
        match app.screen() {
            Screen::Dashboard(view) => view
                .todays_jobs
                .iter()
                .map(|(job, client)| label(job, client.map_or("Unknown Client", |c| c.name.as_str())))
                .collect(),
            Screen::ClientDetail {
                client,
                scheduled,
                completed,
            } => scheduled
                .iter()
                .chain(completed.iter())
                .map(|job| label(job, &client.name))
                .collect(),
            _ => self
                .jobs
                .apply(app.jobs(), app.clients())
                .into_iter()
                .map(|(job, client)| label(job, &client.name))
                .collect(),
        }
    }

    fn edit_search(&mut self, page: &Page) -> Result<()> {
        let target = match page {
            Page::Clients => &mut self.clients.search,
            Page::Jobs => &mut self.jobs.search,
            Page::Invoices => &mut self.invoices.search,
            Page::Inventory => &mut self.inventory.search,
            _ => return Ok(()),
        };
        let answer = optional(
            Text::new("Search (empty to clear):")
                .with_initial_value(target.as_str())
                .prompt(),
        )?;
        if let Some(answer) = answer {
            *target = answer.trim().to_string();
        }
        Ok(())
    }

    fn edit_filter(&mut self, app: &App) -> Result<()> {
        match app.page() {
            Page::Clients => {
                let defaults: Vec<usize> = ClientFilter::ALL
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| self.clients.filters.contains(f))
                    .map(|(i, _)| i)
                    .collect();
                let options = ClientFilter::ALL.map(|f| Labeled::new(f.label(), f)).into();
                let chosen = optional(MultiSelect::new("Show:", options).with_default(&defaults).prompt())?;
                if let Some(chosen) = chosen {
                    self.clients.filters = chosen.into_iter().map(|c| c.value).collect();
                }
            }
            Page::Jobs => {
                let defaults: Vec<usize> = JobStatus::ALL
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| self.jobs.statuses.contains(s))
                    .map(|(i, _)| i)
                    .collect();
                let options = JobStatus::ALL.map(|s| Labeled::new(s.as_str(), s)).into();
                let chosen = optional(
                    MultiSelect::new("Statuses (none selected shows all):", options)
                        .with_default(&defaults)
                        .prompt(),
                )?;
                if let Some(chosen) = chosen {
                    self.jobs.statuses = chosen.into_iter().map(|c| c.value).collect();
                }
            }
            Page::Invoices => {
                let mut options = vec![Labeled::new("All (not archived)", None)];
                options.extend(InvoiceStatus::ALL.map(|s| Labeled::new(s.as_str(), Some(s))));
                if let Some(status) = pick("Status:", options)? {
                    self.invoices.status = status;
                }
            }
            Page::Inventory => {
                let mut options = vec![Labeled::new("All categories", None)];
                options.extend(categories(app.inventory()).into_iter().map(|c| Labeled::new(c.clone(), Some(c))));
                if let Some(category) = pick("Category:", options)? {
                    self.inventory.category = category;
                }
                let mut options = vec![Labeled::new("Any stock level", None)];
                options.extend(StockFilter::ALL.map(|s| Labeled::new(s.label(), Some(s))));
                if let Some(stock) = pick("Stock:", options)? {
                    self.inventory.stock = stock;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn edit_sort(&mut self, page: &Page) -> Result<()> {
        match page {
            Page::Clients => {
                let options = ClientSort::ALL.map(|s| Labeled::new(s.label(), s)).into();
                if let Some(sort) = pick("Sort by:", options)? {
                    self.clients.sort = sort;
                    self.clients.direction = pick_direction(self.clients.direction)?;
                }
            }
            Page::Jobs => {
                let options = JobSort::ALL.map(|s| Labeled::new(s.label(), s)).into();
                if let Some(sort) = pick("Sort by:", options)? {
                    self.jobs.sort = sort;
                    self.jobs.direction = pick_direction(self.jobs.direction)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn invoice_actions(&mut self, app: &mut App) -> Result<()> {
        let options = self
            .invoices
            .apply(app.invoices(), app.clients())
            .into_iter()
            .map(|i| {
                Labeled::new(
                    format!("{} {} {} ({})", i.id, i.date.format("%m/%d/%Y"), money(i.amount), i.status),
                    i.id.clone(),
                )
            })
            .collect();
        let Some(id) = pick("Invoice:", options)? else {
            return Ok(());
        };
        let Some(invoice) = app.find_invoice(&id) else {
            return Ok(());
        };
        println!("{}", invoice_items_table(invoice));
        if let Some(notes) = &invoice.notes {
            println!("Notes: {notes}");
        }

        let mut options = Vec::new();
        if invoice.status != InvoiceStatus::Paid {
            options.push(Labeled::new("Mark paid", 0));
        }
        if invoice.archived {
            options.push(Labeled::new("Restore", 1));
        } else {
            options.push(Labeled::new("Archive", 2));
        }
        if invoice.status != InvoiceStatus::Paid {
            options.push(Labeled::new("Delete", 3));
        }
        match pick("Invoice action:", options)? {
            Some(0) => app.mark_invoice_paid(&id).await,
            Some(1) => app.unarchive_invoice(&id).await,
            Some(2) => app.archive_invoice(&id).await,
            Some(3) if confirm("Delete this invoice for good?")? => app.delete_invoice(&id).await,
            _ => {}
        }
        Ok(())
    }
}

fn pick_direction(current: SortDirection) -> Result<SortDirection> {
    let options = vec![
        Labeled::new("Ascending", SortDirection::Asc),
        Labeled::new("Descending", SortDirection::Desc),
    ];
    Ok(pick("Direction:", options)?.unwrap_or(current))
}

/// Prints the yearly invoice roll-up for a year chosen at the prompt.
fn print_summary(app: &App) -> Result<()> {
    let this_year = app.today().year();
    let year = optional(CustomType::<i32>::new("Year:").with_default(this_year).prompt())?;
    if let Some(year) = year {
        let summary = InvoiceSummary::compute(app.invoices(), app.clients(), year);
        println!("\n--- Monthly Invoice Summary ({year}) ---\n{}", summary.month_table());
        println!("\n--- Client Summary ({year}) ---\n{}", summary.client_table());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_data;
    use crate::settings::AppSettings;
    use chrono::NaiveDate;

    async fn app() -> App {
        let today = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let mut app = App::new(demo_data(today).into_services(), AppSettings::default(), None).with_today(today);
        app.load().await;
        app
    }

    fn labels(actions: &[Labeled<Action>]) -> Vec<&str> {
        actions.iter().map(|a| a.label.as_str()).collect()
    }

    #[tokio::test]
    async fn dashboard_menu_offers_tabs_but_not_back() {
        let app = app().await;
        let session = Session::new();
        let actions = session.actions_for(&app);
        let labels = labels(&actions);
        assert!(labels.contains(&"Open one of today's jobs"));
        assert!(labels.contains(&"Dismiss overview"));
        assert!(labels.contains(&"Go to Clients"));
        assert!(!labels.contains(&"Go to Dashboard"));
        assert!(!labels.contains(&"Back"));
        assert_eq!(labels.last(), Some(&"Quit"));
    }

    #[tokio::test]
    async fn job_detail_menu_targets_the_job() {
        let mut app = app().await;
        app.navigate(Page::JobDetail { job_id: "job-3".into() });
        let session = Session::new();
        let actions = session.actions_for(&app);

        assert!(actions.iter().any(|a| a.value == Action::GenerateInvoice("job-3".into())));
        // job-3 is already paid.
        assert!(!actions.iter().any(|a| matches!(a.value, Action::RecordPayment(_))));
        assert!(labels(&actions).contains(&"View Michael Roberts"));
        assert!(labels(&actions).contains(&"Back"));
    }

    #[tokio::test]
    async fn job_options_follow_the_page() {
        let mut app = app().await;
        let session = Session::new();
        assert_eq!(session.job_options(&app).len(), 2);

        app.navigate(Page::ClientDetail { client_id: "3".into() });
        let options = session.job_options(&app);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].value, "job-5");

        app.navigate(Page::Jobs);
        assert_eq!(session.job_options(&app).len(), 4);
    }

    #[tokio::test]
    async fn performing_navigation_actions() {
        let mut app = app().await;
        let mut session = Session::new();
        session.perform(&mut app, Action::Go(Page::Inventory)).await.unwrap();
        assert_eq!(app.page(), &Page::Inventory);
        session.perform(&mut app, Action::Back).await.unwrap();
        assert_eq!(app.page(), &Page::Dashboard);
        assert!(matches!(session.perform(&mut app, Action::Quit).await.unwrap(), Flow::Quit));
    }

    #[tokio::test]
    async fn render_uses_session_queries() {
        let mut app = app().await;
        app.navigate(Page::Clients);
        let mut session = Session::new();
        assert!(session.render(&app).starts_with("3 client(s)"));
        session.clients.search = "sofia".into();
        assert!(session.render(&app).starts_with("1 client(s)"));
    }
}
