use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use cleaning_desk::app::{App, NoticeLevel, Screen};
use cleaning_desk::logging::init_logging;
use cleaning_desk::model::{InvoiceStatus, JobStatus};
use cleaning_desk::navigation::Page;
use cleaning_desk::seed::demo_data;
use cleaning_desk::services::Services;
use cleaning_desk::session::Session;
use cleaning_desk::settings::{AppSettings, SettingsStore, expand_home_dir};
use cleaning_desk::views::clients::{ClientFilter, ClientQuery, ClientSort, client_table};
use cleaning_desk::views::inventory::{InventoryQuery, StockFilter, inventory_table};
use cleaning_desk::views::invoices::{InvoiceQuery, InvoiceSummary, invoice_table};
use cleaning_desk::views::jobs::{JobQuery, JobSort, job_table};
use cleaning_desk::views::{self, SortDirection};

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "cleaning-desk", version, about = "Front office for a house-cleaning business")]
struct Cli {
    /// Settings file to use instead of the platform default
    #[arg(long, global = true)]
    config: Option<String>,

    /// Print list output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug events to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show earnings, today's jobs and low-stock alerts
    Dashboard,
    /// List clients
    Clients {
        /// Match name, email or address
        #[arg(long)]
        search: Option<String>,
        /// Show archived clients instead of active ones
        #[arg(long)]
        archived: bool,
        /// Only clients with pets
        #[arg(long)]
        pets: bool,
        #[arg(long, value_enum, default_value_t = ClientSort::Name)]
        sort: ClientSort,
        /// Reverse the sort order
        #[arg(long)]
        desc: bool,
    },
    /// List jobs (scheduled and in progress unless --status is given)
    Jobs {
        /// Match type, status, client name or notes
        #[arg(long)]
        search: Option<String>,
        /// Repeatable: scheduled, in-progress, completed, cancelled, archived
        #[arg(long, value_parser = parse_job_status)]
        status: Vec<JobStatus>,
        /// Every status
        #[arg(long, conflicts_with = "status")]
        all: bool,
        #[arg(long, value_enum, default_value_t = JobSort::Date)]
        sort: JobSort,
        /// Oldest first when sorting by date
        #[arg(long)]
        asc: bool,
    },
    /// List invoices
    Invoices {
        /// Match invoice id or client name
        #[arg(long)]
        search: Option<String>,
        /// Paid, Pending, Overdue or Archived
        #[arg(long, value_parser = parse_invoice_status)]
        status: Option<InvoiceStatus>,
        /// Show monthly and per-client totals instead of the list
        #[arg(long)]
        summary: bool,
        /// Year to summarize (defaults to current year)
        #[arg(long, requires = "summary")]
        year: Option<i32>,
    },
    /// List supplies
    Inventory {
        /// Match item name
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        stock: Option<StockFilter>,
    },
    /// Configure business name, operator and invoice terms
    Config,
    /// Show the welcome overview on the dashboard again
    ResetOverview,
}

fn parse_job_status(value: &str) -> Result<JobStatus, String> {
    JobStatus::parse(value).ok_or_else(|| format!("unknown job status '{value}'"))
}

fn parse_invoice_status(value: &str) -> Result<InvoiceStatus, String> {
    InvoiceStatus::parse(value).ok_or_else(|| format!("unknown invoice status '{value}'"))
}

// ==========================================
// Main Function
// ==========================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = match &cli.config {
        Some(path) => SettingsStore::new(expand_home_dir(path)),
        None => SettingsStore::default_location(),
    };
    let settings = store
        .load()
        .with_context(|| format!("loading settings from {}", store.path().display()))?;
    debug!(path = %store.path().display(), ?settings, "settings loaded");

    match cli.command {
        Some(Commands::Config) => return config_wizard(&store, &settings),
        Some(Commands::ResetOverview) => {
            let settings = AppSettings {
                overview_dismissed: false,
                ..settings
            };
            store.save(&settings)?;
            println!("✅ The overview will show on the next dashboard.");
            return Ok(());
        }
        _ => {}
    }

    let today = Local::now().date_naive();
    let services = if settings.seed_demo_data {
        demo_data(today).into_services()
    } else {
        Services::in_memory()
    };
    let mut app = App::new(services, settings, Some(store));
    app.load().await;

    let Some(command) = cli.command else {
        info!("starting interactive session");
        return Session::new().run(&mut app).await;
    };
    if let Some(notice) = app.take_notice().filter(|n| n.level == NoticeLevel::Error) {
        eprintln!("{}", views::notice_line(&notice));
    }

    match command {
        Commands::Dashboard => show_dashboard(&app, cli.json)?,
        Commands::Clients {
            search,
            archived,
            pets,
            sort,
            desc,
        } => {
            let mut filters = BTreeSet::from([if archived {
                ClientFilter::Archived
            } else {
                ClientFilter::Active
            }]);
            if pets {
                filters.insert(ClientFilter::HasPets);
            }
            let query = ClientQuery {
                search: search.unwrap_or_default(),
                filters,
                sort,
                direction: if desc { SortDirection::Desc } else { SortDirection::Asc },
            };
            let rows = query.apply(app.clients());
            print_rows(cli.json, &rows, || client_table(&rows).to_string())?;
        }
        Commands::Jobs {
            search,
            status,
            all,
            sort,
            asc,
        } => {
            let mut query = JobQuery {
                search: search.unwrap_or_default(),
                sort,
                direction: if asc { SortDirection::Asc } else { SortDirection::Desc },
                ..JobQuery::default()
            };
            if all {
                query.statuses.clear();
            } else if !status.is_empty() {
                query.statuses = status.into_iter().collect();
            }
            let rows = query.apply(app.jobs(), app.clients());
            let jobs: Vec<_> = rows.iter().map(|(job, _)| *job).collect();
            print_rows(cli.json, &jobs, || job_table(&rows).to_string())?;
        }
        Commands::Invoices {
            search,
            status,
            summary,
            year,
        } => {
            if summary {
                let year = year.unwrap_or_else(|| today.year());
                let summary = InvoiceSummary::compute(app.invoices(), app.clients(), year);
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                } else {
                    println!("\n--- Monthly Invoice Summary ({year}) ---\n{}", summary.month_table());
                    println!("\n--- Client Summary ({year}) ---\n{}", summary.client_table());
                }
            } else {
                let query = InvoiceQuery {
                    search: search.unwrap_or_default(),
                    status,
                };
                let rows = query.apply(app.invoices(), app.clients());
                print_rows(cli.json, &rows, || invoice_table(&rows, app.clients()).to_string())?;
            }
        }
        Commands::Inventory {
            search,
            category,
            stock,
        } => {
            let query = InventoryQuery {
                search: search.unwrap_or_default(),
                category,
                stock,
            };
            let rows = query.apply(app.inventory());
            print_rows(cli.json, &rows, || inventory_table(&rows).to_string())?;
        }
        Commands::Config | Commands::ResetOverview => {}
    }
    Ok(())
}

// ==========================================
// Output
// ==========================================

fn print_rows<T: Serialize>(json: bool, rows: &[T], table: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else if rows.is_empty() {
        println!("(None found)");
    } else {
        println!("{}", table());
    }
    Ok(())
}

fn show_dashboard(app: &App, json: bool) -> Result<()> {
    let Screen::Dashboard(view) = app.screen() else {
        return Ok(());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&view.summary)?);
    } else {
        println!("{}", views::dashboard::render(&view, app.settings()));
        println!("{}", views::tab_bar(&Page::Dashboard));
    }
    Ok(())
}

// ==========================================
// Config
// ==========================================

fn config_wizard(store: &SettingsStore, current: &AppSettings) -> Result<()> {
    println!("\n⚙️  --- Configuration Setup ---");
    println!("📂 Settings file: {}", store.path().display());

    let business_name = Text::new("Business name:")
        .with_default(&current.business_name)
        .prompt()?;
    let operator_name = Text::new("Your name:")
        .with_default(&current.operator_name)
        .prompt()?;
    let invoice_terms_days = CustomType::<u32>::new("Invoice terms (days until due):")
        .with_default(current.invoice_terms_days)
        .prompt()?;
    let seed_demo_data = Confirm::new("Start with demo data?")
        .with_default(current.seed_demo_data)
        .prompt()?;

    let settings = AppSettings {
        business_name,
        operator_name,
        invoice_terms_days,
        seed_demo_data,
        ..current.clone()
    };
    store.save(&settings)?;
    println!("✅ Settings saved.");
    Ok(())
}
