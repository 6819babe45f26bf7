//! Demo collections loaded at start when `seed_demo_data` is on.
//!
//! Job dates are relative to `today` so the dashboard always has something to show.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::model::{
    Address, AddressKind, Client, InventoryItem, Invoice, InvoiceItem, InvoiceStatus, Job,
    JobAddress, JobKind, JobStatus, Note, NoteKind, PaymentStatus, Pet, PhoneKind, PhoneNumber,
};
use crate::services::Services;

pub struct DemoData {
    pub clients: Vec<Client>,
    pub jobs: Vec<Job>,
    pub invoices: Vec<Invoice>,
    pub inventory: Vec<InventoryItem>,
}

impl DemoData {
    pub fn into_services(self) -> Services {
        Services::from_records(self.clients, self.jobs, self.invoices, self.inventory)
    }
}

fn stamp(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 8, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn address(street: &str, city: &str, kind: AddressKind) -> Address {
    Address {
        street: street.into(),
        city: city.into(),
        state: "IL".into(),
        kind,
    }
}

fn phone(number: &str, kind: PhoneKind) -> PhoneNumber {
    PhoneNumber {
        number: number.into(),
        kind,
    }
}

fn at_noon(today: NaiveDate, offset_days: i64) -> NaiveDateTime {
    let day = if offset_days >= 0 {
        today.checked_add_days(Days::new(offset_days.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(offset_days.unsigned_abs()))
    };
    day.unwrap_or(today).and_hms_opt(12, 0, 0).unwrap_or_default()
}

pub fn demo_data(today: NaiveDate) -> DemoData {
    let clients = demo_clients();
    let jobs = demo_jobs(&clients, today);
    DemoData {
        invoices: demo_invoices(),
        inventory: demo_inventory(),
        clients,
        jobs,
    }
}

fn demo_clients() -> Vec<Client> {
    vec![
        Client {
            id: "1".into(),
            name: "Emily Johnson".into(),
            addresses: vec![
                address("123 Maple Street", "Springfield", AddressKind::Primary),
                address("456 Oak Avenue", "Springfield", AddressKind::Secondary),
            ],
            phone_numbers: vec![
                phone("(555) 123-4567", PhoneKind::Mobile),
                phone("(555) 987-6543", PhoneKind::Home),
            ],
            email: "emily.johnson@email.com".into(),
            has_pets: true,
            pets: vec![Pet {
                kind: "dog".into(),
                count: 2,
                temperament: Some("All friendly".into()),
                care_instructions: Some("Lab & Golden Retriever".into()),
            }],
            notes: vec![
                Note {
                    content: "Prefers eco-friendly cleaning products. Allergic to strong fragrances."
                        .into(),
                    timestamp: stamp(2025, 1, 20),
                    kind: NoteKind::General,
                },
                Note {
                    content: "Cleaned windows and detailed kitchen cabinets. Client very satisfied."
                        .into(),
                    timestamp: stamp(2025, 1, 24),
                    kind: NoteKind::LastVisit,
                },
            ],
            created_at: stamp(2024, 12, 1),
            updated_at: stamp(2025, 1, 24),
            archived: false,
        },
        Client {
            id: "2".into(),
            name: "Michael Roberts".into(),
            addresses: vec![address("789 Pine Road", "Shelbyville", AddressKind::Primary)],
            phone_numbers: vec![phone("(555) 234-5678", PhoneKind::Mobile)],
            email: "m.roberts@email.com".into(),
            has_pets: false,
            pets: vec![],
            notes: vec![Note {
                content: "Key under the mat. Alarm code on file.".into(),
                timestamp: stamp(2025, 1, 10),
                kind: NoteKind::General,
            }],
            created_at: stamp(2024, 12, 15),
            updated_at: stamp(2025, 1, 10),
            archived: false,
        },
        Client {
            id: "3".into(),
            name: "Sofia Martinez".into(),
            addresses: vec![address("22 Cedar Court", "Capital City", AddressKind::Primary)],
            phone_numbers: vec![phone("(555) 345-6789", PhoneKind::Mobile)],
            email: "sofia.martinez@email.com".into(),
            has_pets: true,
            pets: vec![Pet {
                kind: "cat".into(),
                count: 1,
                temperament: Some("Shy".into()),
                care_instructions: Some("Keep bedroom door closed".into()),
            }],
            notes: vec![],
            created_at: stamp(2025, 1, 5),
            updated_at: stamp(2025, 1, 5),
            archived: false,
        },
    ]
}

fn demo_jobs(clients: &[Client], today: NaiveDate) -> Vec<Job> {
    let created = stamp(2025, 1, 2);
    let job = |id: &str,
               client: &Client,
               kind: JobKind,
               status: JobStatus,
               offset: i64,
               price: f64,
               paid: PaymentStatus| Job {
        id: id.into(),
        client_id: client.id.clone(),
        kind,
        status,
        scheduled_date: at_noon(today, offset),
        completed_date: (status == JobStatus::Completed).then(|| at_noon(today, offset)),
        duration: Some(match kind {
            JobKind::RegularCleaning => "2 hours".to_string(),
            JobKind::DeepCleaning => "4 hours".to_string(),
        }),
        amount: None,
        price,
        payment_status: paid,
        address: client
            .primary_address()
            .map(JobAddress::from)
            .unwrap_or_default(),
        notes: None,
        created_at: created,
        updated_at: created,
        archived: false,
    };

    let mut jobs = Vec::new();
    if let [emily, michael, sofia, ..] = clients {
        jobs.push(job("job-1", emily, JobKind::RegularCleaning, JobStatus::Scheduled, 0, 120.0, PaymentStatus::Unpaid));
        jobs.push(job("job-2", emily, JobKind::DeepCleaning, JobStatus::Scheduled, 4, 250.0, PaymentStatus::Unpaid));
        jobs.push(job("job-3", michael, JobKind::RegularCleaning, JobStatus::Scheduled, 0, 95.0, PaymentStatus::Paid));
        jobs.push(job("job-4", michael, JobKind::RegularCleaning, JobStatus::Completed, -7, 95.0, PaymentStatus::Paid));
        jobs.push(job("job-5", sofia, JobKind::DeepCleaning, JobStatus::Scheduled, -1, 180.0, PaymentStatus::Paid));
        jobs.push(job("job-6", sofia, JobKind::RegularCleaning, JobStatus::Cancelled, 2, 110.0, PaymentStatus::Unpaid));
    }
    if let Some(first) = jobs.first_mut() {
        first.notes = Some("Bi-weekly cleaning".into());
    }
    jobs
}

fn demo_invoices() -> Vec<Invoice> {
    let created = stamp(2024, 3, 25);
    vec![
        Invoice {
            id: "inv-1".into(),
            client_id: "1".into(),
            job_ids: vec!["job-1".into(), "job-4".into()],
            date: date(2024, 3, 25),
            due_date: date(2024, 4, 8),
            amount: 240.0,
            status: InvoiceStatus::Pending,
            items: vec![
                InvoiceItem {
                    description: "Regular Clean - March 25".into(),
                    amount: 120.0,
                    job_id: "job-1".into(),
                },
                InvoiceItem {
                    description: "Regular Clean - April 1".into(),
                    amount: 120.0,
                    job_id: "job-4".into(),
                },
            ],
            notes: Some("Monthly invoice for regular cleaning services".into()),
            created_at: created,
            updated_at: created,
            archived: false,
        },
        Invoice {
            id: "inv-2".into(),
            client_id: "2".into(),
            job_ids: vec!["job-2".into()],
            date: date(2024, 3, 28),
            due_date: date(2024, 4, 11),
            amount: 180.0,
            status: InvoiceStatus::Paid,
            items: vec![InvoiceItem {
                description: "Deep Clean - March 28".into(),
                amount: 180.0,
                job_id: "job-2".into(),
            }],
            notes: None,
            created_at: created,
            updated_at: created,
            archived: false,
        },
        Invoice {
            id: "inv-3".into(),
            client_id: "3".into(),
            job_ids: vec!["job-5".into()],
            date: date(2024, 3, 1),
            due_date: date(2024, 3, 15),
            amount: 150.0,
            status: InvoiceStatus::Overdue,
            items: vec![InvoiceItem {
                description: "Deep Clean - March 1".into(),
                amount: 150.0,
                job_id: "job-5".into(),
            }],
            notes: None,
            created_at: created,
            updated_at: created,
            archived: false,
        },
    ]
}

fn demo_inventory() -> Vec<InventoryItem> {
    let created = stamp(2024, 1, 15);
    let item = |id: &str, name: &str, category: &str, current: u32, min: u32, unit: &str, day: u32| {
        InventoryItem {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            current_stock: current,
            min_stock: min,
            unit: unit.into(),
            last_updated: Some(date(2024, 1, day)),
            notes: None,
            created_at: created,
            updated_at: created,
            archived: false,
        }
    };
    let mut items = vec![
        item("item-1", "All-Purpose Cleaner", "Cleaning Supplies", 8, 10, "bottles", 20),
        item("item-2", "Microfiber Cloths", "Cleaning Supplies", 45, 30, "pieces", 22),
        item("item-3", "Vacuum Cleaner", "Equipment", 2, 2, "units", 15),
        item("item-4", "Mop Heads", "Tools", 0, 6, "pieces", 18),
        item("item-5", "Glass Cleaner", "Cleaning Supplies", 14, 6, "bottles", 21),
    ];
    items[0].notes = Some("Eco-friendly formula".into());
    items
}
