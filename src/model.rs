use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Clients
// ==========================================

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    #[default]
    Primary,
    Secondary,
}

impl AddressKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "type")]
    pub kind: AddressKind,
}

impl Address {
    pub fn one_line(&self) -> String {
        format!("{}, {}, {}", self.street, self.city, self.state)
    }

    pub fn is_complete(&self) -> bool {
        !self.street.trim().is_empty() && !self.city.trim().is_empty() && !self.state.trim().is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PhoneKind {
    #[default]
    Mobile,
    Home,
}

impl PhoneKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Home => "home",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PhoneNumber {
    pub number: String,
    #[serde(rename = "type")]
    pub kind: PhoneKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
    pub temperament: Option<String>,
    pub care_instructions: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NoteKind {
    General,
    LastVisit,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Note {
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: NoteKind,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub addresses: Vec<Address>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub email: String,
    pub has_pets: bool,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Client {
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.kind == AddressKind::Primary)
    }

    pub fn mobile_phone(&self) -> Option<&PhoneNumber> {
        self.phone_numbers.iter().find(|p| p.kind == PhoneKind::Mobile)
    }

    /// City of the primary address, empty when there is none.
    pub fn primary_city(&self) -> &str {
        self.primary_address().map(|a| a.city.as_str()).unwrap_or("")
    }
}

/// Fields a caller supplies when creating a client (and what the edit form holds).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientDraft {
    pub name: String,
    pub addresses: Vec<Address>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub email: String,
    pub has_pets: bool,
    #[serde(default)]
    pub pets: Vec<Pet>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl From<&Client> for ClientDraft {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            addresses: client.addresses.clone(),
            phone_numbers: client.phone_numbers.clone(),
            email: client.email.clone(),
            has_pets: client.has_pets,
            pets: client.pets.clone(),
            notes: client.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    pub name: Option<String>,
    pub addresses: Option<Vec<Address>>,
    pub phone_numbers: Option<Vec<PhoneNumber>>,
    pub email: Option<String>,
    pub has_pets: Option<bool>,
    pub pets: Option<Vec<Pet>>,
    pub notes: Option<Vec<Note>>,
}

impl From<ClientDraft> for ClientPatch {
    fn from(draft: ClientDraft) -> Self {
        Self {
            name: Some(draft.name),
            addresses: Some(draft.addresses),
            phone_numbers: Some(draft.phone_numbers),
            email: Some(draft.email),
            has_pets: Some(draft.has_pets),
            pets: Some(draft.pets),
            notes: Some(draft.notes),
        }
    }
}

// ==========================================
// Jobs
// ==========================================

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobKind {
    #[default]
    #[serde(rename = "Regular Cleaning")]
    RegularCleaning,
    #[serde(rename = "Deep Cleaning")]
    DeepCleaning,
}

impl JobKind {
    pub const ALL: [JobKind; 2] = [Self::RegularCleaning, Self::DeepCleaning];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegularCleaning => "Regular Cleaning",
            Self::DeepCleaning => "Deep Cleaning",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Archived,
}

impl JobStatus {
    pub const ALL: [JobStatus; 5] = [
        Self::Scheduled,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
        Self::Archived,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Archived => "archived",
        }
    }

    /// Accepts both `in-progress` and `in_progress` spellings.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "scheduled" => Some(Self::Scheduled),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        })
    }
}

/// Address as it was when the job was scheduled. Later edits to the client
/// do not reach it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct JobAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "type")]
    pub kind: AddressKind,
}

impl From<&Address> for JobAddress {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            kind: address.kind,
        }
    }
}

impl JobAddress {
    pub fn one_line(&self) -> String {
        format!("{}, {}, {}", self.street, self.city, self.state)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub status: JobStatus,
    pub scheduled_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    pub duration: Option<String>,
    pub amount: Option<f64>,
    pub price: f64,
    pub payment_status: PaymentStatus,
    pub address: JobAddress,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Job {
    pub fn scheduled_day(&self) -> NaiveDate {
        self.scheduled_date.date()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub client_id: String,
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub status: JobStatus,
    pub scheduled_date: NaiveDateTime,
    pub completed_date: Option<NaiveDateTime>,
    pub duration: Option<String>,
    pub amount: Option<f64>,
    pub price: f64,
    pub payment_status: PaymentStatus,
    pub address: JobAddress,
    pub notes: Option<String>,
}

impl From<&Job> for JobDraft {
    fn from(job: &Job) -> Self {
        Self {
            client_id: job.client_id.clone(),
            kind: job.kind,
            status: job.status,
            scheduled_date: job.scheduled_date,
            completed_date: job.completed_date,
            duration: job.duration.clone(),
            amount: job.amount,
            price: job.price,
            payment_status: job.payment_status,
            address: job.address.clone(),
            notes: job.notes.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub client_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<JobKind>,
    pub status: Option<JobStatus>,
    pub scheduled_date: Option<NaiveDateTime>,
    pub completed_date: Option<NaiveDateTime>,
    pub duration: Option<String>,
    pub amount: Option<f64>,
    pub price: Option<f64>,
    pub payment_status: Option<PaymentStatus>,
    pub address: Option<JobAddress>,
    pub notes: Option<String>,
}

impl From<JobDraft> for JobPatch {
    fn from(draft: JobDraft) -> Self {
        Self {
            client_id: Some(draft.client_id),
            kind: Some(draft.kind),
            status: Some(draft.status),
            scheduled_date: Some(draft.scheduled_date),
            completed_date: draft.completed_date,
            duration: draft.duration,
            amount: draft.amount,
            price: Some(draft.price),
            payment_status: Some(draft.payment_status),
            address: Some(draft.address),
            notes: draft.notes,
        }
    }
}

// ==========================================
// Invoices
// ==========================================

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
    Archived,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [Self::Paid, Self::Pending, Self::Overdue, Self::Archived];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Pending => "Pending",
            Self::Overdue => "Overdue",
            Self::Archived => "Archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub description: String,
    pub amount: f64,
    pub job_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub job_ids: Vec<String>,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl Invoice {
    pub fn item_total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub client_id: String,
    pub job_ids: Vec<String>,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    pub client_id: Option<String>,
    pub job_ids: Option<Vec<String>>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub amount: Option<f64>,
    pub status: Option<InvoiceStatus>,
    pub items: Option<Vec<InvoiceItem>>,
    pub notes: Option<String>,
}

// ==========================================
// Inventory
// ==========================================

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub current_stock: u32,
    pub min_stock: u32,
    pub unit: String,
    pub last_updated: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

impl InventoryItem {
    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.current_stock == 0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDraft {
    pub name: String,
    pub category: String,
    pub current_stock: u32,
    pub min_stock: u32,
    pub unit: String,
    pub last_updated: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub current_stock: Option<u32>,
    pub min_stock: Option<u32>,
    pub unit: Option<String>,
    pub last_updated: Option<NaiveDate>,
    pub notes: Option<String>,
}
