use comfy_table::{Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Write as _;

use super::{SortDirection, WARN_AMBER, bold, contains_ci, money};
use crate::model::{Client, Job, NoteKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientFilter {
    Active,
    Archived,
    HasPets,
}

impl ClientFilter {
    pub const ALL: [ClientFilter; 3] = [Self::Active, Self::Archived, Self::HasPets];

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Archived => "Archived",
            Self::HasPets => "Has Pets",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ClientSort {
    #[default]
    Name,
    Recent,
    City,
}

impl ClientSort {
    pub const ALL: [ClientSort; 3] = [Self::Name, Self::Recent, Self::City];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Recent => "Recently Added",
            Self::City => "City",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientQuery {
    pub search: String,
    pub filters: BTreeSet<ClientFilter>,
    pub sort: ClientSort,
    pub direction: SortDirection,
}

impl Default for ClientQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeSet::from([ClientFilter::Active]),
            sort: ClientSort::Name,
            direction: SortDirection::Asc,
        }
    }
}

impl ClientQuery {
    fn matches_search(&self, client: &Client) -> bool {
        let needle = self.search.trim();
        contains_ci(&client.name, needle)
            || contains_ci(&client.email, needle)
            || client
                .addresses
                .iter()
                .any(|a| contains_ci(&format!("{} {} {}", a.street, a.city, a.state), needle))
    }

    /// Archived takes precedence over Active when both are selected.
    fn matches_filters(&self, client: &Client) -> bool {
        let archive_ok = if self.filters.contains(&ClientFilter::Archived) {
            client.archived
        } else if self.filters.contains(&ClientFilter::Active) {
            !client.archived
        } else {
            true
        };
        archive_ok && (!self.filters.contains(&ClientFilter::HasPets) || client.has_pets)
    }

    pub fn apply<'a>(&self, clients: &'a [Client]) -> Vec<&'a Client> {
        let mut rows: Vec<&Client> = clients
            .iter()
            .filter(|c| self.matches_search(c) && self.matches_filters(c))
            .collect();
        rows.sort_by(|a, b| {
            let ordering = match self.sort {
                ClientSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                // Ascending shows the newest first.
                ClientSort::Recent => b.created_at.cmp(&a.created_at),
                ClientSort::City => a.primary_city().cmp(b.primary_city()),
            };
            self.direction.apply(ordering)
        });
        rows
    }
}

pub fn client_table(clients: &[&Client]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Name", "City", "Mobile", "Email", "Pets", "Status"]);
    for client in clients {
        let pets = if client.has_pets {
            client
                .pets
                .iter()
                .map(|p| format!("{} {}", p.count, p.kind))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "-".to_string()
        };
        let status = if client.archived {
            Cell::new("Archived").fg(WARN_AMBER)
        } else {
            Cell::new("Active")
        };
        table.add_row(vec![
            bold(&client.name),
            Cell::new(client.primary_city()),
            Cell::new(client.mobile_phone().map_or("-", |p| p.number.as_str())),
            Cell::new(&client.email),
            Cell::new(pets),
            status,
        ]);
    }
    table
}

fn job_lines(out: &mut String, title: &str, jobs: &[&Job]) {
    let _ = writeln!(out, "\n{title} ({})", jobs.len());
    if jobs.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for job in jobs {
        let _ = writeln!(
            out,
            "  {}  {:<16} {}  {}",
            job.scheduled_date.format("%m/%d/%Y %H:%M"),
            job.kind.as_str(),
            money(job.price),
            job.payment_status
        );
    }
}

pub fn client_detail(client: &Client, scheduled: &[&Job], completed: &[&Job]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}{}", client.name, if client.archived { "  (archived)" } else { "" });
    let _ = writeln!(out, "Email: {}", client.email);
    for phone in &client.phone_numbers {
        let _ = writeln!(out, "Phone ({}): {}", phone.kind.as_str(), phone.number);
    }
    for address in &client.addresses {
        let _ = writeln!(out, "Address ({}): {}", address.kind.as_str(), address.one_line());
    }
    if client.has_pets {
        for pet in &client.pets {
            let _ = write!(out, "Pets: {} {}", pet.count, pet.kind);
            if let Some(temperament) = &pet.temperament {
                let _ = write!(out, ", {temperament}");
            }
            if let Some(care) = &pet.care_instructions {
                let _ = write!(out, " ({care})");
            }
            out.push('\n');
        }
    }
    if !client.notes.is_empty() {
        let _ = writeln!(out, "\nNotes");
        for note in &client.notes {
            let tag = match note.kind {
                NoteKind::General => "general",
                NoteKind::LastVisit => "last visit",
            };
            let _ = writeln!(out, "  [{}] {tag}: {}", note.timestamp.format("%m/%d/%Y"), note.content);
        }
    }
    job_lines(&mut out, "Scheduled jobs", scheduled);
    job_lines(&mut out, "Completed jobs", completed);
    out
}
