//! Prompt-driven forms for clients, jobs and inventory items.
//!
//! Forms return `None` when the user backs out with Esc. Validation happens
//! in the controller; on rejection the form is shown again pre-filled with
//! what was typed.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime, Utc};
use inquire::{Confirm, CustomType, DateSelect, Select, Text};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use super::{Labeled, confirm, optional, pick};
use crate::app::App;
use crate::model::{
    Address, AddressKind, Client, ClientDraft, InventoryDraft, JobAddress, JobDraft, JobKind,
    JobStatus, Note, NoteKind, PaymentStatus, Pet, PhoneKind, PhoneNumber,
};
use crate::validation::format_phone_number;
use crate::views::inventory::categories;

const NEW_CATEGORY_OPT: &str = "➕ New category";

fn print_errors<K: fmt::Display>(errors: &BTreeMap<K, String>) {
    println!("Please fix the following:");
    for (field, message) in errors {
        println!("  ❌ {field}: {message}");
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn ask(message: &str, initial: &str) -> Result<Option<String>> {
    optional(Text::new(message).with_initial_value(initial).prompt())
}

/// City and state for a zip code, `None` for blank or unknown codes.
pub(crate) fn lookup_zip(zip: &str) -> Option<(String, String)> {
    let zip = zip.trim();
    if zip.is_empty() {
        return None;
    }
    match zipcodes::matching(zip, None) {
        Ok(results) => results
            .first()
            .map(|info| (info.city.to_string(), info.state.to_string())),
        Err(_) => {
            debug!(zip, "zip lookup found nothing");
            None
        }
    }
}

/// Addresses a job for `client` may use. The job's current address comes
/// first when it is given.
pub(crate) fn address_choices(client: &Client, current: Option<&JobAddress>) -> Vec<Labeled<JobAddress>> {
    let mut choices = Vec::new();
    if let Some(current) = current {
        choices.push(Labeled::new(format!("Keep current: {}", current.one_line()), current.clone()));
    }
    for address in &client.addresses {
        let job_address = JobAddress::from(address);
        if current != Some(&job_address) {
            choices.push(Labeled::new(
                format!("{} ({})", address.one_line(), address.kind.as_str()),
                job_address,
            ));
        }
    }
    choices
}

// ==========================================
// Clients
// ==========================================

fn prompt_address(existing: Option<&Address>, kind: AddressKind) -> Result<Option<Address>> {
    let Some(street) = ask("Street:", existing.map_or("", |a| a.street.as_str()))? else {
        return Ok(None);
    };
    let Some(zip) = optional(Text::new("Zip Code (Leave empty to skip lookup):").prompt())? else {
        return Ok(None);
    };

    let (mut def_city, mut def_state) = existing
        .map(|a| (a.city.clone(), a.state.clone()))
        .unwrap_or_default();
    if let Some((city, state)) = lookup_zip(&zip) {
        println!("📍 Found: {city}, {state}");
        def_city = city;
        def_state = state;
    }

    let Some(city) = optional(Text::new("City:").with_default(&def_city).prompt())? else {
        return Ok(None);
    };
    let Some(state) = optional(Text::new("State:").with_default(&def_state).prompt())? else {
        return Ok(None);
    };
    Ok(Some(Address {
        street: street.trim().to_string(),
        city: city.trim().to_string(),
        state: state.trim().to_string(),
        kind,
    }))
}

fn prompt_phone(message: &str, existing: Option<&str>) -> Result<Option<String>> {
    let answer = optional(
        Text::new(message)
            .with_initial_value(existing.unwrap_or(""))
            .with_help_message("digits are enough, e.g. 5551234567")
            .prompt(),
    )?;
    Ok(answer.map(|raw| format_phone_number(&raw)))
}

fn prompt_pet() -> Result<Option<Pet>> {
    let Some(kind) = ask("Pet type (dog, cat, ...):", "")? else {
        return Ok(None);
    };
    let Some(count) = optional(CustomType::<u32>::new("How many?").with_default(1).prompt())? else {
        return Ok(None);
    };
    let Some(temperament) = ask("Temperament (optional):", "")? else {
        return Ok(None);
    };
    let Some(care) = ask("Care instructions (optional):", "")? else {
        return Ok(None);
    };
    Ok(Some(Pet {
        kind: kind.trim().to_string(),
        count,
        temperament: non_empty(temperament),
        care_instructions: non_empty(care),
    }))
}

fn client_form(draft: &ClientDraft) -> Result<Option<ClientDraft>> {
    let Some(name) = ask("Client Name:", &draft.name)? else {
        return Ok(None);
    };

    println!("\n--- Primary Address ---");
    let primary = draft.addresses.iter().find(|a| a.kind == AddressKind::Primary);
    let Some(primary) = prompt_address(primary, AddressKind::Primary)? else {
        return Ok(None);
    };
    let mut addresses = vec![primary];
    let secondary = draft.addresses.iter().find(|a| a.kind == AddressKind::Secondary);
    let add_secondary = optional(
        Confirm::new("Add a secondary address?")
            .with_default(secondary.is_some())
            .prompt(),
    )?
    .unwrap_or(false);
    if add_secondary {
        println!("\n--- Secondary Address ---");
        if let Some(address) = prompt_address(secondary, AddressKind::Secondary)? {
            addresses.push(address);
        }
    }

    let number_of = |kind: PhoneKind| {
        draft
            .phone_numbers
            .iter()
            .find(|p| p.kind == kind)
            .map(|p| p.number.as_str())
    };
    let Some(mobile) = prompt_phone("Mobile Phone:", number_of(PhoneKind::Mobile))? else {
        return Ok(None);
    };
    let Some(home) = prompt_phone("Home Phone (optional):", number_of(PhoneKind::Home))? else {
        return Ok(None);
    };
    let mut phone_numbers = vec![PhoneNumber {
        number: mobile,
        kind: PhoneKind::Mobile,
    }];
    if !home.is_empty() {
        phone_numbers.push(PhoneNumber {
            number: home,
            kind: PhoneKind::Home,
        });
    }

    let Some(email) = ask("Email:", &draft.email)? else {
        return Ok(None);
    };

    let has_pets = optional(Confirm::new("Any pets?").with_default(draft.has_pets).prompt())?
        .unwrap_or(draft.has_pets);
    let mut pets = Vec::new();
    if has_pets {
        let keep = !draft.pets.is_empty()
            && optional(Confirm::new("Keep the pet details on file?").with_default(true).prompt())?
                .unwrap_or(true);
        if keep {
            pets = draft.pets.clone();
        } else {
            loop {
                match prompt_pet()? {
                    Some(pet) => pets.push(pet),
                    None => break,
                }
                if !confirm("Add another pet?")? {
                    break;
                }
            }
        }
    }

    let mut notes = draft.notes.clone();
    if let Some(note) = ask("Add a note (optional):", "")?.and_then(non_empty) {
        notes.push(Note {
            content: note,
            timestamp: Utc::now(),
            kind: NoteKind::General,
        });
    }

    Ok(Some(ClientDraft {
        name: name.trim().to_string(),
        addresses,
        phone_numbers,
        email: email.trim().to_string(),
        has_pets,
        pets,
        notes,
    }))
}

pub(super) async fn add_client(app: &mut App) -> Result<()> {
    println!("\n--- Creating New Client ---");
    let mut draft = ClientDraft::default();
    loop {
        let Some(filled) = client_form(&draft)? else {
            app.back();
            return Ok(());
        };
        match app.add_client(filled.clone()).await {
            Ok(()) => return Ok(()),
            Err(errors) => {
                print_errors(&errors);
                draft = filled;
                if !confirm("Fix and try again?")? {
                    app.back();
                    return Ok(());
                }
            }
        }
    }
}

pub(super) async fn edit_client(app: &mut App, client_id: &str) -> Result<()> {
    let Some(client) = app.find_client(client_id) else {
        app.back();
        return Ok(());
    };
    println!("\n--- Editing {} ---", client.name);
    let mut draft = ClientDraft::from(client);
    loop {
        let Some(filled) = client_form(&draft)? else {
            app.back();
            return Ok(());
        };
        match app.update_client(client_id, filled.clone()).await {
            Ok(()) => return Ok(()),
            Err(errors) => {
                print_errors(&errors);
                draft = filled;
                if !confirm("Fix and try again?")? {
                    app.back();
                    return Ok(());
                }
            }
        }
    }
}

// ==========================================
// Jobs
// ==========================================

fn suggested_duration(kind: JobKind) -> &'static str {
    match kind {
        JobKind::RegularCleaning => "2 hours",
        JobKind::DeepCleaning => "4 hours",
    }
}

fn job_form(clients: &[&Client], existing: Option<&JobDraft>, today: NaiveDate) -> Result<Option<JobDraft>> {
    if clients.is_empty() {
        println!("Add a client before scheduling jobs.");
        return Ok(None);
    }

    let cursor = existing
        .and_then(|d| clients.iter().position(|c| c.id == d.client_id))
        .unwrap_or(0);
    let options: Vec<Labeled<&Client>> = clients
        .iter()
        .map(|c| Labeled::new(format!("{} ({})", c.name, c.primary_city()), *c))
        .collect();
    let Some(client) = optional(
        Select::new("Please Select Client (Type to Filter):", options)
            .with_starting_cursor(cursor)
            .prompt(),
    )?
    .map(|c| c.value) else {
        return Ok(None);
    };

    let kind_cursor = existing
        .and_then(|d| JobKind::ALL.iter().position(|k| *k == d.kind))
        .unwrap_or(0);
    let kinds = JobKind::ALL.map(|k| Labeled::new(k.as_str(), k)).into();
    let Some(kind) = optional(Select::new("Type:", kinds).with_starting_cursor(kind_cursor).prompt())?
        .map(|k| k.value)
    else {
        return Ok(None);
    };

    let default_day = existing.map_or(today, |d| d.scheduled_date.date());
    let Some(day) = optional(DateSelect::new("Date:").with_default(default_day).prompt())? else {
        return Ok(None);
    };
    let default_time = existing
        .map(|d| d.scheduled_date.time())
        .or_else(|| NaiveTime::from_hms_opt(9, 0, 0))
        .unwrap_or_default();
    let parse_time = |input: &str| NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| ());
    let show_time = |t: NaiveTime| t.format("%H:%M").to_string();
    let Some(time) = optional(
        CustomType::<NaiveTime>::new("Start time (HH:MM):")
            .with_parser(&parse_time)
            .with_formatter(&show_time)
            .with_default_value_formatter(&show_time)
            .with_default(default_time)
            .with_error_message("Use 24-hour HH:MM, e.g. 09:30")
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let duration_default = existing
        .and_then(|d| d.duration.clone())
        .unwrap_or_else(|| suggested_duration(kind).to_string());
    let Some(duration) = ask("Duration:", &duration_default)? else {
        return Ok(None);
    };

    let show_price = |p: f64| format!("${p:.2}");
    let mut price_prompt = CustomType::<f64>::new("Price ($):")
        .with_formatter(&show_price)
        .with_error_message("Enter an amount, e.g. 120 or 95.50");
    if let Some(d) = existing {
        price_prompt = price_prompt.with_default(d.price);
    }
    let Some(price) = optional(price_prompt.prompt())? else {
        return Ok(None);
    };

    let current = existing
        .filter(|d| d.client_id == client.id)
        .map(|d| &d.address);
    let mut choices = address_choices(client, current);
    let address = match choices.len() {
        0 => JobAddress::default(),
        1 => {
            let only = choices.remove(0);
            println!("📍 Address: {only}");
            only.value
        }
        _ => match pick("Job address:", choices)? {
            Some(address) => address,
            None => return Ok(None),
        },
    };

    let notes_default = existing.and_then(|d| d.notes.clone()).unwrap_or_default();
    let Some(notes) = ask("Notes (optional):", &notes_default)? else {
        return Ok(None);
    };

    Ok(Some(JobDraft {
        client_id: client.id.clone(),
        kind,
        status: existing.map_or(JobStatus::Scheduled, |d| d.status),
        scheduled_date: day.and_time(time),
        completed_date: existing.and_then(|d| d.completed_date),
        duration: non_empty(duration),
        amount: existing.and_then(|d| d.amount),
        price,
        payment_status: existing.map_or(PaymentStatus::Unpaid, |d| d.payment_status),
        address,
        notes: non_empty(notes),
    }))
}

pub(super) async fn schedule_job(app: &mut App) -> Result<()> {
    println!("\n--- Schedule a Job ---");
    let mut draft: Option<JobDraft> = None;
    loop {
        let today = app.today();
        let active: Vec<&Client> = app.clients().iter().filter(|c| !c.archived).collect();
        let Some(filled) = job_form(&active, draft.as_ref(), today)? else {
            app.back();
            return Ok(());
        };
        match app.schedule_job(filled.clone()).await {
            Ok(()) => return Ok(()),
            Err(errors) => {
                print_errors(&errors);
                draft = Some(filled);
                if !confirm("Fix and try again?")? {
                    app.back();
                    return Ok(());
                }
            }
        }
    }
}

pub(super) async fn edit_job(app: &mut App, job_id: &str) -> Result<()> {
    let Some(job) = app.find_job(job_id) else {
        app.back();
        return Ok(());
    };
    println!("\n--- Editing Job {} ---", job.id);
    let mut draft = JobDraft::from(job);
    loop {
        let today = app.today();
        let clients: Vec<&Client> = app
            .clients()
            .iter()
            .filter(|c| !c.archived || c.id == draft.client_id)
            .collect();
        let Some(filled) = job_form(&clients, Some(&draft), today)? else {
            app.back();
            return Ok(());
        };
        match app.edit_job(job_id, filled.clone()).await {
            Ok(()) => return Ok(()),
            Err(errors) => {
                print_errors(&errors);
                draft = filled;
                if !confirm("Fix and try again?")? {
                    app.back();
                    return Ok(());
                }
            }
        }
    }
}

// ==========================================
// Inventory
// ==========================================

fn inventory_form(known_categories: Vec<String>, today: NaiveDate) -> Result<Option<InventoryDraft>> {
    let Some(name) = ask("Item name:", "")? else {
        return Ok(None);
    };

    let mut options: Vec<String> = known_categories;
    options.push(NEW_CATEGORY_OPT.to_string());
    let Some(choice) = optional(Select::new("Category:", options).prompt())? else {
        return Ok(None);
    };
    let category = if choice == NEW_CATEGORY_OPT {
        let Some(category) = ask("New category:", "")? else {
            return Ok(None);
        };
        category
    } else {
        choice
    };

    let Some(current_stock) = optional(CustomType::<u32>::new("Current stock:").with_default(0).prompt())? else {
        return Ok(None);
    };
    let Some(min_stock) = optional(CustomType::<u32>::new("Minimum stock:").with_default(1).prompt())? else {
        return Ok(None);
    };
    let Some(unit) = optional(Text::new("Unit:").with_default("pieces").prompt())? else {
        return Ok(None);
    };
    let Some(notes) = ask("Notes (optional):", "")? else {
        return Ok(None);
    };

    Ok(Some(InventoryDraft {
        name: name.trim().to_string(),
        category: category.trim().to_string(),
        current_stock,
        min_stock,
        unit: unit.trim().to_string(),
        last_updated: Some(today),
        notes: non_empty(notes),
    }))
}

pub(super) async fn add_inventory_item(app: &mut App) -> Result<()> {
    println!("\n--- Add Inventory Item ---");
    loop {
        let Some(draft) = inventory_form(categories(app.inventory()), app.today())? else {
            return Ok(());
        };
        match app.add_inventory_item(draft).await {
            Ok(()) => return Ok(()),
            Err(errors) => {
                print_errors(&errors);
                if !confirm("Try again?")? {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_data;

    fn clients() -> Vec<Client> {
        demo_data(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()).clients
    }

    #[test]
    fn single_address_client_has_one_choice() {
        let clients = clients();
        let michael = &clients[1];
        let choices = address_choices(michael, None);
        assert_eq!(choices.len(), 1);
        assert_eq!(choices[0].value.street, "789 Pine Road");
    }

    #[test]
    fn current_address_leads_and_is_not_repeated() {
        let clients = clients();
        let emily = &clients[0];
        let current = JobAddress::from(&emily.addresses[0]);
        let choices = address_choices(emily, Some(&current));
        assert_eq!(choices.len(), 2);
        assert!(choices[0].label.starts_with("Keep current"));
        assert_eq!(choices[1].value.street, "456 Oak Avenue");
    }

    #[test]
    fn blank_zip_skips_lookup() {
        assert_eq!(lookup_zip("   "), None);
    }

    #[test]
    fn known_zip_fills_city_and_state() {
        let (_, state) = lookup_zip("10001").unwrap();
        assert_eq!(state, "NY");
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty(" Shy ".into()), Some("Shy".to_string()));
        assert_eq!(suggested_duration(JobKind::DeepCleaning), "4 hours");
    }
}
