//! Form validation and phone formatting.
//!
//! Validators never fail; they return a map of field -> message and an empty
//! map means the draft may be submitted.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::model::{AddressKind, ClientDraft, InventoryDraft, JobDraft, PhoneKind};

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").expect("phone pattern"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClientField {
    Name,
    Addresses,
    PhoneNumbers,
    Email,
    Pets,
}

impl fmt::Display for ClientField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Addresses => "addresses",
            Self::PhoneNumbers => "phoneNumbers",
            Self::Email => "email",
            Self::Pets => "pets",
        })
    }
}

pub type ValidationErrors = BTreeMap<ClientField, String>;

/// Problems with a job or inventory form, keyed by field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub fn validate_client(client: &ClientDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if client.name.trim().is_empty() {
        errors.insert(ClientField::Name, "Client name is required".into());
    }

    if client.addresses.is_empty() {
        errors.insert(ClientField::Addresses, "At least one address is required".into());
    } else {
        match client.addresses.iter().find(|a| a.kind == AddressKind::Primary) {
            None => {
                errors.insert(ClientField::Addresses, "Primary address is required".into());
            }
            Some(primary) if !primary.is_complete() => {
                errors.insert(ClientField::Addresses, "Primary address must be complete".into());
            }
            Some(_) => {}
        }
    }

    if client.phone_numbers.is_empty() {
        errors.insert(
            ClientField::PhoneNumbers,
            "At least one phone number is required".into(),
        );
    } else {
        match client.phone_numbers.iter().find(|p| p.kind == PhoneKind::Mobile) {
            None => {
                errors.insert(ClientField::PhoneNumbers, "Mobile phone number is required".into());
            }
            Some(mobile) if !PHONE_RE.is_match(&mobile.number) => {
                errors.insert(
                    ClientField::PhoneNumbers,
                    "Mobile phone must be in format (XXX) XXX-XXXX".into(),
                );
            }
            Some(_) => {}
        }
    }

    if client.email.trim().is_empty() {
        errors.insert(ClientField::Email, "Email address is required".into());
    } else if !EMAIL_RE.is_match(&client.email) {
        errors.insert(ClientField::Email, "Invalid email format".into());
    }

    if client.has_pets && client.pets.is_empty() {
        errors.insert(
            ClientField::Pets,
            "Pet information is required when has pets is checked".into(),
        );
    }

    errors
}

/// Strips everything but digits; ten digits render as `(XXX) XXX-XXXX`,
/// anything else comes back as the bare digits.
pub fn format_phone_number(input: &str) -> String {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..])
    } else {
        digits
    }
}

pub fn validate_job(job: &JobDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if job.client_id.trim().is_empty() {
        errors.insert("clientId", "Select a client".to_string());
    }
    if !job.price.is_finite() || job.price < 0.0 {
        errors.insert("price", "Price must be zero or more".to_string());
    }
    if job.address.street.trim().is_empty() {
        errors.insert("address", "Job address is required".to_string());
    }
    errors
}

pub fn validate_inventory_item(item: &InventoryDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for (field, value) in [("name", &item.name), ("category", &item.category), ("unit", &item.unit)] {
        if value.trim().is_empty() {
            errors.insert(field, format!("{field} is required"));
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, JobAddress, Pet, PhoneNumber};

    fn valid_draft() -> ClientDraft {
        ClientDraft {
            name: "Emily Johnson".into(),
            addresses: vec![Address {
                street: "123 Maple Street".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                kind: AddressKind::Primary,
            }],
            phone_numbers: vec![PhoneNumber {
                number: "(555) 123-4567".into(),
                kind: PhoneKind::Mobile,
            }],
            email: "emily@example.com".into(),
            ..ClientDraft::default()
        }
    }

    #[test]
    fn valid_client_has_no_errors() {
        assert!(validate_client(&valid_draft()).is_empty());
    }

    #[test]
    fn name_error_iff_blank_after_trim() {
        for (name, expect_error) in [("", true), ("   ", true), ("\t\n", true), (" Jo ", false), ("A", false)] {
            let mut draft = valid_draft();
            draft.name = name.into();
            let errors = validate_client(&draft);
            assert_eq!(errors.contains_key(&ClientField::Name), expect_error, "name {name:?}");
        }
    }

    #[test]
    fn pets_required_only_when_has_pets() {
        let mut draft = valid_draft();
        draft.has_pets = true;
        assert_eq!(
            validate_client(&draft).get(&ClientField::Pets).map(String::as_str),
            Some("Pet information is required when has pets is checked")
        );

        draft.pets.push(Pet {
            kind: "dog".into(),
            count: 2,
            temperament: None,
            care_instructions: None,
        });
        assert!(!validate_client(&draft).contains_key(&ClientField::Pets));

        draft.has_pets = false;
        draft.pets.clear();
        assert!(!validate_client(&draft).contains_key(&ClientField::Pets));
    }

    #[test]
    fn address_rules_escalate() {
        let mut draft = valid_draft();
        draft.addresses.clear();
        assert_eq!(
            validate_client(&draft)[&ClientField::Addresses],
            "At least one address is required"
        );

        draft.addresses.push(Address {
            street: "9 Side Rd".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            kind: AddressKind::Secondary,
        });
        assert_eq!(validate_client(&draft)[&ClientField::Addresses], "Primary address is required");

        draft.addresses.push(Address {
            street: "1 Main".into(),
            city: " ".into(),
            state: "IL".into(),
            kind: AddressKind::Primary,
        });
        assert_eq!(
            validate_client(&draft)[&ClientField::Addresses],
            "Primary address must be complete"
        );
    }

    #[test]
    fn mobile_phone_must_be_canonical() {
        let mut draft = valid_draft();
        draft.phone_numbers[0].number = "555-123-4567".into();
        assert_eq!(
            validate_client(&draft)[&ClientField::PhoneNumbers],
            "Mobile phone must be in format (XXX) XXX-XXXX"
        );

        draft.phone_numbers[0].kind = PhoneKind::Home;
        assert_eq!(
            validate_client(&draft)[&ClientField::PhoneNumbers],
            "Mobile phone number is required"
        );

        draft.phone_numbers.clear();
        assert_eq!(
            validate_client(&draft)[&ClientField::PhoneNumbers],
            "At least one phone number is required"
        );
    }

    #[test]
    fn email_shape() {
        let mut draft = valid_draft();
        draft.email = " ".into();
        assert_eq!(validate_client(&draft)[&ClientField::Email], "Email address is required");
        draft.email = "no-at-sign.com".into();
        assert_eq!(validate_client(&draft)[&ClientField::Email], "Invalid email format");
        draft.email = "a@b".into();
        assert_eq!(validate_client(&draft)[&ClientField::Email], "Invalid email format");
        draft.email = "a@b.co".into();
        assert!(!validate_client(&draft).contains_key(&ClientField::Email));
    }

    #[test]
    fn formats_ten_digit_numbers() {
        assert_eq!(format_phone_number("555-123-4567"), "(555) 123-4567");
        assert_eq!(format_phone_number("(555)1234567"), "(555) 123-4567");
        assert_eq!(format_phone_number("12345"), "12345");
        assert_eq!(format_phone_number("1-555-123-4567"), "15551234567");
        assert_eq!(format_phone_number(""), "");
    }

    #[test]
    fn job_and_inventory_drafts() {
        let job = JobDraft {
            client_id: " ".into(),
            kind: Default::default(),
            status: Default::default(),
            scheduled_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            completed_date: None,
            duration: None,
            amount: None,
            price: -1.0,
            payment_status: Default::default(),
            address: JobAddress::default(),
            notes: None,
        };
        let errors = validate_job(&job);
        assert_eq!(errors.len(), 3);

        let item = InventoryDraft {
            name: "Mop".into(),
            unit: "pieces".into(),
            ..InventoryDraft::default()
        };
        let errors = validate_inventory_item(&item);
        assert_eq!(errors.keys().copied().collect::<Vec<_>>(), vec!["category"]);
    }
}
