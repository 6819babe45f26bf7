use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Entity, EntityService, ServiceResult};
use crate::model::{Client, ClientDraft, ClientPatch};

impl Entity for Client {
    type Draft = ClientDraft;
    type Patch = ClientPatch;

    const KIND: &'static str = "client";
    const ID_PREFIX: &'static str = "client";

    fn from_draft(id: String, draft: ClientDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            addresses: draft.addresses,
            phone_numbers: draft.phone_numbers,
            email: draft.email,
            has_pets: draft.has_pets,
            pets: draft.pets,
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

    fn apply_patch(&mut self, patch: ClientPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(addresses) = patch.addresses {
            self.addresses = addresses;
        }
        if let Some(phone_numbers) = patch.phone_numbers {
            self.phone_numbers = phone_numbers;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(has_pets) = patch.has_pets {
            self.has_pets = has_pets;
        }
        if let Some(pets) = patch.pets {
            self.pets = pets;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn set_archived(&mut self, archived: bool) {
        self.archived = archived;
    }
}

/// Does `client` match a free-text query on its name or any address?
pub(crate) fn matches_name_or_address(client: &Client, query: &str) -> bool {
    let query = query.to_lowercase();
    client.name.to_lowercase().contains(&query)
        || client
            .addresses
            .iter()
            .any(|a| a.one_line().to_lowercase().contains(&query))
}

#[async_trait]
pub trait ClientQueries: EntityService<Client> {
    /// Case-insensitive match on name or "street, city, state", archived included.
    async fn search(&self, query: &str) -> ServiceResult<Vec<Client>> {
        let clients = self.list_all().await?;
        Ok(clients
            .into_iter()
            .filter(|c| matches_name_or_address(c, query))
            .collect())
    }
}

impl<S: EntityService<Client> + ?Sized> ClientQueries for S {}
