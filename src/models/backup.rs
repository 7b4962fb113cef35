//! Backup model: a disconnected point-in-time copy of the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{iso_millis, lenient_count, Required};
use super::{Contact, Document, Product, Record, SortOrder};
use crate::errors::AppError;

/// A snapshot holding the contact and product collections as JSON text.
///
/// Nothing links a backup back to the live collections once it is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Stringified JSON array of contacts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contacts: Option<String>,
    /// Stringified JSON array of products
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub contact_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub product_count: u64,
}

impl Backup {
    /// Build a backup from collections read out of the store.
    pub fn snapshot(
        contacts: &[Record<Contact>],
        products: &[Record<Product>],
    ) -> Result<Self, AppError> {
        Ok(Self {
            id: None,
            timestamp: Some(Utc::now()),
            contacts: Some(serde_json::to_string(contacts)?),
            products: Some(serde_json::to_string(products)?),
            contact_count: contacts.len() as u64,
            product_count: products.len() as u64,
        })
    }
}

impl Document for Backup {
    const COLLECTION: &'static str = "backups";
    const ID_PREFIX: &'static str = "backup";
    const LABEL: &'static str = "Backup";
    const SORT_ORDER: SortOrder = SortOrder::Descending;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.timestamp = Some(timestamp);
    }

    fn sort_key(&self) -> Option<String> {
        self.timestamp.as_ref().map(iso_millis::sort_key)
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut required = Required::new();
        required.text("contacts", &self.contacts);
        required.text("products", &self.products);
        required.finish(Self::LABEL).map_err(AppError::Validation)
    }
}
