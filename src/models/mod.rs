//! Data models for the contact and product catalog application.
//!
//! Field names match the frontend payloads exactly (camelCase) for seamless
//! interoperability.

mod backup;
mod contact;
pub mod fields;
mod id;
mod link;
mod product;

pub use backup::*;
pub use contact::*;
pub use id::generate_id;
pub use link::*;
pub use product::*;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;

/// List ordering for a collection's sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// A record kind stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Table backing the collection.
    const COLLECTION: &'static str;
    /// Prefix for generated ids.
    const ID_PREFIX: &'static str;
    /// Human-readable kind used in messages ("Contact not found").
    const LABEL: &'static str;
    const SORT_ORDER: SortOrder = SortOrder::Ascending;

    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: String);

    /// The body's own `timestamp`, `None` when the payload left it out.
    fn timestamp(&self) -> Option<DateTime<Utc>>;

    fn set_timestamp(&mut self, timestamp: DateTime<Utc>);

    /// Value the collection is listed by. `None` sorts first.
    fn sort_key(&self) -> Option<String>;

    /// Create-time validation of required fields.
    fn validate(&self) -> Result<(), AppError>;

    /// Assign a generated id when the payload carries none (or an empty one).
    fn ensure_id(&mut self) -> &str {
        if self.id().map_or(true, str::is_empty) {
            self.set_id(generate_id(Self::ID_PREFIX));
        }
        self.id().unwrap_or_default()
    }

    /// Fill in `timestamp` when the payload carries none.
    fn ensure_timestamp(&mut self, fallback: DateTime<Utc>) {
        if self.timestamp().is_none() {
            self.set_timestamp(fallback);
        }
    }
}

/// A stored document together with its store-managed timestamps.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    #[serde(flatten)]
    pub document: T,
    #[serde(with = "fields::iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "fields::iso_millis")]
    pub updated_at: DateTime<Utc>,
}
