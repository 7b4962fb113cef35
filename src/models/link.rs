//! Bookmarked link model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::fields::{iso_millis, lenient_text, Required};
use super::{Document, SortOrder};
use crate::errors::AppError;

/// A saved link, optionally with the credentials used on that site.
///
/// Credentials are stored as given, in plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyLink {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Document for MyLink {
    const COLLECTION: &'static str = "mylinks";
    const ID_PREFIX: &'static str = "link";
    const LABEL: &'static str = "Link";
    const SORT_ORDER: SortOrder = SortOrder::Ascending;

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
        self.name.clone()
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut required = Required::new();
        required.text("name", &self.name);
        required.text("url", &self.url);
        required.finish(Self::LABEL).map_err(AppError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_link_requires_name_and_url() {
        let link: MyLink = serde_json::from_value(json!({ "description": "docs" })).unwrap();
        assert_eq!(
            link.validate().unwrap_err().message(),
            "Link validation failed: name is required, url is required"
        );
    }

    #[test]
    fn test_scalar_credentials_become_text() {
        let link: MyLink = serde_json::from_value(json!({
            "name": "Router",
            "url": "http://192.168.1.1",
            "username": "admin",
            "password": 1234
        }))
        .unwrap();
        assert_eq!(link.password.as_deref(), Some("1234"));
        assert!(serde_json::from_value::<MyLink>(json!({ "name": ["a"] })).is_err());
    }

    #[test]
    fn test_generated_ids_use_link_prefix() {
        let mut link: MyLink =
            serde_json::from_value(json!({ "id": "", "name": "Bank", "url": "https://bank.example" }))
                .unwrap();
        assert!(link.ensure_id().starts_with("link_"));
        assert!(link.validate().is_ok());
    }
}
