//! Product model matching the frontend catalog form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::fields::{iso_millis, lenient_number, lenient_text, null_as_default, Required};
use super::{Document, SortOrder};
use crate::errors::AppError;

/// Unit a price is quoted per.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    #[default]
    Unit,
    Kg,
    Litre,
}

/// A product in the catalog, with supplier and pricing details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub supplier_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub supplier_contact_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub supplier_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub wholesale_price: Option<Number>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub wholesale_price_unit: PriceUnit,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub retail_price: Option<Number>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retail_price_unit: PriceUnit,
    #[serde(default, with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Document for Product {
    const COLLECTION: &'static str = "products";
    const ID_PREFIX: &'static str = "product";
    const LABEL: &'static str = "Product";
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
        self.product_name.clone()
    }

    fn validate(&self) -> Result<(), AppError> {
        let mut required = Required::new();
        required.text("productName", &self.product_name);
        required.text("category", &self.category);
        required.text("supplierName", &self.supplier_name);
        required.number("wholesalePrice", &self.wholesale_price);
        required.number("retailPrice", &self.retail_price);
        required.finish(Self::LABEL).map_err(AppError::Validation)
    }
}
