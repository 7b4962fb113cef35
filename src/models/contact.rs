//! Contact model matching the frontend Contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use super::fields::{iso_millis, lenient_number, lenient_text, null_as_default, Required};
use super::{Document, SortOrder};
use crate::errors::AppError;

/// Why a contact is kept. Selects which additional fields are required.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Purpose {
    #[default]
    General,
    Distributor,
    Influencer,
    Political,
    Celebrity,
    ServiceProvider,
    Customer,
    TeaStall,
    Shops,
}

/// A contact in the relationship book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub native_language: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purpose: Purpose,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    // Social media
    #[serde(rename = "x_twitter", default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub x_twitter: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub x_twitter_profile_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub x_twitter_followers: Option<Number>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub facebook_profile_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub facebook_followers: Option<Number>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub youtube_channel_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub youtube_followers: Option<Number>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub instagram_profile_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub instagram_followers: Option<Number>,

    // Political / celebrity
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub pa_mobile_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub constituency: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub political_party_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub manager_mobile_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,

    // Service provider
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub service_contact_person: Option<String>,
    /// ISO date string as entered by the frontend.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub last_interaction_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub contract_details: Option<String>,

    // Tea stall
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_mobile_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_area: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_mandal: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub tea_stall_tea_powder_price: Option<Number>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tea_stall_other_selling_items: Option<String>,

    // Shops
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_contact_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_village: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub shop_mandal: Option<String>,

    #[serde(default, with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Which required-field set applies to a contact, resolved from its purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactProfile {
    /// Any purpose other than tea stalls and shops.
    Individual,
    TeaStall,
    Shop,
}

impl From<Purpose> for ContactProfile {
    fn from(purpose: Purpose) -> Self {
        match purpose {
            Purpose::TeaStall => ContactProfile::TeaStall,
            Purpose::Shops => ContactProfile::Shop,
            _ => ContactProfile::Individual,
        }
    }
}

impl ContactProfile {
    fn require(self, contact: &Contact, required: &mut Required) {
        match self {
            ContactProfile::Individual => {
                required.text("name", &contact.name);
            }
            ContactProfile::TeaStall => {
                required.text("phone", &contact.phone);
                required.text("teaStallCode", &contact.tea_stall_code);
                required.text("teaStallName", &contact.tea_stall_name);
                required.text("teaStallOwnerName", &contact.tea_stall_owner_name);
                required.text("teaStallMobileNumber", &contact.tea_stall_mobile_number);
            }
            ContactProfile::Shop => {
                required.text("name", &contact.name);
                required.text("shopName", &contact.shop_name);
                required.text("shopOwnerName", &contact.shop_owner_name);
                required.text("shopContactNumber", &contact.shop_contact_number);
                required.text("shopCategory", &contact.shop_category);
                required.text("shopAddress", &contact.shop_address);
            }
        }
    }
}

impl Contact {
    pub fn profile(&self) -> ContactProfile {
        self.purpose.into()
    }
}

impl Document for Contact {
    const COLLECTION: &'static str = "contacts";
    const ID_PREFIX: &'static str = "contact";
    const LABEL: &'static str = "Contact";
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
        self.profile().require(self, &mut required);
        required.finish(Self::LABEL).map_err(AppError::Validation)
    }
}
