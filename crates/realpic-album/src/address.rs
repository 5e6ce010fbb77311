//! Delivery address captured when an album is sent to print

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Postal delivery address
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub recipient_name: String,
    pub phone_number: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub zip_code: String,
}

/// Address field names, for validation reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressField {
    RecipientName,
    PhoneNumber,
    Country,
    City,
    Street,
    ZipCode,
}

impl Display for AddressField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            AddressField::RecipientName => "recipient name",
            AddressField::PhoneNumber => "phone number",
            AddressField::Country => "country",
            AddressField::City => "city",
            AddressField::Street => "street",
            AddressField::ZipCode => "zip code",
        };
        f.write_str(name)
    }
}

impl DeliveryAddress {
    /// Fields that are empty after trimming, in form order
    #[must_use]
    pub fn missing_fields(&self) -> Vec<AddressField> {
        [
            (AddressField::RecipientName, &self.recipient_name),
            (AddressField::PhoneNumber, &self.phone_number),
            (AddressField::Country, &self.country),
            (AddressField::City, &self.city),
            (AddressField::Street, &self.street),
            (AddressField::ZipCode, &self.zip_code),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Copy with every field trimmed
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            recipient_name: self.recipient_name.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            country: self.country.trim().to_string(),
            city: self.city.trim().to_string(),
            street: self.street.trim().to_string(),
            zip_code: self.zip_code.trim().to_string(),
        }
    }
}
