use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A listing exactly as scraped, untrusted. Every field is optional and
/// loosely typed; the cleaner decides what is usable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawListingRecord {
    pub id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Price as displayed, e.g. "12 500 €" or "12.500".
    pub price_text: Option<String>,
    /// Mileage as displayed, e.g. "116 200 km".
    pub mileage_text: Option<String>,
    pub year_text: Option<String>,
    /// "MM/YYYY" as shown on the listing card; used when `year_text` is absent.
    pub first_registration: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub fuel_text: Option<String>,
    pub transmission_text: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub scraped_at: Option<DateTime<Utc>>,
}
