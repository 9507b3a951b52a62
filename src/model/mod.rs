use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fuel type, closed enumeration. Descriptors that the lookup table does not
/// recognize map to `Unknown` rather than being dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Lpg,
    Cng,
    Unknown,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelType::Petrol => write!(f, "petrol"),
            FuelType::Diesel => write!(f, "diesel"),
            FuelType::Electric => write!(f, "electric"),
            FuelType::Hybrid => write!(f, "hybrid"),
            FuelType::Lpg => write!(f, "lpg"),
            FuelType::Cng => write!(f, "cng"),
            FuelType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Transmission {
    Manual,
    Automatic,
    SemiAutomatic,
    Unknown,
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transmission::Manual => write!(f, "manual"),
            Transmission::Automatic => write!(f, "automatic"),
            Transmission::SemiAutomatic => write!(f, "semi-automatic"),
            Transmission::Unknown => write!(f, "unknown"),
        }
    }
}

/// Canonical listing produced by the cleaner. Every field the analyzer and
/// offer calculator depend on (price, mileage, year, make, model) is present
/// and validated; records that cannot satisfy that are rejected upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    /// Whole euros, always > 0.
    pub price: u32,
    /// Kilometers.
    pub mileage: u32,
    pub year: i32,
    /// Lower-cased, diacritic-folded, whitespace-collapsed.
    pub make: String,
    pub model: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    /// Opaque postal/city reference, distance filtering happens upstream.
    pub location: Option<String>,
    pub source_url: String,
    pub scraped_at: DateTime<Utc>,
}
