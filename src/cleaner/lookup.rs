use crate::cleaner::numeric::fold;
use crate::model::{FuelType, Transmission};

/// Descriptor tables for the closed fuel/transmission enumerations.
///
/// Keys are folded tokens (see `numeric::fold`); matching is substring-based
/// because scraped descriptors arrive embedded in longer labels
/// ("Boîte automatique", "Hybride essence/électrique"). Order matters:
/// the first matching entry wins, so more specific tokens come first.
const FUEL_TABLE: &[(&str, FuelType)] = &[
    ("hybride", FuelType::Hybrid),
    ("hybrid", FuelType::Hybrid),
    ("electrique", FuelType::Electric),
    ("electric", FuelType::Electric),
    ("essence", FuelType::Petrol),
    ("petrol", FuelType::Petrol),
    ("gasoline", FuelType::Petrol),
    ("diesel", FuelType::Diesel),
    ("gpl", FuelType::Lpg),
    ("lpg", FuelType::Lpg),
    ("cng", FuelType::Cng),
    ("gnv", FuelType::Cng),
];

const TRANSMISSION_TABLE: &[(&str, Transmission)] = &[
    ("semi-automatique", Transmission::SemiAutomatic),
    ("semi-automatic", Transmission::SemiAutomatic),
    ("automatique", Transmission::Automatic),
    ("automatic", Transmission::Automatic),
    ("manuelle", Transmission::Manual),
    ("manuel", Transmission::Manual),
    ("manual", Transmission::Manual),
];

/// Maps a scraped fuel descriptor to the enumeration. Unmapped descriptors
/// fall back to `Unknown` and are surfaced to telemetry by the caller,
/// never dropped.
pub fn map_fuel(descriptor: &str) -> FuelType {
    let folded = fold(descriptor);
    for (token, fuel) in FUEL_TABLE {
        if folded.contains(token) {
            return *fuel;
        }
    }
    FuelType::Unknown
}

pub fn map_transmission(descriptor: &str) -> Transmission {
    let folded = fold(descriptor);
    for (token, gearbox) in TRANSMISSION_TABLE {
        if folded.contains(token) {
            return *gearbox;
        }
    }
    Transmission::Unknown
}

/// Descriptors the upstream scraper is known to emit. `verify_tables` checks
/// the lookup tables against this corpus at startup so an incomplete table
/// fails fast instead of silently flooding the pool with `Unknown`.
const KNOWN_FUEL_DESCRIPTORS: &[&str] = &[
    "Diesel",
    "Essence",
    "Électrique",
    "Hybride",
    "Hybride essence/électrique",
    "GPL",
    "CNG",
];

const KNOWN_TRANSMISSION_DESCRIPTORS: &[&str] = &[
    "Boîte automatique",
    "Boîte manuelle",
    "Boîte semi-automatique",
    "Automatique",
    "Manuelle",
];

/// Fails when a known descriptor no longer maps, i.e. the table regressed.
/// Per-record unknowns at runtime still resolve to `Unknown`.
pub fn verify_tables() -> anyhow::Result<()> {
    for descriptor in KNOWN_FUEL_DESCRIPTORS {
        if map_fuel(descriptor) == FuelType::Unknown {
            anyhow::bail!("fuel lookup table does not cover descriptor {descriptor:?}");
        }
    }
    for descriptor in KNOWN_TRANSMISSION_DESCRIPTORS {
        if map_transmission(descriptor) == Transmission::Unknown {
            anyhow::bail!("transmission lookup table does not cover descriptor {descriptor:?}");
        }
    }
    Ok(())
}
