use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use crate::cleaner::lookup::{map_fuel, map_transmission};
use crate::cleaner::numeric::{extract_integer, normalize_name};
use crate::cleaner::raw::RawListingRecord;
use crate::cleaner::reject::RejectionReason;
use crate::model::{FuelType, Listing, Transmission};

/// Oldest model year accepted into the pool.
const MIN_YEAR: i32 = 1980;

/// Marketing noise that sometimes trails the scraped model string. Stripped
/// only when a trailing token matches exactly; anything ambiguous stays.
const MODEL_NOISE_TOKENS: &[&str] = &["occasion", "garantie", "export", "tva"];

/// Normalizes one raw record into a canonical `Listing`.
///
/// Pure with respect to `(raw, now)`: safe to run concurrently over many
/// records, and calling it twice yields an identical result. All failure is
/// a `RejectionReason` value; nothing here panics on scraped data.
pub fn clean(raw: &RawListingRecord, now: DateTime<Utc>) -> Result<Listing, RejectionReason> {
    let source_url = raw
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or(RejectionReason::MissingField { field: "url" })?;

    let id = match raw.id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(id) => id.to_string(),
        None => id_from_url(source_url),
    };

    let make = required_name(raw.make.as_deref(), "make")?;
    let model = strip_model_noise(required_name(raw.model.as_deref(), "model")?);

    let price = parse_field(raw.price_text.as_deref(), "price")?;
    if price <= 0 {
        return Err(RejectionReason::NonPositivePrice { price });
    }

    let mileage = parse_field(raw.mileage_text.as_deref(), "mileage")?;
    if mileage < 0 {
        return Err(RejectionReason::NegativeMileage { mileage });
    }

    let year = parse_year(raw)?;
    let max_year = now.year() + 1;
    if !(MIN_YEAR..=max_year).contains(&year) {
        return Err(RejectionReason::YearOutOfRange {
            year,
            min: MIN_YEAR,
            max: max_year,
        });
    }

    let fuel_type = match raw.fuel_text.as_deref() {
        Some(descriptor) => {
            let fuel = map_fuel(descriptor);
            if fuel == FuelType::Unknown {
                debug!(listing = %id, descriptor, "unmapped fuel descriptor");
            }
            fuel
        }
        None => FuelType::Unknown,
    };

    let transmission = match raw.transmission_text.as_deref() {
        Some(descriptor) => {
            let gearbox = map_transmission(descriptor);
            if gearbox == Transmission::Unknown {
                debug!(listing = %id, descriptor, "unmapped transmission descriptor");
            }
            gearbox
        }
        None => Transmission::Unknown,
    };

    Ok(Listing {
        id,
        price: price as u32,
        mileage: mileage as u32,
        year,
        make,
        model,
        fuel_type,
        transmission,
        location: raw.location.clone(),
        source_url: source_url.to_string(),
        scraped_at: raw.scraped_at.unwrap_or(now),
    })
}

fn required_name(
    value: Option<&str>,
    field: &'static str,
) -> Result<String, RejectionReason> {
    let normalized = value.map(normalize_name).unwrap_or_default();
    if normalized.is_empty() {
        return Err(RejectionReason::MissingField { field });
    }
    Ok(normalized)
}

fn parse_field(value: Option<&str>, field: &'static str) -> Result<i64, RejectionReason> {
    let text = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(RejectionReason::MissingField { field })?;
    let parsed = extract_integer(text).ok_or_else(|| RejectionReason::UnparseableNumber {
        field,
        value: text.to_string(),
    })?;
    // Values past u32 range are scraping garbage, not real prices/mileages.
    if parsed > u32::MAX as i64 {
        return Err(RejectionReason::UnparseableNumber {
            field,
            value: text.to_string(),
        });
    }
    Ok(parsed)
}

/// Year comes either as a plain field or as the "MM/YYYY" first-registration
/// label on the listing card.
fn parse_year(raw: &RawListingRecord) -> Result<i32, RejectionReason> {
    if let Some(text) = raw.year_text.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        return extract_integer(text)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| RejectionReason::UnparseableNumber {
                field: "year",
                value: text.to_string(),
            });
    }
    if let Some(text) = raw
        .first_registration
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        let year_part = text.rsplit('/').next().unwrap_or(text);
        return extract_integer(year_part)
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| RejectionReason::UnparseableNumber {
                field: "first_registration",
                value: text.to_string(),
            });
    }
    Err(RejectionReason::MissingField { field: "year" })
}

fn strip_model_noise(model: String) -> String {
    let mut tokens: Vec<&str> = model.split(' ').collect();
    while tokens.len() > 1 {
        let last = tokens[tokens.len() - 1];
        if MODEL_NOISE_TOKENS.contains(&last) {
            tokens.pop();
        } else {
            break;
        }
    }
    tokens.join(" ")
}

fn id_from_url(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn raw_corolla() -> RawListingRecord {
        RawListingRecord {
            id: None,
            url: Some("https://example.com/fr/annonce/toyota-corolla-abc123".to_string()),
            price_text: Some("15 000 €".to_string()),
            mileage_text: Some("60.000 km".to_string()),
            first_registration: Some("03/2018".to_string()),
            make: Some("Toyota".to_string()),
            model: Some(" Corolla ".to_string()),
            fuel_text: Some("Essence".to_string()),
            transmission_text: Some("Boîte manuelle".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn cleans_a_complete_record() {
        let listing = clean(&raw_corolla(), now()).unwrap();
        assert_eq!(listing.id, "toyota-corolla-abc123");
        assert_eq!(listing.price, 15000);
        assert_eq!(listing.mileage, 60000);
        assert_eq!(listing.year, 2018);
        assert_eq!(listing.make, "toyota");
        assert_eq!(listing.model, "corolla");
        assert_eq!(listing.fuel_type, FuelType::Petrol);
        assert_eq!(listing.transmission, Transmission::Manual);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw = raw_corolla();
        let a = clean(&raw, now()).unwrap();
        let b = clean(&raw, now()).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn rejects_non_numeric_price() {
        let mut raw = raw_corolla();
        raw.price_text = Some("Prix non spécifié".to_string());
        let reason = clean(&raw, now()).unwrap_err();
        assert_eq!(reason.kind(), "unparseable_number");
    }

    #[test]
    fn rejects_missing_make() {
        let mut raw = raw_corolla();
        raw.make = Some("   ".to_string());
        assert_eq!(
            clean(&raw, now()).unwrap_err(),
            RejectionReason::MissingField { field: "make" }
        );
    }

    #[test]
    fn rejects_out_of_range_year_without_clamping() {
        let mut raw = raw_corolla();
        raw.first_registration = Some("01/1899".to_string());
        let reason = clean(&raw, now()).unwrap_err();
        assert_eq!(reason.kind(), "year_out_of_range");

        raw.first_registration = Some("01/2031".to_string());
        assert_eq!(clean(&raw, now()).unwrap_err().kind(), "year_out_of_range");
    }

    #[test]
    fn accepts_next_model_year() {
        let mut raw = raw_corolla();
        raw.first_registration = Some("01/2026".to_string());
        assert_eq!(clean(&raw, now()).unwrap().year, 2026);
    }

    #[test]
    fn rejects_zero_price() {
        let mut raw = raw_corolla();
        raw.price_text = Some("0 €".to_string());
        assert_eq!(clean(&raw, now()).unwrap_err().kind(), "non_positive_price");
    }

    #[test]
    fn unknown_fuel_is_kept_not_dropped() {
        let mut raw = raw_corolla();
        raw.fuel_text = Some("Hydrogène".to_string());
        let listing = clean(&raw, now()).unwrap();
        assert_eq!(listing.fuel_type, FuelType::Unknown);
    }

    #[test]
    fn strips_trailing_noise_from_model() {
        let mut raw = raw_corolla();
        raw.model = Some("Corolla Occasion".to_string());
        assert_eq!(clean(&raw, now()).unwrap().model, "corolla");

        // Single-token models are never stripped to empty.
        raw.model = Some("Occasion".to_string());
        assert_eq!(clean(&raw, now()).unwrap().model, "occasion");
    }

    #[test]
    fn prefers_scraper_id_over_url_slug() {
        let mut raw = raw_corolla();
        raw.id = Some("lst-98765".to_string());
        assert_eq!(clean(&raw, now()).unwrap().id, "lst-98765");
    }
}
