use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::market::Confidence;

/// One factor that shaped the offer, with its signed contribution to the
/// discount. Data, not prose: message generation formats these downstream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "factor", rename_all = "snake_case")]
pub enum OfferFactor {
    /// Confidence-tiered starting discount; lower confidence prices in
    /// more estimation risk.
    BaseDiscount { confidence: Confidence, pct: f64 },
    /// Target mileage relative to the comparable pool median.
    MileageAdjustment { deviation_pct: f64, pct: f64 },
    /// Target age relative to the comparable pool's median year;
    /// positive years = older than the pool.
    AgeAdjustment { years: i32, pct: f64 },
    /// The combined discount hit the configured ceiling.
    DiscountCapApplied { cap_pct: f64 },
}

/// Reference to the estimate an offer was derived from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimateRef {
    pub listing_id: String,
    pub computed_at: DateTime<Utc>,
}

/// Buy-side purchase offer. Invariant:
/// `min_acceptable <= recommended_price <= max_acceptable <= estimated price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub listing_id: String,
    pub based_on_estimate: EstimateRef,
    pub recommended_price: u32,
    pub min_acceptable: u32,
    pub max_acceptable: u32,
    /// (estimated - recommended) / estimated, never negative.
    pub discount_percent: f64,
    pub rationale: Vec<OfferFactor>,
}
