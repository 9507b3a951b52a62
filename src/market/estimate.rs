use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical reliability of a market estimate, derived from comparable
/// count and price dispersion. Ordered: Low < Medium < High.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "LOW"),
            Confidence::Medium => write!(f, "MEDIUM"),
            Confidence::High => write!(f, "HIGH"),
        }
    }
}

/// How far the comparable filter had to widen before enough matches existed.
/// Recorded on every estimate: a widened pool is part of the provenance,
/// never hidden. Ordered from strictest to loosest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RelaxationLevel {
    /// Same make+model, year within the window, mileage within the band.
    Exact,
    /// Same make+model, year window doubled, mileage band dropped.
    WidenedYear,
    /// Same make+model, any year and mileage.
    ModelOnly,
    /// Same make, any model.
    MakeOnly,
}

impl fmt::Display for RelaxationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelaxationLevel::Exact => write!(f, "exact"),
            RelaxationLevel::WidenedYear => write!(f, "widened-year"),
            RelaxationLevel::ModelOnly => write!(f, "model-only"),
            RelaxationLevel::MakeOnly => write!(f, "make-only"),
        }
    }
}

/// Market price estimate for one target listing. Immutable once produced;
/// a later analysis run supersedes it with a newer `computed_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEstimate {
    pub listing_id: String,
    pub comparable_count: usize,
    /// Median comparable price. Absent only when zero comparables remained
    /// after full relaxation; a price is never fabricated from no data.
    pub estimated_price: Option<u32>,
    /// (p25, p75) of the comparable prices.
    pub price_range: Option<(u32, u32)>,
    pub confidence: Confidence,
    pub relaxation: RelaxationLevel,
    /// Pool medians consumed by the offer adjustments.
    pub pool_median_mileage: Option<u32>,
    pub pool_median_year: Option<i32>,
    pub computed_at: DateTime<Utc>,
}
