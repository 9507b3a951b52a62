use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::core::config::AnalysisConfig;
use crate::market::estimate::{Confidence, MarketEstimate, RelaxationLevel};
use crate::market::stats;
use crate::model::Listing;

/// Immutable comparable pool for one batch run, indexed by listing id.
///
/// Built once per batch and shared read-only across all analyses so every
/// listing analyzed together sees the same comparable set. Duplicate ids
/// keep the first occurrence.
pub struct PoolSnapshot {
    listings: Vec<Listing>,
    by_id: HashMap<String, usize>,
}

impl PoolSnapshot {
    pub fn new(listings: Vec<Listing>) -> Self {
        let mut deduped: Vec<Listing> = Vec::with_capacity(listings.len());
        let mut by_id = HashMap::with_capacity(listings.len());
        for listing in listings {
            if by_id.contains_key(&listing.id) {
                debug!(listing = %listing.id, "duplicate id in pool, keeping first");
                continue;
            }
            by_id.insert(listing.id.clone(), deduped.len());
            deduped.push(listing);
        }
        Self {
            listings: deduped,
            by_id,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.by_id.get(id).map(|&i| &self.listings[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listing> {
        self.listings.iter()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

const RELAXATION_LADDER: [RelaxationLevel; 4] = [
    RelaxationLevel::Exact,
    RelaxationLevel::WidenedYear,
    RelaxationLevel::ModelOnly,
    RelaxationLevel::MakeOnly,
];

pub struct MarketAnalyzer {
    cfg: AnalysisConfig,
}

impl MarketAnalyzer {
    pub fn new(cfg: AnalysisConfig) -> Self {
        Self { cfg }
    }

    /// Builds the market estimate for `target` against the pool snapshot.
    ///
    /// Filtering is strict at each ladder rung; the rung actually used is
    /// recorded on the estimate. Never fails: zero comparables after full
    /// relaxation yields an estimate without a price, confidence Low.
    pub fn analyze(
        &self,
        target: &Listing,
        pool: &PoolSnapshot,
        computed_at: DateTime<Utc>,
    ) -> MarketEstimate {
        let mut fallback: Option<(RelaxationLevel, Vec<&Listing>)> = None;
        let mut chosen: Option<(RelaxationLevel, Vec<&Listing>)> = None;
        for level in RELAXATION_LADDER {
            let comparables: Vec<&Listing> = pool
                .iter()
                .filter(|c| c.id != target.id && self.matches(level, target, c))
                .collect();
            if comparables.len() >= self.cfg.min_comparables {
                chosen = Some((level, comparables));
                break;
            }
            // Strictest rung that produced anything, used when no rung
            // reaches min_comparables.
            if fallback.is_none() && !comparables.is_empty() {
                fallback = Some((level, comparables));
            }
        }
        let (relaxation, comparables) = chosen
            .or(fallback)
            .unwrap_or((RelaxationLevel::MakeOnly, Vec::new()));

        if relaxation != RelaxationLevel::Exact {
            debug!(
                listing = %target.id,
                relaxation = %relaxation,
                count = comparables.len(),
                "comparable filter widened"
            );
        }

        let prices: Vec<u32> = comparables.iter().map(|c| c.price).collect();
        let mileages: Vec<u32> = comparables.iter().map(|c| c.mileage).collect();
        let years: Vec<i32> = comparables.iter().map(|c| c.year).collect();

        let estimated_price = stats::median(&prices);
        let price_range = stats::iqr(&prices);
        let confidence = self.confidence(prices.len(), estimated_price, price_range);

        MarketEstimate {
            listing_id: target.id.clone(),
            comparable_count: comparables.len(),
            estimated_price,
            price_range,
            confidence,
            relaxation,
            pool_median_mileage: stats::median(&mileages),
            pool_median_year: stats::median_i32(&years),
            computed_at,
        }
    }

    fn matches(&self, level: RelaxationLevel, target: &Listing, candidate: &Listing) -> bool {
        if candidate.make != target.make {
            return false;
        }
        match level {
            RelaxationLevel::Exact => {
                candidate.model == target.model
                    && (candidate.year - target.year).abs() <= self.cfg.year_window
                    && self.within_mileage_band(target, candidate)
            }
            RelaxationLevel::WidenedYear => {
                candidate.model == target.model
                    && (candidate.year - target.year).abs() <= 2 * self.cfg.year_window
            }
            RelaxationLevel::ModelOnly => candidate.model == target.model,
            RelaxationLevel::MakeOnly => true,
        }
    }

    fn within_mileage_band(&self, target: &Listing, candidate: &Listing) -> bool {
        let band = target.mileage as f64 * self.cfg.mileage_band_percent;
        (candidate.mileage as f64 - target.mileage as f64).abs() <= band
    }

    /// Deterministic mapping from sample size and dispersion to a tier.
    /// Tight range and many comparables rate High; sparse or wide-spread
    /// pools rate Low. Monotone in count for fixed dispersion.
    fn confidence(
        &self,
        count: usize,
        estimate: Option<u32>,
        range: Option<(u32, u32)>,
    ) -> Confidence {
        let (estimate, range) = match (estimate, range) {
            (Some(e), Some(r)) => (e, r),
            _ => return Confidence::Low,
        };
        let spread = stats::relative_spread(range, estimate);
        if count >= self.cfg.high_min_comparables && spread <= self.cfg.high_max_spread {
            Confidence::High
        } else if count >= self.cfg.min_comparables && spread <= self.cfg.medium_max_spread {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}
