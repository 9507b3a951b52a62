use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::cleaner::{clean, RawListingRecord};
use crate::core::Config;
use crate::market::{MarketAnalyzer, MarketEstimate, PoolSnapshot};
use crate::model::Listing;
use crate::offer::{Offer, OfferCalculator};

/// Per-reason rejection counters for one batch, keyed by the stable
/// `RejectionReason::kind` label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RejectionTally {
    pub counts: BTreeMap<&'static str, usize>,
}

impl RejectionTally {
    fn record(&mut self, kind: &'static str) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Everything one pipeline run produced. The snapshot the estimates were
/// computed against is kept alongside them so downstream consumers see a
/// consistent view.
pub struct BatchReport {
    pub pool: PoolSnapshot,
    pub rejections: RejectionTally,
    pub estimates: Vec<MarketEstimate>,
    pub offers: Vec<Offer>,
    pub run_at: DateTime<Utc>,
}

impl BatchReport {
    /// Offers ranked by discount, best first, filtered to `min_discount`.
    pub fn best_deals(&self, min_discount: f64, limit: usize) -> Vec<&Offer> {
        let mut deals: Vec<&Offer> = self
            .offers
            .iter()
            .filter(|o| o.discount_percent >= min_discount)
            .collect();
        deals.sort_by(|a, b| {
            b.discount_percent
                .partial_cmp(&a.discount_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.listing_id.cmp(&b.listing_id))
        });
        deals.truncate(limit);
        deals
    }
}

/// Runs the full engine over one feed of raw records.
///
/// Every record is cleaned independently; a bad record is counted and
/// skipped, never aborts the batch. All analyses in the batch share one
/// immutable pool snapshot, so they see the same comparable set.
pub fn run_batch(raw_records: &[RawListingRecord], cfg: &Config) -> BatchReport {
    let run_at = Utc::now();
    run_batch_at(raw_records, cfg, run_at)
}

/// Same as `run_batch` with an explicit clock, for reproducible runs.
pub fn run_batch_at(
    raw_records: &[RawListingRecord],
    cfg: &Config,
    run_at: DateTime<Utc>,
) -> BatchReport {
    let mut rejections = RejectionTally::default();
    let mut listings: Vec<Listing> = Vec::with_capacity(raw_records.len());

    for raw in raw_records {
        match clean(raw, run_at) {
            Ok(listing) => listings.push(listing),
            Err(reason) => {
                debug!(url = ?raw.url, %reason, "record rejected");
                rejections.record(reason.kind());
            }
        }
    }
    info!(
        cleaned = listings.len(),
        rejected = rejections.total(),
        "cleaning pass complete"
    );

    let pool = PoolSnapshot::new(listings);
    let analyzer = MarketAnalyzer::new(cfg.analysis.clone());
    let calculator = OfferCalculator::new(cfg.offer.clone());

    let mut estimates = Vec::with_capacity(pool.len());
    let mut offers = Vec::new();
    for target in pool.iter() {
        let estimate = analyzer.analyze(target, &pool, run_at);
        if let Some(offer) = calculator.compute_offer(target, &estimate) {
            offers.push(offer);
        }
        estimates.push(estimate);
    }
    info!(
        estimates = estimates.len(),
        offers = offers.len(),
        "analysis pass complete"
    );

    BatchReport {
        pool,
        rejections,
        estimates,
        offers,
        run_at,
    }
}
