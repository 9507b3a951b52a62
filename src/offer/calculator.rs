use crate::core::config::OfferConfig;
use crate::market::{Confidence, MarketEstimate};
use crate::model::Listing;
use crate::offer::types::{EstimateRef, Offer, OfferFactor};

pub struct OfferCalculator {
    cfg: OfferConfig,
}

impl OfferCalculator {
    pub fn new(cfg: OfferConfig) -> Self {
        Self { cfg }
    }

    /// Derives the purchase offer for `target` from its market estimate.
    ///
    /// Returns `None` when the estimate carries no price: with no market
    /// signal the engine declines rather than guessing. Deterministic and
    /// side-effect free for a given `(target, estimate, config)`.
    pub fn compute_offer(&self, target: &Listing, estimate: &MarketEstimate) -> Option<Offer> {
        let estimated = estimate.estimated_price?;

        let base = self.base_discount(estimate.confidence);
        let mut rationale = vec![OfferFactor::BaseDiscount {
            confidence: estimate.confidence,
            pct: base,
        }];
        let mut discount = base;

        // Above-median mileage asks for more, below-median for less.
        if let Some(median_mileage) = estimate.pool_median_mileage.filter(|&m| m > 0) {
            let deviation =
                (target.mileage as f64 - median_mileage as f64) / median_mileage as f64;
            let adjustment = (deviation * self.cfg.mileage_adjustment_rate)
                .clamp(-self.cfg.adjustment_cap, self.cfg.adjustment_cap);
            if adjustment != 0.0 {
                discount += adjustment;
                rationale.push(OfferFactor::MileageAdjustment {
                    deviation_pct: deviation,
                    pct: adjustment,
                });
            }
        }

        if let Some(median_year) = estimate.pool_median_year {
            let years = median_year - target.year;
            let adjustment = (years as f64 * self.cfg.age_adjustment_rate)
                .clamp(-self.cfg.adjustment_cap, self.cfg.adjustment_cap);
            if years != 0 {
                discount += adjustment;
                rationale.push(OfferFactor::AgeAdjustment {
                    years,
                    pct: adjustment,
                });
            }
        }

        if discount > self.cfg.max_total_discount {
            discount = self.cfg.max_total_discount;
            rationale.push(OfferFactor::DiscountCapApplied {
                cap_pct: self.cfg.max_total_discount,
            });
        }
        // Net discount never goes negative: the offer stays at or below
        // fair market value.
        discount = discount.max(0.0);

        let recommended = ((estimated as f64 * (1.0 - discount)).round() as u32).min(estimated);
        let min_acceptable =
            (recommended as f64 * (1.0 - self.cfg.negotiation_slack)).round() as u32;
        // Ceiling clamped at fair value: never negotiate above market.
        let max_acceptable = ((recommended as f64 * (1.0 + self.cfg.negotiation_slack)).round()
            as u32)
            .min(estimated);

        Some(Offer {
            listing_id: target.id.clone(),
            based_on_estimate: EstimateRef {
                listing_id: estimate.listing_id.clone(),
                computed_at: estimate.computed_at,
            },
            recommended_price: recommended,
            min_acceptable,
            max_acceptable,
            discount_percent: (estimated - recommended) as f64 / estimated as f64,
            rationale,
        })
    }

    fn base_discount(&self, confidence: Confidence) -> f64 {
        match confidence {
            Confidence::Low => self.cfg.base_discount_low,
            Confidence::Medium => self.cfg.base_discount_medium,
            Confidence::High => self.cfg.base_discount_high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::market::RelaxationLevel;
    use crate::model::{FuelType, Transmission};
    use chrono::{DateTime, TimeZone, Utc};

    fn calculator() -> OfferCalculator {
        OfferCalculator::new(Config::default().offer)
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn target(mileage: u32, year: i32) -> Listing {
        Listing {
            id: "target".to_string(),
            price: 15_000,
            mileage,
            year,
            make: "toyota".to_string(),
            model: "corolla".to_string(),
            fuel_type: FuelType::Petrol,
            transmission: Transmission::Manual,
            location: None,
            source_url: "https://example.com/target".to_string(),
            scraped_at: ts(),
        }
    }

    fn estimate(
        price: Option<u32>,
        confidence: Confidence,
        median_mileage: Option<u32>,
        median_year: Option<i32>,
    ) -> MarketEstimate {
        MarketEstimate {
            listing_id: "target".to_string(),
            comparable_count: if price.is_some() { 10 } else { 0 },
            estimated_price: price,
            price_range: price.map(|p| (p - 500, p + 500)),
            confidence,
            relaxation: RelaxationLevel::Exact,
            pool_median_mileage: median_mileage,
            pool_median_year: median_year,
            computed_at: ts(),
        }
    }

    fn assert_bounds(offer: &Offer, estimated: u32) {
        assert!(offer.min_acceptable <= offer.recommended_price);
        assert!(offer.recommended_price <= offer.max_acceptable);
        assert!(offer.max_acceptable <= estimated);
        assert!(offer.discount_percent >= 0.0);
    }

    #[test]
    fn declines_without_market_signal() {
        let offer = calculator().compute_offer(
            &target(60_000, 2018),
            &estimate(None, Confidence::Low, None, None),
        );
        assert!(offer.is_none());
    }

    #[test]
    fn high_confidence_applies_smallest_base_discount() {
        // Target sits exactly on the pool medians: base discount only.
        let offer = calculator()
            .compute_offer(
                &target(60_000, 2018),
                &estimate(Some(16_000), Confidence::High, Some(60_000), Some(2018)),
            )
            .unwrap();

        assert_eq!(offer.recommended_price, 15_200); // 16 000 × 0.95
        assert!(offer.recommended_price < 16_000);
        assert_bounds(&offer, 16_000);
        assert_eq!(
            offer.rationale,
            vec![OfferFactor::BaseDiscount {
                confidence: Confidence::High,
                pct: 0.05
            }]
        );
    }

    #[test]
    fn low_confidence_applies_largest_base_discount() {
        let calc = calculator();
        let t = target(60_000, 2018);
        let e = |c| estimate(Some(16_000), c, Some(60_000), Some(2018));

        let low = calc.compute_offer(&t, &e(Confidence::Low)).unwrap();
        let medium = calc.compute_offer(&t, &e(Confidence::Medium)).unwrap();
        let high = calc.compute_offer(&t, &e(Confidence::High)).unwrap();

        assert!(low.recommended_price < medium.recommended_price);
        assert!(medium.recommended_price < high.recommended_price);
        assert_eq!(low.recommended_price, 14_080); // maximum tier: 12%
    }

    #[test]
    fn above_median_mileage_increases_discount() {
        let calc = calculator();
        let on_median = calc
            .compute_offer(
                &target(60_000, 2018),
                &estimate(Some(16_000), Confidence::High, Some(60_000), Some(2018)),
            )
            .unwrap();
        let worn = calc
            .compute_offer(
                &target(90_000, 2018),
                &estimate(Some(16_000), Confidence::High, Some(60_000), Some(2018)),
            )
            .unwrap();

        assert!(worn.recommended_price < on_median.recommended_price);
        assert!(worn.rationale.iter().any(|f| matches!(
            f,
            OfferFactor::MileageAdjustment { pct, .. } if *pct > 0.0
        )));
        assert_bounds(&worn, 16_000);
    }

    #[test]
    fn below_median_mileage_never_pushes_offer_above_market() {
        // Nearly-new car against a worn pool: adjustments go negative but
        // the net discount floors at zero.
        let offer = calculator()
            .compute_offer(
                &target(5_000, 2021),
                &estimate(Some(16_000), Confidence::High, Some(120_000), Some(2014)),
            )
            .unwrap();

        assert!(offer.recommended_price <= 16_000);
        assert_bounds(&offer, 16_000);
    }

    #[test]
    fn age_adjustment_is_reported_per_year() {
        let offer = calculator()
            .compute_offer(
                &target(60_000, 2015),
                &estimate(Some(16_000), Confidence::High, Some(60_000), Some(2018)),
            )
            .unwrap();

        // 3 years older than the pool median at 1%/year, under the 5% cap.
        assert!(offer.rationale.contains(&OfferFactor::AgeAdjustment {
            years: 3,
            pct: 0.03
        }));
        assert_bounds(&offer, 16_000);
    }

    #[test]
    fn combined_discount_is_capped_and_recorded() {
        let mut cfg = Config::default().offer;
        cfg.base_discount_low = 0.20;
        cfg.adjustment_cap = 0.10;
        let calc = OfferCalculator::new(cfg);

        // Low base 20% + mileage cap 10% + age cap 10% would be 40%.
        let offer = calc
            .compute_offer(
                &target(200_000, 2008),
                &estimate(Some(16_000), Confidence::Low, Some(60_000), Some(2018)),
            )
            .unwrap();

        assert!((offer.discount_percent - 0.25).abs() < 1e-3);
        assert!(offer
            .rationale
            .contains(&OfferFactor::DiscountCapApplied { cap_pct: 0.25 }));
        assert_bounds(&offer, 16_000);
    }

    #[test]
    fn negotiation_band_respects_slack_and_fair_value() {
        let offer = calculator()
            .compute_offer(
                &target(60_000, 2018),
                &estimate(Some(16_000), Confidence::High, Some(60_000), Some(2018)),
            )
            .unwrap();

        assert_eq!(offer.min_acceptable, 14_440); // 15 200 × 0.95
        assert_eq!(offer.max_acceptable, 15_960); // 15 200 × 1.05, under 16 000
    }

    #[test]
    fn offer_is_deterministic() {
        let t = target(72_000, 2016);
        let e = estimate(Some(14_500), Confidence::Medium, Some(65_000), Some(2017));
        let a = calculator().compute_offer(&t, &e).unwrap();
        let b = calculator().compute_offer(&t, &e).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
