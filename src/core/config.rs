use anyhow::Result;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub offer: OfferConfig,
    pub io: IoConfig,
    pub monitoring: MonitoringConfig,
}

/// Comparable-pool filtering and confidence thresholds. Static for a run;
/// the analyzer never mutates them.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Max |target.year - comparable.year| at the strictest filter rung.
    pub year_window: i32,
    /// Mileage band as a fraction of target mileage, e.g. 0.30 = ±30%.
    pub mileage_band_percent: f64,
    /// Below this count the relaxation ladder keeps widening.
    pub min_comparables: usize,
    pub high_min_comparables: usize,
    /// Max (p75 - p25) / median for High confidence.
    pub high_max_spread: f64,
    pub medium_max_spread: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferConfig {
    pub base_discount_low: f64,
    pub base_discount_medium: f64,
    pub base_discount_high: f64,
    pub negotiation_slack: f64,
    /// Discount added per 100% mileage deviation from the pool median.
    pub mileage_adjustment_rate: f64,
    /// Discount added per year of age relative to the pool median.
    pub age_adjustment_rate: f64,
    /// Cap on each adjustment's absolute contribution.
    pub adjustment_cap: f64,
    pub max_total_discount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IoConfig {
    pub input_path: String,
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: String,
    /// Offers below this discount are left out of the best-deals summary.
    pub min_deal_discount: f64,
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            analysis: AnalysisConfig {
                year_window: env::var("YEAR_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2),
                mileage_band_percent: env_f64("MILEAGE_BAND_PERCENT", 0.30),
                min_comparables: env_usize("MIN_COMPARABLES", 3),
                high_min_comparables: env_usize("HIGH_MIN_COMPARABLES", 8),
                high_max_spread: env_f64("HIGH_MAX_SPREAD", 0.15),
                medium_max_spread: env_f64("MEDIUM_MAX_SPREAD", 0.30),
            },
            offer: OfferConfig {
                base_discount_low: env_f64("BASE_DISCOUNT_LOW", 0.12),
                base_discount_medium: env_f64("BASE_DISCOUNT_MEDIUM", 0.08),
                base_discount_high: env_f64("BASE_DISCOUNT_HIGH", 0.05),
                negotiation_slack: env_f64("NEGOTIATION_SLACK", 0.05),
                mileage_adjustment_rate: env_f64("MILEAGE_ADJUSTMENT_RATE", 0.10),
                age_adjustment_rate: env_f64("AGE_ADJUSTMENT_RATE", 0.01),
                adjustment_cap: env_f64("ADJUSTMENT_CAP", 0.05),
                max_total_discount: env_f64("MAX_TOTAL_DISCOUNT", 0.25),
            },
            io: IoConfig {
                input_path: env::var("INPUT_PATH")
                    .unwrap_or_else(|_| "data/raw_listings.json".to_string()),
                output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "reports".to_string()),
            },
            monitoring: MonitoringConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                min_deal_discount: env_f64("MIN_DEAL_DISCOUNT", 0.15),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        // Defaults as documented, independent of the process environment.
        Self {
            analysis: AnalysisConfig {
                year_window: 2,
                mileage_band_percent: 0.30,
                min_comparables: 3,
                high_min_comparables: 8,
                high_max_spread: 0.15,
                medium_max_spread: 0.30,
            },
            offer: OfferConfig {
                base_discount_low: 0.12,
                base_discount_medium: 0.08,
                base_discount_high: 0.05,
                negotiation_slack: 0.05,
                mileage_adjustment_rate: 0.10,
                age_adjustment_rate: 0.01,
                adjustment_cap: 0.05,
                max_total_discount: 0.25,
            },
            io: IoConfig {
                input_path: "data/raw_listings.json".to_string(),
                output_dir: "reports".to_string(),
            },
            monitoring: MonitoringConfig {
                log_level: "info".to_string(),
                min_deal_discount: 0.15,
            },
        }
    }
}
