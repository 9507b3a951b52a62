pub mod calculator;
pub mod types;

pub use calculator::OfferCalculator;
pub use types::{EstimateRef, Offer, OfferFactor};
