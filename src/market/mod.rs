pub mod analyzer;
pub mod estimate;
pub mod stats;

pub use analyzer::{MarketAnalyzer, PoolSnapshot};
pub use estimate::{Confidence, MarketEstimate, RelaxationLevel};
