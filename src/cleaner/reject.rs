use serde::Serialize;
use thiserror::Error;

/// Why a raw record was excluded from the comparable pool. These are
/// recoverable: the record is skipped and counted, the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum RejectionReason {
    #[error("missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("no numeric token recoverable from `{field}`: {value:?}")]
    UnparseableNumber { field: &'static str, value: String },

    #[error("year {year} outside plausible range {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("price must be positive, got {price}")]
    NonPositivePrice { price: i64 },

    #[error("mileage must be non-negative, got {mileage}")]
    NegativeMileage { mileage: i64 },
}

impl RejectionReason {
    /// Stable label for telemetry counters.
    pub fn kind(&self) -> &'static str {
        match self {
            RejectionReason::MissingField { .. } => "missing_field",
            RejectionReason::UnparseableNumber { .. } => "unparseable_number",
            RejectionReason::YearOutOfRange { .. } => "year_out_of_range",
            RejectionReason::NonPositivePrice { .. } => "non_positive_price",
            RejectionReason::NegativeMileage { .. } => "negative_mileage",
        }
    }
}
