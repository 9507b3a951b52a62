pub mod clean;
pub mod lookup;
pub mod numeric;
pub mod raw;
pub mod reject;

pub use clean::clean;
pub use raw::RawListingRecord;
pub use reject::RejectionReason;
