pub mod cleaner;
pub mod core;
pub mod market;
pub mod model;
pub mod offer;
pub mod pipeline;
