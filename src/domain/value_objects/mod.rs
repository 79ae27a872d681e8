//! Value Objects
//!
//! Immutable reference data and pure calculations derived from it.

pub mod pricing;
pub mod visa_catalog;

pub use pricing::{
    calculate_total_price, calculate_total_price_by_code, estimated_delivery_date, format_price,
    PricingQuote,
};
pub use visa_catalog::{
    ProcessingTime, ProcessingTimeOption, VisaDuration, VisaDurationOption, VisaOption, VisaType,
    PROCESSING_TIMES, VISA_OPTIONS,
};
