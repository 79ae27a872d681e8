//! Pricing calculator.
//!
//! Pure functions over the visa catalog. Incomplete selections price to
//! zero instead of failing so that a quote can always be rendered while the
//! applicant is still choosing options.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::visa_catalog::{
    duration_option_by_code, processing_option_by_code, ProcessingTime, VisaDuration, VisaType,
};

/// Derived price and turnaround for a selection. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingQuote {
    pub visa_type: VisaType,
    pub visa_duration: Option<VisaDuration>,
    pub processing_time: Option<ProcessingTime>,
    pub number_of_applicants: u32,
    pub base_price: Decimal,
    pub processing_fee: Decimal,
    pub total_price: Decimal,
    pub estimated_delivery_date: NaiveDate,
}

impl PricingQuote {
    /// Build a quote for the given selection, as of `today`.
    pub fn new(
        visa_type: VisaType,
        visa_duration: Option<VisaDuration>,
        processing_time: Option<ProcessingTime>,
        number_of_applicants: u32,
        today: NaiveDate,
    ) -> Self {
        let base_price = visa_duration
            .and_then(|d| visa_type.option().duration(d))
            .map(|d| d.price())
            .unwrap_or_default();
        let processing_fee = processing_time
            .map(|t| t.option().additional_fee())
            .unwrap_or_default();

        Self {
            visa_type,
            visa_duration,
            processing_time,
            number_of_applicants,
            base_price,
            processing_fee,
            total_price: calculate_total_price(
                visa_type,
                visa_duration,
                processing_time,
                number_of_applicants,
            ),
            estimated_delivery_date: estimated_delivery_date(processing_time, today),
        }
    }
}

/// `(base price + processing fee) * applicants`, or zero when the duration is
/// not sold for the visa type or either option is unset.
pub fn calculate_total_price(
    visa_type: VisaType,
    visa_duration: Option<VisaDuration>,
    processing_time: Option<ProcessingTime>,
    number_of_applicants: u32,
) -> Decimal {
    let Some(duration) = visa_duration.and_then(|d| visa_type.option().duration(d)) else {
        return Decimal::ZERO;
    };
    let Some(processing) = processing_time.map(|t| t.option()) else {
        return Decimal::ZERO;
    };

    (duration.price() + processing.additional_fee()) * Decimal::from(number_of_applicants)
}

/// Same as [`calculate_total_price`] but keyed by wire codes; any unknown
/// code prices to zero.
pub fn calculate_total_price_by_code(
    visa_type: &str,
    visa_duration: &str,
    processing_time: &str,
    number_of_applicants: u32,
) -> Decimal {
    match (
        duration_option_by_code(visa_type, visa_duration),
        processing_option_by_code(processing_time),
    ) {
        (Some(duration), Some(processing)) => {
            (duration.price() + processing.additional_fee()) * Decimal::from(number_of_applicants)
        }
        _ => Decimal::ZERO,
    }
}

/// `today` plus the tier's turnaround. Days are counted on the calendar;
/// weekends and holidays are not skipped. Unset tier returns `today`.
pub fn estimated_delivery_date(processing_time: Option<ProcessingTime>, today: NaiveDate) -> NaiveDate {
    let Some(tier) = processing_time else {
        return today;
    };

    today
        .checked_add_days(Days::new(u64::from(tier.option().business_days)))
        .unwrap_or(today)
}

/// Render a price as `$25.00`.
pub fn format_price(price: Decimal) -> String {
    format!("${:.2}", price.round_dp(2))
}
