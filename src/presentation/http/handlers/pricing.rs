//! Pricing and Catalog Handlers

use axum::{extract::Query, Json};
use chrono::Utc;

use crate::application::dto::request::QuoteQuery;
use crate::application::dto::response::{CatalogResponse, QuoteResponse};
use crate::domain::{PricingQuote, ProcessingTime, VisaDuration, VisaType};
use crate::shared::error::AppError;
use crate::shared::validation::validate_request;

/// Price a selection
/// GET /api/v1/pricing/quote?visa_type=..&visa_duration=..&processing_time=..&number_of_applicants=..
///
/// Unknown codes are rejected. A known duration that the visa type does not
/// offer prices to zero, like an unfinished selection.
pub async fn get_quote(Query(query): Query<QuoteQuery>) -> Result<Json<QuoteResponse>, AppError> {
    validate_request(&query)?;

    let visa_type = VisaType::from_code(&query.visa_type)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown visa type: {}", query.visa_type)))?;
    let visa_duration = parse_optional(&query.visa_duration, VisaDuration::from_code, "visa duration")?;
    let processing_time =
        parse_optional(&query.processing_time, ProcessingTime::from_code, "processing time")?;

    let quote = PricingQuote::new(
        visa_type,
        visa_duration,
        processing_time,
        query.number_of_applicants,
        Utc::now().date_naive(),
    );

    Ok(Json(quote.into()))
}

/// Visa types, durations and processing tiers
/// GET /api/v1/catalog
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse::current())
}

fn parse_optional<T>(
    code: &str,
    parse: impl Fn(&str) -> Option<T>,
    what: &str,
) -> Result<Option<T>, AppError> {
    if code.trim().is_empty() {
        return Ok(None);
    }
    parse(code)
        .map(Some)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown {}: {}", what, code)))
}
