//! Response DTOs
//!
//! Data structures for API response bodies.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::upload_service::{format_file_size, UploadedFile};
use crate::domain::value_objects::{
    format_price, PricingQuote, ProcessingTimeOption, VisaOption, PROCESSING_TIMES, VISA_OPTIONS,
};
use crate::domain::{ApplicationRecord, ApplicationStatus, VisaApplicationDraft};

/// Application record response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationResponse {
    pub id: Uuid,
    pub status: ApplicationStatus,
    pub fields: VisaApplicationDraft,
    pub created_at: String,
    pub updated_at: String,
    pub submitted_at: Option<String>,
}

impl From<ApplicationRecord> for ApplicationResponse {
    fn from(record: ApplicationRecord) -> Self {
        Self {
            id: record.id,
            status: record.status,
            fields: record.fields,
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
            submitted_at: record.submitted_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Stored file response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_size_label: String,
}

impl From<UploadedFile> for UploadResponse {
    fn from(file: UploadedFile) -> Self {
        Self {
            file_size_label: format_file_size(file.file_size),
            url: file.url,
            file_name: file.file_name,
            file_size: file.file_size,
        }
    }
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteUploadResponse {
    pub deleted: bool,
}

/// Pricing quote response
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub base_price: Decimal,
    pub processing_fee: Decimal,
    pub number_of_applicants: u32,
    pub total_price: Decimal,
    pub formatted_total: String,
    pub estimated_delivery_date: NaiveDate,
}

impl From<PricingQuote> for QuoteResponse {
    fn from(quote: PricingQuote) -> Self {
        Self {
            formatted_total: format_price(quote.total_price),
            base_price: quote.base_price,
            processing_fee: quote.processing_fee,
            number_of_applicants: quote.number_of_applicants,
            total_price: quote.total_price,
            estimated_delivery_date: quote.estimated_delivery_date,
        }
    }
}

/// Visa catalog response
#[derive(Debug, Clone, Serialize)]
pub struct CatalogResponse {
    pub visa_options: &'static [VisaOption],
    pub processing_times: &'static [ProcessingTimeOption],
}

impl CatalogResponse {
    pub fn current() -> Self {
        Self {
            visa_options: &VISA_OPTIONS,
            processing_times: &PROCESSING_TIMES,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
