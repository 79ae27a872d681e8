//! Application Layer
//!
//! Contains business logic services, the form wizard and data transfer
//! objects (DTOs). This layer orchestrates the flow of data between the
//! presentation and domain layers.

pub mod dto;
pub mod form;
pub mod services;
