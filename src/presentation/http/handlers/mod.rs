//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod application;
pub mod health;
pub mod pricing;
pub mod upload;
