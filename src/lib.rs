//! # Visa Intake Library
//!
//! This crate provides the intake side of a visa application service:
//! - Validation rules for every field of an application
//! - A pricing calculator over the visa catalog
//! - Document upload with file and portrait photo checks
//! - A two-step form wizard with debounced local autosave
//! - Application records moving from `DRAFT` to `SUBMITTED`
//! - RESTful HTTP API endpoints over all of the above
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, catalog, pricing and validation rules
//! - **Application Layer**: Record service, upload client, form wizard and DTOs
//! - **Infrastructure Layer**: Repositories, document storage, local stores, metrics
//! - **Presentation Layer**: HTTP handlers and middleware
//!
//! ## Module Structure
//!
//! ```text
//! visa_intake/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, validation rules
//! +-- application/    Services, form wizard and DTOs
//! +-- infrastructure/ Database, storage and local store implementations
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Common utilities (errors, request validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
