//! # Domain Layer
//!
//! The domain layer contains the core business rules of visa intake.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: The application draft, patches and the persisted record
//! - **value_objects**: Visa catalog and pricing
//! - **services**: Validation rules
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Rules take the current date as an argument
//! - Repository traits define data access contracts

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
