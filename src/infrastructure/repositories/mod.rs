//! Repository Implementations
//!
//! Implementations of the domain `ApplicationRepository` trait.

mod application_repository;
mod memory_repository;

pub use application_repository::PgApplicationRepository;
pub use memory_repository::InMemoryApplicationRepository;
