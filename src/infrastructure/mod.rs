//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Application record repositories (PostgreSQL, in-memory)
//! - Document storage backends (local directory, remote blob store)
//! - Local key-value stores for wizard persistence
//! - Prometheus metrics

pub mod database;
pub mod local_store;
pub mod metrics;
pub mod repositories;
pub mod storage;
