//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! quote service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common inputs
//! - `builders`: Builder patterns for test data construction
//! - `doubles`: Deterministic clock and random sources
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod doubles;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use doubles::*;
pub use assertions::*;
pub use generators::*;
