//! Repository implementations for domain entities
//!
//! This module provides concrete repository implementations that handle
//! database access for each domain aggregate. Repositories encapsulate
//! SQL queries and map between database rows and plain column values.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Runtime-checked queries with row types deriving `sqlx::FromRow`
//! - One transaction per aggregate write
//! - Optimistic concurrency control through a version column

pub mod quote;

pub use quote::{CoverageOptionRow, QuoteFilter, QuoteRepository, QuoteRow, QuoteWithCoverage};
