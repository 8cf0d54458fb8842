//! Infrastructure Database Layer
//!
//! This crate provides the PostgreSQL persistence for the quote service using
//! SQLx: connection pooling, embedded migrations, the quote repository and the
//! adapter implementing `domain_quote::QuotePort`.
//!
//! # Architecture
//!
//! The crate follows the repository pattern, providing data access abstractions
//! that hide the database implementation details from the domain layer:
//!
//! - `repositories`: SQL over plain row types, one transaction per write
//! - `adapters`: row to aggregate conversion and error translation
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresQuoteAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/quotes")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresQuoteAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::PostgresQuoteAdapter;
