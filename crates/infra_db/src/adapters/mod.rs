//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the PostgreSQL database layer.
//!
//! # Architecture
//!
//! Each domain has a corresponding adapter that:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresQuoteAdapter;
//! use domain_quote::QuotePort;
//!
//! let adapter = PostgresQuoteAdapter::new(pool);
//! let quote = adapter.find_by_id(quote_id).await?;
//! ```

pub mod quote;

pub use quote::PostgresQuoteAdapter;
