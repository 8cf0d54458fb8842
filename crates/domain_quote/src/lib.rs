//! Quote Domain
//!
//! This crate implements commercial insurance quoting: a business, the
//! coverage options offered to it, and the workflow that carries a quote from
//! draft to an underwriting decision.
//!
//! # Architecture
//!
//! The domain layer is infrastructure-agnostic:
//! - **Aggregates**: Quote is the aggregate root; business information and
//!   coverage options live inside it
//! - **Value Objects**: CoverageType with its static catalog, BusinessType, Industry
//! - **Domain Services**: QuoteService, QuoteNumberGenerator
//! - **Ports**: QuotePort, implemented by infra_db and by an in-memory mock
//! - **Domain Events**: QuoteCreated, QuoteUpdated, StatusChanged, QuoteDeleted
//!
//! # Quote Lifecycle
//!
//! ```text
//! Draft <-> Saved -> Submitted -> Approved
//!                             \-> Rejected
//! Expired (by time only)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_quote::{QuoteService, QuoteSettings, NewQuote};
//!
//! let service = QuoteService::with_system_sources(port, QuoteSettings::default());
//! let quote = service.create(input).await?;
//! let quote = service.submit(quote.id()).await?;
//! ```

pub mod business;
pub mod commands;
pub mod coverage;
pub mod error;
pub mod events;
pub mod numbering;
pub mod ports;
pub mod quote;
pub mod services;
pub mod settings;
pub mod statistics;
pub mod validation;

pub use business::{BusinessInformation, BusinessInformationInput, BusinessType, Industry};
pub use commands::{NewQuote, QuoteUpdate};
pub use coverage::{CoverageOption, CoverageOptionInput, CoverageType, CoverageTypeInfo};
pub use error::QuoteError;
pub use events::QuoteEvent;
pub use numbering::QuoteNumberGenerator;
pub use ports::{QuotePort, QuoteSort, QuoteSortField};
pub use quote::{Quote, QuoteRecord, QuoteStatus};
pub use services::QuoteService;
pub use settings::QuoteSettings;
pub use statistics::QuoteStatistics;
pub use validation::{QuoteValidator, ValidationResult};
