//! Core Kernel - Foundational types shared by the quote workspace
//!
//! This crate provides the building blocks used by the domain, persistence
//! and transport layers:
//! - Strongly-typed identifiers
//! - Port error and health-check types for the hexagonal architecture
//! - Injectable clock and randomness
//! - Offset pagination

pub mod clock;
pub mod error;
pub mod identifiers;
pub mod pagination;
pub mod ports;
pub mod random;

pub use clock::{Clock, SystemClock};
pub use error::CoreError;
pub use identifiers::{QuoteId, BusinessInformationId, CoverageOptionId};
pub use pagination::{Page, PageRequest, SortDirection, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use ports::{
    PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable,
};
pub use random::{RandomSource, StdRandom};
