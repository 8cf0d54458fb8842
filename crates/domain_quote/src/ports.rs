//! Quote Domain Ports
//!
//! This module defines the persistence port for the quote domain, enabling
//! swappable implementations (PostgreSQL, in-memory mock).
//!
//! # Architecture
//!
//! The `QuotePort` trait defines every operation the lifecycle engine needs
//! from its store:
//!
//! - **Internal Adapter**: PostgreSQL database (infra_db)
//! - **Mock Adapter**: In-memory map for tests without a database
//!
//! # Persistence Contract
//!
//! - `save` inserts a quote whose version is 0 and updates any other quote
//!   only if the stored version matches; the returned quote carries the new
//!   version. A stale version fails with `PortError::Conflict`.
//! - `save` writes the quote, its business information and all coverage
//!   options atomically; stored options no longer on the quote are removed.
//! - `delete` removes the quote with its business information and coverage
//!   options atomically.
//! - Unpaged finders return quotes newest first.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_quote::ports::QuotePort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn QuotePort> = Arc::new(PostgresQuoteAdapter::new(pool));
//! let quote = port.find_by_id(id).await?;
//! ```

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use core_kernel::{
    CoreError, DomainPort, HealthCheckable, Page, PageRequest, PortError, QuoteId, SortDirection,
};

use crate::business::{BusinessType, Industry};
use crate::quote::{Quote, QuoteStatus};

/// Fields a quote listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    TotalPremium,
    QuoteNumber,
    ValidUntil,
}

impl QuoteSortField {
    /// Parses the camelCase wire name
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim() {
            "createdAt" => Ok(QuoteSortField::CreatedAt),
            "updatedAt" => Ok(QuoteSortField::UpdatedAt),
            "totalPremium" => Ok(QuoteSortField::TotalPremium),
            "quoteNumber" => Ok(QuoteSortField::QuoteNumber),
            "validUntil" => Ok(QuoteSortField::ValidUntil),
            other => Err(CoreError::validation(format!("Unknown sort field '{}'", other))),
        }
    }

    /// Column name in the `quotes` table
    pub fn column(&self) -> &'static str {
        match self {
            QuoteSortField::CreatedAt => "created_at",
            QuoteSortField::UpdatedAt => "updated_at",
            QuoteSortField::TotalPremium => "total_premium",
            QuoteSortField::QuoteNumber => "quote_number",
            QuoteSortField::ValidUntil => "valid_until",
        }
    }

    fn compare(&self, left: &Quote, right: &Quote) -> Ordering {
        match self {
            QuoteSortField::CreatedAt => left.created_at().cmp(&right.created_at()),
            QuoteSortField::UpdatedAt => left.updated_at().cmp(&right.updated_at()),
            QuoteSortField::TotalPremium => left.total_premium().cmp(&right.total_premium()),
            QuoteSortField::QuoteNumber => left.quote_number().cmp(right.quote_number()),
            QuoteSortField::ValidUntil => left.valid_until().cmp(&right.valid_until()),
        }
    }
}

/// Ordering for paged quote listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuoteSort {
    pub field: QuoteSortField,
    pub direction: SortDirection,
}

impl QuoteSort {
    /// Parses `"field"` or `"field,direction"`, e.g. `"totalPremium,asc"`
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let mut parts = value.splitn(2, ',');
        let field = QuoteSortField::parse(parts.next().unwrap_or_default())?;
        let direction = match parts.next() {
            Some(direction) => SortDirection::parse(direction)?,
            None => SortDirection::default(),
        };
        Ok(Self { field, direction })
    }

    /// Compares two quotes under this ordering, breaking ties by id
    pub fn compare(&self, left: &Quote, right: &Quote) -> Ordering {
        let ordering = self.field.compare(left, right).then_with(|| left.id().cmp(&right.id()));
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// SQL `ORDER BY` body for the `quotes` table aliased as `q`
    pub fn order_by_sql(&self) -> String {
        format!(
            "q.{} {}, q.id {}",
            self.field.column(),
            self.direction.as_sql(),
            self.direction.as_sql()
        )
    }
}

/// The persistence port for quote aggregates
///
/// All methods are async and return `Result<T, PortError>` for consistent
/// error handling across adapter implementations.
#[async_trait]
pub trait QuotePort: DomainPort + HealthCheckable {
    // ========================================================================
    // Lookup
    // ========================================================================

    /// Retrieves a quote by ID
    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, PortError>;

    /// Retrieves a quote by its human-facing number
    async fn find_by_quote_number(&self, quote_number: &str) -> Result<Option<Quote>, PortError>;

    /// Checks whether a quote number is already taken
    async fn exists_by_quote_number(&self, quote_number: &str) -> Result<bool, PortError>;

    // ========================================================================
    // Writes
    // ========================================================================

    /// Inserts or updates a quote with its owned records
    ///
    /// # Returns
    ///
    /// The stored quote with its new version
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the stored version differs or the quote
    /// number is already taken
    async fn save(&self, quote: &Quote) -> Result<Quote, PortError>;

    /// Deletes a quote with its business information and coverage options
    async fn delete(&self, quote: &Quote) -> Result<(), PortError>;

    // ========================================================================
    // Listings
    // ========================================================================

    /// Returns one page of all quotes
    async fn find_page(&self, request: PageRequest, sort: QuoteSort) -> Result<Page<Quote>, PortError>;

    /// Returns one page of quotes whose business name contains `fragment`,
    /// ignoring case
    async fn search_by_business_name(
        &self,
        fragment: &str,
        request: PageRequest,
        sort: QuoteSort,
    ) -> Result<Page<Quote>, PortError>;

    /// Returns quotes in the given status
    async fn find_by_status(&self, status: QuoteStatus) -> Result<Vec<Quote>, PortError>;

    /// Returns quotes for businesses in the given state
    async fn find_by_state(&self, state: &str) -> Result<Vec<Quote>, PortError>;

    /// Returns quotes created within `[start, end]`
    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, PortError>;

    /// Returns quotes whose validity window ended before `now`
    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<Quote>, PortError>;

    /// Returns quotes for businesses of the given type
    async fn find_by_business_type(&self, business_type: BusinessType) -> Result<Vec<Quote>, PortError>;

    /// Returns quotes for businesses in the given industry
    async fn find_by_industry(&self, industry: Industry) -> Result<Vec<Quote>, PortError>;

    /// Returns quotes whose total premium is strictly greater than `amount`
    async fn find_by_total_premium_above(&self, amount: Decimal) -> Result<Vec<Quote>, PortError>;

    /// Returns draft quotes created before `cutoff`
    async fn find_stale_drafts(&self, cutoff: DateTime<Utc>) -> Result<Vec<Quote>, PortError>;

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Counts quotes in the given status
    async fn count_by_status(&self, status: QuoteStatus) -> Result<u64, PortError>;

    /// Counts all quotes
    async fn count(&self) -> Result<u64, PortError>;

    /// Returns every quote
    async fn find_all(&self) -> Result<Vec<Quote>, PortError>;
}

/// Mock implementation of QuotePort for testing
///
/// This adapter stores quotes in memory and is useful for unit testing
/// without database dependencies.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// In-memory mock implementation of QuotePort
    #[derive(Debug, Default, Clone)]
    pub struct MockQuotePort {
        quotes: Arc<RwLock<HashMap<QuoteId, Quote>>>,
    }

    impl MockQuotePort {
        /// Creates a new, empty mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with quotes for testing
        pub async fn with_quotes(quotes: Vec<Quote>) -> Result<Self, PortError> {
            let port = Self::new();
            for quote in quotes {
                port.save(&quote).await?;
            }
            Ok(port)
        }

        /// Number of stored quotes
        pub async fn len(&self) -> usize {
            self.quotes.read().await.len()
        }

        /// Returns true if nothing is stored
        pub async fn is_empty(&self) -> bool {
            self.quotes.read().await.is_empty()
        }

        async fn filtered<F>(&self, predicate: F) -> Vec<Quote>
        where
            F: Fn(&Quote) -> bool,
        {
            let quotes = self.quotes.read().await;
            let mut matches: Vec<Quote> = quotes.values().filter(|q| predicate(q)).cloned().collect();
            let newest_first = QuoteSort::default();
            matches.sort_by(|a, b| newest_first.compare(a, b));
            matches
        }

        async fn paged<F>(&self, request: PageRequest, sort: QuoteSort, predicate: F) -> Page<Quote>
        where
            F: Fn(&Quote) -> bool,
        {
            let mut matches = self.filtered(predicate).await;
            matches.sort_by(|a, b| sort.compare(a, b));
            Page::from_ordered(matches, request)
        }
    }

    impl DomainPort for MockQuotePort {}

    #[async_trait]
    impl HealthCheckable for MockQuotePort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-quote-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl QuotePort for MockQuotePort {
        async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, PortError> {
            Ok(self.quotes.read().await.get(&id).cloned())
        }

        async fn find_by_quote_number(&self, quote_number: &str) -> Result<Option<Quote>, PortError> {
            Ok(self
                .quotes
                .read()
                .await
                .values()
                .find(|q| q.quote_number() == quote_number)
                .cloned())
        }

        async fn exists_by_quote_number(&self, quote_number: &str) -> Result<bool, PortError> {
            Ok(self
                .quotes
                .read()
                .await
                .values()
                .any(|q| q.quote_number() == quote_number))
        }

        async fn save(&self, quote: &Quote) -> Result<Quote, PortError> {
            let mut quotes = self.quotes.write().await;

            match quotes.get(&quote.id()) {
                Some(stored) if stored.version() != quote.version() => {
                    return Err(PortError::conflict(format!(
                        "Quote {} was modified concurrently (expected version {}, found {})",
                        quote.id(),
                        quote.version(),
                        stored.version()
                    )));
                }
                None if quote.version() != 0 => {
                    return Err(PortError::not_found("Quote", quote.id()));
                }
                _ => {}
            }

            let number_taken = quotes
                .values()
                .any(|q| q.id() != quote.id() && q.quote_number() == quote.quote_number());
            if number_taken {
                return Err(PortError::conflict(format!(
                    "Quote number {} already exists",
                    quote.quote_number()
                )));
            }

            let mut record = quote.to_record();
            record.version += 1;
            let stored = Quote::restore(record);
            quotes.insert(stored.id(), stored.clone());
            Ok(stored)
        }

        async fn delete(&self, quote: &Quote) -> Result<(), PortError> {
            self.quotes
                .write()
                .await
                .remove(&quote.id())
                .map(|_| ())
                .ok_or_else(|| PortError::not_found("Quote", quote.id()))
        }

        async fn find_page(&self, request: PageRequest, sort: QuoteSort) -> Result<Page<Quote>, PortError> {
            Ok(self.paged(request, sort, |_| true).await)
        }

        async fn search_by_business_name(
            &self,
            fragment: &str,
            request: PageRequest,
            sort: QuoteSort,
        ) -> Result<Page<Quote>, PortError> {
            let needle = fragment.to_lowercase();
            Ok(self
                .paged(request, sort, |q| {
                    q.business_information().name.to_lowercase().contains(&needle)
                })
                .await)
        }

        async fn find_by_status(&self, status: QuoteStatus) -> Result<Vec<Quote>, PortError> {
            Ok(self.filtered(|q| q.status() == status).await)
        }

        async fn find_by_state(&self, state: &str) -> Result<Vec<Quote>, PortError> {
            Ok(self.filtered(|q| q.business_information().state == state).await)
        }

        async fn find_created_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Quote>, PortError> {
            Ok(self
                .filtered(|q| q.created_at() >= start && q.created_at() <= end)
                .await)
        }

        async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<Quote>, PortError> {
            Ok(self.filtered(|q| q.valid_until() < now).await)
        }

        async fn find_by_business_type(&self, business_type: BusinessType) -> Result<Vec<Quote>, PortError> {
            Ok(self
                .filtered(|q| q.business_information().business_type == business_type)
                .await)
        }

        async fn find_by_industry(&self, industry: Industry) -> Result<Vec<Quote>, PortError> {
            Ok(self
                .filtered(|q| q.business_information().industry == industry)
                .await)
        }

        async fn find_by_total_premium_above(&self, amount: Decimal) -> Result<Vec<Quote>, PortError> {
            Ok(self.filtered(|q| q.total_premium() > amount).await)
        }

        async fn find_stale_drafts(&self, cutoff: DateTime<Utc>) -> Result<Vec<Quote>, PortError> {
            Ok(self
                .filtered(|q| q.status() == QuoteStatus::Draft && q.created_at() < cutoff)
                .await)
        }

        async fn count_by_status(&self, status: QuoteStatus) -> Result<u64, PortError> {
            Ok(self
                .quotes
                .read()
                .await
                .values()
                .filter(|q| q.status() == status)
                .count() as u64)
        }

        async fn count(&self) -> Result<u64, PortError> {
            Ok(self.quotes.read().await.len() as u64)
        }

        async fn find_all(&self) -> Result<Vec<Quote>, PortError> {
            Ok(self.filtered(|_| true).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::MockQuotePort;
    use crate::business::BusinessInformationInput;
    use crate::commands::NewQuote;
    use chrono::Duration;

    fn create_test_quote(name: &str, number: &str) -> Quote {
        Quote::create(
            NewQuote {
                business_information: BusinessInformationInput {
                    name: name.to_string(),
                    business_type: BusinessType::Retail,
                    industry: Industry::RetailTrade,
                    state: "CA".to_string(),
                },
                coverage_options: vec![],
                risk_rating: None,
                underwriter_notes: None,
            },
            number.to_string(),
            Duration::days(30),
            Utc::now(),
        )
    }

    #[test]
    fn test_sort_parse() {
        let sort = QuoteSort::parse("totalPremium,asc").unwrap();
        assert_eq!(sort.field, QuoteSortField::TotalPremium);
        assert_eq!(sort.direction, SortDirection::Asc);

        let sort = QuoteSort::parse("quoteNumber").unwrap();
        assert_eq!(sort.direction, SortDirection::Desc);

        assert!(QuoteSort::parse("status,asc").is_err());
        assert_eq!(QuoteSort::default().order_by_sql(), "q.created_at DESC, q.id DESC");
    }

    #[tokio::test]
    async fn test_mock_save_bumps_version() {
        let port = MockQuotePort::new();
        let quote = create_test_quote("Acme LLC", "IQ-1");

        let stored = port.save(&quote).await.unwrap();
        assert_eq!(stored.version(), 1);

        let again = port.save(&stored).await.unwrap();
        assert_eq!(again.version(), 2);
    }

    #[tokio::test]
    async fn test_mock_rejects_stale_version() {
        let port = MockQuotePort::new();
        let stored = port.save(&create_test_quote("Acme LLC", "IQ-1")).await.unwrap();
        port.save(&stored).await.unwrap();

        let error = port.save(&stored).await.unwrap_err();
        assert!(error.is_conflict());
    }

    #[tokio::test]
    async fn test_mock_rejects_duplicate_number() {
        let port = MockQuotePort::new();
        port.save(&create_test_quote("Acme LLC", "IQ-1")).await.unwrap();

        let error = port.save(&create_test_quote("Other Co", "IQ-1")).await.unwrap_err();
        assert!(error.is_conflict());
    }

    #[tokio::test]
    async fn test_mock_search_ignores_case() {
        let port = MockQuotePort::with_quotes(vec![
            create_test_quote("Acme LLC", "IQ-1"),
            create_test_quote("Globex", "IQ-2"),
        ])
        .await
        .unwrap();

        let page = port
            .search_by_business_name("aCmE", PageRequest::default(), QuoteSort::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].business_information().name, "Acme LLC");
    }
}
