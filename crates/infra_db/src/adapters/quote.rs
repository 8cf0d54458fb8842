//! PostgreSQL Quote Adapter
//!
//! This module provides the internal (database) adapter for the quote domain,
//! implementing the `QuotePort` trait using PostgreSQL via the `QuoteRepository`.
//!
//! # Overview
//!
//! The `PostgresQuoteAdapter` serves as the bridge between the domain layer's
//! port interface and the database layer. It:
//!
//! - Translates port calls into repository operations
//! - Converts database rows back to domain aggregates
//! - Handles error translation between database and port errors
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresQuoteAdapter;
//! use domain_quote::QuotePort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn QuotePort> = Arc::new(PostgresQuoteAdapter::new(pool));
//! let quote = port.find_by_id(quote_id).await?;
//! ```

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, BusinessInformationId, CoverageOptionId, DomainPort, HealthCheckResult,
    HealthCheckable, Page, PageRequest, PortError, QuoteId,
};
use domain_quote::{
    BusinessInformation, BusinessType, CoverageOption, CoverageType, Industry, Quote, QuotePort,
    QuoteRecord, QuoteSort, QuoteStatus,
};

use crate::error::DatabaseError;
use crate::repositories::quote::{
    CoverageOptionRow, QuoteFilter, QuoteRepository, QuoteRow, QuoteWithCoverage,
};

const ADAPTER_ID: &str = "postgres-quote-adapter";

/// Health checks slower than this report `Degraded`
const DEGRADED_LATENCY_MS: u64 = 500;

/// PostgreSQL-backed implementation of the QuotePort trait
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - `DatabaseError::StaleVersion` / `DuplicateEntry` -> `PortError::Conflict`
/// - Connection and pool errors -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresQuoteAdapter {
    repository: QuoteRepository,
    pool: PgPool,
}

impl PostgresQuoteAdapter {
    /// Creates a new PostgreSQL quote adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: QuoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &QuoteRepository {
        &self.repository
    }

    async fn list(&self, filter: QuoteFilter) -> Result<Vec<Quote>, PortError> {
        let rows = self
            .repository
            .find_where(filter)
            .await
            .map_err(db_to_port_error)?;
        rows_to_quotes(rows)
    }

    async fn page(
        &self,
        filter: QuoteFilter,
        request: PageRequest,
        sort: QuoteSort,
    ) -> Result<Page<Quote>, PortError> {
        let total = self
            .repository
            .count_where(filter.clone())
            .await
            .map_err(db_to_port_error)?;
        let rows = self
            .repository
            .find_page_where(
                filter,
                &sort.order_by_sql(),
                i64::from(request.size()),
                request.offset() as i64,
            )
            .await
            .map_err(db_to_port_error)?;

        Ok(Page::new(rows_to_quotes(rows)?, request, total.max(0) as u64))
    }

    async fn count_filtered(&self, filter: QuoteFilter) -> Result<u64, PortError> {
        let count = self
            .repository
            .count_where(filter)
            .await
            .map_err(db_to_port_error)?;
        Ok(count.max(0) as u64)
    }
}

// Mark as a domain port
impl DomainPort for PostgresQuoteAdapter {}

#[async_trait]
impl HealthCheckable for PostgresQuoteAdapter {
    /// Checks database connectivity with `SELECT 1`
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(_) if latency_ms > DEGRADED_LATENCY_MS => (
                AdapterHealth::Degraded,
                Some(format!("Slow database response: {}ms", latency_ms)),
            ),
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl QuotePort for PostgresQuoteAdapter {
    #[instrument(skip(self), fields(quote_id = %id))]
    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, PortError> {
        debug!("Fetching quote by ID");

        self.repository
            .find_by_id(*id.as_uuid())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_quote)
            .transpose()
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn find_by_quote_number(&self, quote_number: &str) -> Result<Option<Quote>, PortError> {
        debug!("Fetching quote by number");

        self.repository
            .find_by_quote_number(quote_number)
            .await
            .map_err(db_to_port_error)?
            .map(row_to_quote)
            .transpose()
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn exists_by_quote_number(&self, quote_number: &str) -> Result<bool, PortError> {
        self.repository
            .exists_by_quote_number(quote_number)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, quote), fields(quote_id = %quote.id(), version = quote.version()))]
    async fn save(&self, quote: &Quote) -> Result<Quote, PortError> {
        let mut record = quote.to_record();
        let expected_version = record.version;
        record.version += 1;

        let (row, options) = record_to_rows(&record);
        let written = if expected_version == 0 {
            debug!("Inserting new quote");
            self.repository.insert(&row, &options).await
        } else {
            debug!("Updating quote");
            self.repository.update(&row, &options, expected_version).await
        };
        written.map_err(db_to_port_error)?;

        Ok(Quote::restore(record))
    }

    #[instrument(skip(self, quote), fields(quote_id = %quote.id()))]
    async fn delete(&self, quote: &Quote) -> Result<(), PortError> {
        debug!("Deleting quote");

        self.repository
            .delete(*quote.id().as_uuid())
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn find_page(&self, request: PageRequest, sort: QuoteSort) -> Result<Page<Quote>, PortError> {
        self.page(QuoteFilter::All, request, sort).await
    }

    #[instrument(skip(self))]
    async fn search_by_business_name(
        &self,
        fragment: &str,
        request: PageRequest,
        sort: QuoteSort,
    ) -> Result<Page<Quote>, PortError> {
        self.page(QuoteFilter::BusinessNameContains(fragment.to_string()), request, sort)
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: QuoteStatus) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::Status(status.as_str().to_string())).await
    }

    #[instrument(skip(self))]
    async fn find_by_state(&self, state: &str) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::State(state.to_string())).await
    }

    #[instrument(skip(self))]
    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::CreatedBetween(start, end)).await
    }

    #[instrument(skip(self))]
    async fn find_expired(&self, now: DateTime<Utc>) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::ValidUntilBefore(now)).await
    }

    #[instrument(skip(self))]
    async fn find_by_business_type(&self, business_type: BusinessType) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::BusinessType(business_type.as_str().to_string()))
            .await
    }

    #[instrument(skip(self))]
    async fn find_by_industry(&self, industry: Industry) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::Industry(industry.as_str().to_string())).await
    }

    #[instrument(skip(self))]
    async fn find_by_total_premium_above(&self, amount: Decimal) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::TotalPremiumAbove(amount)).await
    }

    #[instrument(skip(self))]
    async fn find_stale_drafts(&self, cutoff: DateTime<Utc>) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::DraftCreatedBefore(cutoff)).await
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self, status: QuoteStatus) -> Result<u64, PortError> {
        self.count_filtered(QuoteFilter::Status(status.as_str().to_string()))
            .await
    }

    #[instrument(skip(self))]
    async fn count(&self) -> Result<u64, PortError> {
        self.count_filtered(QuoteFilter::All).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<Quote>, PortError> {
        self.list(QuoteFilter::All).await
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

/// Converts a DatabaseError to a PortError
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound { entity, id } => PortError::not_found(entity, id),
        DatabaseError::StaleVersion { .. } | DatabaseError::DuplicateEntry(_) => {
            PortError::conflict(e.to_string())
        }
        _ if e.is_constraint_violation() => PortError::validation(e.to_string()),
        _ if e.is_connection_error() => PortError::connection(e.to_string()),
        _ => PortError::internal(e.to_string()),
    }
}

fn parse_column<T: FromStr>(column: &str, value: &str) -> Result<T, DatabaseError> {
    value.parse().map_err(|_| DatabaseError::decode(column, value))
}

fn rows_to_quotes(rows: Vec<QuoteWithCoverage>) -> Result<Vec<Quote>, PortError> {
    rows.into_iter()
        .map(row_to_quote)
        .collect::<Result<_, _>>()
        .map_err(db_to_port_error)
}

/// Converts a joined quote row with its options to a domain Quote
fn row_to_quote(data: QuoteWithCoverage) -> Result<Quote, DatabaseError> {
    let row = data.quote;

    let business_information = BusinessInformation {
        id: BusinessInformationId::from_uuid(row.business_id),
        name: row.business_name,
        business_type: parse_column::<BusinessType>("business_type", &row.business_type)?,
        industry: parse_column::<Industry>("industry", &row.industry)?,
        state: row.state,
        created_at: row.business_created_at,
        updated_at: row.business_updated_at,
    };

    let coverage_options = data
        .coverage_options
        .into_iter()
        .map(|option| {
            Ok(CoverageOption {
                id: CoverageOptionId::from_uuid(option.id),
                name: option.name,
                coverage_type: parse_column::<CoverageType>("coverage_type", &option.coverage_type)?,
                premium: option.premium,
                description: option.description,
                is_active: option.is_active,
                is_selected: option.is_selected,
                created_at: option.created_at,
                updated_at: option.updated_at,
            })
        })
        .collect::<Result<Vec<_>, DatabaseError>>()?;

    Ok(Quote::restore(QuoteRecord {
        id: QuoteId::from_uuid(row.id),
        quote_number: row.quote_number,
        business_information,
        coverage_options,
        total_premium: row.total_premium,
        risk_rating: row.risk_rating,
        underwriter_notes: row.underwriter_notes,
        status: parse_column::<QuoteStatus>("status", &row.status)?,
        valid_until: row.valid_until,
        version: row.version,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

/// Converts a quote record to the rows written by the repository
fn record_to_rows(record: &QuoteRecord) -> (QuoteRow, Vec<CoverageOptionRow>) {
    let quote_id = *record.id.as_uuid();
    let business = &record.business_information;

    let row = QuoteRow {
        id: quote_id,
        quote_number: record.quote_number.clone(),
        total_premium: record.total_premium,
        risk_rating: record.risk_rating.clone(),
        underwriter_notes: record.underwriter_notes.clone(),
        status: record.status.as_str().to_string(),
        valid_until: record.valid_until,
        version: record.version,
        created_at: record.created_at,
        updated_at: record.updated_at,
        business_id: *business.id.as_uuid(),
        business_name: business.name.clone(),
        business_type: business.business_type.as_str().to_string(),
        industry: business.industry.as_str().to_string(),
        state: business.state.clone(),
        business_created_at: business.created_at,
        business_updated_at: business.updated_at,
    };

    let options = record
        .coverage_options
        .iter()
        .enumerate()
        .map(|(position, option)| CoverageOptionRow {
            id: *option.id.as_uuid(),
            quote_id,
            position: position as i32,
            name: option.name.clone(),
            coverage_type: option.coverage_type.as_str().to_string(),
            premium: option.premium,
            description: option.description.clone(),
            is_active: option.is_active,
            is_selected: option.is_selected,
            created_at: option.created_at,
            updated_at: option.updated_at,
        })
        .collect();

    (row, options)
}
