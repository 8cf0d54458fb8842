//! Quote repository implementation
//!
//! This module provides database access for quote aggregates. A quote spans
//! three tables: `quotes`, its `business_information` row and its
//! `coverage_options`. Every write touches all three inside one transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::{QueryAs, QueryScalar};
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

/// Shared projection joining a quote with its business information
const QUOTE_SELECT: &str = r#"
    SELECT
        q.id,
        q.quote_number,
        q.total_premium,
        q.risk_rating,
        q.underwriter_notes,
        q.status,
        q.valid_until,
        q.version,
        q.created_at,
        q.updated_at,
        b.id AS business_id,
        b.name AS business_name,
        b.business_type,
        b.industry,
        b.state,
        b.created_at AS business_created_at,
        b.updated_at AS business_updated_at
    FROM quotes q
    JOIN business_information b ON b.id = q.business_information_id
"#;

const QUOTE_COUNT: &str = r#"
    SELECT COUNT(*)
    FROM quotes q
    JOIN business_information b ON b.id = q.business_information_id
"#;

/// Order for unpaged listings
const NEWEST_FIRST: &str = "q.created_at DESC, q.id DESC";

/// Database row for a quote joined with its business information
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct QuoteRow {
    pub id: Uuid,
    pub quote_number: String,
    pub total_premium: Decimal,
    pub risk_rating: Option<String>,
    pub underwriter_notes: Option<String>,
    pub status: String,
    pub valid_until: DateTime<Utc>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub business_id: Uuid,
    pub business_name: String,
    pub business_type: String,
    pub industry: String,
    pub state: String,
    pub business_created_at: DateTime<Utc>,
    pub business_updated_at: DateTime<Utc>,
}

/// Database row for a coverage option
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CoverageOptionRow {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub position: i32,
    pub name: String,
    pub coverage_type: String,
    pub premium: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A quote row with its coverage options in position order
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteWithCoverage {
    pub quote: QuoteRow,
    pub coverage_options: Vec<CoverageOptionRow>,
}

/// Row filters supported by the listing queries
///
/// Enum-typed columns are matched by their stored text.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteFilter {
    All,
    Status(String),
    State(String),
    BusinessType(String),
    Industry(String),
    /// `created_at` within the inclusive range
    CreatedBetween(DateTime<Utc>, DateTime<Utc>),
    /// `valid_until` strictly before the instant
    ValidUntilBefore(DateTime<Utc>),
    /// `total_premium` strictly greater than the amount
    TotalPremiumAbove(Decimal),
    /// DRAFT quotes created strictly before the instant
    DraftCreatedBefore(DateTime<Utc>),
    /// Business name containing the fragment, ignoring case
    BusinessNameContains(String),
}

impl QuoteFilter {
    fn where_clause(&self) -> &'static str {
        match self {
            QuoteFilter::All => "TRUE",
            QuoteFilter::Status(_) => "q.status = $1",
            QuoteFilter::State(_) => "b.state = $1",
            QuoteFilter::BusinessType(_) => "b.business_type = $1",
            QuoteFilter::Industry(_) => "b.industry = $1",
            QuoteFilter::CreatedBetween(_, _) => "q.created_at BETWEEN $1 AND $2",
            QuoteFilter::ValidUntilBefore(_) => "q.valid_until < $1",
            QuoteFilter::TotalPremiumAbove(_) => "q.total_premium > $1",
            QuoteFilter::DraftCreatedBefore(_) => "q.status = 'DRAFT' AND q.created_at < $1",
            QuoteFilter::BusinessNameContains(_) => {
                r"lower(b.name) LIKE '%' || lower($1) || '%' ESCAPE '\'"
            }
        }
    }

    /// Number of positional parameters the clause consumes
    fn arity(&self) -> usize {
        match self {
            QuoteFilter::All => 0,
            QuoteFilter::CreatedBetween(_, _) => 2,
            _ => 1,
        }
    }

    fn bind_rows<'q>(
        self,
        query: QueryAs<'q, Postgres, QuoteRow, PgArguments>,
    ) -> QueryAs<'q, Postgres, QuoteRow, PgArguments> {
        match self {
            QuoteFilter::All => query,
            QuoteFilter::Status(value)
            | QuoteFilter::State(value)
            | QuoteFilter::BusinessType(value)
            | QuoteFilter::Industry(value) => query.bind(value),
            QuoteFilter::BusinessNameContains(fragment) => query.bind(escape_like(&fragment)),
            QuoteFilter::CreatedBetween(start, end) => query.bind(start).bind(end),
            QuoteFilter::ValidUntilBefore(at) | QuoteFilter::DraftCreatedBefore(at) => query.bind(at),
            QuoteFilter::TotalPremiumAbove(amount) => query.bind(amount),
        }
    }

    fn bind_count<'q>(
        self,
        query: QueryScalar<'q, Postgres, i64, PgArguments>,
    ) -> QueryScalar<'q, Postgres, i64, PgArguments> {
        match self {
            QuoteFilter::All => query,
            QuoteFilter::Status(value)
            | QuoteFilter::State(value)
            | QuoteFilter::BusinessType(value)
            | QuoteFilter::Industry(value) => query.bind(value),
            QuoteFilter::BusinessNameContains(fragment) => query.bind(escape_like(&fragment)),
            QuoteFilter::CreatedBetween(start, end) => query.bind(start).bind(end),
            QuoteFilter::ValidUntilBefore(at) | QuoteFilter::DraftCreatedBefore(at) => query.bind(at),
            QuoteFilter::TotalPremiumAbove(amount) => query.bind(amount),
        }
    }
}

/// Escapes `LIKE` wildcards so the fragment matches literally
pub fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Repository for quote aggregates
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::repositories::QuoteRepository;
///
/// let repo = QuoteRepository::new(pool);
/// let quote = repo.find_by_id(quote_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    /// Creates a new QuoteRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Retrieves a quote by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<QuoteWithCoverage>, DatabaseError> {
        let sql = format!("{} WHERE q.id = $1", QUOTE_SELECT);
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_coverage(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Retrieves a quote by its number
    pub async fn find_by_quote_number(
        &self,
        quote_number: &str,
    ) -> Result<Option<QuoteWithCoverage>, DatabaseError> {
        let sql = format!("{} WHERE q.quote_number = $1", QUOTE_SELECT);
        let row = sqlx::query_as::<_, QuoteRow>(&sql)
            .bind(quote_number)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(self.attach_coverage(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Checks whether a quote number is taken
    pub async fn exists_by_quote_number(&self, quote_number: &str) -> Result<bool, DatabaseError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM quotes WHERE quote_number = $1)",
        )
        .bind(quote_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Lists every quote matching `filter`, newest first
    pub async fn find_where(&self, filter: QuoteFilter) -> Result<Vec<QuoteWithCoverage>, DatabaseError> {
        let sql = format!(
            "{} WHERE {} ORDER BY {}",
            QUOTE_SELECT,
            filter.where_clause(),
            NEWEST_FIRST
        );
        let rows = filter
            .bind_rows(sqlx::query_as::<_, QuoteRow>(&sql))
            .fetch_all(&self.pool)
            .await?;

        self.attach_coverage(rows).await
    }

    /// Lists one page of quotes matching `filter`
    ///
    /// # Arguments
    ///
    /// * `order_by` - Trusted `ORDER BY` body over the `q` alias
    /// * `limit` / `offset` - Page window
    pub async fn find_page_where(
        &self,
        filter: QuoteFilter,
        order_by: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuoteWithCoverage>, DatabaseError> {
        let next = filter.arity() + 1;
        let sql = format!(
            "{} WHERE {} ORDER BY {} LIMIT ${} OFFSET ${}",
            QUOTE_SELECT,
            filter.where_clause(),
            order_by,
            next,
            next + 1
        );
        let rows = filter
            .bind_rows(sqlx::query_as::<_, QuoteRow>(&sql))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        self.attach_coverage(rows).await
    }

    /// Counts quotes matching `filter`
    pub async fn count_where(&self, filter: QuoteFilter) -> Result<i64, DatabaseError> {
        let sql = format!("{} WHERE {}", QUOTE_COUNT, filter.where_clause());
        let count = filter
            .bind_count(sqlx::query_scalar::<_, i64>(&sql))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a new quote with its business information and coverage options
    ///
    /// `quote.version` is stored as given.
    pub async fn insert(
        &self,
        quote: &QuoteRow,
        coverage_options: &[CoverageOptionRow],
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO business_information (
                id, name, business_type, industry, state, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(quote.business_id)
        .bind(&quote.business_name)
        .bind(&quote.business_type)
        .bind(&quote.industry)
        .bind(&quote.state)
        .bind(quote.business_created_at)
        .bind(quote.business_updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, quote_number, business_information_id, total_premium,
                risk_rating, underwriter_notes, status, valid_until,
                version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(quote.id)
        .bind(&quote.quote_number)
        .bind(quote.business_id)
        .bind(quote.total_premium)
        .bind(&quote.risk_rating)
        .bind(&quote.underwriter_notes)
        .bind(&quote.status)
        .bind(quote.valid_until)
        .bind(quote.version)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&mut *tx)
        .await?;

        upsert_coverage(&mut tx, coverage_options).await?;

        tx.commit().await?;

        debug!(quote_id = %quote.id, "Inserted quote");
        Ok(())
    }

    /// Updates a quote if its stored version equals `expected_version`
    ///
    /// The stored version becomes `quote.version`. Coverage options not in
    /// `coverage_options` are deleted.
    ///
    /// # Errors
    ///
    /// - `StaleVersion` if the quote exists with a different version
    /// - `NotFound` if the quote does not exist
    pub async fn update(
        &self,
        quote: &QuoteRow,
        coverage_options: &[CoverageOptionRow],
        expected_version: i64,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE quotes SET
                quote_number = $2,
                total_premium = $3,
                risk_rating = $4,
                underwriter_notes = $5,
                status = $6,
                valid_until = $7,
                version = $8,
                updated_at = $9
            WHERE id = $1 AND version = $10
            "#,
        )
        .bind(quote.id)
        .bind(&quote.quote_number)
        .bind(quote.total_premium)
        .bind(&quote.risk_rating)
        .bind(&quote.underwriter_notes)
        .bind(&quote.status)
        .bind(quote.valid_until)
        .bind(quote.version)
        .bind(quote.updated_at)
        .bind(expected_version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM quotes WHERE id = $1)")
                .bind(quote.id)
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(if exists {
                DatabaseError::StaleVersion {
                    entity: "Quote",
                    id: quote.id.to_string(),
                    expected_version,
                }
            } else {
                DatabaseError::not_found("Quote", quote.id)
            });
        }

        sqlx::query(
            r#"
            UPDATE business_information SET
                name = $2,
                business_type = $3,
                industry = $4,
                state = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(quote.business_id)
        .bind(&quote.business_name)
        .bind(&quote.business_type)
        .bind(&quote.industry)
        .bind(&quote.state)
        .bind(quote.business_updated_at)
        .execute(&mut *tx)
        .await?;

        let kept: Vec<Uuid> = coverage_options.iter().map(|option| option.id).collect();
        let removed = sqlx::query("DELETE FROM coverage_options WHERE quote_id = $1 AND NOT (id = ANY($2))")
            .bind(quote.id)
            .bind(&kept)
            .execute(&mut *tx)
            .await?;

        upsert_coverage(&mut tx, coverage_options).await?;

        tx.commit().await?;

        debug!(
            quote_id = %quote.id,
            version = quote.version,
            orphans_removed = removed.rows_affected(),
            "Updated quote"
        );
        Ok(())
    }

    /// Deletes a quote with its coverage options and business information
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no quote has the given ID
    pub async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM coverage_options WHERE quote_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let business_id = sqlx::query_scalar::<_, Uuid>(
            "DELETE FROM quotes WHERE id = $1 RETURNING business_information_id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(business_id) = business_id else {
            tx.rollback().await?;
            return Err(DatabaseError::not_found("Quote", id));
        };

        sqlx::query("DELETE FROM business_information WHERE id = $1")
            .bind(business_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(quote_id = %id, "Deleted quote");
        Ok(())
    }

    async fn attach_coverage(&self, rows: Vec<QuoteRow>) -> Result<Vec<QuoteWithCoverage>, DatabaseError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let options = sqlx::query_as::<_, CoverageOptionRow>(
            r#"
            SELECT
                id, quote_id, position, name, coverage_type, premium,
                description, is_active, is_selected, created_at, updated_at
            FROM coverage_options
            WHERE quote_id = ANY($1)
            ORDER BY quote_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_quote: HashMap<Uuid, Vec<CoverageOptionRow>> = HashMap::new();
        for option in options {
            by_quote.entry(option.quote_id).or_default().push(option);
        }

        Ok(rows
            .into_iter()
            .map(|quote| QuoteWithCoverage {
                coverage_options: by_quote.remove(&quote.id).unwrap_or_default(),
                quote,
            })
            .collect())
    }
}

async fn upsert_coverage(
    tx: &mut Transaction<'_, Postgres>,
    coverage_options: &[CoverageOptionRow],
) -> Result<(), DatabaseError> {
    for option in coverage_options {
        sqlx::query(
            r#"
            INSERT INTO coverage_options (
                id, quote_id, position, name, coverage_type, premium,
                description, is_active, is_selected, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO UPDATE SET
                position = EXCLUDED.position,
                name = EXCLUDED.name,
                premium = EXCLUDED.premium,
                description = EXCLUDED.description,
                is_active = EXCLUDED.is_active,
                is_selected = EXCLUDED.is_selected,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(option.id)
        .bind(option.quote_id)
        .bind(option.position)
        .bind(&option.name)
        .bind(&option.coverage_type)
        .bind(option.premium)
        .bind(&option.description)
        .bind(option.is_active)
        .bind(option.is_selected)
        .bind(option.created_at)
        .bind(option.updated_at)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
