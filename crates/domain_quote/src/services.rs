//! Quote lifecycle service
//!
//! [`QuoteService`] orchestrates every quote operation: it loads the
//! aggregate through the [`QuotePort`], lets the aggregate enforce its
//! invariants, then persists with a single `save` or `delete` call. All checks
//! run before that call, so a failed operation never writes anything.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use core_kernel::{Clock, Page, PageRequest, QuoteId, RandomSource, SystemClock, StdRandom};

use crate::business::{BusinessType, Industry};
use crate::commands::{NewQuote, QuoteUpdate};
use crate::error::QuoteError;
use crate::events::QuoteEvent;
use crate::numbering::QuoteNumberGenerator;
use crate::ports::{QuotePort, QuoteSort};
use crate::quote::{Quote, QuoteStatus};
use crate::settings::QuoteSettings;
use crate::statistics::QuoteStatistics;
use crate::validation::QuoteValidator;

/// Service implementing the quote lifecycle
pub struct QuoteService {
    port: Arc<dyn QuotePort>,
    clock: Arc<dyn Clock>,
    numbers: QuoteNumberGenerator,
    settings: QuoteSettings,
}

impl QuoteService {
    /// Creates a service with explicit time and randomness sources
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let service = QuoteService::new(port, Arc::new(SystemClock), Arc::new(StdRandom::new()), settings);
    /// let quote = service.create(input).await?;
    /// ```
    pub fn new(
        port: Arc<dyn QuotePort>,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
        settings: QuoteSettings,
    ) -> Self {
        let numbers = QuoteNumberGenerator::new(
            settings.number_prefix.clone(),
            settings.max_number_attempts,
            Arc::clone(&clock),
            random,
        );
        Self {
            port,
            clock,
            numbers,
            settings,
        }
    }

    /// Creates a service on the system clock and an entropy-seeded generator
    pub fn with_system_sources(port: Arc<dyn QuotePort>, settings: QuoteSettings) -> Self {
        Self::new(port, Arc::new(SystemClock), Arc::new(StdRandom::new()), settings)
    }

    /// Returns the active settings
    pub fn settings(&self) -> &QuoteSettings {
        &self.settings
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Creates a draft quote with a fresh quote number
    ///
    /// # Errors
    ///
    /// - `Validation` if the input breaks a field rule
    /// - `QuoteNumberGeneration` if no unique number was found
    #[instrument(skip(self, input), fields(business = %input.business_information.name))]
    pub async fn create(&self, input: NewQuote) -> Result<Quote, QuoteError> {
        QuoteValidator::validate_new(&input).into_result()?;
        info!("Creating new quote for business: {}", input.business_information.name);

        let quote_number = self.numbers.generate(self.port.as_ref()).await?;
        let quote = Quote::create(input, quote_number, self.settings.validity(), self.clock.now());
        let stored = self.persist(quote).await?;

        info!(
            "Created quote with ID: {} and number: {}",
            stored.id(),
            stored.quote_number()
        );
        Ok(stored)
    }

    /// Applies an update to an existing quote
    ///
    /// # Errors
    ///
    /// - `NotFound` if the quote does not exist
    /// - `Validation` if the input breaks a field rule
    /// - `InvalidState` if the quote is locked or the status change is not allowed
    #[instrument(skip(self, update), fields(quote_id = %id))]
    pub async fn update(&self, id: QuoteId, update: QuoteUpdate) -> Result<Quote, QuoteError> {
        QuoteValidator::validate_update(&update).into_result()?;
        let mut quote = self.load(id).await?;
        quote.apply_update(update, self.clock.now())?;
        self.persist(quote).await
    }

    /// Deletes a draft quote with its business information and coverage options
    #[instrument(skip(self), fields(quote_id = %id))]
    pub async fn delete(&self, id: QuoteId) -> Result<(), QuoteError> {
        let mut quote = self.load(id).await?;
        quote.mark_deleted(self.clock.now())?;
        self.port.delete(&quote).await?;
        Self::publish(quote.take_events());
        Ok(())
    }

    /// Submits a saved quote that has a selected coverage option
    #[instrument(skip(self), fields(quote_id = %id))]
    pub async fn submit(&self, id: QuoteId) -> Result<Quote, QuoteError> {
        let mut quote = self.load(id).await?;
        quote.submit(self.clock.now())?;
        self.persist(quote).await
    }

    /// Approves a submitted quote
    #[instrument(skip(self), fields(quote_id = %id))]
    pub async fn approve(&self, id: QuoteId) -> Result<Quote, QuoteError> {
        let mut quote = self.load(id).await?;
        quote.approve(self.clock.now())?;
        self.persist(quote).await
    }

    /// Rejects a submitted quote, recording the reason in the underwriter notes
    #[instrument(skip(self, reason), fields(quote_id = %id))]
    pub async fn reject(&self, id: QuoteId, reason: &str) -> Result<Quote, QuoteError> {
        let mut quote = self.load(id).await?;
        quote.reject(reason, self.clock.now())?;
        self.persist(quote).await
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Recomputes the total premium of a quote without persisting anything
    pub async fn calculate_premium(&self, id: QuoteId) -> Result<Decimal, QuoteError> {
        let mut quote = self.load(id).await?;
        Ok(quote.recalculate_premium())
    }

    /// Fetches a quote by ID
    pub async fn get_by_id(&self, id: QuoteId) -> Result<Quote, QuoteError> {
        self.load(id).await
    }

    /// Fetches a quote by its number
    pub async fn get_by_number(&self, quote_number: &str) -> Result<Option<Quote>, QuoteError> {
        Ok(self.port.find_by_quote_number(quote_number).await?)
    }

    /// Lists quotes one page at a time
    pub async fn list(&self, request: PageRequest, sort: QuoteSort) -> Result<Page<Quote>, QuoteError> {
        Ok(self.port.find_page(request, sort).await?)
    }

    /// Lists quotes in a status
    pub async fn list_by_status(&self, status: QuoteStatus) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.port.find_by_status(status).await?)
    }

    /// Searches business names case-insensitively
    pub async fn search_by_business_name(
        &self,
        fragment: &str,
        request: PageRequest,
        sort: QuoteSort,
    ) -> Result<Page<Quote>, QuoteError> {
        Ok(self
            .port
            .search_by_business_name(fragment.trim(), request, sort)
            .await?)
    }

    /// Lists quotes for businesses in a state
    pub async fn list_by_state(&self, state: &str) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.port.find_by_state(state).await?)
    }

    /// Lists quotes created within `[start, end]`
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `start` is after `end`
    pub async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Quote>, QuoteError> {
        if start > end {
            return Err(QuoteError::validation("Start date must not be after end date"));
        }
        Ok(self.port.find_created_between(start, end).await?)
    }

    /// Lists quotes whose validity window has passed
    pub async fn list_expired(&self) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.port.find_expired(self.clock.now()).await?)
    }

    /// Lists quotes for a business type
    pub async fn list_by_business_type(&self, business_type: BusinessType) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.port.find_by_business_type(business_type).await?)
    }

    /// Lists quotes for an industry
    pub async fn list_by_industry(&self, industry: Industry) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.port.find_by_industry(industry).await?)
    }

    /// Lists quotes whose total premium exceeds `min_premium`
    pub async fn list_with_premium_above(&self, min_premium: Decimal) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.port.find_by_total_premium_above(min_premium).await?)
    }

    /// Lists drafts created more than `older_than_days` days ago
    pub async fn list_stale_drafts(&self, older_than_days: u32) -> Result<Vec<Quote>, QuoteError> {
        let cutoff = self.clock.now() - Duration::days(i64::from(older_than_days));
        Ok(self.port.find_stale_drafts(cutoff).await?)
    }

    /// Returns true if no stored quote carries `quote_number`
    pub async fn is_quote_number_unique(&self, quote_number: &str) -> Result<bool, QuoteError> {
        Ok(!self.port.exists_by_quote_number(quote_number).await?)
    }

    /// Computes portfolio statistics
    #[instrument(skip(self))]
    pub async fn get_statistics(&self) -> Result<QuoteStatistics, QuoteError> {
        let total_quotes = self.port.count().await?;

        let mut status_counts = Vec::with_capacity(QuoteStatus::ALL.len());
        for status in QuoteStatus::ALL {
            status_counts.push((status, self.port.count_by_status(status).await?));
        }

        let total_premium_value: Decimal = self
            .port
            .find_all()
            .await?
            .iter()
            .map(Quote::total_premium)
            .sum();

        Ok(QuoteStatistics::aggregate(total_quotes, &status_counts, total_premium_value))
    }

    async fn load(&self, id: QuoteId) -> Result<Quote, QuoteError> {
        self.port
            .find_by_id(id)
            .await?
            .ok_or_else(|| QuoteError::not_found(id))
    }

    async fn persist(&self, mut quote: Quote) -> Result<Quote, QuoteError> {
        let events = quote.take_events();
        let stored = self.port.save(&quote).await?;
        Self::publish(events);
        Ok(stored)
    }

    fn publish(events: Vec<QuoteEvent>) {
        for event in events {
            match &event {
                QuoteEvent::StatusChanged { quote_id, from, to, .. } => {
                    info!(event = event.name(), quote_id = %quote_id, from = %from, to = %to, "Quote status changed");
                }
                _ => {
                    info!(event = event.name(), quote_id = %event.quote_id(), "Quote event");
                }
            }
        }
    }
}
