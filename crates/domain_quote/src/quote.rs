//! Quote Aggregate Root
//!
//! The Quote aggregate is the consistency boundary for a commercial insurance
//! quote: one business, its coverage options, and the approval workflow.
//!
//! # Invariants
//!
//! - `total_premium` equals the sum of premiums of selected coverage options;
//!   it is recomputed on every mutation and on restore
//! - Status changes follow the transition table of [`QuoteStatus`]
//! - Approved and rejected quotes cannot be edited
//! - Only draft quotes can be deleted

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::QuoteId;

use crate::business::BusinessInformation;
use crate::commands::{NewQuote, QuoteUpdate};
use crate::coverage::{default_coverage_options, selected_premium_total, CoverageOption};
use crate::error::QuoteError;
use crate::events::QuoteEvent;

/// Quote lifecycle states
///
/// ```text
/// DRAFT <-> SAVED -> SUBMITTED -> APPROVED
///                              \-> REJECTED
/// EXPIRED is reached by time only
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Draft,
    Saved,
    Submitted,
    Approved,
    Rejected,
    Expired,
}

impl QuoteStatus {
    /// All statuses in lifecycle order
    pub const ALL: [QuoteStatus; 6] = [
        QuoteStatus::Draft,
        QuoteStatus::Saved,
        QuoteStatus::Submitted,
        QuoteStatus::Approved,
        QuoteStatus::Rejected,
        QuoteStatus::Expired,
    ];

    /// Stable storage and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "DRAFT",
            QuoteStatus::Saved => "SAVED",
            QuoteStatus::Submitted => "SUBMITTED",
            QuoteStatus::Approved => "APPROVED",
            QuoteStatus::Rejected => "REJECTED",
            QuoteStatus::Expired => "EXPIRED",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "Draft",
            QuoteStatus::Saved => "Saved",
            QuoteStatus::Submitted => "Submitted",
            QuoteStatus::Approved => "Approved",
            QuoteStatus::Rejected => "Rejected",
            QuoteStatus::Expired => "Expired",
        }
    }

    /// Statuses reachable from this one by an explicit transition
    pub fn allowed_transitions(&self) -> &'static [QuoteStatus] {
        match self {
            QuoteStatus::Draft => &[QuoteStatus::Saved],
            QuoteStatus::Saved => &[QuoteStatus::Submitted, QuoteStatus::Draft],
            QuoteStatus::Submitted => &[QuoteStatus::Approved, QuoteStatus::Rejected],
            QuoteStatus::Approved | QuoteStatus::Rejected | QuoteStatus::Expired => &[],
        }
    }

    /// Checks the transition table
    pub fn can_transition_to(&self, target: QuoteStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Returns true for statuses whose quotes can no longer be edited
    pub fn is_locked_for_edit(&self) -> bool {
        matches!(self, QuoteStatus::Approved | QuoteStatus::Rejected)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuoteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown quote status: {}", s))
    }
}

/// Flat, persistence-facing view of a quote
///
/// Adapters load rows into a `QuoteRecord` and call [`Quote::restore`];
/// they persist from [`Quote::to_record`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRecord {
    pub id: QuoteId,
    pub quote_number: String,
    pub business_information: BusinessInformation,
    pub coverage_options: Vec<CoverageOption>,
    pub total_premium: Decimal,
    pub risk_rating: Option<String>,
    pub underwriter_notes: Option<String>,
    pub status: QuoteStatus,
    pub valid_until: DateTime<Utc>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The Quote aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Internal identifier
    id: QuoteId,
    /// Human-facing unique number
    quote_number: String,
    /// The insured business
    business_information: BusinessInformation,
    /// Priced line items
    coverage_options: Vec<CoverageOption>,
    /// Sum of selected option premiums
    total_premium: Decimal,
    /// Free-text risk rating
    risk_rating: Option<String>,
    /// Free-text underwriter notes
    underwriter_notes: Option<String>,
    /// Current lifecycle state
    status: QuoteStatus,
    /// End of the validity window
    valid_until: DateTime<Utc>,
    /// Version for optimistic concurrency
    version: i64,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
    /// Domain events awaiting publication
    #[serde(skip)]
    events: Vec<QuoteEvent>,
}

impl Quote {
    /// Creates a new draft quote
    ///
    /// # Arguments
    ///
    /// * `input` - Business details, optional coverage and underwriting fields
    /// * `quote_number` - A number already checked for uniqueness
    /// * `validity` - Length of the validity window
    /// * `now` - Creation timestamp
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let quote = Quote::create(input, "IQ-20240101120000-0042".into(), Duration::days(30), now);
    /// assert_eq!(quote.status(), QuoteStatus::Draft);
    /// ```
    pub fn create(
        input: NewQuote,
        quote_number: String,
        validity: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let coverage_options = if input.coverage_options.is_empty() {
            default_coverage_options(now)
        } else {
            input
                .coverage_options
                .into_iter()
                .map(|option| CoverageOption::from_input(option, now))
                .collect()
        };

        let mut quote = Self {
            id: QuoteId::new(),
            quote_number,
            business_information: BusinessInformation::from_input(input.business_information, now),
            coverage_options,
            total_premium: Decimal::ZERO,
            risk_rating: input.risk_rating,
            underwriter_notes: input.underwriter_notes,
            status: QuoteStatus::Draft,
            valid_until: now + validity,
            version: 0,
            created_at: now,
            updated_at: now,
            events: Vec::new(),
        };
        quote.recalculate_premium();

        quote.events.push(QuoteEvent::QuoteCreated {
            quote_id: quote.id,
            quote_number: quote.quote_number.clone(),
            timestamp: now,
        });

        quote
    }

    /// Rebuilds a quote from its stored form, recomputing the total premium
    pub fn restore(record: QuoteRecord) -> Self {
        let mut quote = Self {
            id: record.id,
            quote_number: record.quote_number,
            business_information: record.business_information,
            coverage_options: record.coverage_options,
            total_premium: record.total_premium,
            risk_rating: record.risk_rating,
            underwriter_notes: record.underwriter_notes,
            status: record.status,
            valid_until: record.valid_until,
            version: record.version,
            created_at: record.created_at,
            updated_at: record.updated_at,
            events: Vec::new(),
        };
        quote.recalculate_premium();
        quote
    }

    /// Returns the stored form of this quote
    pub fn to_record(&self) -> QuoteRecord {
        QuoteRecord {
            id: self.id,
            quote_number: self.quote_number.clone(),
            business_information: self.business_information.clone(),
            coverage_options: self.coverage_options.clone(),
            total_premium: self.total_premium,
            risk_rating: self.risk_rating.clone(),
            underwriter_notes: self.underwriter_notes.clone(),
            status: self.status,
            valid_until: self.valid_until,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Returns the quote ID
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Returns the quote number
    pub fn quote_number(&self) -> &str {
        &self.quote_number
    }

    /// Returns the business information
    pub fn business_information(&self) -> &BusinessInformation {
        &self.business_information
    }

    /// Returns the coverage options
    pub fn coverage_options(&self) -> &[CoverageOption] {
        &self.coverage_options
    }

    /// Returns the total premium of selected options
    pub fn total_premium(&self) -> Decimal {
        self.total_premium
    }

    /// Returns the risk rating
    pub fn risk_rating(&self) -> Option<&str> {
        self.risk_rating.as_deref()
    }

    /// Returns the underwriter notes
    pub fn underwriter_notes(&self) -> Option<&str> {
        self.underwriter_notes.as_deref()
    }

    /// Returns the current status
    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    /// Returns the end of the validity window
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    /// Returns the optimistic concurrency version
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<QuoteEvent> {
        std::mem::take(&mut self.events)
    }

    /// Checks whether the validity window has passed
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    /// Checks whether at least one coverage option is selected
    pub fn has_selected_coverage(&self) -> bool {
        self.coverage_options.iter().any(|option| option.is_selected)
    }

    /// Sum of selected premiums, computed from the options
    pub fn calculate_premium(&self) -> Decimal {
        selected_premium_total(&self.coverage_options)
    }

    /// Recomputes and stores the total premium
    pub fn recalculate_premium(&mut self) -> Decimal {
        self.total_premium = self.calculate_premium();
        self.total_premium
    }

    /// Applies a caller update
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the quote is approved or rejected
    /// - `InvalidState` if a differing requested status is not an allowed transition
    ///
    /// Nothing is modified when an error is returned.
    pub fn apply_update(&mut self, update: QuoteUpdate, now: DateTime<Utc>) -> Result<(), QuoteError> {
        if self.status.is_locked_for_edit() {
            return Err(QuoteError::invalid_state(format!(
                "Cannot update quote in {} status",
                self.status
            )));
        }

        let target = update.status.filter(|status| *status != self.status);
        if let Some(target) = target {
            self.ensure_transition(target)?;
        }

        self.business_information
            .overwrite(update.business_information, now);

        for incoming in &update.coverage_options {
            if let Some(existing) = self
                .coverage_options
                .iter_mut()
                .find(|option| option.coverage_type == incoming.coverage_type)
            {
                existing.merge(incoming, now);
            }
        }

        self.risk_rating = update.risk_rating;
        self.underwriter_notes = update.underwriter_notes;

        if let Some(target) = target {
            self.set_status(target, now);
        }

        self.recalculate_premium();
        self.updated_at = now;
        self.events.push(QuoteEvent::QuoteUpdated {
            quote_id: self.id,
            timestamp: now,
        });

        Ok(())
    }

    /// Moves to `target` if the transition table allows it
    ///
    /// # Errors
    ///
    /// Returns `InvalidState("Invalid status transition from {from} to {to}")`
    pub fn transition_to(&mut self, target: QuoteStatus, now: DateTime<Utc>) -> Result<(), QuoteError> {
        self.ensure_transition(target)?;
        self.set_status(target, now);
        Ok(())
    }

    /// Submits a saved quote for underwriting
    ///
    /// # Errors
    ///
    /// - `InvalidState("Only saved quotes can be submitted")`
    /// - `InvalidState("Quote must have at least one selected coverage option")`
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        if self.status != QuoteStatus::Saved {
            return Err(QuoteError::invalid_state("Only saved quotes can be submitted"));
        }
        if !self.has_selected_coverage() {
            return Err(QuoteError::invalid_state(
                "Quote must have at least one selected coverage option",
            ));
        }
        self.set_status(QuoteStatus::Submitted, now);
        Ok(())
    }

    /// Approves a submitted quote
    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        if self.status != QuoteStatus::Submitted {
            return Err(QuoteError::invalid_state("Only submitted quotes can be approved"));
        }
        self.set_status(QuoteStatus::Approved, now);
        Ok(())
    }

    /// Rejects a submitted quote, appending the reason to the underwriter notes
    ///
    /// Absent notes are treated as empty, so the result always ends with
    /// `"\nRejection reason: {reason}"`.
    pub fn reject(&mut self, reason: &str, now: DateTime<Utc>) -> Result<(), QuoteError> {
        if self.status != QuoteStatus::Submitted {
            return Err(QuoteError::invalid_state("Only submitted quotes can be rejected"));
        }
        let existing = self.underwriter_notes.as_deref().unwrap_or("");
        self.underwriter_notes = Some(format!("{}\nRejection reason: {}", existing, reason));
        self.set_status(QuoteStatus::Rejected, now);
        Ok(())
    }

    /// Marks a draft quote for deletion
    ///
    /// # Errors
    ///
    /// Returns `InvalidState("Only draft quotes can be deleted")` unless DRAFT
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        if self.status != QuoteStatus::Draft {
            return Err(QuoteError::invalid_state("Only draft quotes can be deleted"));
        }
        self.events.push(QuoteEvent::QuoteDeleted {
            quote_id: self.id,
            timestamp: now,
        });
        Ok(())
    }

    fn ensure_transition(&self, target: QuoteStatus) -> Result<(), QuoteError> {
        if self.status.can_transition_to(target) {
            Ok(())
        } else {
            Err(QuoteError::invalid_transition(self.status, target))
        }
    }

    fn set_status(&mut self, target: QuoteStatus, now: DateTime<Utc>) {
        let from = self.status;
        self.status = target;
        self.updated_at = now;
        self.events.push(QuoteEvent::StatusChanged {
            quote_id: self.id,
            from,
            to: target,
            timestamp: now,
        });
    }
}
