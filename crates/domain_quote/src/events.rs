//! Domain events for the quote aggregate
//!
//! Events are recorded by [`Quote`](crate::Quote) as it changes and drained by
//! the lifecycle engine once the change has been persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::QuoteId;

use crate::quote::QuoteStatus;

/// Domain events emitted by the Quote aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteEvent {
    /// A draft quote was created
    QuoteCreated {
        quote_id: QuoteId,
        quote_number: String,
        timestamp: DateTime<Utc>,
    },

    /// Business details, coverage or underwriting fields changed
    QuoteUpdated {
        quote_id: QuoteId,
        timestamp: DateTime<Utc>,
    },

    /// The quote moved along the approval workflow
    StatusChanged {
        quote_id: QuoteId,
        from: QuoteStatus,
        to: QuoteStatus,
        timestamp: DateTime<Utc>,
    },

    /// A draft quote was discarded
    QuoteDeleted {
        quote_id: QuoteId,
        timestamp: DateTime<Utc>,
    },
}

impl QuoteEvent {
    /// Returns the quote this event concerns
    pub fn quote_id(&self) -> QuoteId {
        match self {
            QuoteEvent::QuoteCreated { quote_id, .. }
            | QuoteEvent::QuoteUpdated { quote_id, .. }
            | QuoteEvent::StatusChanged { quote_id, .. }
            | QuoteEvent::QuoteDeleted { quote_id, .. } => *quote_id,
        }
    }

    /// Short event name for logs
    pub fn name(&self) -> &'static str {
        match self {
            QuoteEvent::QuoteCreated { .. } => "quote_created",
            QuoteEvent::QuoteUpdated { .. } => "quote_updated",
            QuoteEvent::StatusChanged { .. } => "status_changed",
            QuoteEvent::QuoteDeleted { .. } => "quote_deleted",
        }
    }
}
