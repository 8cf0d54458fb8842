//! Quote domain errors
//!
//! This module defines all error types that can occur within the
//! quote lifecycle engine.

use thiserror::Error;

use core_kernel::{PortError, QuoteId};

use crate::quote::QuoteStatus;

/// Errors that can occur in the quote domain
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Referenced quote does not exist
    #[error("Quote not found with id: {id}")]
    NotFound {
        id: String,
    },

    /// Operation not permitted in the quote's current status
    #[error("{0}")]
    InvalidState(String),

    /// Input failed validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Every generated quote number collided with an existing one
    #[error("Unable to generate a unique quote number after {attempts} attempts")]
    QuoteNumberGeneration {
        attempts: u32,
    },

    /// The persistence port failed
    #[error(transparent)]
    Port(#[from] PortError),
}

impl QuoteError {
    /// Creates a not found error for a quote identifier
    pub fn not_found(id: QuoteId) -> Self {
        QuoteError::NotFound {
            id: id.as_uuid().to_string(),
        }
    }

    /// Creates an invalid state error with a verbatim message
    pub fn invalid_state(message: impl Into<String>) -> Self {
        QuoteError::InvalidState(message.into())
    }

    /// Creates the error for a transition outside the allowed table
    pub fn invalid_transition(from: QuoteStatus, to: QuoteStatus) -> Self {
        QuoteError::InvalidState(format!(
            "Invalid status transition from {} to {}",
            from, to
        ))
    }

    /// Creates a validation error from a single message
    pub fn validation(message: impl Into<String>) -> Self {
        QuoteError::Validation(vec![message.into()])
    }

    /// Returns true if the quote was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, QuoteError::NotFound { .. })
    }
}
