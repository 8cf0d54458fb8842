//! Quote number generation
//!
//! Numbers have the form `{prefix}-{yyyyMMddHHmmss}-{nnnn}`: the UTC
//! timestamp of generation followed by a zero-padded random suffix in
//! `0000..=9999`. The timestamp is read once per generation; only the suffix
//! is redrawn on collision.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use core_kernel::{Clock, RandomSource};

use crate::error::QuoteError;
use crate::ports::QuotePort;

/// Exclusive upper bound of the random suffix
const SUFFIX_RANGE: u32 = 10_000;

/// Formats a quote number from its parts
pub fn format_number(prefix: &str, timestamp: DateTime<Utc>, suffix: u32) -> String {
    format!("{}-{}-{:04}", prefix, timestamp.format("%Y%m%d%H%M%S"), suffix)
}

/// Generates quote numbers that are unique in the store
pub struct QuoteNumberGenerator {
    prefix: String,
    max_attempts: u32,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl QuoteNumberGenerator {
    /// Creates a generator
    ///
    /// # Arguments
    ///
    /// * `prefix` - Leading segment, e.g. `"IQ"`
    /// * `max_attempts` - Attempts before giving up; at least one is always made
    /// * `clock` - Source of the timestamp segment
    /// * `random` - Source of the suffix
    pub fn new(
        prefix: impl Into<String>,
        max_attempts: u32,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            max_attempts: max_attempts.max(1),
            clock,
            random,
        }
    }

    /// Returns the configured prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Produces a number not yet present in `port`
    ///
    /// # Errors
    ///
    /// - `QuoteNumberGeneration` when every attempt collided
    /// - `Port` if the uniqueness lookup fails
    pub async fn generate(&self, port: &dyn QuotePort) -> Result<String, QuoteError> {
        let timestamp = self.clock.now();

        for attempt in 1..=self.max_attempts {
            let candidate = format_number(&self.prefix, timestamp, self.random.next_below(SUFFIX_RANGE));
            if !port.exists_by_quote_number(&candidate).await? {
                debug!(quote_number = %candidate, attempt, "Generated quote number");
                return Ok(candidate);
            }
            warn!(quote_number = %candidate, attempt, "Quote number collision, retrying");
        }

        Err(QuoteError::QuoteNumberGeneration {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_pads_suffix() {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(format_number("IQ", timestamp, 42), "IQ-20240307090502-0042");
        assert_eq!(format_number("CQ", timestamp, 9999), "CQ-20240307090502-9999");
    }
}
