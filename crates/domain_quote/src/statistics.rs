//! Aggregate quote statistics

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::quote::QuoteStatus;

/// Portfolio-wide counts and premium totals
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteStatistics {
    pub total_quotes: u64,
    pub draft_quotes: u64,
    pub saved_quotes: u64,
    pub submitted_quotes: u64,
    pub approved_quotes: u64,
    pub rejected_quotes: u64,
    pub expired_quotes: u64,
    pub total_premium_value: Decimal,
    pub average_premium: Decimal,
}

impl QuoteStatistics {
    /// Builds statistics from per-status counts and the premium sum
    ///
    /// The average is `total_premium_value / total_quotes` rounded to two
    /// places, half away from zero, or zero when there are no quotes.
    pub fn aggregate(
        total_quotes: u64,
        status_counts: &[(QuoteStatus, u64)],
        total_premium_value: Decimal,
    ) -> Self {
        let count_of = |status: QuoteStatus| {
            status_counts
                .iter()
                .filter(|(s, _)| *s == status)
                .map(|(_, count)| *count)
                .sum()
        };

        let average_premium = if total_quotes == 0 {
            Decimal::ZERO
        } else {
            (total_premium_value / Decimal::from(total_quotes))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            total_quotes,
            draft_quotes: count_of(QuoteStatus::Draft),
            saved_quotes: count_of(QuoteStatus::Saved),
            submitted_quotes: count_of(QuoteStatus::Submitted),
            approved_quotes: count_of(QuoteStatus::Approved),
            rejected_quotes: count_of(QuoteStatus::Rejected),
            expired_quotes: count_of(QuoteStatus::Expired),
            total_premium_value,
            average_premium,
        }
    }
}
