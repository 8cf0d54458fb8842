//! Engine settings supplied by configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Tunables for quote creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Length of a new quote's validity window in days
    pub validity_days: u32,
    /// Leading segment of generated quote numbers
    pub number_prefix: String,
    /// Upper bound on quote-number generation attempts
    pub max_number_attempts: u32,
}

impl QuoteSettings {
    /// Validity window as a duration
    pub fn validity(&self) -> Duration {
        Duration::days(i64::from(self.validity_days))
    }
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            validity_days: 30,
            number_prefix: "IQ".to_string(),
            max_number_attempts: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = QuoteSettings::default();
        assert_eq!(settings.validity(), Duration::days(30));
        assert_eq!(settings.number_prefix, "IQ");
        assert_eq!(settings.max_number_attempts, 10);
    }
}
