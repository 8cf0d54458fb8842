//! Quote input validation rules
//!
//! The lifecycle engine validates every create and update input before it
//! touches the aggregate, so no partially-applied input is ever persisted.
//!
//! # Validation Rules
//!
//! ## Business Information
//! - Name must not be blank and must be 2-255 characters
//! - State must be a 2-letter uppercase code
//!
//! ## Coverage Options
//! - Name must not be blank
//! - Premium must be greater than zero, with at most 2 decimal places and
//!   no more than 9999999999.99 (the stored `NUMERIC(12,2)` range)
//! - Description is at most 1000 characters
//!
//! ## Underwriting Fields
//! - Risk rating is at most 50 characters
//! - Underwriter notes are at most 2000 characters

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::business::BusinessInformationInput;
use crate::commands::{NewQuote, QuoteUpdate};
use crate::coverage::CoverageOptionInput;
use crate::error::QuoteError;

pub const BUSINESS_NAME_MIN_LEN: usize = 2;
pub const BUSINESS_NAME_MAX_LEN: usize = 255;
pub const COVERAGE_DESCRIPTION_MAX_LEN: usize = 1000;
pub const RISK_RATING_MAX_LEN: usize = 50;
pub const UNDERWRITER_NOTES_MAX_LEN: usize = 2000;
pub const PREMIUM_MAX_SCALE: u32 = 2;
pub const PREMIUM_MAX: Decimal = dec!(9999999999.99);

/// Result of input validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors
    pub errors: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self::default()
    }

    /// Returns true if no rule was violated
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Converts to a `Result`, failing with all collected messages
    pub fn into_result(self) -> Result<(), QuoteError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(QuoteError::Validation(self.errors))
        }
    }
}

/// Returns true for a two-letter uppercase ASCII code
pub fn is_state_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_uppercase())
}

/// Returns the rule a premium violates, if any
///
/// Trailing zeros do not count toward the scale, so `100.500` is accepted.
pub fn premium_violation(premium: Decimal) -> Option<&'static str> {
    if premium <= Decimal::ZERO {
        Some("Premium must be greater than zero")
    } else if premium.normalize().scale() > PREMIUM_MAX_SCALE {
        Some("Premium must have at most 2 decimal places")
    } else if premium > PREMIUM_MAX {
        Some("Premium must not exceed 9999999999.99")
    } else {
        None
    }
}

/// Validator for quote inputs
pub struct QuoteValidator;

impl QuoteValidator {
    /// Validates a create input
    pub fn validate_new(input: &NewQuote) -> ValidationResult {
        let mut result = ValidationResult::ok();
        Self::validate_business(&input.business_information, &mut result);
        Self::validate_coverages(&input.coverage_options, &mut result);
        Self::validate_underwriting(
            input.risk_rating.as_deref(),
            input.underwriter_notes.as_deref(),
            &mut result,
        );
        result
    }

    /// Validates an update input
    pub fn validate_update(input: &QuoteUpdate) -> ValidationResult {
        let mut result = ValidationResult::ok();
        Self::validate_business(&input.business_information, &mut result);
        Self::validate_coverages(&input.coverage_options, &mut result);
        Self::validate_underwriting(
            input.risk_rating.as_deref(),
            input.underwriter_notes.as_deref(),
            &mut result,
        );
        result
    }

    fn validate_business(business: &BusinessInformationInput, result: &mut ValidationResult) {
        let name = business.name.trim();
        if name.is_empty() {
            result.add_error("Business name is required");
        } else {
            let length = name.chars().count();
            if !(BUSINESS_NAME_MIN_LEN..=BUSINESS_NAME_MAX_LEN).contains(&length) {
                result.add_error(format!(
                    "Business name must be between {} and {} characters",
                    BUSINESS_NAME_MIN_LEN, BUSINESS_NAME_MAX_LEN
                ));
            }
        }

        if !is_state_code(&business.state) {
            result.add_error("State must be a 2-letter uppercase code");
        }
    }

    fn validate_coverages(options: &[CoverageOptionInput], result: &mut ValidationResult) {
        for (index, option) in options.iter().enumerate() {
            if option.name.trim().is_empty() {
                result.add_error(format!("coverageOptions[{}]: Coverage name is required", index));
            }
            if let Some(violation) = premium_violation(option.premium) {
                result.add_error(format!("coverageOptions[{}]: {}", index, violation));
            }
            if let Some(description) = &option.description {
                if description.chars().count() > COVERAGE_DESCRIPTION_MAX_LEN {
                    result.add_error(format!(
                        "coverageOptions[{}]: Description must be at most {} characters",
                        index, COVERAGE_DESCRIPTION_MAX_LEN
                    ));
                }
            }
        }
    }

    fn validate_underwriting(
        risk_rating: Option<&str>,
        underwriter_notes: Option<&str>,
        result: &mut ValidationResult,
    ) {
        if risk_rating.is_some_and(|r| r.chars().count() > RISK_RATING_MAX_LEN) {
            result.add_error(format!(
                "Risk rating must be at most {} characters",
                RISK_RATING_MAX_LEN
            ));
        }
        if underwriter_notes.is_some_and(|n| n.chars().count() > UNDERWRITER_NOTES_MAX_LEN) {
            result.add_error(format!(
                "Underwriter notes must be at most {} characters",
                UNDERWRITER_NOTES_MAX_LEN
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::{BusinessType, Industry};
    use crate::coverage::CoverageType;
    use rust_decimal_macros::dec;

    fn valid_input() -> NewQuote {
        NewQuote {
            business_information: BusinessInformationInput {
                name: "Acme LLC".into(),
                business_type: BusinessType::Retail,
                industry: Industry::RetailTrade,
                state: "CA".into(),
            },
            coverage_options: vec![],
            risk_rating: None,
            underwriter_notes: None,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(QuoteValidator::validate_new(&valid_input()).is_valid());
    }

    #[test]
    fn test_state_code() {
        assert!(is_state_code("CA"));
        assert!(!is_state_code("ca"));
        assert!(!is_state_code("CAL"));
        assert!(!is_state_code("C1"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut input = valid_input();
        input.business_information.name = "   ".into();
        let result = QuoteValidator::validate_new(&input);
        assert_eq!(result.errors, vec!["Business name is required".to_string()]);
    }

    #[test]
    fn test_short_name_rejected() {
        let mut input = valid_input();
        input.business_information.name = "A".into();
        assert!(!QuoteValidator::validate_new(&input).is_valid());
    }

    #[test]
    fn test_non_positive_premium_rejected() {
        let mut input = valid_input();
        input.coverage_options.push(CoverageOptionInput {
            name: "GL".into(),
            coverage_type: CoverageType::GeneralLiability,
            premium: dec!(0),
            description: None,
            is_active: true,
            is_selected: true,
        });
        let result = QuoteValidator::validate_new(&input);
        assert!(result.errors[0].contains("Premium must be greater than zero"));
    }

    fn with_premium(premium: Decimal) -> NewQuote {
        let mut input = valid_input();
        input.coverage_options.push(CoverageOptionInput {
            name: "GL".into(),
            coverage_type: CoverageType::GeneralLiability,
            premium,
            description: None,
            is_active: true,
            is_selected: true,
        });
        input
    }

    #[test]
    fn test_sub_cent_premium_rejected() {
        for premium in [dec!(0.001), dec!(100.005)] {
            let result = QuoteValidator::validate_new(&with_premium(premium));
            assert_eq!(
                result.errors,
                vec!["coverageOptions[0]: Premium must have at most 2 decimal places".to_string()]
            );
        }
    }

    #[test]
    fn test_trailing_zeros_do_not_count_as_scale() {
        assert!(QuoteValidator::validate_new(&with_premium(dec!(100.500))).is_valid());
        assert!(QuoteValidator::validate_new(&with_premium(dec!(0.01))).is_valid());
    }

    #[test]
    fn test_premium_above_column_range_rejected() {
        assert!(QuoteValidator::validate_new(&with_premium(PREMIUM_MAX)).is_valid());

        let result = QuoteValidator::validate_new(&with_premium(dec!(10000000000)));
        assert_eq!(
            result.errors,
            vec!["coverageOptions[0]: Premium must not exceed 9999999999.99".to_string()]
        );
    }

    #[test]
    fn test_padded_name_measured_trimmed() {
        let mut input = valid_input();
        input.business_information.name = " A ".into();
        let result = QuoteValidator::validate_new(&input);
        assert_eq!(
            result.errors,
            vec!["Business name must be between 2 and 255 characters".to_string()]
        );
    }

    #[test]
    fn test_errors_accumulate() {
        let mut input = valid_input();
        input.business_information.state = "california".into();
        input.risk_rating = Some("x".repeat(51));
        let result = QuoteValidator::validate_new(&input);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(result.into_result(), Err(QuoteError::Validation(_))));
    }
}
