//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating quote inputs that satisfy the
//! field validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_quote::{
    BusinessInformationInput, BusinessType, CoverageOptionInput, CoverageType, Industry, NewQuote,
    QuoteStatus,
};

/// Strategy for any quote status
pub fn status_strategy() -> impl Strategy<Value = QuoteStatus> {
    prop::sample::select(QuoteStatus::ALL.to_vec())
}

/// Strategy for any coverage type
pub fn coverage_type_strategy() -> impl Strategy<Value = CoverageType> {
    prop::sample::select(CoverageType::ALL.to_vec())
}

/// Strategy for positive premiums with two decimal places (0.01 to 99,999.99)
pub fn premium_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for two-letter state codes
pub fn state_code_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2}"
}

/// Strategy for valid business information
pub fn business_strategy() -> impl Strategy<Value = BusinessInformationInput> {
    (
        "[A-Za-z][A-Za-z ]{1,40}[A-Za-z]",
        prop::sample::select(BusinessType::ALL.to_vec()),
        prop::sample::select(Industry::ALL.to_vec()),
        state_code_strategy(),
    )
        .prop_map(|(name, business_type, industry, state)| BusinessInformationInput {
            name,
            business_type,
            industry,
            state,
        })
}

/// Strategy for a valid coverage option input
pub fn coverage_option_strategy() -> impl Strategy<Value = CoverageOptionInput> {
    (coverage_type_strategy(), premium_strategy(), any::<bool>(), any::<bool>()).prop_map(
        |(coverage_type, premium, is_selected, is_active)| CoverageOptionInput {
            name: coverage_type.display_name().to_string(),
            coverage_type,
            premium,
            description: None,
            is_active,
            is_selected,
        },
    )
}

/// Strategy for a valid create input with up to `max_options` coverage options
pub fn new_quote_strategy(max_options: usize) -> impl Strategy<Value = NewQuote> {
    (
        business_strategy(),
        prop::collection::vec(coverage_option_strategy(), 0..=max_options),
    )
        .prop_map(|(business_information, coverage_options)| NewQuote {
            business_information,
            coverage_options,
            risk_rating: None,
            underwriter_notes: None,
        })
}
