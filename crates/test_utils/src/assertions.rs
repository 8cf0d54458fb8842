//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for quote types that give more
//! meaningful failure messages than standard assertions.

use rust_decimal::Decimal;

use domain_quote::{Quote, QuoteError};

/// Asserts that a quote's total equals the sum of its selected premiums
pub fn assert_premium_consistent(quote: &Quote) {
    let expected: Decimal = quote
        .coverage_options()
        .iter()
        .filter(|option| option.is_selected)
        .map(|option| option.premium)
        .sum();
    assert_eq!(
        quote.total_premium(),
        expected,
        "Total premium {} does not match selected premiums {} on quote {}",
        quote.total_premium(),
        expected,
        quote.quote_number()
    );
}

/// Asserts that a number has the form `{prefix}-{14 digits}-{4 digits}`
pub fn assert_quote_number_format(number: &str, prefix: &str) {
    let parts: Vec<&str> = number.split('-').collect();
    let well_formed = parts.len() == 3
        && parts[0] == prefix
        && parts[1].len() == 14
        && parts[1].bytes().all(|b| b.is_ascii_digit())
        && parts[2].len() == 4
        && parts[2].bytes().all(|b| b.is_ascii_digit());
    assert!(
        well_formed,
        "Quote number '{}' does not match {}-yyyyMMddHHmmss-nnnn",
        number,
        prefix
    );
}

/// Asserts that an error is `InvalidState` with exactly `message`
pub fn assert_invalid_state(error: &QuoteError, message: &str) {
    match error {
        QuoteError::InvalidState(actual) => assert_eq!(actual, message),
        other => panic!("Expected InvalidState(\"{}\"), got {:?}", message, other),
    }
}
