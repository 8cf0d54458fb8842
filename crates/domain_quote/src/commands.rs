//! Caller inputs to the lifecycle engine

use serde::{Deserialize, Serialize};

use crate::business::BusinessInformationInput;
use crate::coverage::CoverageOptionInput;
use crate::quote::QuoteStatus;

/// Input for creating a quote
///
/// An empty `coverage_options` list seeds the default coverage set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
    pub business_information: BusinessInformationInput,
    pub coverage_options: Vec<CoverageOptionInput>,
    pub risk_rating: Option<String>,
    pub underwriter_notes: Option<String>,
}

/// Input for updating an existing quote
///
/// Business information, risk rating and underwriter notes are overwritten.
/// Coverage options are merged into existing options of the same type;
/// options of a type the quote does not carry are ignored. A `status` that
/// differs from the current one is validated against the transition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    pub business_information: BusinessInformationInput,
    pub coverage_options: Vec<CoverageOptionInput>,
    pub risk_rating: Option<String>,
    pub underwriter_notes: Option<String>,
    pub status: Option<QuoteStatus>,
}
