//! Test Data Builders
//!
//! Provides builder patterns for constructing quote inputs with sensible
//! defaults. Tests specify only the relevant fields.

use domain_quote::{
    BusinessInformationInput, BusinessType, CoverageOptionInput, Industry, NewQuote, QuoteStatus,
    QuoteUpdate,
};

use crate::fixtures::BusinessFixtures;

/// Builder for create and update inputs
#[derive(Debug, Clone)]
pub struct QuoteInputBuilder {
    business: BusinessInformationInput,
    coverage_options: Vec<CoverageOptionInput>,
    risk_rating: Option<String>,
    underwriter_notes: Option<String>,
    status: Option<QuoteStatus>,
}

impl Default for QuoteInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteInputBuilder {
    /// Creates a builder for Acme LLC with no coverage options
    pub fn new() -> Self {
        Self {
            business: BusinessFixtures::acme(),
            coverage_options: Vec::new(),
            risk_rating: None,
            underwriter_notes: None,
            status: None,
        }
    }

    /// Replaces the business information
    pub fn with_business(mut self, business: BusinessInformationInput) -> Self {
        self.business = business;
        self
    }

    /// Sets the business name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.business.name = name.into();
        self
    }

    /// Sets the business type
    pub fn with_business_type(mut self, business_type: BusinessType) -> Self {
        self.business.business_type = business_type;
        self
    }

    /// Sets the industry
    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.business.industry = industry;
        self
    }

    /// Sets the state code
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.business.state = state.into();
        self
    }

    /// Appends a coverage option
    pub fn with_coverage(mut self, option: CoverageOptionInput) -> Self {
        self.coverage_options.push(option);
        self
    }

    /// Sets the risk rating
    pub fn with_risk_rating(mut self, rating: impl Into<String>) -> Self {
        self.risk_rating = Some(rating.into());
        self
    }

    /// Sets the underwriter notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.underwriter_notes = Some(notes.into());
        self
    }

    /// Requests a status change (update inputs only)
    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Builds a create input
    pub fn build_new(self) -> NewQuote {
        NewQuote {
            business_information: self.business,
            coverage_options: self.coverage_options,
            risk_rating: self.risk_rating,
            underwriter_notes: self.underwriter_notes,
        }
    }

    /// Builds an update input
    pub fn build_update(self) -> QuoteUpdate {
        QuoteUpdate {
            business_information: self.business,
            coverage_options: self.coverage_options,
            risk_rating: self.risk_rating,
            underwriter_notes: self.underwriter_notes,
            status: self.status,
        }
    }
}
