//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the quote domain. These fixtures are
//! consistent and predictable for unit tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_quote::ports::mock::MockQuotePort;
use domain_quote::{
    BusinessInformationInput, BusinessType, CoverageOptionInput, CoverageType, Industry,
    QuoteService, QuoteSettings,
};

use crate::doubles::{FixedClock, ScriptedRandom};

/// Fixture for business information
pub struct BusinessFixtures;

impl BusinessFixtures {
    /// The canonical retail business in California
    pub fn acme() -> BusinessInformationInput {
        BusinessInformationInput {
            name: "Acme LLC".to_string(),
            business_type: BusinessType::Retail,
            industry: Industry::RetailTrade,
            state: "CA".to_string(),
        }
    }

    /// A Texas restaurant
    pub fn diner() -> BusinessInformationInput {
        BusinessInformationInput {
            name: "Lone Star Diner".to_string(),
            business_type: BusinessType::Restaurant,
            industry: Industry::FoodService,
            state: "TX".to_string(),
        }
    }

    /// A New York software company
    pub fn tech_co() -> BusinessInformationInput {
        BusinessInformationInput {
            name: "Hudson Software Inc".to_string(),
            business_type: BusinessType::Technology,
            industry: Industry::Software,
            state: "NY".to_string(),
        }
    }
}

/// Fixture for coverage option inputs
pub struct CoverageFixtures;

impl CoverageFixtures {
    /// General liability at the default $500 premium
    pub fn general_liability(selected: bool) -> CoverageOptionInput {
        Self::option("General Liability", CoverageType::GeneralLiability, dec!(500.00), selected)
    }

    /// Property at the default $750 premium
    pub fn property(selected: bool) -> CoverageOptionInput {
        Self::option("Property", CoverageType::Property, dec!(750.00), selected)
    }

    /// Additional coverage at the default $300 premium
    pub fn additional(selected: bool) -> CoverageOptionInput {
        Self::option("Additional Coverage Options", CoverageType::Additional, dec!(300.00), selected)
    }

    /// An active option with the given fields
    pub fn option(
        name: &str,
        coverage_type: CoverageType,
        premium: Decimal,
        selected: bool,
    ) -> CoverageOptionInput {
        CoverageOptionInput {
            name: name.to_string(),
            coverage_type,
            premium,
            description: None,
            is_active: true,
            is_selected: selected,
        }
    }
}

/// Fixture for time values
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// A fixed instant used as "now" in tests
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap()
    }
}

/// A quote service over an in-memory port with pinned time and randomness
pub struct ServiceFixture {
    pub service: QuoteService,
    pub port: MockQuotePort,
    pub clock: Arc<FixedClock>,
    pub random: Arc<ScriptedRandom>,
}

impl ServiceFixture {
    /// Builds a fixture with default settings
    pub fn new() -> Self {
        Self::with_settings(QuoteSettings::default())
    }

    /// Builds a fixture with the given settings
    pub fn with_settings(settings: QuoteSettings) -> Self {
        Self::with_port(MockQuotePort::new(), settings)
    }

    /// Builds a fixture over an existing port
    pub fn with_port(port: MockQuotePort, settings: QuoteSettings) -> Self {
        let clock = Arc::new(FixedClock::new(TemporalFixtures::now()));
        let random = Arc::new(ScriptedRandom::counting_from(1));
        let service = QuoteService::new(
            Arc::new(port.clone()),
            clock.clone(),
            random.clone(),
            settings,
        );
        Self {
            service,
            port,
            clock,
            random,
        }
    }
}

impl Default for ServiceFixture {
    fn default() -> Self {
        Self::new()
    }
}
