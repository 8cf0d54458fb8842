//! Coverage options and the coverage type catalog
//!
//! A coverage option is a priced line item on a quote. Only selected options
//! contribute to the quote's total premium.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::CoverageOptionId;

/// Types of commercial coverage offered on a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageType {
    /// Bodily injury, property damage and personal injury claims
    GeneralLiability,
    /// Buildings, equipment, inventory and furniture
    Property,
    /// Cyber, employment practices and other specialized coverages
    Additional,
}

/// Fixed descriptive metadata for a coverage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoverageTypeInfo {
    pub display_name: &'static str,
    pub description: &'static str,
}

/// Catalog of coverage type metadata, keyed by variant
static COVERAGE_CATALOG: [(CoverageType, CoverageTypeInfo); 3] = [
    (
        CoverageType::GeneralLiability,
        CoverageTypeInfo {
            display_name: "General Liability",
            description: "Protects against claims of bodily injury, property damage, and personal injury",
        },
    ),
    (
        CoverageType::Property,
        CoverageTypeInfo {
            display_name: "Property Insurance",
            description: "Covers business property including buildings, equipment, inventory, and furniture",
        },
    ),
    (
        CoverageType::Additional,
        CoverageTypeInfo {
            display_name: "Additional Coverage",
            description: "Includes cyber liability, employment practices liability, and other specialized coverages",
        },
    ),
];

impl CoverageType {
    /// All coverage types in catalog order
    pub const ALL: [CoverageType; 3] = [
        CoverageType::GeneralLiability,
        CoverageType::Property,
        CoverageType::Additional,
    ];

    /// Looks up the catalog entry for this type
    pub fn info(&self) -> &'static CoverageTypeInfo {
        COVERAGE_CATALOG
            .iter()
            .find(|(coverage_type, _)| coverage_type == self)
            .map(|(_, info)| info)
            .unwrap_or(&COVERAGE_CATALOG[0].1)
    }

    /// Human-readable name from the catalog
    pub fn display_name(&self) -> &'static str {
        self.info().display_name
    }

    /// Catalog description
    pub fn description(&self) -> &'static str {
        self.info().description
    }

    /// Stable storage and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverageType::GeneralLiability => "GENERAL_LIABILITY",
            CoverageType::Property => "PROPERTY",
            CoverageType::Additional => "ADDITIONAL",
        }
    }
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoverageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown coverage type: {}", s))
    }
}

/// A coverage line item supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageOptionInput {
    pub name: String,
    pub coverage_type: CoverageType,
    pub premium: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_selected: bool,
}

/// A coverage line item belonging to a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageOption {
    pub id: CoverageOptionId,
    pub name: String,
    pub coverage_type: CoverageType,
    pub premium: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CoverageOption {
    /// Creates a new option from caller input
    pub fn from_input(input: CoverageOptionInput, now: DateTime<Utc>) -> Self {
        Self {
            id: CoverageOptionId::new(),
            name: input.name,
            coverage_type: input.coverage_type,
            premium: input.premium,
            description: input.description,
            is_active: input.is_active,
            is_selected: input.is_selected,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copies every caller-editable field from `input`, keeping identity and type
    pub fn merge(&mut self, input: &CoverageOptionInput, now: DateTime<Utc>) {
        self.name = input.name.clone();
        self.premium = input.premium;
        self.description = input.description.clone();
        self.is_selected = input.is_selected;
        self.is_active = input.is_active;
        self.updated_at = now;
    }
}

/// The three options seeded onto a quote created without coverage
///
/// All are active and none are selected, so the seeded quote has a zero
/// total premium.
pub fn default_coverage_options(now: DateTime<Utc>) -> Vec<CoverageOption> {
    [
        (
            "General Liability",
            CoverageType::GeneralLiability,
            dec!(500.00),
            "General liability insurance protects your business from claims",
        ),
        (
            "Property",
            CoverageType::Property,
            dec!(750.00),
            "Property insurance covers your business property",
        ),
        (
            "Additional Coverage Options",
            CoverageType::Additional,
            dec!(300.00),
            "Additional coverage options include cyber liability",
        ),
    ]
    .into_iter()
    .map(|(name, coverage_type, premium, description)| {
        CoverageOption::from_input(
            CoverageOptionInput {
                name: name.to_string(),
                coverage_type,
                premium,
                description: Some(description.to_string()),
                is_active: true,
                is_selected: false,
            },
            now,
        )
    })
    .collect()
}

/// Sum of premiums over selected options
pub fn selected_premium_total(options: &[CoverageOption]) -> Decimal {
    options
        .iter()
        .filter(|option| option.is_selected)
        .map(|option| option.premium)
        .sum()
}
