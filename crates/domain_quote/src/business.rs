//! Business information owned by a quote
//!
//! Every quote describes exactly one business. The record is created with the
//! quote, overwritten field-by-field on update, and removed with the quote.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::BusinessInformationId;

/// Kind of business being insured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessType {
    Retail,
    Restaurant,
    Technology,
    Manufacturing,
    Healthcare,
    Professional,
}

impl BusinessType {
    /// All business types in declaration order
    pub const ALL: [BusinessType; 6] = [
        BusinessType::Retail,
        BusinessType::Restaurant,
        BusinessType::Technology,
        BusinessType::Manufacturing,
        BusinessType::Healthcare,
        BusinessType::Professional,
    ];

    /// Stable storage and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Retail => "RETAIL",
            BusinessType::Restaurant => "RESTAURANT",
            BusinessType::Technology => "TECHNOLOGY",
            BusinessType::Manufacturing => "MANUFACTURING",
            BusinessType::Healthcare => "HEALTHCARE",
            BusinessType::Professional => "PROFESSIONAL",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            BusinessType::Retail => "Retail",
            BusinessType::Restaurant => "Restaurant",
            BusinessType::Technology => "Technology",
            BusinessType::Manufacturing => "Manufacturing",
            BusinessType::Healthcare => "Healthcare",
            BusinessType::Professional => "Professional Services",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BusinessType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown business type: {}", s))
    }
}

/// Industry classification of the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Industry {
    FoodService,
    RetailTrade,
    Software,
    HealthcareServices,
    Consulting,
    Manufacturing,
}

impl Industry {
    /// All industries in declaration order
    pub const ALL: [Industry; 6] = [
        Industry::FoodService,
        Industry::RetailTrade,
        Industry::Software,
        Industry::HealthcareServices,
        Industry::Consulting,
        Industry::Manufacturing,
    ];

    /// Stable storage and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::FoodService => "FOOD_SERVICE",
            Industry::RetailTrade => "RETAIL_TRADE",
            Industry::Software => "SOFTWARE",
            Industry::HealthcareServices => "HEALTHCARE_SERVICES",
            Industry::Consulting => "CONSULTING",
            Industry::Manufacturing => "MANUFACTURING",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Industry::FoodService => "Food Service",
            Industry::RetailTrade => "Retail Trade",
            Industry::Software => "Software Development",
            Industry::HealthcareServices => "Healthcare Services",
            Industry::Consulting => "Consulting",
            Industry::Manufacturing => "Manufacturing",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("Unknown industry: {}", s))
    }
}

/// Business details supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInformationInput {
    pub name: String,
    pub business_type: BusinessType,
    pub industry: Industry,
    /// Two-letter uppercase state code
    pub state: String,
}

/// Business information as stored with a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInformation {
    pub id: BusinessInformationId,
    pub name: String,
    pub business_type: BusinessType,
    pub industry: Industry,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessInformation {
    /// Creates a new record from caller input
    ///
    /// # Arguments
    ///
    /// * `input` - The validated business details
    /// * `now` - Creation timestamp
    pub fn from_input(input: BusinessInformationInput, now: DateTime<Utc>) -> Self {
        Self {
            id: BusinessInformationId::new(),
            name: input.name,
            business_type: input.business_type,
            industry: input.industry,
            state: input.state,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every caller-editable field
    pub fn overwrite(&mut self, input: BusinessInformationInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.business_type = input.business_type;
        self.industry = input.industry;
        self.state = input.state;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_type_names_roundtrip() {
        for business_type in BusinessType::ALL {
            assert_eq!(business_type.as_str().parse::<BusinessType>().unwrap(), business_type);
        }
        assert_eq!(BusinessType::Professional.display_name(), "Professional Services");
    }

    #[test]
    fn test_industry_serde_matches_storage_name() {
        for industry in Industry::ALL {
            let json = serde_json::to_string(&industry).unwrap();
            assert_eq!(json, format!("\"{}\"", industry.as_str()));
        }
        assert_eq!(Industry::Software.display_name(), "Software Development");
    }

    #[test]
    fn test_unknown_names_rejected() {
        assert!("BAKERY".parse::<BusinessType>().is_err());
        assert!("retail_trade".parse::<Industry>().is_err());
    }

    #[test]
    fn test_overwrite_keeps_identity() {
        let created = Utc::now();
        let mut info = BusinessInformation::from_input(
            BusinessInformationInput {
                name: "Acme LLC".into(),
                business_type: BusinessType::Retail,
                industry: Industry::RetailTrade,
                state: "CA".into(),
            },
            created,
        );
        let id = info.id;

        let later = created + chrono::Duration::minutes(5);
        info.overwrite(
            BusinessInformationInput {
                name: "Acme Holdings".into(),
                business_type: BusinessType::Technology,
                industry: Industry::Software,
                state: "WA".into(),
            },
            later,
        );

        assert_eq!(info.id, id);
        assert_eq!(info.name, "Acme Holdings");
        assert_eq!(info.state, "WA");
        assert_eq!(info.created_at, created);
        assert_eq!(info.updated_at, later);
    }
}
