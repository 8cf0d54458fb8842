//! Quote DTOs

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use core_kernel::{Page, PageRequest, DEFAULT_PAGE_SIZE};
use domain_quote::validation::{is_state_code, premium_violation};
use domain_quote::{
    BusinessInformation, BusinessInformationInput, BusinessType, CoverageOption,
    CoverageOptionInput, CoverageType, Industry, NewQuote, Quote, QuoteSort, QuoteStatus,
    QuoteUpdate,
};

use crate::error::ApiError;

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInformationRequest {
    #[validate(length(
        min = 2,
        max = 255,
        message = "Business name must be between 2 and 255 characters"
    ))]
    pub name: String,
    pub business_type: BusinessType,
    pub industry: Industry,
    #[validate(custom(function = "validate_state_code"))]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CoverageOptionRequest {
    #[validate(length(min = 1, message = "Coverage name is required"))]
    pub name: String,
    pub coverage_type: CoverageType,
    #[validate(custom(function = "validate_premium"))]
    pub premium: Decimal,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_selected: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    #[validate(nested)]
    pub business_information: BusinessInformationRequest,
    #[serde(default)]
    #[validate(nested)]
    pub coverage_options: Vec<CoverageOptionRequest>,
    #[validate(length(max = 50, message = "Risk rating must be at most 50 characters"))]
    pub risk_rating: Option<String>,
    #[validate(length(max = 2000, message = "Underwriter notes must be at most 2000 characters"))]
    pub underwriter_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteRequest {
    #[validate(nested)]
    pub business_information: BusinessInformationRequest,
    #[serde(default)]
    #[validate(nested)]
    pub coverage_options: Vec<CoverageOptionRequest>,
    #[validate(length(max = 50, message = "Risk rating must be at most 50 characters"))]
    pub risk_rating: Option<String>,
    #[validate(length(max = 2000, message = "Underwriter notes must be at most 2000 characters"))]
    pub underwriter_notes: Option<String>,
    pub status: Option<QuoteStatus>,
}

fn default_true() -> bool {
    true
}

fn validate_state_code(state: &str) -> Result<(), ValidationError> {
    if is_state_code(state) {
        Ok(())
    } else {
        Err(ValidationError::new("state_code")
            .with_message("State must be a 2-letter uppercase code".into()))
    }
}

fn validate_premium(premium: &Decimal) -> Result<(), ValidationError> {
    match premium_violation(*premium) {
        None => Ok(()),
        Some(message) => Err(ValidationError::new("premium").with_message(message.into())),
    }
}

impl From<BusinessInformationRequest> for BusinessInformationInput {
    fn from(request: BusinessInformationRequest) -> Self {
        Self {
            name: request.name,
            business_type: request.business_type,
            industry: request.industry,
            state: request.state,
        }
    }
}

impl From<CoverageOptionRequest> for CoverageOptionInput {
    fn from(request: CoverageOptionRequest) -> Self {
        Self {
            name: request.name,
            coverage_type: request.coverage_type,
            premium: request.premium,
            description: request.description,
            is_active: request.is_active,
            is_selected: request.is_selected,
        }
    }
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(request: CreateQuoteRequest) -> Self {
        Self {
            business_information: request.business_information.into(),
            coverage_options: request.coverage_options.into_iter().map(Into::into).collect(),
            risk_rating: request.risk_rating,
            underwriter_notes: request.underwriter_notes,
        }
    }
}

impl From<UpdateQuoteRequest> for QuoteUpdate {
    fn from(request: UpdateQuoteRequest) -> Self {
        Self {
            business_information: request.business_information.into(),
            coverage_options: request.coverage_options.into_iter().map(Into::into).collect(),
            risk_rating: request.risk_rating,
            underwriter_notes: request.underwriter_notes,
            status: request.status,
        }
    }
}

// ============================================================================
// Query parameters
// ============================================================================

/// `?page=0&size=20&sort=createdAt,desc`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl PageQuery {
    pub fn to_request(&self) -> Result<(PageRequest, QuoteSort), ApiError> {
        let request = PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE))?;
        let sort = match self.sort.as_deref() {
            Some(sort) if !sort.trim().is_empty() => QuoteSort::parse(sort)?,
            _ => QuoteSort::default(),
        };
        Ok((request, sort))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub business_name: String,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
}

impl SearchQuery {
    pub fn page(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: String,
    pub end_date: String,
}

impl DateRangeQuery {
    pub fn bounds(&self) -> Result<(DateTime<Utc>, DateTime<Utc>), ApiError> {
        Ok((parse_date_time(&self.start_date)?, parse_date_time(&self.end_date)?))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RejectQuery {
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumAboveQuery {
    pub min_premium: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleQuery {
    pub older_than_days: Option<u32>,
}

/// Parses an RFC 3339 timestamp, or an offset-less one taken as UTC
pub fn parse_date_time(value: &str) -> Result<DateTime<Utc>, ApiError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| ApiError::BadRequest(format!("Invalid date-time: {}", value)))
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInformationResponse {
    pub id: Uuid,
    pub name: String,
    pub business_type: BusinessType,
    pub business_type_display_name: &'static str,
    pub industry: Industry,
    pub industry_display_name: &'static str,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&BusinessInformation> for BusinessInformationResponse {
    fn from(business: &BusinessInformation) -> Self {
        Self {
            id: *business.id.as_uuid(),
            name: business.name.clone(),
            business_type: business.business_type,
            business_type_display_name: business.business_type.display_name(),
            industry: business.industry,
            industry_display_name: business.industry.display_name(),
            state: business.state.clone(),
            created_at: business.created_at,
            updated_at: business.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageOptionResponse {
    pub id: Uuid,
    pub name: String,
    pub coverage_type: CoverageType,
    pub coverage_type_display_name: &'static str,
    pub premium: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&CoverageOption> for CoverageOptionResponse {
    fn from(option: &CoverageOption) -> Self {
        Self {
            id: *option.id.as_uuid(),
            name: option.name.clone(),
            coverage_type: option.coverage_type,
            coverage_type_display_name: option.coverage_type.display_name(),
            premium: option.premium,
            description: option.description.clone(),
            is_active: option.is_active,
            is_selected: option.is_selected,
            created_at: option.created_at,
            updated_at: option.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub id: Uuid,
    pub quote_number: String,
    pub business_information: BusinessInformationResponse,
    pub coverage_options: Vec<CoverageOptionResponse>,
    pub total_premium: Decimal,
    pub risk_rating: Option<String>,
    pub underwriter_notes: Option<String>,
    pub status: QuoteStatus,
    pub status_display_name: &'static str,
    pub valid_until: DateTime<Utc>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        Self {
            id: *quote.id().as_uuid(),
            quote_number: quote.quote_number().to_string(),
            business_information: quote.business_information().into(),
            coverage_options: quote.coverage_options().iter().map(Into::into).collect(),
            total_premium: quote.total_premium(),
            risk_rating: quote.risk_rating().map(str::to_string),
            underwriter_notes: quote.underwriter_notes().map(str::to_string),
            status: quote.status(),
            status_display_name: quote.status().display_name(),
            valid_until: quote.valid_until(),
            version: quote.version(),
            created_at: quote.created_at(),
            updated_at: quote.updated_at(),
        }
    }
}

impl From<Quote> for QuoteResponse {
    fn from(quote: Quote) -> Self {
        QuoteResponse::from(&quote)
    }
}

/// Converts a list of quotes for output
pub fn quote_list(quotes: Vec<Quote>) -> Vec<QuoteResponse> {
    quotes.iter().map(QuoteResponse::from).collect()
}

/// Converts a page of quotes for output
pub fn quote_page(page: Page<Quote>) -> Page<QuoteResponse> {
    page.map(QuoteResponse::from)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumResponse {
    pub quote_id: Uuid,
    pub total_premium: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteNumberCheckResponse {
    pub quote_number: String,
    pub is_unique: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn request_json() -> serde_json::Value {
        serde_json::json!({
            "businessInformation": {
                "name": "Acme LLC",
                "businessType": "RETAIL",
                "industry": "RETAIL_TRADE",
                "state": "CA"
            },
            "coverageOptions": [
                {
                    "name": "General Liability",
                    "coverageType": "GENERAL_LIABILITY",
                    "premium": "500.00",
                    "isSelected": true
                }
            ],
            "riskRating": "LOW"
        })
    }

    #[test]
    fn test_create_request_maps_to_new_quote() {
        let request: CreateQuoteRequest = serde_json::from_value(request_json()).unwrap();
        assert!(request.validate().is_ok());

        let input = NewQuote::from(request);
        assert_eq!(input.business_information.business_type, BusinessType::Retail);
        assert_eq!(input.coverage_options.len(), 1);
        assert!(input.coverage_options[0].is_active);
        assert!(input.coverage_options[0].is_selected);
        assert_eq!(input.coverage_options[0].premium, dec!(500.00));
        assert_eq!(input.risk_rating.as_deref(), Some("LOW"));
    }

    #[test]
    fn test_invalid_request_collects_nested_messages() {
        let mut json = request_json();
        json["businessInformation"]["state"] = "california".into();
        json["coverageOptions"][0]["premium"] = "0".into();

        let request: CreateQuoteRequest = serde_json::from_value(json).unwrap();
        let error = ApiError::from(request.validate().unwrap_err());
        match error {
            ApiError::Validation(messages) => {
                assert!(messages.contains(&"State must be a 2-letter uppercase code".to_string()));
                assert!(messages.contains(&"Premium must be greater than zero".to_string()));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_premium_outside_column_range_rejected() {
        for (premium, expected) in [
            ("100.005", "Premium must have at most 2 decimal places"),
            ("10000000000", "Premium must not exceed 9999999999.99"),
        ] {
            let mut json = request_json();
            json["coverageOptions"][0]["premium"] = premium.into();
            let request: CreateQuoteRequest = serde_json::from_value(json).unwrap();
            match ApiError::from(request.validate().unwrap_err()) {
                ApiError::Validation(messages) => {
                    assert_eq!(messages, vec![expected.to_string()]);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        let mut json = request_json();
        json["coverageOptions"][0]["premium"] = "9999999999.99".into();
        let request: CreateQuoteRequest = serde_json::from_value(json).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_page_query_defaults() {
        let (request, sort) = PageQuery::default().to_request().unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(sort, QuoteSort::default());
    }

    #[test]
    fn test_page_query_rejects_bad_sort() {
        let query = PageQuery {
            sort: Some("colour,asc".to_string()),
            ..PageQuery::default()
        };
        assert!(matches!(query.to_request(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_date_time_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(parse_date_time("2024-06-01T12:00:00Z").unwrap(), expected);
        assert_eq!(parse_date_time("2024-06-01T14:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_date_time("2024-06-01T12:00:00").unwrap(), expected);
        assert!(parse_date_time("June 1st").is_err());
    }
}
