//! Quote handlers

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use core_kernel::{Page, QuoteId};
use domain_quote::{BusinessType, Industry, QuoteStatistics, QuoteStatus};

use crate::dto::quote::*;
use crate::error::ApiError;
use crate::extractors::{extract_query, extract_validated_json};
use crate::AppState;

/// Age in days after which a draft counts as stale, when not given
const DEFAULT_STALE_DAYS: u32 = 30;

fn parse_path_enum<T>(value: &str) -> Result<T, ApiError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .trim()
        .to_ascii_uppercase()
        .parse()
        .map_err(ApiError::BadRequest)
}

/// Creates a quote
pub async fn create_quote(
    State(state): State<AppState>,
    body: Result<Json<CreateQuoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuoteResponse>), ApiError> {
    let request = extract_validated_json(body)?;
    let quote = state.quotes.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(quote.into())))
}

/// Replaces the editable content of a quote
pub async fn update_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<UpdateQuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let request = extract_validated_json(body)?;
    let quote = state.quotes.update(QuoteId::from_uuid(id), request.into()).await?;
    Ok(Json(quote.into()))
}

/// Gets a quote by ID
pub async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let quote = state.quotes.get_by_id(QuoteId::from_uuid(id)).await?;
    Ok(Json(quote.into()))
}

/// Gets a quote by its quote number
pub async fn get_quote_by_number(
    State(state): State<AppState>,
    Path(quote_number): Path<String>,
) -> Result<Json<QuoteResponse>, ApiError> {
    state
        .quotes
        .get_by_number(&quote_number)
        .await?
        .map(|quote| Json(quote.into()))
        .ok_or_else(|| ApiError::NotFound(format!("Quote not found with number: {}", quote_number)))
}

/// Lists quotes one page at a time
pub async fn list_quotes(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Page<QuoteResponse>>, ApiError> {
    let (request, sort) = extract_query(query)?.to_request()?;
    let page = state.quotes.list(request, sort).await?;
    Ok(Json(quote_page(page)))
}

/// Lists quotes in a status
pub async fn list_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let status: QuoteStatus = parse_path_enum(&status)?;
    Ok(Json(quote_list(state.quotes.list_by_status(status).await?)))
}

/// Searches quotes by business name
pub async fn search_quotes(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Page<QuoteResponse>>, ApiError> {
    let query = extract_query(query)?;
    let (request, sort) = query.page().to_request()?;
    let page = state
        .quotes
        .search_by_business_name(&query.business_name, request, sort)
        .await?;
    Ok(Json(quote_page(page)))
}

/// Lists quotes for businesses in a state
pub async fn list_by_state(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    Ok(Json(quote_list(state.quotes.list_by_state(&code).await?)))
}

/// Lists quotes created within a date range
pub async fn list_by_date_range(
    State(state): State<AppState>,
    query: Result<Query<DateRangeQuery>, QueryRejection>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let (start, end) = extract_query(query)?.bounds()?;
    Ok(Json(quote_list(state.quotes.list_by_date_range(start, end).await?)))
}

/// Lists quotes past their validity date
pub async fn list_expired(
    State(state): State<AppState>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    Ok(Json(quote_list(state.quotes.list_expired().await?)))
}

/// Lists quotes for one business type
pub async fn list_by_business_type(
    State(state): State<AppState>,
    Path(business_type): Path<String>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let business_type: BusinessType = parse_path_enum(&business_type)?;
    Ok(Json(quote_list(state.quotes.list_by_business_type(business_type).await?)))
}

/// Lists quotes in an industry
pub async fn list_by_industry(
    State(state): State<AppState>,
    Path(industry): Path<String>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let industry: Industry = parse_path_enum(&industry)?;
    Ok(Json(quote_list(state.quotes.list_by_industry(industry).await?)))
}

/// Lists quotes whose total premium exceeds `minPremium`
pub async fn list_premium_above(
    State(state): State<AppState>,
    query: Result<Query<PremiumAboveQuery>, QueryRejection>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let query = extract_query(query)?;
    Ok(Json(quote_list(state.quotes.list_with_premium_above(query.min_premium).await?)))
}

/// Lists drafts created more than `olderThanDays` days ago
pub async fn list_stale_drafts(
    State(state): State<AppState>,
    query: Result<Query<StaleQuery>, QueryRejection>,
) -> Result<Json<Vec<QuoteResponse>>, ApiError> {
    let days = extract_query(query)?.older_than_days.unwrap_or(DEFAULT_STALE_DAYS);
    Ok(Json(quote_list(state.quotes.list_stale_drafts(days).await?)))
}

/// Deletes a draft quote
pub async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.quotes.delete(QuoteId::from_uuid(id)).await?;
    info!(quote_id = %id, "Quote deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Computes the premium of the selected coverages
pub async fn calculate_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PremiumResponse>, ApiError> {
    let total_premium = state.quotes.calculate_premium(QuoteId::from_uuid(id)).await?;
    Ok(Json(PremiumResponse {
        quote_id: id,
        total_premium,
    }))
}

/// Submits a saved quote for underwriting
pub async fn submit_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>, ApiError> {
    Ok(Json(state.quotes.submit(QuoteId::from_uuid(id)).await?.into()))
}

/// Approves a submitted quote
pub async fn approve_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QuoteResponse>, ApiError> {
    Ok(Json(state.quotes.approve(QuoteId::from_uuid(id)).await?.into()))
}

/// Rejects a submitted quote with the given `reason`
pub async fn reject_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    query: Result<Query<RejectQuery>, QueryRejection>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let query = extract_query(query)?;
    let quote = state.quotes.reject(QuoteId::from_uuid(id), &query.reason).await?;
    Ok(Json(quote.into()))
}

/// Portfolio statistics
pub async fn get_statistics(
    State(state): State<AppState>,
) -> Result<Json<QuoteStatistics>, ApiError> {
    Ok(Json(state.quotes.get_statistics().await?))
}

/// Reports whether a quote number is still free
pub async fn check_quote_number(
    State(state): State<AppState>,
    Path(quote_number): Path<String>,
) -> Result<Json<QuoteNumberCheckResponse>, ApiError> {
    let is_unique = state.quotes.is_quote_number_unique(&quote_number).await?;
    Ok(Json(QuoteNumberCheckResponse {
        quote_number,
        is_unique,
    }))
}
