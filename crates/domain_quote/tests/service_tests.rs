//! Lifecycle tests for the quote service over the in-memory port

use chrono::Duration;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::{PageRequest, PortError, QuoteId};
use domain_quote::{CoverageType, QuoteError, QuotePort, QuoteSort, QuoteStatus};
use test_utils::{
    assert_invalid_state, assert_premium_consistent, assert_quote_number_format, BusinessFixtures,
    CoverageFixtures, QuoteInputBuilder, ServiceFixture, TemporalFixtures,
};

// ============= CREATE TESTS =============
mod create_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_seeds_default_coverage() {
        let fixture = ServiceFixture::new();

        let quote = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        assert_eq!(quote.status(), QuoteStatus::Draft);
        assert_eq!(quote.coverage_options().len(), 3);
        assert!(quote.coverage_options().iter().all(|o| o.is_active && !o.is_selected));
        assert_eq!(quote.total_premium(), dec!(0.00));
        assert_eq!(quote.business_information().name, "Acme LLC");
        assert_eq!(quote.version(), 1);
    }

    #[tokio::test]
    async fn test_create_assigns_number_and_validity() {
        let fixture = ServiceFixture::new();

        let quote = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        assert_quote_number_format(quote.quote_number(), "IQ");
        assert_eq!(quote.quote_number(), "IQ-20240601123045-0001");
        assert_eq!(quote.created_at(), TemporalFixtures::now());
        assert_eq!(quote.valid_until(), TemporalFixtures::now() + Duration::days(30));
    }

    #[tokio::test]
    async fn test_create_sums_selected_premiums() {
        let fixture = ServiceFixture::new();
        let input = QuoteInputBuilder::new()
            .with_coverage(CoverageFixtures::general_liability(true))
            .with_coverage(CoverageFixtures::property(true))
            .with_coverage(CoverageFixtures::additional(false))
            .build_new();

        let quote = fixture.service.create(input).await.unwrap();

        assert_eq!(quote.total_premium(), dec!(1250.00));
        assert_premium_consistent(&quote);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let fixture = ServiceFixture::new();
        let input = QuoteInputBuilder::new().with_state("California").build_new();

        let error = fixture.service.create(input).await.unwrap_err();

        assert!(matches!(error, QuoteError::Validation(_)));
        assert!(fixture.port.is_empty().await);
    }
}

// ============= UPDATE TESTS =============
mod update_tests {
    use super::*;

    #[tokio::test]
    async fn test_update_merges_coverage_by_type() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();
        let original_id = created.coverage_options()[0].id;

        let update = QuoteInputBuilder::new()
            .with_name("Acme Holdings LLC")
            .with_coverage(CoverageFixtures::option(
                "Premium Liability",
                CoverageType::GeneralLiability,
                dec!(650.00),
                true,
            ))
            .with_risk_rating("LOW")
            .build_update();

        let updated = fixture.service.update(created.id(), update).await.unwrap();

        assert_eq!(updated.business_information().name, "Acme Holdings LLC");
        assert_eq!(updated.coverage_options().len(), 3);
        let liability = &updated.coverage_options()[0];
        assert_eq!(liability.id, original_id);
        assert_eq!(liability.name, "Premium Liability");
        assert_eq!(liability.premium, dec!(650.00));
        assert_eq!(updated.total_premium(), dec!(650.00));
        assert_eq!(updated.risk_rating(), Some("LOW"));
    }

    #[tokio::test]
    async fn test_update_ignores_unmatched_coverage_type() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::general_liability(true))
                    .build_new(),
            )
            .await
            .unwrap();

        let update = QuoteInputBuilder::new()
            .with_coverage(CoverageFixtures::property(true))
            .build_update();
        let updated = fixture.service.update(created.id(), update).await.unwrap();

        assert_eq!(updated.coverage_options().len(), 1);
        assert_eq!(updated.total_premium(), dec!(500.00));
    }

    #[tokio::test]
    async fn test_update_applies_allowed_status() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        let update = QuoteInputBuilder::new().with_status(QuoteStatus::Saved).build_update();
        let updated = fixture.service.update(created.id(), update).await.unwrap();

        assert_eq!(updated.status(), QuoteStatus::Saved);
    }

    #[tokio::test]
    async fn test_update_rejects_disallowed_status() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        let update = QuoteInputBuilder::new()
            .with_name("Changed")
            .with_status(QuoteStatus::Approved)
            .build_update();
        let error = fixture.service.update(created.id(), update).await.unwrap_err();

        assert_invalid_state(&error, "Invalid status transition from DRAFT to APPROVED");
        let stored = fixture.service.get_by_id(created.id()).await.unwrap();
        assert_eq!(stored.business_information().name, "Acme LLC");
    }

    #[tokio::test]
    async fn test_update_locked_after_approval() {
        let fixture = ServiceFixture::new();
        let id = approved_quote(&fixture).await;

        let error = fixture
            .service
            .update(id, QuoteInputBuilder::new().build_update())
            .await
            .unwrap_err();

        assert_invalid_state(&error, "Cannot update quote in APPROVED status");
    }

    #[tokio::test]
    async fn test_update_missing_quote() {
        let fixture = ServiceFixture::new();
        let id = QuoteId::new();

        let error = fixture
            .service
            .update(id, QuoteInputBuilder::new().build_update())
            .await
            .unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(error.to_string(), format!("Quote not found with id: {}", id.as_uuid()));
    }

    async fn approved_quote(fixture: &ServiceFixture) -> QuoteId {
        let created = fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::general_liability(true))
                    .build_new(),
            )
            .await
            .unwrap();
        fixture
            .service
            .update(
                created.id(),
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::general_liability(true))
                    .with_status(QuoteStatus::Saved)
                    .build_update(),
            )
            .await
            .unwrap();
        fixture.service.submit(created.id()).await.unwrap();
        fixture.service.approve(created.id()).await.unwrap();
        created.id()
    }
}

// ============= WORKFLOW TESTS =============
mod workflow_tests {
    use super::*;

    async fn saved_quote(fixture: &ServiceFixture, selected: bool) -> QuoteId {
        let created = fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::general_liability(selected))
                    .build_new(),
            )
            .await
            .unwrap();
        fixture
            .service
            .update(
                created.id(),
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::general_liability(selected))
                    .with_status(QuoteStatus::Saved)
                    .build_update(),
            )
            .await
            .unwrap();
        created.id()
    }

    #[tokio::test]
    async fn test_submit_saved_quote() {
        let fixture = ServiceFixture::new();
        let id = saved_quote(&fixture, true).await;

        let submitted = fixture.service.submit(id).await.unwrap();

        assert_eq!(submitted.status(), QuoteStatus::Submitted);
    }

    #[tokio::test]
    async fn test_submit_draft_fails() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        let error = fixture.service.submit(created.id()).await.unwrap_err();

        assert_invalid_state(&error, "Only saved quotes can be submitted");
    }

    #[tokio::test]
    async fn test_submit_without_selection_fails() {
        let fixture = ServiceFixture::new();
        let id = saved_quote(&fixture, false).await;

        let error = fixture.service.submit(id).await.unwrap_err();

        assert_invalid_state(&error, "Quote must have at least one selected coverage option");
    }

    #[tokio::test]
    async fn test_approve_requires_submitted() {
        let fixture = ServiceFixture::new();
        let id = saved_quote(&fixture, true).await;

        let error = fixture.service.approve(id).await.unwrap_err();
        assert_invalid_state(&error, "Only submitted quotes can be approved");

        fixture.service.submit(id).await.unwrap();
        let approved = fixture.service.approve(id).await.unwrap();
        assert_eq!(approved.status(), QuoteStatus::Approved);
    }

    #[tokio::test]
    async fn test_reject_appends_reason() {
        let fixture = ServiceFixture::new();
        let id = saved_quote(&fixture, true).await;

        let error = fixture.service.reject(id, "too risky").await.unwrap_err();
        assert_invalid_state(&error, "Only submitted quotes can be rejected");

        fixture.service.submit(id).await.unwrap();
        let rejected = fixture.service.reject(id, "too risky").await.unwrap();

        assert_eq!(rejected.status(), QuoteStatus::Rejected);
        assert!(rejected
            .underwriter_notes()
            .unwrap()
            .ends_with("\nRejection reason: too risky"));
    }

    #[tokio::test]
    async fn test_reject_keeps_existing_notes() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::property(true))
                    .build_new(),
            )
            .await
            .unwrap();
        fixture
            .service
            .update(
                created.id(),
                QuoteInputBuilder::new()
                    .with_notes("Site visit done")
                    .with_status(QuoteStatus::Saved)
                    .build_update(),
            )
            .await
            .unwrap();
        fixture.service.submit(created.id()).await.unwrap();

        let rejected = fixture.service.reject(created.id(), "flood zone").await.unwrap();

        assert_eq!(
            rejected.underwriter_notes(),
            Some("Site visit done\nRejection reason: flood zone")
        );
    }

    #[tokio::test]
    async fn test_delete_only_drafts() {
        let fixture = ServiceFixture::new();
        let draft = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();
        let saved = saved_quote(&fixture, true).await;

        fixture.service.delete(draft.id()).await.unwrap();
        assert!(fixture.service.get_by_id(draft.id()).await.unwrap_err().is_not_found());

        let error = fixture.service.delete(saved).await.unwrap_err();
        assert_invalid_state(&error, "Only draft quotes can be deleted");
        assert_eq!(fixture.port.len().await, 1);
    }

    #[tokio::test]
    async fn test_missing_quote_is_not_found_everywhere() {
        let fixture = ServiceFixture::new();
        let id = QuoteId::new();

        assert!(fixture.service.submit(id).await.unwrap_err().is_not_found());
        assert!(fixture.service.approve(id).await.unwrap_err().is_not_found());
        assert!(fixture.service.reject(id, "x").await.unwrap_err().is_not_found());
        assert!(fixture.service.delete(id).await.unwrap_err().is_not_found());
        assert!(fixture.service.calculate_premium(id).await.unwrap_err().is_not_found());
    }
}

// ============= READ TESTS =============
mod read_tests {
    use super::*;

    #[tokio::test]
    async fn test_calculate_premium_is_read_only() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::general_liability(true))
                    .with_coverage(CoverageFixtures::property(true))
                    .build_new(),
            )
            .await
            .unwrap();

        let premium = fixture.service.calculate_premium(created.id()).await.unwrap();

        assert_eq!(premium, dec!(1250.00));
        let stored = fixture.service.get_by_id(created.id()).await.unwrap();
        assert_eq!(stored.version(), created.version());
        assert_eq!(stored.status(), QuoteStatus::Draft);
    }

    #[tokio::test]
    async fn test_get_by_number() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        let found = fixture.service.get_by_number(created.quote_number()).await.unwrap();
        assert_eq!(found.map(|q| q.id()), Some(created.id()));

        assert!(fixture.service.get_by_number("IQ-0-0").await.unwrap().is_none());
        assert!(!fixture.service.is_quote_number_unique(created.quote_number()).await.unwrap());
        assert!(fixture.service.is_quote_number_unique("IQ-0-0").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let fixture = ServiceFixture::new();
        for name in ["First Co", "Second Co", "Third Co"] {
            fixture
                .service
                .create(QuoteInputBuilder::new().with_name(name).build_new())
                .await
                .unwrap();
            fixture.clock.advance(Duration::minutes(1));
        }

        let page = fixture
            .service
            .list(PageRequest::new(0, 2).unwrap(), QuoteSort::default())
            .await
            .unwrap();

        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].business_information().name, "Third Co");
        assert!(!page.last);
    }

    #[tokio::test]
    async fn test_filters() {
        let fixture = ServiceFixture::new();
        fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();
        fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_business(BusinessFixtures::diner())
                    .with_coverage(CoverageFixtures::property(true))
                    .build_new(),
            )
            .await
            .unwrap();

        assert_eq!(fixture.service.list_by_state("TX").await.unwrap().len(), 1);
        assert_eq!(fixture.service.list_by_status(QuoteStatus::Draft).await.unwrap().len(), 2);
        assert_eq!(
            fixture
                .service
                .list_by_business_type(domain_quote::BusinessType::Restaurant)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            fixture
                .service
                .list_by_industry(domain_quote::Industry::RetailTrade)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(fixture.service.list_with_premium_above(dec!(700)).await.unwrap().len(), 1);
        assert_eq!(
            fixture.service.list_with_premium_above(Decimal::ZERO).await.unwrap().len(),
            1
        );

        let page = fixture
            .service
            .search_by_business_name("star", PageRequest::default(), QuoteSort::default())
            .await
            .unwrap();
        assert_eq!(page.total_elements, 1);
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let fixture = ServiceFixture::new();
        let now = TemporalFixtures::now();
        fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        assert_eq!(fixture.service.list_by_date_range(now, now).await.unwrap().len(), 1);
        assert!(fixture
            .service
            .list_by_date_range(now + Duration::seconds(1), now + Duration::days(1))
            .await
            .unwrap()
            .is_empty());

        let error = fixture
            .service
            .list_by_date_range(now, now - Duration::days(1))
            .await
            .unwrap_err();
        assert!(matches!(error, QuoteError::Validation(_)));
    }

    #[tokio::test]
    async fn test_expired_and_stale() {
        let fixture = ServiceFixture::new();
        fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();

        assert!(fixture.service.list_expired().await.unwrap().is_empty());
        assert!(fixture.service.list_stale_drafts(7).await.unwrap().is_empty());

        fixture.clock.advance(Duration::days(31));

        assert_eq!(fixture.service.list_expired().await.unwrap().len(), 1);
        assert_eq!(fixture.service.list_stale_drafts(7).await.unwrap().len(), 1);
    }
}

// ============= STATISTICS TESTS =============
mod statistics_tests {
    use super::*;

    #[tokio::test]
    async fn test_statistics_totals_and_average() {
        let fixture = ServiceFixture::new();
        fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::option(
                        "Liability",
                        CoverageType::GeneralLiability,
                        dec!(1000.00),
                        true,
                    ))
                    .build_new(),
            )
            .await
            .unwrap();
        fixture
            .service
            .create(
                QuoteInputBuilder::new()
                    .with_coverage(CoverageFixtures::option(
                        "Property",
                        CoverageType::Property,
                        dec!(2000.00),
                        true,
                    ))
                    .build_new(),
            )
            .await
            .unwrap();

        let stats = fixture.service.get_statistics().await.unwrap();

        assert_eq!(stats.total_quotes, 2);
        assert_eq!(stats.draft_quotes, 2);
        assert_eq!(stats.total_premium_value, dec!(3000.00));
        assert_eq!(stats.average_premium, dec!(1500.00));
    }

    #[tokio::test]
    async fn test_statistics_empty() {
        let fixture = ServiceFixture::new();

        let stats = fixture.service.get_statistics().await.unwrap();

        assert_eq!(stats.total_quotes, 0);
        assert_eq!(stats.average_premium, Decimal::ZERO);
    }
}

// ============= CONCURRENCY TESTS =============
mod concurrency_tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_copy_is_rejected() {
        let fixture = ServiceFixture::new();
        let created = fixture
            .service
            .create(QuoteInputBuilder::new().build_new())
            .await
            .unwrap();
        let stale = fixture.port.find_by_id(created.id()).await.unwrap().unwrap();

        fixture
            .service
            .update(created.id(), QuoteInputBuilder::new().with_name("Fresh").build_update())
            .await
            .unwrap();

        let error = fixture.port.save(&stale).await.unwrap_err();
        assert!(matches!(error, PortError::Conflict { .. }));
        let stored = fixture.service.get_by_id(created.id()).await.unwrap();
        assert_eq!(stored.business_information().name, "Fresh");
    }
}
