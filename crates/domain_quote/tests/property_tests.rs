//! Property-based tests for quote invariants

use chrono::Duration;
use proptest::prelude::*;

use domain_quote::{Quote, QuoteError, QuoteStatus};
use test_utils::{
    assert_premium_consistent, coverage_option_strategy, new_quote_strategy, status_strategy,
    QuoteInputBuilder, TemporalFixtures,
};

fn quote_in(status: QuoteStatus) -> Quote {
    let quote = Quote::create(
        QuoteInputBuilder::new().build_new(),
        "IQ-20240601123045-0001".to_string(),
        Duration::days(30),
        TemporalFixtures::now(),
    );
    let mut record = quote.to_record();
    record.status = status;
    Quote::restore(record)
}

/// Every permitted lifecycle move, written out independently of `QuoteStatus`
const ALLOWED: &[(QuoteStatus, QuoteStatus)] = &[
    (QuoteStatus::Draft, QuoteStatus::Saved),
    (QuoteStatus::Saved, QuoteStatus::Draft),
    (QuoteStatus::Saved, QuoteStatus::Submitted),
    (QuoteStatus::Submitted, QuoteStatus::Approved),
    (QuoteStatus::Submitted, QuoteStatus::Rejected),
];

#[test]
fn test_every_status_pair_follows_lifecycle() {
    for from in QuoteStatus::ALL {
        for to in QuoteStatus::ALL {
            let allowed = ALLOWED.contains(&(from, to));
            let mut quote = quote_in(from);
            let result = quote.transition_to(to, TemporalFixtures::now());

            assert_eq!(from.can_transition_to(to), allowed, "{} -> {}", from, to);
            if allowed {
                assert!(result.is_ok(), "{} -> {} should be allowed", from, to);
                assert_eq!(quote.status(), to);
            } else {
                let expected = format!("Invalid status transition from {} to {}", from, to);
                assert!(
                    matches!(result, Err(QuoteError::InvalidState(ref m)) if *m == expected),
                    "{} -> {} should be rejected",
                    from,
                    to
                );
                assert_eq!(quote.status(), from);
            }
        }
    }
}

#[test]
fn test_terminal_statuses_have_no_exits() {
    for status in [QuoteStatus::Approved, QuoteStatus::Rejected, QuoteStatus::Expired] {
        assert!(ALLOWED.iter().all(|(from, _)| *from != status));
        assert!(status.allowed_transitions().is_empty());
    }
}

proptest! {
    #[test]
    fn test_created_premium_matches_selection(input in new_quote_strategy(5)) {
        let quote = Quote::create(
            input,
            "IQ-20240601123045-0001".to_string(),
            Duration::days(30),
            TemporalFixtures::now(),
        );
        assert_premium_consistent(&quote);
    }

    #[test]
    fn test_update_keeps_premium_consistent(
        options in prop::collection::vec(coverage_option_strategy(), 0..6)
    ) {
        let mut quote = quote_in(QuoteStatus::Draft);
        let mut builder = QuoteInputBuilder::new();
        for option in options {
            builder = builder.with_coverage(option);
        }

        quote.apply_update(builder.build_update(), TemporalFixtures::now()).unwrap();

        assert_premium_consistent(&quote);
        prop_assert_eq!(quote.coverage_options().len(), 3);
    }

    #[test]
    fn test_delete_allowed_only_for_drafts(status in status_strategy()) {
        let mut quote = quote_in(status);
        let result = quote.mark_deleted(TemporalFixtures::now());
        prop_assert_eq!(result.is_ok(), status == QuoteStatus::Draft);
    }

    #[test]
    fn test_locked_statuses_reject_updates(status in status_strategy()) {
        let mut quote = quote_in(status);
        let result = quote.apply_update(QuoteInputBuilder::new().build_update(), TemporalFixtures::now());
        prop_assert_eq!(result.is_err(), status.is_locked_for_edit());
    }
}
