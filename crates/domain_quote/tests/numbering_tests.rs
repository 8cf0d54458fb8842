//! Quote number generation against a populated store

use std::sync::Arc;

use domain_quote::ports::mock::MockQuotePort;
use domain_quote::{Quote, QuoteError, QuoteNumberGenerator, QuotePort, QuoteSettings};
use test_utils::{
    assert_quote_number_format, FixedClock, QuoteInputBuilder, ScriptedRandom, ServiceFixture,
    TemporalFixtures,
};

async fn port_with_number(number: &str) -> MockQuotePort {
    let quote = Quote::create(
        QuoteInputBuilder::new().build_new(),
        number.to_string(),
        chrono::Duration::days(30),
        TemporalFixtures::now(),
    );
    MockQuotePort::with_quotes(vec![quote]).await.unwrap()
}

fn generator(random: ScriptedRandom, max_attempts: u32) -> QuoteNumberGenerator {
    QuoteNumberGenerator::new(
        "IQ",
        max_attempts,
        Arc::new(FixedClock::new(TemporalFixtures::now())),
        Arc::new(random),
    )
}

#[tokio::test]
async fn test_generated_number_format() {
    let port = MockQuotePort::new();
    let number = generator(ScriptedRandom::scripted([7]), 10)
        .generate(&port)
        .await
        .unwrap();

    assert_eq!(number, "IQ-20240601123045-0007");
    assert_quote_number_format(&number, "IQ");
}

#[tokio::test]
async fn test_collision_redraws_suffix() {
    let port = port_with_number("IQ-20240601123045-0001").await;

    let number = generator(ScriptedRandom::scripted([1, 1, 9042]), 10)
        .generate(&port)
        .await
        .unwrap();

    assert_eq!(number, "IQ-20240601123045-9042");
    assert!(!port.exists_by_quote_number(&number).await.unwrap());
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let port = port_with_number("IQ-20240601123045-0005").await;

    let error = generator(ScriptedRandom::scripted([5, 5, 5]), 3)
        .generate(&port)
        .await
        .unwrap_err();

    assert!(matches!(error, QuoteError::QuoteNumberGeneration { attempts: 3 }));
}

#[tokio::test]
async fn test_service_uses_configured_prefix() {
    let settings = QuoteSettings {
        number_prefix: "CQ".to_string(),
        ..QuoteSettings::default()
    };
    let fixture = ServiceFixture::with_settings(settings);

    let quote = fixture
        .service
        .create(QuoteInputBuilder::new().build_new())
        .await
        .unwrap();

    assert_quote_number_format(quote.quote_number(), "CQ");
}

#[tokio::test]
async fn test_service_skips_taken_numbers() {
    let port = port_with_number("IQ-20240601123045-0001").await;
    let fixture = ServiceFixture::with_port(port, QuoteSettings::default());

    let quote = fixture
        .service
        .create(QuoteInputBuilder::new().build_new())
        .await
        .unwrap();

    assert_eq!(quote.quote_number(), "IQ-20240601123045-0002");
    assert_eq!(fixture.port.len().await, 2);
}
