//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, ordering,
//! and display formatting.

use core_kernel::{BusinessInformationId, CoverageOptionId, QuoteId};
use uuid::Uuid;

mod quote_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = QuoteId::new();
        let id2 = QuoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_ids_are_time_ordered() {
        let id1 = QuoteId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = QuoteId::new();
        assert!(id1 < id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = QuoteId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(QuoteId::prefix(), "QTE");
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = QuoteId::new();
        let parsed: QuoteId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        assert!("QTE-not-a-uuid".parse::<QuoteId>().is_err());
    }

    #[test]
    fn test_json_is_bare_uuid() {
        let uuid = Uuid::now_v7();
        let id = QuoteId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));

        let back: QuoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod owned_entity_ids {
    use super::*;

    #[test]
    fn test_prefixes() {
        assert_eq!(BusinessInformationId::prefix(), "BIZ");
        assert_eq!(CoverageOptionId::prefix(), "COV");
    }

    #[test]
    fn test_display_format() {
        assert!(BusinessInformationId::new().to_string().starts_with("BIZ-"));
        assert!(CoverageOptionId::new().to_string().starts_with("COV-"));
    }

    #[test]
    fn test_uuid_roundtrip() {
        let uuid = Uuid::now_v7();
        let id: CoverageOptionId = uuid.into();
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }
}
