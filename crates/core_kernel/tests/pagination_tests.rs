//! Tests for offset pagination

use core_kernel::{Page, PageRequest, SortDirection, MAX_PAGE_SIZE};
use proptest::prelude::*;

mod page_request {
    use super::*;

    #[test]
    fn test_offset_is_page_times_size() {
        let request = PageRequest::new(3, 25).unwrap();
        assert_eq!(request.offset(), 75);
    }

    #[test]
    fn test_max_size_accepted() {
        assert!(PageRequest::new(0, MAX_PAGE_SIZE).is_ok());
    }
}

mod page_slicing {
    use super::*;

    #[test]
    fn test_from_ordered_takes_requested_window() {
        let items: Vec<u32> = (0..45).collect();
        let page = Page::from_ordered(items, PageRequest::new(2, 20).unwrap());

        assert_eq!(page.content, vec![40, 41, 42, 43, 44]);
        assert_eq!(page.total_elements, 45);
        assert_eq!(page.total_pages, 3);
        assert!(page.last);
        assert!(!page.first);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items: Vec<u32> = (0..5).collect();
        let page = Page::from_ordered(items, PageRequest::new(4, 10).unwrap());
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 5);
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = Page::from_ordered(vec![1, 2, 3], PageRequest::default());
        let mapped = page.clone().map(|n| n * 10);

        assert_eq!(mapped.content, vec![10, 20, 30]);
        assert_eq!(mapped.total_elements, page.total_elements);
        assert_eq!(mapped.total_pages, page.total_pages);
    }

    #[test]
    fn test_serializes_camel_case() {
        let page = Page::from_ordered(vec![1], PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalElements"], 1);
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["content"][0], 1);
    }
}

mod sort_direction {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(SortDirection::parse("ASC").unwrap(), SortDirection::Asc);
        assert_eq!(SortDirection::parse(" desc ").unwrap(), SortDirection::Desc);
        assert!(SortDirection::parse("sideways").is_err());
    }

    #[test]
    fn test_default_is_descending() {
        assert_eq!(SortDirection::default(), SortDirection::Desc);
        assert_eq!(SortDirection::default().as_sql(), "DESC");
    }
}

proptest! {
    #[test]
    fn prop_pages_partition_the_result_set(total in 0usize..500, size in 1u32..=MAX_PAGE_SIZE) {
        let items: Vec<usize> = (0..total).collect();
        let first = Page::from_ordered(items.clone(), PageRequest::new(0, size).unwrap());

        let mut collected = Vec::new();
        for page_index in 0..first.total_pages.max(1) {
            let page = Page::from_ordered(items.clone(), PageRequest::new(page_index as u32, size).unwrap());
            prop_assert!(page.content.len() <= size as usize);
            collected.extend(page.content);
        }

        prop_assert_eq!(collected, items);
    }
}
