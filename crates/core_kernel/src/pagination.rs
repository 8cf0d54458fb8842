//! Offset pagination primitives
//!
//! A [`PageRequest`] addresses a zero-based page of fixed size; a [`Page`]
//! carries one slice of results together with the totals a client needs to
//! navigate the rest.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default number of elements per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a caller may request
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort direction for ordered queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Parses "asc"/"desc" case-insensitively
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(CoreError::validation(format!(
                "Unknown sort direction '{}'",
                other
            ))),
        }
    }
}

/// A request for one page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request
    ///
    /// # Arguments
    ///
    /// * `page` - Zero-based page index
    /// * `size` - Elements per page, between 1 and [`MAX_PAGE_SIZE`]
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the size is out of range
    pub fn new(page: u32, size: u32) -> Result<Self, CoreError> {
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(CoreError::validation(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, size })
    }

    /// Returns the zero-based page index
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of elements to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Assembles a page from its content and the total match count
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        let size = u64::from(request.size());
        let total_pages = total_elements.div_ceil(size);
        let page = request.page();
        Self {
            content,
            page,
            size: request.size(),
            total_elements,
            total_pages,
            first: page == 0,
            last: u64::from(page) + 1 >= total_pages,
        }
    }

    /// Slices an already-ordered, fully materialized result set
    pub fn from_ordered(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let content = all
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.size() as usize)
            .collect();
        Self::new(content, request, total)
    }

    /// Transforms the content while keeping the paging metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}
