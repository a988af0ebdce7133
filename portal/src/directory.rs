//! School directory: free-text search and fixed-size pagination.

use crate::models::School;

pub const PAGE_SIZE: usize = 10;

pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Items of the 1-based `page`. Pages past the end are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(items.len());
    let end = start.saturating_add(PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// Schools whose searchable columns contain `term`, ignoring case.
///
/// Returns a view over `schools`; an empty term matches everything.
pub fn search_schools<'a>(schools: &'a [School], term: &str) -> Vec<&'a School> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return schools.iter().collect();
    }
    schools.iter().filter(|s| s.matches(&needle)).collect()
}

/// Search term and pagination cursor of one directory page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    pub query: String,
    pub current_page: usize,
}

impl Default for DirectoryView {
    fn default() -> Self {
        Self {
            query: String::new(),
            current_page: 1,
        }
    }
}

impl DirectoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new search always starts from the first page.
    pub fn search(&mut self, term: &str) {
        self.query = term.trim().to_string();
        self.current_page = 1;
    }

    /// Moves to `page`; requests outside `1..=total` are ignored.
    pub fn change_page(&mut self, page: usize, total: usize) -> bool {
        if page < 1 || page > total {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn results<'a>(&self, schools: &'a [School]) -> Vec<&'a School> {
        search_schools(schools, &self.query)
    }

    /// 1-based row number of the first item on the current page.
    pub fn first_row_number(&self) -> usize {
        (self.current_page - 1) * PAGE_SIZE + 1
    }
}
