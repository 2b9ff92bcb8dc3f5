//! List filtering
//!
//! A `FilterState` describes what a listing screen shows: free-text search,
//! status filter, sort order and page. [`FilterState::apply`] projects an
//! already-fetched list through it without touching the network.

use std::cmp::{Ordering, Reverse};

use serde::{Deserialize, Serialize};

use crate::models::Record;
use crate::search::find_case_insensitive;

pub const DEFAULT_PAGE_SIZE: usize = 10;

// == Status Filter ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl StatusFilter {
    fn admits(self, record: &Record) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => record.is_active() == Some(true),
            StatusFilter::Inactive => record.is_active() == Some(false),
        }
    }
}

// == Sorting ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    fn value_of(&self, record: &Record) -> SortValue {
        SortValue::of(record.field(&self.field))
    }
}

/// Sort projection of a field value.
///
/// Numbers order before text and missing values come last, so mixed
/// columns still sort totally. Text compares case-insensitively.
#[derive(Debug, Clone)]
enum SortValue {
    Number(f64),
    Text(String),
    Missing,
}

impl SortValue {
    fn of(raw: Option<String>) -> Self {
        let Some(raw) = raw else {
            return SortValue::Missing;
        };
        match raw.trim().parse::<f64>() {
            Ok(number) if !number.is_nan() => SortValue::Number(number),
            _ => SortValue::Text(raw.to_lowercase()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Number(_) => 0,
            SortValue::Text(_) => 1,
            SortValue::Missing => 2,
        }
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

// == List Page ==
/// One page of a filtered listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListPage {
    pub items: Vec<Record>,
    /// Records left after search and status filtering
    pub total: usize,
    /// 1-based page actually shown, after clamping
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}

// == Filter State ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub status_filter: StatusFilter,
    pub sort_key: Option<SortKey>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status_filter: StatusFilter::All,
            sort_key: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    // Changing what is shown sends the user back to the first page.

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self.page = 1;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status_filter = status;
        self.page = 1;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort_key = Some(sort);
        self.page = 1;
        self
    }

    /// Sorts by `field`, flipping the direction if it is already the key.
    pub fn toggle_sort(mut self, field: &str) -> Self {
        let direction = match &self.sort_key {
            Some(key) if key.field == field && key.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        self.sort_key = Some(SortKey {
            field: field.to_string(),
            direction,
        });
        self.page = 1;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.page = 1;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Filters, sorts and paginates `records`.
    ///
    /// The search term is matched case-insensitively against `fields`. The
    /// requested page is clamped into `1..=total_pages`.
    pub fn apply(&self, records: &[Record], fields: &[&str]) -> ListPage {
        let needle = self.search_term.trim().to_lowercase();

        let mut matching: Vec<&Record> = records
            .iter()
            .filter(|record| self.status_filter.admits(record))
            .filter(|record| needle.is_empty() || matches_any(record, fields, &needle))
            .collect();

        // Stable in both directions, so equal keys keep backend order
        match &self.sort_key {
            Some(sort) if sort.direction == SortDirection::Asc => {
                matching.sort_by_cached_key(|record| sort.value_of(record));
            }
            Some(sort) => {
                matching.sort_by_cached_key(|record| Reverse(sort.value_of(record)));
            }
            None => {}
        }

        let page_size = self.page_size.max(1);
        let total = matching.len();
        let total_pages = total.div_ceil(page_size).max(1);
        let page = self.page.clamp(1, total_pages);

        let items = matching
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .cloned()
            .collect();

        ListPage {
            items,
            total,
            page,
            total_pages,
            page_size,
        }
    }
}

fn matches_any(record: &Record, fields: &[&str], needle: &str) -> bool {
    fields.iter().any(|field| {
        record
            .field(field)
            .is_some_and(|text| find_case_insensitive(&text, needle).is_some())
    })
}
