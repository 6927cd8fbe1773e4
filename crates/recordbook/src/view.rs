//! View derivation: pagination, search filtering, and row numbering.
//!
//! Everything here is a pure function of the record slice and the current
//! page/search values.
//!
//! With [`SearchScope::Page`] (the default) pagination is computed over the
//! whole store and the search only hides rows of the page being shown, so a
//! page can come up short even though matches exist elsewhere.
//! [`SearchScope::Store`] filters first and paginates the matches instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{Record, RecordId};

/// Rows per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Which records a search query is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    /// Filter only the rows of the current page.
    #[default]
    Page,
    /// Filter the whole store, then paginate the matches.
    Store,
}

/// Fixed view parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewParams {
    /// Rows per page. Always at least 1.
    pub page_size: usize,
    /// How search interacts with pagination.
    pub scope: SearchScope,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scope: SearchScope::Page,
        }
    }
}

impl ViewParams {
    fn size(self) -> usize {
        self.page_size.max(1)
    }
}

/// Records at positions `[(page-1)*page_size, page*page_size)`, clipped to
/// the available length. Page numbers start at 1; page 0 is treated as 1.
#[must_use]
pub fn visible_slice(records: &[Record], page: usize, page_size: usize) -> &[Record] {
    let (start, end) = page_bounds(records.len(), page, page_size);
    &records[start..end]
}

/// Case-insensitive substring match against keyword or description.
///
/// An empty query matches every record.
#[must_use]
pub fn matches_search(record: &Record, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record.keyword.to_lowercase().contains(&needle)
        || record.description.to_lowercase().contains(&needle)
}

/// Number of pages needed for `total` rows. Never less than 1.
#[must_use]
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp `page` into `[1, total_pages]`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

fn page_bounds(len: usize, page: usize, page_size: usize) -> (usize, usize) {
    let size = page_size.max(1);
    let start = page.max(1).saturating_sub(1).saturating_mul(size).min(len);
    let end = start.saturating_add(size).min(len);
    (start, end)
}

/// Number of rows pagination is computed over.
#[must_use]
pub fn paged_total(records: &[Record], query: &str, params: ViewParams) -> usize {
    match params.scope {
        SearchScope::Page => records.len(),
        SearchScope::Store => records.iter().filter(|r| matches_search(r, query)).count(),
    }
}

/// Store positions of the rows making up `page`, before the page-scoped
/// search filter is applied.
///
/// A row's offset within this window is its selectable row number.
#[must_use]
pub fn page_window(records: &[Record], page: usize, query: &str, params: ViewParams) -> Vec<usize> {
    match params.scope {
        SearchScope::Page => {
            let (start, end) = page_bounds(records.len(), page, params.size());
            (start..end).collect()
        }
        SearchScope::Store => {
            let matching: Vec<usize> = records
                .iter()
                .enumerate()
                .filter(|(_, r)| matches_search(r, query))
                .map(|(i, _)| i)
                .collect();
            let (start, end) = page_bounds(matching.len(), page, params.size());
            matching[start..end].to_vec()
        }
    }
}

/// The record shown at page-relative `offset`, if any.
///
/// A row the search hides is not shown, so it yields `None`.
#[must_use]
pub fn record_at<'a>(
    records: &'a [Record],
    page: usize,
    offset: usize,
    query: &str,
    params: ViewParams,
) -> Option<&'a Record> {
    page_window(records, page, query, params)
        .get(offset)
        .map(|&index| &records[index])
        .filter(|record| params.scope == SearchScope::Store || matches_search(record, query))
}

/// A displayed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<'a> {
    /// Page-relative position, used to select the row.
    pub offset: usize,
    /// Descending row number: `total - store_index`.
    pub ordinal: usize,
    /// Whether this row is the current selection.
    pub selected: bool,
    /// The record shown.
    pub record: &'a Record,
}

/// Rows displayed for `page` under `query`.
#[must_use]
pub fn derive_rows<'a>(
    records: &'a [Record],
    page: usize,
    query: &str,
    selection: Option<RecordId>,
    params: ViewParams,
) -> Vec<Row<'a>> {
    let total = records.len();
    page_window(records, page, query, params)
        .into_iter()
        .enumerate()
        .filter(|&(_, index)| {
            params.scope == SearchScope::Store || matches_search(&records[index], query)
        })
        .map(|(offset, index)| {
            let record = &records[index];
            Row {
                offset,
                ordinal: total - index,
                selected: selection == Some(record.id),
                record,
            }
        })
        .collect()
}

/// The "Total: N records - a to b" header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// Rows pagination is computed over.
    pub total: usize,
    /// 1-based position of the first row on the page.
    pub first: usize,
    /// 1-based position of the last row on the page.
    pub last: usize,
}

impl PageSummary {
    /// Summary for `page`, or `None` when there is nothing to show.
    #[must_use]
    pub fn new(total: usize, page: usize, page_size: usize) -> Option<Self> {
        if total == 0 {
            return None;
        }
        let (start, end) = page_bounds(total, page, page_size);
        Some(Self {
            total,
            first: start + 1,
            last: end,
        })
    }
}

impl fmt::Display for PageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.total == 1 { "record" } else { "records" };
        write!(
            f,
            "Total: {} {noun} - {} to {}",
            self.total, self.first, self.last
        )
    }
}

/// Pagination control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    /// Jump to page 1.
    First,
    /// One page back.
    Prev,
    /// One page forward.
    Next,
    /// Jump to the last page.
    Last,
    /// Jump to a specific page.
    To(usize),
}

impl PageNav {
    /// The page this request leads to, clamped into `[1, total_pages]`.
    #[must_use]
    pub fn resolve(self, current: usize, total_pages: usize) -> usize {
        let target = match self {
            Self::First => 1,
            Self::Prev => current.saturating_sub(1),
            Self::Next => current.saturating_add(1),
            Self::Last => total_pages,
            Self::To(page) => page,
        };
        clamp_page(target, total_pages)
    }
}

/// State of the first/prev/label/next/last controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page, 1-based.
    pub page: usize,
    /// Total number of pages.
    pub total_pages: usize,
    /// Whether the controls are shown at all.
    pub visible: bool,
}

impl Pagination {
    /// Controls for `page` over `total` rows.
    ///
    /// The controls are hidden when everything fits on one page.
    #[must_use]
    pub fn new(total: usize, page: usize, page_size: usize) -> Self {
        let total_pages = page_count(total, page_size);
        Self {
            page: clamp_page(page, total_pages),
            total_pages,
            visible: total > page_size.max(1),
        }
    }

    /// Whether first/prev are enabled.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.page > 1
    }

    /// Whether next/last are enabled.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.page < self.total_pages
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page {} of {}", self.page, self.total_pages)
    }
}
