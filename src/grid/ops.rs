use rayon::prelude::*;

use super::column::ColumnDescriptor;
use super::record::Record;
use super::value::{Value, compare_values};

// Below this size a sequential scan beats spinning up the pool.
const PARALLEL_FILTER_THRESHOLD: usize = 2048;

// Number of page buttons shown in the pagination footer.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Returns the indices of all records with at least one field whose text
/// contains `search_text`, ignoring case. An empty search keeps every row.
///
/// Input order is preserved, including on the parallel path.
pub fn apply_filter(records: &[Record], search_text: &str) -> Vec<usize> {
    if search_text.is_empty() {
        return (0..records.len()).collect();
    }
    let needle = search_text.to_lowercase();
    let matches = |record: &Record| record.values().any(|v| v.contains_lowercase(&needle));

    if records.len() >= PARALLEL_FILTER_THRESHOLD {
        records
            .par_iter()
            .enumerate()
            .filter(|(_, r)| matches(r))
            .map(|(idx, _)| idx)
            .collect()
    } else {
        records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches(r))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Orders `rows` (indices into `records`) by `column`.
///
/// The sort is stable in both directions: rows with equal keys keep their
/// relative order from `rows`. Without a column the order is unchanged.
pub fn apply_sort(
    records: &[Record],
    rows: &[usize],
    column: Option<&ColumnDescriptor>,
    direction: SortDirection,
) -> Vec<usize> {
    let Some(column) = column else {
        return rows.to_vec();
    };

    // Evaluate every key once, derived accessors can be costly.
    let mut indexed_rows: Vec<(usize, Value)> = rows
        .iter()
        .map(|&row_idx| (row_idx, column.sort_key(&records[row_idx])))
        .collect();

    indexed_rows.sort_by(|(_, a), (_, b)| {
        let ordering = compare_values(a, b);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    indexed_rows.into_iter().map(|(idx, _)| idx).collect()
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    count.div_ceil(page_size).max(1)
}

/// A page cut out of a longer sequence.
#[derive(Debug, PartialEq)]
pub struct PageSlice<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
}

/// Cuts page `page` (1-based) out of `items`. Out of range pages are
/// clamped, so this never fails; an empty input yields one empty page.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> PageSlice<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page = page.clamp(1, total_pages);
    let begin = std::cmp::min((page - 1) * page_size, items.len());
    let end = std::cmp::min(begin + page_size, items.len());
    PageSlice {
        items: &items[begin..end],
        page,
        total_pages,
    }
}

/// Page numbers to offer as direct jumps, centred on `current` where possible.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= PAGE_WINDOW || current <= PAGE_WINDOW / 2 + 1 {
        return (1..=std::cmp::min(PAGE_WINDOW, total_pages)).collect();
    }
    let first = if current + PAGE_WINDOW / 2 >= total_pages {
        total_pages + 1 - PAGE_WINDOW
    } else {
        current - PAGE_WINDOW / 2
    };
    (first..first + PAGE_WINDOW).collect()
}
