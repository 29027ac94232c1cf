//! Generic data grid: search, sort and paginate arbitrary records.
//!
//! Views never copy records. Filter and sort produce row index mappings
//! into the caller's record list, and pagination slices that mapping:
//!
//! ```text
//! records ──filter──▶ rows ──sort──▶ rows ──paginate──▶ visible records
//! ```

pub mod column;
pub mod engine;
pub mod ops;
pub mod record;
pub mod value;

pub use column::{ColumnDescriptor, FieldAccessor, format_currency};
pub use engine::{
    DEFAULT_PAGE_SIZE, GridAction, GridConfig, GridEngine, GridView, ViewState, compute_view,
};
pub use ops::{PageSlice, SortDirection, apply_filter, apply_sort, page_window, paginate, total_pages};
pub use record::Record;
pub use value::{Value, ValueKind};
