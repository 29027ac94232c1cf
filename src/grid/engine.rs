use derive_setters::Setters;
use std::sync::Arc;
use tracing::trace;

use super::column::ColumnDescriptor;
use super::ops::{SortDirection, apply_filter, apply_sort, page_window, paginate, total_pages};
use super::record::Record;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Static behaviour of one table.
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
pub struct GridConfig {
    pub searchable: bool,
    pub paginated: bool,
    pub page_size: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            searchable: true,
            paginated: true,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Search, sort and page position of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_text: String,
    pub sort_field: Option<usize>, // Index into the column list
    pub sort_direction: SortDirection,
    pub current_page: usize,
    pub page_size: usize,
    pub selected_row: usize, // Position on the current page
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            sort_field: None,
            sort_direction: SortDirection::Ascending,
            current_page: 1,
            page_size: page_size.max(1),
            selected_row: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum GridAction {
    Search(String),
    Sort(usize),
    GoToPage(usize),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    SetPageSize(usize),
    ReplaceRecords(Arc<Vec<Record>>),
    SelectNext,
    SelectPrevious,
}

/// What a table has to draw after filter, sort and paginate.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView<'a> {
    pub visible_records: Vec<&'a Record>,
    pub total_filtered_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_window: Vec<usize>,
    /// Highlighted position in `visible_records`, `None` on an empty page.
    pub selected: Option<usize>,
    /// 1-based position of the first visible record, 0 when nothing is shown.
    pub first_shown: usize,
    pub last_shown: usize,
}

impl GridView<'_> {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn range_label(&self) -> String {
        format!(
            "Showing {} to {} of {} results",
            self.first_shown, self.last_shown, self.total_filtered_count
        )
    }
}

/// Computes the view for `state` without keeping anything around.
pub fn compute_view<'a>(
    records: &'a [Record],
    columns: &[ColumnDescriptor],
    config: &GridConfig,
    state: &ViewState,
) -> GridView<'a> {
    let rows = derive_rows(records, columns, config, state);
    build_view(records, &rows, config, state)
}

fn derive_rows(
    records: &[Record],
    columns: &[ColumnDescriptor],
    config: &GridConfig,
    state: &ViewState,
) -> Vec<usize> {
    let search = if config.searchable {
        state.search_text.as_str()
    } else {
        ""
    };
    let filtered = apply_filter(records, search);
    let column = state.sort_field.and_then(|idx| columns.get(idx));
    apply_sort(records, &filtered, column, state.sort_direction)
}

fn build_view<'a>(
    records: &'a [Record],
    rows: &[usize],
    config: &GridConfig,
    state: &ViewState,
) -> GridView<'a> {
    let (page, total, slice_begin, slice) = if config.paginated {
        let page = paginate(rows, state.current_page, state.page_size);
        let begin = (page.page - 1) * state.page_size.max(1);
        (page.page, page.total_pages, begin, page.items)
    } else {
        (1, 1, 0, rows)
    };

    let visible_records: Vec<&Record> = slice.iter().map(|&idx| &records[idx]).collect();
    let (first_shown, last_shown) = if visible_records.is_empty() {
        (0, 0)
    } else {
        (slice_begin + 1, slice_begin + visible_records.len())
    };
    let selected = (!visible_records.is_empty())
        .then(|| state.selected_row.min(visible_records.len() - 1));

    GridView {
        visible_records,
        total_filtered_count: rows.len(),
        current_page: page,
        total_pages: total,
        page_window: page_window(page, total),
        selected,
        first_shown,
        last_shown,
    }
}

/// A table's records, columns and view state.
///
/// The filtered and sorted row mapping is cached and only rebuilt when the
/// search, the sort or the records change. Paging just re-slices it.
pub struct GridEngine {
    records: Arc<Vec<Record>>,
    columns: Vec<ColumnDescriptor>,
    config: GridConfig,
    state: ViewState,
    rows: Arc<Vec<usize>>, // Filtered and sorted mapping of view row to record index
}

impl GridEngine {
    pub fn new(
        records: impl Into<Arc<Vec<Record>>>,
        columns: Vec<ColumnDescriptor>,
        config: GridConfig,
    ) -> Self {
        let state = ViewState::new(config.page_size);
        let mut engine = Self {
            records: records.into(),
            columns,
            config,
            state,
            rows: Arc::new(Vec::new()),
        };
        engine.rebuild_rows();
        engine
    }

    pub fn records(&self) -> &Arc<Vec<Record>> {
        &self.records
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn total_pages(&self) -> usize {
        if self.config.paginated {
            total_pages(self.rows.len(), self.state.page_size)
        } else {
            1
        }
    }

    /// Sort direction to show next to column `idx`, if it is the sort column.
    pub fn sort_indicator(&self, idx: usize) -> Option<SortDirection> {
        (self.state.sort_field == Some(idx)).then_some(self.state.sort_direction)
    }

    pub fn dispatch(&mut self, action: GridAction) {
        trace!("Grid action {:?}", action);
        match action {
            GridAction::Search(text) => {
                self.state.search_text = text;
                self.state.current_page = 1;
                self.state.selected_row = 0;
                self.rebuild_rows();
            }
            GridAction::Sort(idx) => {
                match self.columns.get(idx) {
                    Some(column) if column.sortable => {}
                    _ => {
                        trace!("Ignoring sort request on column {idx}");
                        return;
                    }
                }
                if self.state.sort_field == Some(idx) {
                    self.state.sort_direction = self.state.sort_direction.toggled();
                } else {
                    self.state.sort_field = Some(idx);
                    self.state.sort_direction = SortDirection::Ascending;
                }
                self.state.selected_row = 0;
                self.rebuild_rows();
            }
            GridAction::GoToPage(page) => self.go_to_page(page),
            GridAction::NextPage => self.go_to_page(self.state.current_page.saturating_add(1)),
            GridAction::PreviousPage => self.go_to_page(self.state.current_page.saturating_sub(1)),
            GridAction::FirstPage => self.go_to_page(1),
            GridAction::LastPage => self.go_to_page(self.total_pages()),
            GridAction::SetPageSize(size) => {
                self.state.page_size = size.max(1);
                self.state.current_page = 1;
                self.state.selected_row = 0;
            }
            GridAction::ReplaceRecords(records) => {
                self.records = records;
                self.state = ViewState::new(self.config.page_size);
                self.rebuild_rows();
            }
            GridAction::SelectNext => {
                if self.state.selected_row + 1 < self.page_len() {
                    self.state.selected_row += 1;
                } else if self.state.current_page < self.total_pages() {
                    self.go_to_page(self.state.current_page + 1);
                }
            }
            GridAction::SelectPrevious => {
                if self.state.selected_row > 0 {
                    self.state.selected_row = (self.state.selected_row - 1).min(self.page_len().saturating_sub(1));
                } else if self.state.current_page > 1 {
                    self.go_to_page(self.state.current_page - 1);
                    self.state.selected_row = self.page_len().saturating_sub(1);
                }
            }
        }
    }

    /// The record under the selection cursor, if the page has any rows.
    pub fn selected_record(&self) -> Option<&Record> {
        let view = self.view();
        view.selected.map(|idx| view.visible_records[idx])
    }

    // Number of rows on the current page.
    fn page_len(&self) -> usize {
        if self.config.paginated {
            paginate(&self.rows, self.state.current_page, self.state.page_size).items.len()
        } else {
            self.rows.len()
        }
    }

    pub fn view(&self) -> GridView<'_> {
        build_view(&self.records, &self.rows, &self.config, &self.state)
    }

    fn go_to_page(&mut self, page: usize) {
        self.state.current_page = page.clamp(1, self.total_pages());
        self.state.selected_row = 0;
    }

    fn rebuild_rows(&mut self) {
        self.rows = Arc::new(derive_rows(
            &self.records,
            &self.columns,
            &self.config,
            &self.state,
        ));
        self.state.current_page = self.state.current_page.clamp(1, self.total_pages());
        trace!(
            "Rebuilt grid rows: {} of {} records, page {}/{}",
            self.rows.len(),
            self.records.len(),
            self.state.current_page,
            self.total_pages()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::value::{Value, ValueKind};

    fn rates(values: &[f64]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, &rate)| Record::new().with("id", i as i64).with("rate", rate))
            .collect()
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::by_name("ID", "id", ValueKind::Number).sortable(true),
            ColumnDescriptor::by_name("Rate", "rate", ValueKind::Number).sortable(true),
            ColumnDescriptor::by_name("Note", "note", ValueKind::Text),
        ]
    }

    fn rate_of(r: &Record) -> f64 {
        match r.get("rate") {
            Some(Value::Number(n)) => *n,
            _ => panic!("rate missing"),
        }
    }

    #[test]
    fn sort_requests_toggle_direction() {
        let mut engine = GridEngine::new(rates(&[2.0, 1.0, 3.0]), columns(), GridConfig::default());
        engine.dispatch(GridAction::Sort(1));
        assert_eq!(engine.state().sort_direction, SortDirection::Ascending);
        engine.dispatch(GridAction::Sort(1));
        assert_eq!(engine.state().sort_direction, SortDirection::Descending);
        let view = engine.view();
        let got: Vec<f64> = view.visible_records.iter().map(|r| rate_of(r)).collect();
        assert_eq!(got, vec![3.0, 2.0, 1.0]);

        engine.dispatch(GridAction::Sort(0));
        assert_eq!(engine.state().sort_field, Some(0));
        assert_eq!(engine.state().sort_direction, SortDirection::Ascending);
        assert_eq!(engine.sort_indicator(0), Some(SortDirection::Ascending));
        assert_eq!(engine.sort_indicator(1), None);
    }

    #[test]
    fn unsortable_or_unknown_columns_are_ignored() {
        let mut engine = GridEngine::new(rates(&[2.0, 1.0]), columns(), GridConfig::default());
        engine.dispatch(GridAction::Sort(2));
        engine.dispatch(GridAction::Sort(17));
        assert_eq!(engine.state().sort_field, None);
    }

    #[test]
    fn search_resets_page() {
        let values: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let mut engine = GridEngine::new(rates(&values), columns(), GridConfig::default());
        engine.dispatch(GridAction::GoToPage(3));
        assert_eq!(engine.state().current_page, 3);
        engine.dispatch(GridAction::Search("1".into()));
        assert_eq!(engine.state().current_page, 1);
    }

    #[test]
    fn page_navigation_is_clamped() {
        let values: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let mut engine = GridEngine::new(rates(&values), columns(), GridConfig::default());
        engine.dispatch(GridAction::PreviousPage);
        assert_eq!(engine.state().current_page, 1);
        engine.dispatch(GridAction::GoToPage(99));
        assert_eq!(engine.state().current_page, 3);
        engine.dispatch(GridAction::NextPage);
        assert_eq!(engine.state().current_page, 3);
        let view = engine.view();
        assert_eq!(view.visible_records.len(), 5);
        assert_eq!(view.range_label(), "Showing 21 to 25 of 25 results");
        assert!(view.has_previous());
        assert!(!view.has_next());
        engine.dispatch(GridAction::FirstPage);
        assert_eq!(engine.state().current_page, 1);
        engine.dispatch(GridAction::LastPage);
        assert_eq!(engine.state().current_page, 3);
    }

    #[test]
    fn page_size_change_resets_page() {
        let values: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let mut engine = GridEngine::new(rates(&values), columns(), GridConfig::default());
        engine.dispatch(GridAction::GoToPage(2));
        engine.dispatch(GridAction::SetPageSize(20));
        assert_eq!(engine.state().current_page, 1);
        assert_eq!(engine.total_pages(), 2);
        engine.dispatch(GridAction::SetPageSize(0));
        assert_eq!(engine.state().page_size, 1);
    }

    #[test]
    fn replacing_records_resets_state() {
        let mut engine = GridEngine::new(rates(&[1.0, 2.0]), columns(), GridConfig::default());
        engine.dispatch(GridAction::Search("2".into()));
        engine.dispatch(GridAction::Sort(1));
        engine.dispatch(GridAction::ReplaceRecords(Arc::new(rates(&[5.0, 6.0, 7.0]))));
        assert_eq!(engine.state(), &ViewState::new(DEFAULT_PAGE_SIZE));
        assert_eq!(engine.view().total_filtered_count, 3);
    }

    #[test]
    fn disabled_search_and_pagination() {
        let values: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let config = GridConfig::default().searchable(false).paginated(false);
        let mut engine = GridEngine::new(rates(&values), columns(), config);
        engine.dispatch(GridAction::Search("nothing matches this".into()));
        engine.dispatch(GridAction::GoToPage(2));
        let view = engine.view();
        assert_eq!(view.visible_records.len(), 25);
        assert_eq!((view.current_page, view.total_pages), (1, 1));
    }

    #[test]
    fn selection_moves_across_pages() {
        let values: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let mut engine = GridEngine::new(rates(&values), columns(), GridConfig::default());
        assert_eq!(engine.view().selected, Some(0));
        engine.dispatch(GridAction::SelectPrevious);
        assert_eq!(engine.view().selected, Some(0));
        for _ in 0..10 {
            engine.dispatch(GridAction::SelectNext);
        }
        assert_eq!(engine.state().current_page, 2);
        assert_eq!(engine.view().selected, Some(0));
        assert_eq!(engine.selected_record().map(rate_of), Some(10.0));
        engine.dispatch(GridAction::SelectNext);
        engine.dispatch(GridAction::SelectNext);
        assert_eq!(engine.selected_record().map(rate_of), Some(11.0));

        engine.dispatch(GridAction::FirstPage);
        assert_eq!(engine.selected_record().map(rate_of), Some(0.0));
        engine.dispatch(GridAction::LastPage);
        engine.dispatch(GridAction::SelectPrevious);
        assert_eq!(engine.state().current_page, 1);
        assert_eq!(engine.selected_record().map(rate_of), Some(9.0));
    }

    #[test]
    fn empty_page_has_no_selection() {
        let mut engine = GridEngine::new(rates(&[1.0]), columns(), GridConfig::default());
        engine.dispatch(GridAction::Search("nothing".into()));
        engine.dispatch(GridAction::SelectNext);
        assert_eq!(engine.view().selected, None);
        assert!(engine.selected_record().is_none());
    }

    #[test]
    fn range_label_uses_normalised_page_size() {
        let records = rates(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut state = ViewState::new(1);
        state.page_size = 0;
        state.current_page = 3;
        let view = compute_view(&records, &columns(), &GridConfig::default(), &state);
        assert_eq!(view.visible_records.iter().map(|r| rate_of(r)).collect::<Vec<_>>(), vec![2.0]);
        assert_eq!(view.range_label(), "Showing 3 to 3 of 7 results");
    }

    #[test]
    fn compute_view_matches_engine() {
        let records = rates(&[3.0, 1.0, 2.0]);
        let mut state = ViewState::new(2);
        state.sort_field = Some(1);
        let view = compute_view(&records, &columns(), &GridConfig::default(), &state);
        let got: Vec<f64> = view.visible_records.iter().map(|r| rate_of(r)).collect();
        assert_eq!(got, vec![1.0, 2.0]);
        assert_eq!(view.total_pages, 2);
    }
}
