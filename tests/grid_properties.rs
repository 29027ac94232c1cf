use spotless::entities::{Catalog, cleaner_columns};
use spotless::grid::{
    ColumnDescriptor, GridAction, GridConfig, GridEngine, Record, SortDirection, Value, ValueKind,
    ViewState, apply_filter, apply_sort, compute_view, format_currency, paginate,
};

fn people() -> Vec<Record> {
    let rows = [
        ("Maria", "Garcia", "Manchester", 16.0_f64),
        ("John", "Smith", "London", 15.5),
        ("ana", "Rodriguez", "Birmingham", 15.0),
        ("Mariam", "Khan", "Leeds", 16.0),
        ("Oliver", "Wilson", "London", 15.5),
        ("Grace", "Okafor", "Leeds", 16.0),
        ("liam", "Murphy", "Cardiff", 14.0),
    ];
    rows.iter()
        .enumerate()
        .map(|(i, (first, last, city, rate))| {
            Record::new()
                .with("id", i as i64)
                .with("first_name", *first)
                .with("sure_name", *last)
                .with("city", *city)
                .with("rate", *rate)
        })
        .collect()
}

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::by_name("ID", "id", ValueKind::Number).sortable(true),
        ColumnDescriptor::by_name("First", "first_name", ValueKind::Text).sortable(true),
        ColumnDescriptor::by_name("City", "city", ValueKind::Text).sortable(true),
        ColumnDescriptor::by_name("Rate", "rate", ValueKind::Number)
            .sortable(true)
            .with_format(format_currency),
    ]
}

fn ids(records: &[&Record]) -> Vec<i64> {
    records
        .iter()
        .map(|r| match r.get("id") {
            Some(Value::Number(n)) => *n as i64,
            other => panic!("unexpected id {other:?}"),
        })
        .collect()
}

#[test]
fn empty_search_keeps_every_record_in_order() {
    let records = people();
    assert_eq!(apply_filter(&records, ""), (0..records.len()).collect::<Vec<_>>());
}

#[test]
fn filter_keeps_exactly_the_matching_records() {
    let records = people();
    let rows = apply_filter(&records, "LONDON");
    assert_eq!(rows, vec![1, 4]);

    // Substring anywhere in any field, original order kept.
    let rows = apply_filter(&records, "mari");
    assert_eq!(rows, vec![0, 3]);
    for (idx, record) in records.iter().enumerate() {
        let matches = record
            .values()
            .any(|v| v.to_string().to_lowercase().contains("mari"));
        assert_eq!(rows.contains(&idx), matches);
    }
}

#[test]
fn sort_is_stable_in_both_directions() {
    let records = people();
    let rows: Vec<usize> = (0..records.len()).collect();
    let rate = &columns()[3];

    let ascending = apply_sort(&records, &rows, Some(rate), SortDirection::Ascending);
    assert_eq!(ascending, vec![6, 2, 1, 4, 0, 3, 5]);

    let descending = apply_sort(&records, &rows, Some(rate), SortDirection::Descending);
    assert_eq!(descending, vec![0, 3, 5, 1, 4, 2, 6]);
}

#[test]
fn reversing_twice_restores_ascending_order() {
    let records = people();
    let mut grid = GridEngine::new(records, columns(), GridConfig::default());
    grid.dispatch(GridAction::Sort(1));
    let ascending = ids(&grid.view().visible_records);
    grid.dispatch(GridAction::Sort(1));
    assert_eq!(grid.state().sort_direction, SortDirection::Descending);
    grid.dispatch(GridAction::Sort(1));
    assert_eq!(ids(&grid.view().visible_records), ascending);
}

#[test]
fn descending_is_the_reverse_of_ascending_for_distinct_keys() {
    let records = people();
    let rows: Vec<usize> = (0..records.len()).collect();
    let id = &columns()[0];

    let ascending = apply_sort(&records, &rows, Some(id), SortDirection::Ascending);
    let descending = apply_sort(&records, &rows, Some(id), SortDirection::Descending);
    assert_eq!(descending, ascending.iter().rev().copied().collect::<Vec<_>>());

    let mut grid = GridEngine::new(records, columns(), GridConfig::default());
    grid.dispatch(GridAction::Sort(0));
    let up = ids(&grid.view().visible_records);
    grid.dispatch(GridAction::Sort(0));
    let down = ids(&grid.view().visible_records);
    assert_eq!(down, up.into_iter().rev().collect::<Vec<_>>());
}

#[test]
fn text_sort_ignores_case() {
    let records = people();
    let mut grid = GridEngine::new(records, columns(), GridConfig::default());
    grid.dispatch(GridAction::Sort(1));
    let names: Vec<String> = grid
        .view()
        .visible_records
        .iter()
        .map(|r| r.get("first_name").map(|v| v.to_string()).unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["ana", "Grace", "John", "liam", "Maria", "Mariam", "Oliver"]);
}

#[test]
fn pages_cover_every_row_exactly_once() {
    let records = people();
    for page_size in 1..=8 {
        let mut state = ViewState::new(page_size);
        let first = compute_view(&records, &columns(), &GridConfig::default(), &state);
        let mut seen = Vec::new();
        for page in 1..=first.total_pages {
            state.current_page = page;
            let view = compute_view(&records, &columns(), &GridConfig::default(), &state);
            assert!(view.visible_records.len() <= page_size);
            seen.extend(ids(&view.visible_records));
        }
        assert_eq!(seen, (0..records.len() as i64).collect::<Vec<_>>());
    }
}

#[test]
fn out_of_range_page_is_clamped() {
    let records = people();
    let mut state = ViewState::new(3);
    state.current_page = 9999;
    let view = compute_view(&records, &columns(), &GridConfig::default(), &state);
    assert_eq!(view.current_page, 3);
    assert_eq!(ids(&view.visible_records), vec![6]);

    let page = paginate(&[1, 2, 3], 0, 2);
    assert_eq!(page.page, 1);
    assert_eq!(page.items, &[1, 2]);
}

#[test]
fn second_page_of_rates_sorted_descending() {
    let catalog = Catalog::mock();
    let mut grid = GridEngine::new(catalog.cleaners.clone(), cleaner_columns(), GridConfig::default());
    grid.dispatch(GridAction::Sort(5));
    grid.dispatch(GridAction::Sort(5));
    grid.dispatch(GridAction::GoToPage(2));

    let view = grid.view();
    let rates: Vec<String> = view
        .visible_records
        .iter()
        .map(|r| grid.columns()[5].render(r))
        .collect();
    assert_eq!(rates, vec!["£14.50", "£14.00"]);
    assert_eq!(view.range_label(), "Showing 11 to 12 of 12 results");
    assert!(view.has_previous());
    assert!(!view.has_next());
}

#[test]
fn search_is_case_insensitive() {
    let catalog = Catalog::mock();
    let mut grid = GridEngine::new(catalog.cleaners.clone(), cleaner_columns(), GridConfig::default());
    grid.dispatch(GridAction::Search("maria".into()));
    let lower = grid.view().visible_records.len();
    grid.dispatch(GridAction::Search("MARIA".into()));
    assert_eq!(grid.view().visible_records.len(), lower);
    assert_eq!(lower, 1);
    assert_eq!(grid.columns()[1].render(grid.view().visible_records[0]), "Ms Maria Garcia");
}

#[test]
fn empty_record_list_has_one_empty_page() {
    let grid = GridEngine::new(Vec::<Record>::new(), columns(), GridConfig::default());
    let view = grid.view();
    assert!(view.visible_records.is_empty());
    assert_eq!(view.total_filtered_count, 0);
    assert_eq!(view.current_page, 1);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page_window, vec![1]);
}

#[test]
fn search_resets_page_but_keeps_sort() {
    let catalog = Catalog::mock();
    let mut grid = GridEngine::new(catalog.cleaners.clone(), cleaner_columns(), GridConfig::default());
    grid.dispatch(GridAction::Sort(0));
    grid.dispatch(GridAction::NextPage);
    assert_eq!(grid.state().current_page, 2);
    grid.dispatch(GridAction::Search("a".into()));
    assert_eq!(grid.state().current_page, 1);
    assert_eq!(grid.state().sort_field, Some(0));
}
