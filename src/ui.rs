use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
};

use crate::auth::Route;
use crate::domain::{AppConfig, InputMode};
use crate::grid::{GridEngine, GridView};
use crate::model::{Model, role_label};

const SIDEBAR_WIDTH: u16 = 24;
const STAT_CARD_HEIGHT: u16 = 5;

pub struct AdminUI {}

impl AdminUI {
    pub fn new(_cfg: &AppConfig) -> Self {
        Self {}
    }

    pub fn draw(&self, model: &Model, frame: &mut Frame) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        draw_header(model, frame, layout[0]);

        if model.route() == Route::Login {
            draw_login(model, frame, layout[1]);
        } else {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
                .split(layout[1]);
            draw_sidebar(model, frame, body[0]);
            match model.grid() {
                Some(grid) => draw_grid(model.route(), grid, frame, body[1]),
                None if model.route() == Route::Settings => draw_settings(model, frame, body[1]),
                None => draw_dashboard(model, frame, body[1]),
            }
        }

        draw_status_line(model, frame, layout[2]);

        if let Some(fields) = model.record_view() {
            draw_record(model.route(), fields, frame);
        }

        if model.show_popup() {
            let area = centered_rect(60, 70, frame.area());
            frame.render_widget(Clear, area);
            let popup = Paragraph::new(model.popup_message())
                .block(Block::default().title(" Help ").borders(Borders::ALL))
                .wrap(Wrap { trim: false });
            frame.render_widget(popup, area);
        }
    }
}

fn draw_header(model: &Model, frame: &mut Frame, area: Rect) {
    let user = match &model.session().user {
        Some(user) => format!("{} ({}) ", user.username, role_label(model.session())),
        None => "not signed in ".to_string(),
    };
    let line = Line::from(vec![
        " Spotless Admin ".bold().reversed(),
        format!(" {}", model.route().title()).bold(),
    ]);
    let user = Line::from(user.yellow());
    let parts = split_right(area, user.width());
    frame.render_widget(Paragraph::new(line), parts[0]);
    frame.render_widget(Paragraph::new(user).alignment(Alignment::Right), parts[1]);
}

// Left part takes what the right-aligned `right_width` cells leave over.
fn split_right(area: Rect, right_width: usize) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right_width as u16)])
        .split(area)
}

fn draw_sidebar(model: &Model, frame: &mut Frame, area: Rect) {
    let links = model.nav_links();
    let items: Vec<ListItem> = links
        .iter()
        .map(|route| ListItem::new(format!(" {}", route.title())))
        .collect();
    let mut state = ListState::default().with_selected(links.iter().position(|r| *r == model.route()));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Menu "))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶");
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_grid(route: Route, grid: &GridEngine, frame: &mut Frame, area: Rect) {
    let view = grid.view();
    // A single page needs no pager.
    let show_pagination = grid.config().paginated && view.total_pages > 1;
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if grid.config().searchable { 1 } else { 0 }),
            Constraint::Min(3),
            Constraint::Length(if show_pagination { 1 } else { 0 }),
        ])
        .split(area);

    if grid.config().searchable {
        let search = &grid.state().search_text;
        let line = if search.is_empty() {
            Line::from(" Search... (press /)".dark_gray())
        } else {
            Line::from(vec![" Search: ".into(), search.clone().bold()])
        };
        frame.render_widget(Paragraph::new(line), layout[0]);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", route.title()));

    if view.visible_records.is_empty() {
        let empty = Paragraph::new("No data available")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, layout[1]);
    } else {
        frame.render_widget(build_table(grid, &view).block(block), layout[1]);
    }

    if show_pagination {
        draw_pagination(&view, frame, layout[2]);
    }
}

fn build_table<'a>(grid: &'a GridEngine, view: &GridView<'a>) -> Table<'a> {
    let columns = grid.columns();
    let header = Row::new(columns.iter().enumerate().map(|(idx, column)| {
        let mut label = column.label.clone();
        if column.sortable && idx < 9 {
            label = format!("{} {}", idx + 1, label);
        }
        if let Some(direction) = grid.sort_indicator(idx) {
            label = format!("{} {}", label, direction.arrow());
        }
        Cell::from(label)
    }))
    .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));

    let rows = view.visible_records.iter().enumerate().map(|(n, record)| {
        let style = if view.selected == Some(n) {
            Style::default().add_modifier(Modifier::REVERSED)
        } else if n % 2 == 0 {
            Style::default()
        } else {
            Style::default().bg(Color::Rgb(30, 30, 30))
        };
        Row::new(columns.iter().map(|column| Cell::from(column.render(record)))).style(style)
    });

    let widths = vec![Constraint::Fill(1); columns.len()];
    Table::new(rows, widths).header(header).column_spacing(1)
}

fn draw_pagination(view: &GridView, frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    let prev = if view.has_previous() { "‹ Prev ".into() } else { "‹ Prev ".dark_gray() };
    spans.push(prev);
    for page in &view.page_window {
        let label = format!(" {page} ");
        spans.push(if *page == view.current_page {
            label.reversed().bold()
        } else {
            label.into()
        });
    }
    let next = if view.has_next() { " Next › ".into() } else { " Next › ".dark_gray() };
    spans.push(next);
    let pages = Line::from(spans);
    let parts = split_right(area, pages.width());
    frame.render_widget(Paragraph::new(format!(" {}", view.range_label())), parts[0]);
    frame.render_widget(Paragraph::new(pages).alignment(Alignment::Right), parts[1]);
}

fn draw_record(route: Route, fields: &[(String, String)], frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);
    let rows = fields.iter().map(|(name, value)| {
        Row::new(vec![Cell::from(name.clone().bold()), Cell::from(value.clone())])
    });
    let table = Table::new(rows, [Constraint::Percentage(35), Constraint::Percentage(65)])
        .column_spacing(2)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" View {} ", route.title()))
                .title_bottom(Line::from(" Esc closes ").centered()),
        );
    frame.render_widget(table, area);
}

fn draw_dashboard(model: &Model, frame: &mut Frame, area: Rect) {
    let cards = model.stat_cards();
    if cards.is_empty() {
        return;
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(STAT_CARD_HEIGHT), Constraint::Min(0)])
        .split(area);
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, cards.len() as u32); cards.len()])
        .split(rows[0]);
    for (card, slot) in cards.iter().zip(slots.iter()) {
        let text = Text::from(vec![Line::from(""), Line::from(card.value.clone().bold())]);
        let widget = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", card.title)));
        frame.render_widget(widget, *slot);
    }
}

fn draw_settings(model: &Model, frame: &mut Frame, area: Rect) {
    let config = model.config();
    let mut lines = Vec::new();
    if let Some(user) = &model.session().user {
        lines.push(Line::from(vec!["User:      ".into(), user.username.clone().bold()]));
        lines.push(Line::from(vec!["Role:      ".into(), user.role.as_str().bold()]));
        lines.push(Line::from(vec!["User ID:   ".into(), user.user_id.to_string().bold()]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Page size: {}", config.page_size)));
    if config.loads.is_empty() {
        lines.push(Line::from("Data:      built-in sample records"));
    }
    for (kind, path) in &config.loads {
        lines.push(Line::from(format!("Data:      {:?} from {}", kind, path.display())));
    }
    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Settings "));
    frame.render_widget(widget, area);
}

fn draw_login(model: &Model, frame: &mut Frame, area: Rect) {
    let form = centered_rect(50, 40, area);
    frame.render_widget(Clear, form);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Sign in to your account ");
    let inner = block.inner(form);
    frame.render_widget(block, form);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(" Username"), rows[0]);
    let input = model.last_input();
    frame.render_widget(
        Paragraph::new(input.input.as_str()).block(Block::default().borders(Borders::ALL)),
        rows[1],
    );
    if model.input_mode() == Some(InputMode::Login) {
        frame.set_cursor_position(Position::new(
            rows[1].x + 1 + input.cursor_pos as u16,
            rows[1].y + 1,
        ));
    }
    if let Some(error) = model.login_error() {
        frame.render_widget(Paragraph::new(error.red()), rows[2]);
    }
    frame.render_widget(
        Paragraph::new("Enter signs in, Esc quits".dark_gray()).alignment(Alignment::Center),
        rows[3],
    );
}

fn draw_status_line(model: &Model, frame: &mut Frame, area: Rect) {
    if model.input_mode() == Some(InputMode::Search) {
        let input = model.last_input();
        frame.render_widget(Paragraph::new(format!("/{}", input.input)), area);
        frame.set_cursor_position(Position::new(area.x + 1 + input.cursor_pos as u16, area.y));
        return;
    }
    let line = Line::from(vec![
        format!(" {} ", model.status_message()).into(),
        "| ? help | q quit".dark_gray(),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().fg(Color::Yellow)), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::UserDirectory;
    use crate::domain::Message;
    use crate::entities::Catalog;
    use ratatui::{Terminal, backend::TestBackend};

    fn render(model: &Model) -> String {
        let ui = AdminUI::new(model.config());
        let mut terminal = Terminal::new(TestBackend::new(160, 30)).unwrap();
        terminal.draw(|f| ui.draw(model, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn model_for(user: Option<&str>) -> Model {
        let config = AppConfig {
            user: user.map(Into::into),
            ..AppConfig::default()
        };
        Model::init(&config, Catalog::mock(), UserDirectory::mock()).unwrap()
    }

    #[test]
    fn login_screen_is_drawn_without_session() {
        let screen = render(&model_for(None));
        assert!(screen.contains("Sign in to your account"));
        assert!(screen.contains("not signed in"));
    }

    #[test]
    fn table_page_shows_rows_and_pagination() {
        let mut model = model_for(Some("admin"));
        model.navigate(Route::Cleaners);
        model.update(Some(Message::SortColumn(5))).unwrap();
        let screen = render(&model);
        assert!(screen.contains("6 Rate ▲"));
        assert!(screen.contains("Showing 1 to 10 of 12 results"));
        assert!(screen.contains("Next ›"));
        assert!(screen.contains("£14.00"));
    }

    #[test]
    fn empty_search_shows_placeholder() {
        let mut model = model_for(Some("admin"));
        model.navigate(Route::Cleaners);
        model.update(Some(Message::Search)).unwrap();
        for c in "zzzz".chars() {
            let key = ratatui::crossterm::event::KeyEvent::from(
                ratatui::crossterm::event::KeyCode::Char(c),
            );
            model.update(Some(Message::RawKey(key))).unwrap();
        }
        let screen = render(&model);
        assert!(screen.contains("No data available"));
        assert!(!screen.contains("Showing"));
    }

    #[test]
    fn single_page_hides_the_pager() {
        let mut model = model_for(Some("admin"));
        model.navigate(Route::Agencies);
        let screen = render(&model);
        assert!(screen.contains("CleanCo Lettings"));
        assert!(!screen.contains("Next ›"));
        assert!(!screen.contains("Showing"));
    }

    #[test]
    fn record_popup_lists_fields() {
        let mut model = model_for(Some("admin"));
        model.navigate(Route::Cleaners);
        model.update(Some(Message::SelectNext)).unwrap();
        model.update(Some(Message::Enter)).unwrap();
        let screen = render(&model);
        assert!(screen.contains("View Cleaners"));
        assert!(screen.contains("maria.garcia@example.com"));
        assert!(screen.contains("register_date"));
    }

    #[test]
    fn dashboard_shows_stat_cards() {
        let screen = render(&model_for(Some("admin")));
        assert!(screen.contains("Total Customers"));
        assert!(screen.contains("£485.50"));
        assert!(screen.contains("admin (admin)"));
    }
}
