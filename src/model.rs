use ratatui::crossterm::event::KeyEvent;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::auth::{Access, Role, Route, Session, User, UserDirectory, authorize, home_for, nav_links};
use crate::dashboard::{StatCard, stat_cards};
use crate::domain::{AppConfig, HELP_TEXT, InputMode, Message, SpotlessError};
use crate::entities::{Catalog, EntityKind};
use crate::grid::{ColumnDescriptor, FieldAccessor, GridAction, GridConfig, GridEngine, Record};
use crate::inputter::{InputResult, Inputter};
use crate::loader::columns_for;

// Page sizes offered by +/-.
const PAGE_SIZES: [usize; 5] = [5, 10, 20, 50, 100];

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    PAGE,
    POPUP,
    CMDINPUT,
    RECORD,
}

struct Table {
    kind: EntityKind,
    grid: GridEngine,
}

pub struct Model {
    config: AppConfig,
    pub status: Status,
    modus: Modus,
    session: Session,
    directory: UserDirectory,
    catalog: Catalog,
    columns: HashMap<EntityKind, Vec<ColumnDescriptor>>,
    route: Route,
    tables: HashMap<Route, Table>,
    input: Inputter,
    input_mode: Option<InputMode>,
    last_input: InputResult,
    search_before_edit: String,
    login_error: Option<String>,
    popup_message: String,
    record_fields: Vec<(String, String)>,
    status_message: String,
    last_status_message_update: Instant,
}

impl Model {
    /// Builds the model and opens the start page for the configured user.
    /// An unknown `--user` is a configuration error, not a failed login.
    pub fn init(
        config: &AppConfig,
        catalog: Catalog,
        directory: UserDirectory,
    ) -> Result<Self, SpotlessError> {
        let session = match &config.user {
            Some(username) => Session::signed_in(directory.sign_in_as(username).map_err(|_| {
                SpotlessError::Config(format!("unknown user {username}"))
            })?),
            None => Session::anonymous(),
        };

        let columns = [
            EntityKind::Cleaners,
            EntityKind::Customers,
            EntityKind::Agencies,
            EntityKind::Services,
            EntityKind::Invoices,
        ]
        .into_iter()
        .map(|kind| (kind, kind.columns()))
        .collect();

        let mut model = Self {
            config: config.clone(),
            status: Status::READY,
            modus: Modus::PAGE,
            session,
            directory,
            catalog,
            columns,
            route: Route::Login,
            tables: HashMap::new(),
            input: Inputter::default(),
            input_mode: None,
            last_input: InputResult::default(),
            search_before_edit: String::new(),
            login_error: None,
            popup_message: String::new(),
            record_fields: Vec::new(),
            status_message: "Started spotless!".to_string(),
            last_status_message_update: Instant::now(),
        };
        let start = model.session.role().map(home_for).unwrap_or(Route::Login);
        model.navigate(start);
        Ok(model)
    }

    // -------------------- Accessors for rendering ---------------------- //

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn nav_links(&self) -> Vec<Route> {
        self.session.role().map(nav_links).unwrap_or_default()
    }

    pub fn grid(&self) -> Option<&GridEngine> {
        self.tables.get(&self.route).map(|t| &t.grid)
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        match &self.session.user {
            Some(user) => stat_cards(&self.catalog, user),
            None => Vec::new(),
        }
    }

    pub fn show_popup(&self) -> bool {
        self.modus == Modus::POPUP
    }

    pub fn popup_message(&self) -> &str {
        &self.popup_message
    }

    /// Field name and value pairs of the record being viewed.
    pub fn record_view(&self) -> Option<&[(String, String)]> {
        (self.modus == Modus::RECORD).then_some(self.record_fields.as_slice())
    }

    pub fn input_mode(&self) -> Option<InputMode> {
        self.input_mode
    }

    pub fn last_input(&self) -> &InputResult {
        &self.last_input
    }

    pub fn login_error(&self) -> Option<&str> {
        self.login_error.as_deref()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn last_status_message_update(&self) -> Instant {
        self.last_status_message_update
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn raw_keyevents(&self) -> bool {
        self.modus == Modus::CMDINPUT
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
    }

    // -------------------- Data ---------------------- //

    /// Replaces the records behind every table of `kind`.
    ///
    /// Open tables keep their columns and reset their view when the new
    /// records carry the fields those columns read. Otherwise the tables
    /// switch to one column per loaded field and are rebuilt.
    pub fn replace_records(&mut self, kind: EntityKind, records: Vec<Record>) {
        let compatible = match (self.columns.get(&kind), records.first()) {
            (Some(columns), Some(first)) => columns_read_from(columns, first),
            _ => false,
        };
        info!(
            "Replacing {:?} with {} records (columns kept: {})",
            kind,
            records.len(),
            compatible
        );
        if !compatible && !records.is_empty() {
            self.columns.insert(kind, columns_for(&records));
            self.tables.retain(|_, t| t.kind != kind);
        }
        self.catalog.set(kind, Arc::new(records));

        if let Some(user) = self.session.user.clone() {
            for (route, table) in self.tables.iter_mut().filter(|(_, t)| t.kind == kind) {
                if let Some((_, rows)) = self.catalog.table_for(*route, &user) {
                    table.grid.dispatch(GridAction::ReplaceRecords(rows));
                }
            }
        }
        if self.grid().is_none() {
            self.open_table(self.route);
        }
    }

    fn open_table(&mut self, route: Route) {
        if self.tables.contains_key(&route) {
            return;
        }
        let Some(user) = self.session.user.as_ref() else {
            return;
        };
        if let Some((kind, records)) = self.catalog.table_for(route, user) {
            let columns = self
                .columns
                .get(&kind)
                .cloned()
                .unwrap_or_else(|| kind.columns());
            let config = GridConfig::default().page_size(self.config.page_size);
            debug!("Opening table {:?} for {} with {} records", kind, route.path(), records.len());
            self.tables.insert(
                route,
                Table {
                    kind,
                    grid: GridEngine::new(records, columns, config),
                },
            );
        }
    }

    // -------------------- Routing ---------------------- //

    pub fn navigate(&mut self, route: Route) {
        match authorize(&self.session, route) {
            Access::Granted => {
                trace!("Navigate to {}", route.path());
                self.route = route;
                if route == Route::Login {
                    self.enter_cmd_mode(InputMode::Login);
                } else {
                    self.open_table(route);
                }
            }
            Access::Redirect(target) => {
                self.set_status_message(format!("{} is not available to you", route.path()));
                // The home route of a signed in user is always granted.
                if target != route {
                    self.navigate(target);
                }
            }
            Access::RedirectToLogin => self.navigate(Route::Login),
            Access::Loading => self.set_status_message("Loading ..."),
        }
    }

    fn step_link(&mut self, step: isize) {
        let links = self.nav_links();
        if links.is_empty() {
            return;
        }
        let current = links.iter().position(|r| *r == self.route).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(links.len() as isize) as usize;
        self.navigate(links[next]);
    }

    // -------------------- Update ---------------------- //

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), SpotlessError> {
        let Some(msg) = message else {
            return Ok(());
        };
        match self.modus {
            Modus::PAGE => match msg {
                Message::Quit => self.quit(),
                Message::NextLink => self.step_link(1),
                Message::PreviousLink => self.step_link(-1),
                Message::Search => {
                    if self.grid().is_some_and(|g| g.config().searchable) {
                        self.enter_cmd_mode(InputMode::Search);
                    }
                }
                Message::SortColumn(idx) => self.grid_action(GridAction::Sort(idx)),
                Message::NextPage => self.grid_action(GridAction::NextPage),
                Message::PreviousPage => self.grid_action(GridAction::PreviousPage),
                Message::FirstPage => self.grid_action(GridAction::FirstPage),
                Message::LastPage => self.grid_action(GridAction::LastPage),
                Message::SelectNext => self.move_selection(GridAction::SelectNext),
                Message::SelectPrevious => self.move_selection(GridAction::SelectPrevious),
                Message::Enter => self.show_record(),
                Message::GrowPageSize => self.step_page_size(1),
                Message::ShrinkPageSize => self.step_page_size(-1),
                Message::Logout => self.logout(),
                Message::Help => self.show_help(),
                Message::Resize(width, height) => trace!("UI was resized to {width}x{height}"),
                Message::Exit | Message::RawKey(_) => (),
            },
            Modus::RECORD => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Enter => self.modus = Modus::PAGE,
                Message::SelectNext => {
                    self.move_selection(GridAction::SelectNext);
                    self.show_record();
                }
                Message::SelectPrevious => {
                    self.move_selection(GridAction::SelectPrevious);
                    self.show_record();
                }
                _ => (),
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit | Message::Enter | Message::Help => self.modus = Modus::PAGE,
                _ => (),
            },
            Modus::CMDINPUT => {
                if let Message::RawKey(key) = msg {
                    self.raw_input(key)
                }
            }
        }
        Ok(())
    }

    fn grid_action(&mut self, action: GridAction) {
        let Some(table) = self.tables.get_mut(&self.route) else {
            return;
        };
        table.grid.dispatch(action);
        let state = table.grid.state();
        let total_pages = table.grid.total_pages();
        let message = match state.sort_field.and_then(|i| table.grid.columns().get(i)) {
            Some(column) => format!(
                "Page {}/{} sorted by {} {}",
                state.current_page,
                total_pages,
                column.label,
                state.sort_direction.arrow()
            ),
            None => format!("Page {}/{}", state.current_page, total_pages),
        };
        self.set_status_message(message);
    }

    fn move_selection(&mut self, action: GridAction) {
        if let Some(table) = self.tables.get_mut(&self.route) {
            table.grid.dispatch(action);
        }
    }

    fn show_record(&mut self) {
        let fields: Option<Vec<(String, String)>> =
            self.grid().and_then(|g| g.selected_record()).map(|record| {
                record
                    .fields()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect()
            });
        match fields {
            Some(fields) => {
                trace!("Viewing record with {} fields", fields.len());
                self.record_fields = fields;
                self.modus = Modus::RECORD;
            }
            None => self.set_status_message("No record selected"),
        }
    }

    fn step_page_size(&mut self, step: isize) {
        let Some(grid) = self.grid() else {
            return;
        };
        let current = grid.state().page_size;
        let next = if step > 0 {
            PAGE_SIZES.iter().copied().find(|&s| s > current)
        } else {
            PAGE_SIZES.iter().copied().rev().find(|&s| s < current)
        };
        if let Some(size) = next {
            self.grid_action(GridAction::SetPageSize(size));
            self.set_status_message(format!("Showing {size} rows per page"));
        }
    }

    fn logout(&mut self) {
        self.session.logout();
        self.tables.clear();
        self.set_status_message("Signed out");
        self.navigate(Route::Login);
    }

    fn login(&mut self, username: &str) {
        match self.session.login(&self.directory, username) {
            Ok(User { username, role, .. }) => {
                self.login_error = None;
                self.tables.clear();
                self.set_status_message(format!("Welcome {username}"));
                self.navigate(home_for(role));
            }
            Err(e) => {
                warn!("Login failed for {username:?}");
                self.login_error = Some(e.to_string());
                self.enter_cmd_mode(InputMode::Login);
            }
        }
    }

    fn show_help(&mut self) {
        self.popup_message = HELP_TEXT.to_string();
        self.modus = Modus::POPUP;
    }

    fn enter_cmd_mode(&mut self, mode: InputMode) {
        self.input.clear();
        if mode == InputMode::Search {
            self.search_before_edit = self
                .grid()
                .map(|g| g.state().search_text.clone())
                .unwrap_or_default();
            let search = self.search_before_edit.clone();
            self.input.set(&search);
        }
        self.last_input = self.input.get();
        self.input_mode = Some(mode);
        self.modus = Modus::CMDINPUT;
    }

    fn leave_cmd_mode(&mut self) {
        self.input_mode = None;
        self.modus = Modus::PAGE;
    }

    fn raw_input(&mut self, key: KeyEvent) {
        let result = self.input.read(key);
        self.last_input = result.clone();
        match self.input_mode {
            Some(InputMode::Search) => {
                if result.canceled {
                    let previous = self.search_before_edit.clone();
                    self.grid_action(GridAction::Search(previous));
                    self.leave_cmd_mode();
                    return;
                }
                // Search as you type, like the search box it replaces.
                self.grid_action(GridAction::Search(result.input.clone()));
                if result.finished {
                    if let Some(view) = self.grid().map(|g| g.view().total_filtered_count) {
                        self.set_status_message(format!("Found {view} results"));
                    }
                    self.leave_cmd_mode();
                }
            }
            Some(InputMode::Login) => {
                if result.canceled {
                    self.quit();
                } else if result.finished {
                    self.leave_cmd_mode();
                    self.login(&result.input);
                }
            }
            None => self.leave_cmd_mode(),
        }
    }
}

// True when every named field the columns read exists on `record`.
fn columns_read_from(columns: &[ColumnDescriptor], record: &Record) -> bool {
    columns.iter().all(|c| match &c.accessor {
        FieldAccessor::ByName(name) => record.get(name).is_some(),
        FieldAccessor::Derived(_) => true,
    })
}

/// Role of the signed in user, for the header.
pub fn role_label(session: &Session) -> &'static str {
    session.role().map(|r: Role| r.as_str()).unwrap_or("guest")
}
