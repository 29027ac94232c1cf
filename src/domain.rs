use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use crate::entities::EntityKind;
use crate::grid::DEFAULT_PAGE_SIZE;

#[derive(Debug)]
pub enum SpotlessError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    InvalidCredentials,
    Config(String),
}

impl fmt::Display for SpotlessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpotlessError::IoError(e) => write!(f, "I/O error: {e}"),
            SpotlessError::PolarsError(e) => write!(f, "Data error: {e}"),
            SpotlessError::LoadingFailed(reason) => write!(f, "Loading failed: {reason}"),
            SpotlessError::FileNotFound => f.write_str("File not found"),
            SpotlessError::PermissionDenied => f.write_str("Permission denied"),
            SpotlessError::UnknownFileType => f.write_str("Unknown file type"),
            SpotlessError::InvalidCredentials => {
                f.write_str("Invalid username or password. Please try again.")
            }
            SpotlessError::Config(reason) => write!(f, "Invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for SpotlessError {}

impl From<Error> for SpotlessError {
    fn from(err: Error) -> Self {
        SpotlessError::IoError(err)
    }
}

impl From<PolarsError> for SpotlessError {
    fn from(err: PolarsError) -> Self {
        SpotlessError::PolarsError(err)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub event_poll_time: u64,
    pub page_size: usize,
    pub user: Option<String>,
    pub loads: Vec<(EntityKind, PathBuf)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            page_size: DEFAULT_PAGE_SIZE,
            user: None,
            loads: Vec::new(),
        }
    }
}

/// What the command line is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Search,
    Login,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Quit,
    NextLink,
    PreviousLink,
    Search,
    SortColumn(usize),
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    GrowPageSize,
    ShrinkPageSize,
    SelectNext,
    SelectPrevious,
    Logout,
    Help,
    Enter,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
Navigation
  Tab / Shift-Tab   next / previous page in the sidebar
  q                 quit
  ?                 this help

Tables
  /                 search (Enter applies, Esc cancels)
  1-9               sort by column, press again to reverse
  Left / h          previous page
  Right / l         next page
  g / G             first / last page
  + / -             more / fewer rows per page
  Down / j          select next row
  Up / k            select previous row
  Enter             view the selected record (Esc closes)

Session
  L                 log out
";
