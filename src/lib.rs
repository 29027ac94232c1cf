//! Terminal admin console for a cleaning-service business.
//!
//! The data grid in [`grid`] is independent of the rest and can be used on
//! its own: give it records and column descriptors, dispatch actions, and
//! read back the current page.

pub mod auth;
pub mod controller;
pub mod dashboard;
pub mod domain;
pub mod entities;
pub mod grid;
pub mod inputter;
pub mod loader;
pub mod model;
pub mod ui;
