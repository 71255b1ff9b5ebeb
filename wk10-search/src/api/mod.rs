//! HTTP handlers for wk10-search

pub mod search;
pub mod ui;

pub use search::{index, search};
