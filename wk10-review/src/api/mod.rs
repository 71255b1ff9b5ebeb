//! HTTP handlers for wk10-review

pub mod review;
pub mod ui;

pub use review::{index, results};
