//! # wk10 Common Library
//!
//! Shared code for the wk10 web apps:
//! - Error type
//! - Configuration file loading and tracing setup
//! - Health check routes
//! - HTML page shell and escaping
//! - Graceful shutdown signal

pub mod api;
pub mod config;
pub mod error;
pub mod html;
pub mod shutdown;

pub use error::{Error, Result};
