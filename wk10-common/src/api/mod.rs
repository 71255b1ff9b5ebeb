//! HTTP routes shared by every wk10 app

pub mod health;

pub use health::{health_routes, HealthResponse};
