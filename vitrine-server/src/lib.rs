//! HTTP surface of the Vitrine gallery.
//!
//! The binary in `main.rs` loads configuration and serves [`app::create_app`];
//! integration tests build the same router over a temporary catalog.

pub mod app;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
