//! MedTrack clinical equipment maintenance server
//!
//! REST JSON API tracking medical equipment, the maintenance performed on it
//! and the service orders opened against it. Status changes of maintenance
//! records and service orders follow the rules in [`lifecycle`].

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod helpers;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
