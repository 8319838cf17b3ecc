//! Themelens - Topic Model Dashboard Engine
//!
//! Loads one dashboard bundle describing a topic-modeling run and keeps every
//! view built from it (charts, document tables, theme and document detail
//! modals) linked through a single shared color and identity mapping.

pub mod backend;
pub mod charts;
pub mod cli;
pub mod colors;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod metrics;
pub mod modal;
pub mod model;
pub mod notice;
pub mod store;
pub mod table;

/// Shown wherever a value is absent or cannot be displayed.
pub const PLACEHOLDER: &str = "—";

pub use backend::{DashboardBackend, HttpBackend};
pub use config::ClientConfig;
pub use dashboard::{Dashboard, Effect, Interaction};
pub use error::{BootError, ConfigError, InferenceError};
pub use store::{BundleStore, ColorLookup};
