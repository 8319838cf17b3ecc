//! Themelens fixture backend
//!
//! Serves one dashboard bundle from a JSON file over the same two calls the
//! dashboard makes, plus a settings echo and a health check. Inference is a
//! keyword-overlap scorer over the bundle's themes.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use themelens::model::DashboardBundle;

pub mod inference;
pub mod routing;
pub mod server;

/// Shared, read-only server state.
#[derive(Debug, Clone)]
pub struct AppState {
  pub bundle: Arc<DashboardBundle>,
}

impl AppState {
  pub fn new(bundle: DashboardBundle) -> Self {
    Self { bundle: Arc::new(bundle) }
  }

  /// Load the bundle served by every request.
  pub fn load(path: &Path) -> Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read bundle file: {}", path.display()))?;
    let bundle: DashboardBundle =
      serde_json::from_str(&content).with_context(|| format!("Invalid bundle file: {}", path.display()))?;
    Ok(Self::new(bundle))
  }
}
