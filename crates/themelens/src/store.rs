//! Dashboard bundle store
//!
//! Holds the one bundle fetched at boot, with colors attached, plus read-only
//! indices by theme id and theme label. Every view reads from here and asks it
//! for theme colors through [`ColorLookup`].

use std::collections::HashMap;
use tracing::{info, warn};

use crate::backend::DashboardBackend;
use crate::colors::{self, DEFAULT_COLOR};
use crate::error::BootError;
use crate::model::{DashboardBundle, DiagnosticsRow, Document, SimilarityEntry, Theme, ThemeId};

/// Read-only color service shared by every renderer.
pub trait ColorLookup {
  /// Color for a theme id; unknown ids get a fixed default, never an error.
  fn color_of(&self, theme_id: ThemeId) -> String;
}

/// The loaded bundle and its lookup tables.
#[derive(Debug, Clone)]
pub struct BundleStore {
  bundle: DashboardBundle,
  by_id: HashMap<ThemeId, usize>,
  by_label: HashMap<String, usize>,
  colors: HashMap<ThemeId, String>,
  ambiguous_labels: Vec<String>,
}

impl BundleStore {
  /// Fetch the bundle for `model` and build the store from it.
  pub async fn load(backend: &dyn DashboardBackend, model: &str) -> Result<Self, BootError> {
    let bundle = backend.dashboard_data(model).await?;
    info!(
      themes = bundle.themes.len(),
      documents = bundle.documents.len(),
      "Dashboard bundle loaded"
    );
    Ok(Self::from_bundle(bundle))
  }

  /// Attach colors and build indices. Runs once, before anything renders.
  pub fn from_bundle(mut bundle: DashboardBundle) -> Self {
    let mut slots: Vec<Option<String>> = bundle.themes.iter().map(|t| t.color.clone()).collect();
    colors::fill_missing(&mut slots);
    for (theme, color) in bundle.themes.iter_mut().zip(slots) {
      theme.color = color;
    }

    let mut by_id = HashMap::new();
    let mut by_label = HashMap::new();
    let mut colors = HashMap::new();
    let mut ambiguous_labels = Vec::new();

    for (index, theme) in bundle.themes.iter().enumerate() {
      if by_id.contains_key(&theme.id) {
        warn!(theme_id = theme.id, "Duplicate theme id in bundle; first match wins");
      } else {
        by_id.insert(theme.id, index);
        colors.insert(theme.id, theme.color.clone().unwrap_or_else(|| DEFAULT_COLOR.to_string()));
      }

      if by_label.contains_key(&theme.label) {
        if !ambiguous_labels.contains(&theme.label) {
          warn!(label = %theme.label, "Theme label shared by several themes; first match wins");
          ambiguous_labels.push(theme.label.clone());
        }
      } else {
        by_label.insert(theme.label.clone(), index);
      }
    }

    Self { bundle, by_id, by_label, colors, ambiguous_labels }
  }

  pub fn bundle(&self) -> &DashboardBundle {
    &self.bundle
  }

  pub fn themes(&self) -> &[Theme] {
    &self.bundle.themes
  }

  pub fn documents(&self) -> &[Document] {
    &self.bundle.documents
  }

  pub fn theme(&self, id: ThemeId) -> Option<&Theme> {
    self.by_id.get(&id).map(|&i| &self.bundle.themes[i])
  }

  /// First theme carrying `label`.
  pub fn theme_by_label(&self, label: &str) -> Option<&Theme> {
    self.by_label.get(label).map(|&i| &self.bundle.themes[i])
  }

  /// The theme a document points at through its label.
  pub fn theme_of(&self, document: &Document) -> Option<&Theme> {
    self.theme_by_label(&document.theme)
  }

  /// Diagnostics row joined by label; first match wins.
  pub fn diagnostics_for(&self, label: &str) -> Option<&DiagnosticsRow> {
    self.bundle.diagnostics.iter().find(|row| row.theme() == Some(label))
  }

  /// Similarity entries for a theme id, empty when the bundle has none.
  pub fn similarities_for(&self, id: ThemeId) -> &[SimilarityEntry] {
    self.bundle.similarities.get(&id.to_string()).map(Vec::as_slice).unwrap_or(&[])
  }

  /// Documents whose theme label equals `label`, in bundle order.
  pub fn documents_for(&self, label: &str) -> Vec<Document> {
    self.bundle.documents.iter().filter(|d| d.theme == label).cloned().collect()
  }

  /// Labels used by more than one theme.
  pub fn ambiguous_labels(&self) -> &[String] {
    &self.ambiguous_labels
  }
}

impl ColorLookup for BundleStore {
  fn color_of(&self, theme_id: ThemeId) -> String {
    self.colors.get(&theme_id).cloned().unwrap_or_else(|| DEFAULT_COLOR.to_string())
  }
}

impl ColorLookup for HashMap<ThemeId, String> {
  fn color_of(&self, theme_id: ThemeId) -> String {
    self.get(&theme_id).cloned().unwrap_or_else(|| DEFAULT_COLOR.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn sample_bundle() -> DashboardBundle {
    serde_json::from_value(json!({
      "themes": [
        { "id": 1, "label": "Budget", "document_count": 5, "keywords": "tax, budget" },
        { "id": 2, "label": "Health", "document_count": 2, "color": "rgb(10, 20, 30)" },
        { "id": 3, "label": "Budget", "document_count": 8 }
      ],
      "documents": [
        { "id": 1, "text": "foo", "theme": "Budget", "score": 0.82 },
        { "id": 2, "text": "bar", "theme": "Health", "score": 0.4 },
        { "id": 3, "text": "baz", "theme": "Budget", "score": 0.1 }
      ],
      "diagnostics": [
        { "theme": "Health", "prevalence": 0.2 },
        { "theme": "Budget", "prevalence": 0.5 }
      ],
      "similarities": { "1": [{ "ID": 2, "Similarity": 0.3 }] }
    }))
    .unwrap()
  }

  #[test]
  fn test_colors_fill_only_missing_themes() {
    let store = BundleStore::from_bundle(sample_bundle());

    assert_eq!(store.color_of(1), colors::color_at(0));
    assert_eq!(store.color_of(2), "rgb(10, 20, 30)");
    assert_eq!(store.color_of(3), colors::color_at(2));
    assert_eq!(store.themes()[0].color.as_deref(), Some(colors::color_at(0).as_str()));
  }

  #[test]
  fn test_unknown_theme_gets_default_color() {
    let store = BundleStore::from_bundle(sample_bundle());
    assert_eq!(store.color_of(99), DEFAULT_COLOR);
  }

  #[test]
  fn test_label_join_first_match_wins_and_is_flagged() {
    let store = BundleStore::from_bundle(sample_bundle());

    assert_eq!(store.theme_by_label("Budget").map(|t| t.id), Some(1));
    assert_eq!(store.ambiguous_labels(), &["Budget".to_string()]);

    let doc = &store.documents()[2];
    assert_eq!(store.theme_of(doc).map(|t| t.id), Some(1));
  }

  #[test]
  fn test_cross_reference_lookups() {
    let store = BundleStore::from_bundle(sample_bundle());

    assert_eq!(store.theme(2).map(|t| t.label.as_str()), Some("Health"));
    assert!(store.theme(42).is_none());
    assert_eq!(store.diagnostics_for("Budget").and_then(|d| d.number("prevalence")), Some(0.5));
    assert!(store.diagnostics_for("Nope").is_none());
    assert_eq!(store.similarities_for(1).len(), 1);
    assert!(store.similarities_for(2).is_empty());
    assert_eq!(store.documents_for("Budget").len(), 2);
  }

  #[test]
  fn test_duplicate_theme_id_first_match_wins() {
    let bundle: DashboardBundle = serde_json::from_value(json!({
      "themes": [
        { "id": 4, "label": "First", "color": "rgb(1, 2, 3)" },
        { "id": 4, "label": "Second", "color": "rgb(9, 9, 9)" }
      ]
    }))
    .unwrap();
    let store = BundleStore::from_bundle(bundle);

    assert_eq!(store.theme(4).map(|t| t.label.as_str()), Some("First"));
    assert_eq!(store.color_of(4), "rgb(1, 2, 3)");
  }

  #[test]
  fn test_every_referenced_theme_id_has_a_color() {
    let store = BundleStore::from_bundle(sample_bundle());
    for theme in store.themes() {
      assert_ne!(store.color_of(theme.id), DEFAULT_COLOR);
    }
  }
}
