//! Theme distribution bar chart: documents per theme, in bundle order

use super::{wrap_keywords, Axis, ChartKind, ChartPoint, ChartSpec, Plot, Selection};
use crate::model::Theme;
use crate::store::ColorLookup;

pub fn theme_distribution(themes: &[Theme], colors: &dyn ColorLookup) -> ChartSpec {
  let points = themes
    .iter()
    .map(|theme| {
      let mut tooltip = vec![format!("{} documents", theme.document_count), "Keywords:".to_string()];
      tooltip.extend(wrap_keywords(theme.keywords.as_ref()));

      ChartPoint {
        label: theme.label.clone(),
        plot: Plot::Value { value: theme.document_count as f64 },
        color: colors.color_of(theme.id),
        fill: None,
        tooltip,
        selection: Some(Selection::Theme { id: theme.id }),
      }
    })
    .collect();

  ChartSpec {
    kind: ChartKind::Bar,
    title: "Theme distribution".to_string(),
    axis: Axis { min: Some(0.0), max: None, title: Some("Documents".to_string()) },
    points,
    decorations: Vec::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::DashboardBundle;
  use crate::store::BundleStore;
  use serde_json::json;

  fn store() -> BundleStore {
    let bundle: DashboardBundle = serde_json::from_value(json!({
      "themes": [
        { "id": 10, "label": "A", "document_count": 5, "keywords": "a1, a2, a3, a4, a5, a6" },
        { "id": 20, "label": "B", "document_count": 2 },
        { "id": 30, "label": "C", "document_count": 8, "keywords": ["not", "a", "string"] }
      ]
    }))
    .unwrap();
    BundleStore::from_bundle(bundle)
  }

  #[test]
  fn test_values_follow_theme_order() {
    let store = store();
    let spec = theme_distribution(store.themes(), &store);

    assert_eq!(spec.values(), vec![5.0, 2.0, 8.0]);
    assert_eq!(spec.labels(), vec!["A", "B", "C"]);
  }

  #[test]
  fn test_generated_colors_are_distinct_hsl() {
    let store = store();
    let spec = theme_distribution(store.themes(), &store);
    let colors = spec.colors();

    assert!(colors.iter().all(|c| c.starts_with("hsl(")));
    assert_ne!(colors[0], colors[1]);
    assert_ne!(colors[1], colors[2]);
    assert_ne!(colors[0], colors[2]);
  }

  #[test]
  fn test_tooltip_wraps_keywords() {
    let store = store();
    let spec = theme_distribution(store.themes(), &store);

    assert_eq!(spec.points[0].tooltip, vec!["5 documents", "Keywords:", "a1, a2, a3, a4, a5", "a6"]);
    assert_eq!(spec.points[1].tooltip, vec!["2 documents", "Keywords:", "—"]);
  }

  #[test]
  fn test_click_resolves_theme_id() {
    let store = store();
    let spec = theme_distribution(store.themes(), &store);
    assert_eq!(spec.resolve_click(2), Some(Selection::Theme { id: 30 }));
  }
}
