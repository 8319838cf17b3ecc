//! Per-document inference bar chart: top inferred theme scores

use super::{group_words, Axis, ChartKind, ChartPoint, ChartSpec, Plot, Selection};
use crate::model::TopTheme;
use crate::store::ColorLookup;

const NO_KEYWORDS: &str = "No keywords";

pub fn document_inference(top_themes: &[TopTheme], colors: &dyn ColorLookup) -> ChartSpec {
  let points = top_themes
    .iter()
    .map(|top| {
      let mut tooltip = vec![format!("Score: {:.1}%", top.score * 100.0), "Keywords:".to_string()];
      match top.keywords.as_ref().and_then(|k| k.words()) {
        Some(words) if !words.is_empty() => tooltip.extend(group_words(&words)),
        _ => tooltip.push(NO_KEYWORDS.to_string()),
      }

      ChartPoint {
        label: top.label.clone(),
        plot: Plot::Value { value: top.score },
        color: colors.color_of(top.theme_id),
        fill: None,
        tooltip,
        selection: Some(Selection::Theme { id: top.theme_id }),
      }
    })
    .collect();

  ChartSpec {
    kind: ChartKind::Bar,
    title: "Top inferred themes".to_string(),
    axis: Axis { min: Some(0.0), max: Some(1.0), title: Some("Score".to_string()) },
    points,
    decorations: Vec::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Keywords;
  use std::collections::HashMap;

  fn top(theme_id: i64, score: f64, keywords: Option<&str>) -> TopTheme {
    TopTheme {
      theme_id,
      label: format!("Theme {theme_id}"),
      score,
      keywords: keywords.map(|k| Keywords::Joined(k.to_string())),
    }
  }

  #[test]
  fn test_bars_use_shared_colors() {
    let colors = HashMap::from([(4, "hsl(10, 70%, 55%)".to_string())]);
    let spec = document_inference(&[top(4, 0.6, None), top(9, 0.3, None)], &colors);

    assert_eq!(spec.values(), vec![0.6, 0.3]);
    assert_eq!(spec.colors(), vec!["hsl(10, 70%, 55%)", crate::colors::DEFAULT_COLOR]);
    assert_eq!(spec.axis.max, Some(1.0));
  }

  #[test]
  fn test_tooltip_shows_percentage_and_keywords() {
    let spec = document_inference(&[top(1, 0.8234, Some("tax, fees")), top(2, 0.1, None)], &HashMap::new());

    assert_eq!(spec.points[0].tooltip, vec!["Score: 82.3%", "Keywords:", "tax, fees"]);
    assert_eq!(spec.points[1].tooltip, vec!["Score: 10.0%", "Keywords:", "No keywords"]);
  }

  #[test]
  fn test_click_resolves_inferred_theme() {
    let spec = document_inference(&[top(7, 0.5, None)], &HashMap::new());
    assert_eq!(spec.resolve_click(0), Some(Selection::Theme { id: 7 }));
  }
}
