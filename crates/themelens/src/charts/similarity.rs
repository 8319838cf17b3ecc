//! Theme similarity dot plot, strongest relationships first

use std::cmp::Ordering;
use tracing::debug;

use super::{Axis, ChartKind, ChartPoint, ChartSpec, Plot, Selection};
use crate::model::{SimilarityEntry, ThemeId};
use crate::store::ColorLookup;

/// Entries with a usable similarity, sorted by descending absolute value.
///
/// Ties keep their input order.
pub fn ranked(entries: &[SimilarityEntry]) -> Vec<(ThemeId, f64)> {
  let mut ranked: Vec<(ThemeId, f64)> = entries
    .iter()
    .filter_map(|entry| match entry.similarity.value() {
      Some(value) => Some((entry.id, value)),
      None => {
        debug!(id = entry.id, "Skipping similarity entry without a numeric value");
        None
      }
    })
    .collect();

  ranked.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(Ordering::Equal));
  ranked
}

pub fn similarity_plot(entries: &[SimilarityEntry], colors: &dyn ColorLookup) -> ChartSpec {
  let points = ranked(entries)
    .into_iter()
    .map(|(id, value)| ChartPoint {
      label: format!("Theme {id}"),
      plot: Plot::Value { value },
      color: colors.color_of(id),
      fill: None,
      tooltip: vec![format!("Similarity: {value:.3}")],
      selection: Some(Selection::Theme { id }),
    })
    .collect();

  ChartSpec {
    kind: ChartKind::HorizontalBar,
    title: "Similar themes".to_string(),
    axis: Axis { min: Some(-1.0), max: Some(1.0), title: Some("Similarity".to_string()) },
    points,
    decorations: Vec::new(),
  }
}
