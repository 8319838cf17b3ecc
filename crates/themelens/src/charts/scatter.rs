//! 2D theme map: one bubble per theme, sized by relative theme size

use super::{wrap_keywords, Axis, ChartKind, ChartPoint, ChartSpec, Decoration, Plot, Selection};
use crate::colors::{derive_translucent, FILL_ALPHA};
use crate::model::CoordinatePoint;
use crate::store::ColorLookup;

pub const MIN_RADIUS: f64 = 10.0;
pub const MAX_RADIUS: f64 = 40.0;

/// Linear map from the observed size range onto [`MIN_RADIUS`, `MAX_RADIUS`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
  min: f64,
  max: f64,
}

impl RadiusScale {
  pub fn observe(sizes: impl IntoIterator<Item = f64>) -> Self {
    let (min, max) = sizes
      .into_iter()
      .filter(|s| s.is_finite())
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
    Self { min, max }
  }

  /// A degenerate range (single point, all equal, or nothing finite) maps to
  /// the middle of the radius range.
  pub fn radius(&self, size: f64) -> f64 {
    let span = self.max - self.min;
    if !span.is_finite() || span <= 0.0 || !size.is_finite() {
      return (MIN_RADIUS + MAX_RADIUS) / 2.0;
    }
    (size - self.min) / span * (MAX_RADIUS - MIN_RADIUS) + MIN_RADIUS
  }
}

pub fn theme_map(coordinates: &[CoordinatePoint], colors: &dyn ColorLookup) -> ChartSpec {
  let scale = RadiusScale::observe(coordinates.iter().map(|c| c.size));

  let points = coordinates
    .iter()
    .map(|point| {
      let solid = colors.color_of(point.id);
      let mut tooltip = vec![point.label.clone(), "Keywords:".to_string()];
      tooltip.extend(wrap_keywords(point.keywords.as_ref()));

      ChartPoint {
        label: point.label.clone(),
        plot: Plot::Bubble { x: point.x, y: point.y, radius: scale.radius(point.size) },
        fill: Some(derive_translucent(&solid, FILL_ALPHA)),
        color: solid,
        tooltip,
        selection: Some(Selection::Theme { id: point.id }),
      }
    })
    .collect();

  let decorations = coordinates
    .iter()
    .enumerate()
    .map(|(index, point)| Decoration::CenteredLabel { index, text: point.label.clone() })
    .collect();

  ChartSpec {
    kind: ChartKind::Scatter,
    title: "Theme map".to_string(),
    axis: Axis::default(),
    points,
    decorations,
  }
}
