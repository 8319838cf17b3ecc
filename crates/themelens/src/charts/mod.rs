//! Chart views and chart instance lifecycle
//!
//! Each view is a pure function from a bundle slice plus a [`ColorLookup`] to a
//! [`ChartSpec`]. Drawing goes through [`ChartRegistry`], which owns the live
//! instance for each container and destroys it before anything else is drawn
//! there.
//!
//! [`ColorLookup`]: crate::store::ColorLookup

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::model::{Keywords, ThemeId};
use crate::PLACEHOLDER;

pub mod distribution;
pub mod inference;
pub mod scatter;
pub mod similarity;
pub mod text_canvas;

pub use text_canvas::TextCanvas;

/// Keywords shown per tooltip line.
pub const KEYWORDS_PER_LINE: usize = 5;

/// What a click on a chart element points back to. Every chart plots themes;
/// document clicks come from table rows instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
  Theme { id: ThemeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
  /// Vertical bars, one per label
  Bar,
  /// Horizontal bars on a fixed value domain
  HorizontalBar,
  /// Bubbles positioned by x/y
  Scatter,
}

/// Where an element sits on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Plot {
  Value { value: f64 },
  Bubble { x: f64, y: f64, radius: f64 },
}

/// One drawable element with everything needed to render and resolve clicks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
  pub label: String,
  pub plot: Plot,
  /// Solid color, also the border color for bubbles
  pub color: String,
  /// Fill when it differs from `color`
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fill: Option<String>,
  pub tooltip: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub selection: Option<Selection>,
}

/// Value axis bounds; `None` lets the canvas pick.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Axis {
  pub min: Option<f64>,
  pub max: Option<f64>,
  pub title: Option<String>,
}

/// Drawing applied on top of the base chart once it has been drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Decoration {
  CenteredLabel { index: usize, text: String },
}

/// A complete, canvas-independent description of one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
  pub kind: ChartKind,
  pub title: String,
  pub axis: Axis,
  pub points: Vec<ChartPoint>,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub decorations: Vec<Decoration>,
}

impl ChartSpec {
  pub fn labels(&self) -> Vec<&str> {
    self.points.iter().map(|p| p.label.as_str()).collect()
  }

  /// Bar values, or bubble radii for scatter charts.
  pub fn values(&self) -> Vec<f64> {
    self
      .points
      .iter()
      .map(|p| match p.plot {
        Plot::Value { value } => value,
        Plot::Bubble { radius, .. } => radius,
      })
      .collect()
  }

  pub fn colors(&self) -> Vec<&str> {
    self.points.iter().map(|p| p.color.as_str()).collect()
  }

  /// Entity behind the element at `index`, if any.
  pub fn resolve_click(&self, index: usize) -> Option<Selection> {
    self.points.get(index).and_then(|p| p.selection.clone())
  }
}

/// Wrap keywords into tooltip lines of [`KEYWORDS_PER_LINE`].
///
/// Absent or non-keyword data yields a single placeholder line.
pub fn wrap_keywords(keywords: Option<&Keywords>) -> Vec<String> {
  match keywords.and_then(Keywords::words) {
    Some(words) if !words.is_empty() => group_words(&words),
    _ => vec![PLACEHOLDER.to_string()],
  }
}

/// Join words into comma-separated groups of [`KEYWORDS_PER_LINE`].
pub fn group_words(words: &[String]) -> Vec<String> {
  words.chunks(KEYWORDS_PER_LINE).map(|chunk| chunk.join(", ")).collect()
}

// Chart lifecycle
// ===============

/// Identifier of one drawn chart instance on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CanvasId(pub u64);

/// The drawing capability: turns a spec into a live chart and tears it down.
pub trait Canvas {
  fn draw(&mut self, container: &str, spec: &ChartSpec) -> CanvasId;
  fn destroy(&mut self, id: CanvasId);
}

/// Returned by [`ChartRegistry::render`]; disposing a handle whose chart was
/// already replaced is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHandle {
  pub container: String,
  pub id: CanvasId,
}

impl ChartHandle {
  pub fn dispose<C: Canvas>(self, charts: &mut ChartRegistry<C>) -> bool {
    charts.dispose_handle(&self)
  }
}

struct LiveChart {
  id: CanvasId,
  spec: ChartSpec,
}

/// Owns every live chart, one per container.
pub struct ChartRegistry<C: Canvas> {
  canvas: C,
  live: HashMap<String, LiveChart>,
}

impl<C: Canvas> ChartRegistry<C> {
  pub fn new(canvas: C) -> Self {
    Self { canvas, live: HashMap::new() }
  }

  /// Draw `spec` into `container`, destroying whatever was drawn there before.
  pub fn render(&mut self, container: &str, spec: ChartSpec) -> ChartHandle {
    self.dispose(container);
    let id = self.canvas.draw(container, &spec);
    debug!(container, id = id.0, points = spec.points.len(), "Chart drawn");
    self.live.insert(container.to_string(), LiveChart { id, spec });
    ChartHandle { container: container.to_string(), id }
  }

  /// Destroy the chart in `container`. Returns false when nothing was drawn there.
  pub fn dispose(&mut self, container: &str) -> bool {
    match self.live.remove(container) {
      Some(chart) => {
        self.canvas.destroy(chart.id);
        debug!(container, id = chart.id.0, "Chart destroyed");
        true
      }
      None => false,
    }
  }

  fn dispose_handle(&mut self, handle: &ChartHandle) -> bool {
    let current = self.live.get(&handle.container).map(|chart| chart.id);
    if current == Some(handle.id) {
      self.dispose(&handle.container)
    } else {
      false
    }
  }

  pub fn spec(&self, container: &str) -> Option<&ChartSpec> {
    self.live.get(container).map(|chart| &chart.spec)
  }

  pub fn is_live(&self, container: &str) -> bool {
    self.live.contains_key(container)
  }

  pub fn live_count(&self) -> usize {
    self.live.len()
  }

  /// Resolve a click on element `index` of the chart in `container`.
  pub fn resolve_click(&self, container: &str, index: usize) -> Option<Selection> {
    self.spec(container).and_then(|spec| spec.resolve_click(index))
  }

  pub fn canvas(&self) -> &C {
    &self.canvas
  }
}
