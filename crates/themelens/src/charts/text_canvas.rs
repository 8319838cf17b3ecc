//! Terminal canvas: draws chart specs as block-character text

use colored::*;
use std::collections::BTreeMap;

use super::{Canvas, CanvasId, ChartKind, ChartSpec, Decoration, Plot};
use crate::colors::to_rgb;

const BAR_WIDTH: usize = 32;
const GRID_WIDTH: usize = 56;
const GRID_HEIGHT: usize = 16;
const LABEL_WIDTH: usize = 24;

struct Drawing {
  container: String,
  text: String,
}

/// A [`Canvas`] that keeps each live chart as a rendered block of text.
pub struct TextCanvas {
  styled: bool,
  next_id: u64,
  drawings: BTreeMap<CanvasId, Drawing>,
  destroyed: usize,
}

impl Default for TextCanvas {
  fn default() -> Self {
    Self::new()
  }
}

impl TextCanvas {
  /// Canvas that colors bars and points with their theme color.
  pub fn new() -> Self {
    Self { styled: true, next_id: 1, drawings: BTreeMap::new(), destroyed: 0 }
  }

  /// Canvas without ANSI styling.
  pub fn plain() -> Self {
    Self { styled: false, ..Self::new() }
  }

  pub fn output(&self, id: CanvasId) -> Option<&str> {
    self.drawings.get(&id).map(|d| d.text.as_str())
  }

  /// Text currently drawn into `container`, if any.
  pub fn output_for(&self, container: &str) -> Option<&str> {
    self.drawings.values().find(|d| d.container == container).map(|d| d.text.as_str())
  }

  pub fn live_count(&self) -> usize {
    self.drawings.len()
  }

  /// How many charts have been torn down over this canvas's lifetime.
  pub fn destroyed(&self) -> usize {
    self.destroyed
  }
}

impl Canvas for TextCanvas {
  fn draw(&mut self, container: &str, spec: &ChartSpec) -> CanvasId {
    let id = CanvasId(self.next_id);
    self.next_id += 1;
    let text = render(spec, self.styled);
    self.drawings.insert(id, Drawing { container: container.to_string(), text });
    id
  }

  fn destroy(&mut self, id: CanvasId) {
    if self.drawings.remove(&id).is_some() {
      self.destroyed += 1;
    }
  }
}

/// Render a spec to text without registering it anywhere.
pub fn render(spec: &ChartSpec, styled: bool) -> String {
  let mut lines = vec![spec.title.clone()];
  if spec.points.is_empty() {
    lines.push(format!("  {}", crate::PLACEHOLDER));
    return lines.join("\n");
  }

  match spec.kind {
    ChartKind::Bar | ChartKind::HorizontalBar => lines.extend(bar_lines(spec, styled)),
    ChartKind::Scatter => lines.extend(scatter_lines(spec, styled)),
  }
  lines.join("\n")
}

fn paint(text: &str, color: &str, styled: bool) -> String {
  match (styled, to_rgb(color)) {
    (true, Some((r, g, b))) => text.truecolor(r, g, b).to_string(),
    _ => text.to_string(),
  }
}

fn truncate(text: &str, width: usize) -> String {
  if text.chars().count() <= width {
    return text.to_string();
  }
  let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
  cut.push('…');
  cut
}

fn format_value(value: f64) -> String {
  if value.fract() == 0.0 && value.abs() < 1e12 {
    format!("{value:.0}")
  } else {
    format!("{value:.3}")
  }
}

fn bar_lines(spec: &ChartSpec, styled: bool) -> Vec<String> {
  let values: Vec<f64> = spec.values();
  let observed_max = values.iter().cloned().fold(0.0_f64, f64::max);
  let min = spec.axis.min.unwrap_or(0.0);
  let max = spec.axis.max.unwrap_or(observed_max).max(min);

  spec
    .points
    .iter()
    .zip(values)
    .map(|(point, value)| {
      let bar = if min < 0.0 {
        diverging_bar(value, min.abs().max(max.abs()))
      } else {
        let span = max - min;
        let filled = if span > 0.0 { ((value - min) / span * BAR_WIDTH as f64).round() } else { 0.0 };
        let filled = filled.clamp(0.0, BAR_WIDTH as f64) as usize;
        format!("{}{}", "█".repeat(filled), " ".repeat(BAR_WIDTH - filled))
      };
      format!(
        "  {:<width$} {} {}",
        truncate(&point.label, LABEL_WIDTH),
        paint(&bar, &point.color, styled),
        format_value(value),
        width = LABEL_WIDTH
      )
    })
    .collect()
}

/// Bar growing left or right from a centre line.
fn diverging_bar(value: f64, extent: f64) -> String {
  let half = BAR_WIDTH / 2;
  let filled = if extent > 0.0 { (value.abs() / extent * half as f64).round() } else { 0.0 };
  let filled = filled.clamp(0.0, half as f64) as usize;

  if value < 0.0 {
    format!("{}{}│{}", " ".repeat(half - filled), "█".repeat(filled), " ".repeat(half))
  } else {
    format!("{}│{}{}", " ".repeat(half), "█".repeat(filled), " ".repeat(half - filled))
  }
}

fn scatter_lines(spec: &ChartSpec, styled: bool) -> Vec<String> {
  let bubbles: Vec<(f64, f64, f64)> = spec
    .points
    .iter()
    .filter_map(|p| match p.plot {
      Plot::Bubble { x, y, radius } => Some((x, y, radius)),
      Plot::Value { .. } => None,
    })
    .collect();

  let range = |values: Vec<f64>| {
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
  };
  let (x_min, x_max) = range(bubbles.iter().map(|b| b.0).collect());
  let (y_min, y_max) = range(bubbles.iter().map(|b| b.1).collect());

  let cell = |value: f64, lo: f64, hi: f64, size: usize| -> usize {
    if hi > lo {
      (((value - lo) / (hi - lo)) * (size - 1) as f64).round() as usize
    } else {
      size / 2
    }
  };

  let mut grid = vec![vec![(' ', None::<usize>); GRID_WIDTH]; GRID_HEIGHT];
  let mut positions = Vec::with_capacity(bubbles.len());
  for (index, (x, y, _)) in bubbles.iter().enumerate() {
    let col = cell(*x, x_min, x_max, GRID_WIDTH);
    let row = GRID_HEIGHT - 1 - cell(*y, y_min, y_max, GRID_HEIGHT);
    grid[row][col] = ('●', Some(index));
    positions.push((row, col));
  }

  for decoration in &spec.decorations {
    match decoration {
      Decoration::CenteredLabel { index, text } => {
        let Some(&(row, col)) = positions.get(*index) else { continue };
        let row = if row > 0 { row - 1 } else { row + 1 };
        let text: Vec<char> = truncate(text, GRID_WIDTH).chars().collect();
        let start = col.saturating_sub(text.len() / 2).min(GRID_WIDTH - text.len());
        for (offset, ch) in text.into_iter().enumerate() {
          grid[row][start + offset] = (ch, Some(*index));
        }
      }
    }
  }

  let mut lines: Vec<String> = grid
    .into_iter()
    .map(|row| {
      let body: String = row
        .into_iter()
        .map(|(ch, owner)| match owner.and_then(|i| spec.points.get(i)) {
          Some(point) => paint(&ch.to_string(), &point.color, styled),
          None => ch.to_string(),
        })
        .collect();
      format!("  │{body}")
    })
    .collect();
  lines.push(format!("  └{}", "─".repeat(GRID_WIDTH)));

  for (point, (_, _, radius)) in spec.points.iter().zip(&bubbles) {
    lines.push(format!("  {} {} (r={radius:.1})", paint("●", &point.color, styled), point.label));
  }
  lines
}
