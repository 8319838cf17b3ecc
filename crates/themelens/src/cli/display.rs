//! Display formatting for CLI output

use colored::*;
use serde::Serialize;

use crate::charts::ChartSpec;
use crate::metrics::{MetricCard, MetricScope, MetricsPanel};
use crate::modal::{DiagnosticCard, DocumentModal, ModalChrome, ThemeModal};
use crate::model::{Document, ThemeId, TopTheme};
use crate::table::{TableView, ThemeOption};
use crate::PLACEHOLDER;

const MAX_CELL_WIDTH: usize = 48;
const TEXT_WIDTH: usize = 80;

/// Wrap text to fit within a specified width
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current_line = String::new();
    for word in paragraph.split_whitespace() {
      if current_line.is_empty() {
        current_line = word.to_string();
      } else if current_line.chars().count() + 1 + word.chars().count() <= width {
        current_line.push(' ');
        current_line.push_str(word);
      } else {
        lines.push(std::mem::take(&mut current_line));
        current_line = word.to_string();
      }
    }

    if !current_line.is_empty() {
      lines.push(current_line);
    }
  }

  lines
}

fn truncate(text: &str, width: usize) -> String {
  let flat = text.replace('\n', " ");
  if flat.chars().count() <= width {
    return flat;
  }
  let mut cut: String = flat.chars().take(width.saturating_sub(1)).collect();
  cut.push('…');
  cut
}

fn pad(text: &str, width: usize) -> String {
  let len = text.chars().count();
  format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Render the visible rows of a table as aligned plain-text columns.
pub fn render_table(view: &TableView) -> String {
  let rows: Vec<Vec<String>> = view
    .visible_rows()
    .map(|row| row.cells.iter().map(|cell| truncate(cell, MAX_CELL_WIDTH)).collect())
    .collect();

  let mut widths: Vec<usize> = view.headers.iter().map(|h| h.chars().count()).collect();
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let header = view.headers.iter().zip(&widths).map(|(h, w)| pad(h, *w)).collect::<Vec<_>>().join("  ");
  let mut lines = vec![header.trim_end().bold().to_string()];
  for row in rows {
    let line = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect::<Vec<_>>().join("  ");
    lines.push(line.trim_end().to_string());
  }
  lines.join("\n")
}

pub fn print_section(title: &str) {
  println!("{}", format!("=== {title} ===").blue().bold());
}

pub fn print_chart(output: Option<&str>) {
  println!("{}", output.unwrap_or(PLACEHOLDER));
  println!();
}

pub fn print_table(view: &TableView) {
  println!("{}", render_table(view));
  println!();
}

pub fn print_metrics(panel: &MetricsPanel) {
  let scope = match panel.scope() {
    MetricScope::Theme => "Theme metrics",
    MetricScope::Model => "Model metrics",
  };
  print_section(scope);
  if panel.visible_cards().is_empty() {
    println!("  {PLACEHOLDER}");
  }
  for card in panel.visible_cards() {
    println!("  {} {}", format!("{}:", card.label).dimmed(), card.value.bold());
  }
  println!("  ({})", panel.toggle_label());
  println!();
}

pub fn print_theme_modal(modal: &ThemeModal, similarity: Option<&str>) {
  println!("{} {}", format!("[{}]", modal.theme_id).dimmed(), modal.label.bold());
  println!("{}", modal.summary);
  println!();

  if modal.keywords.is_empty() {
    println!("Keywords: {PLACEHOLDER}");
  } else {
    let badges: Vec<String> = modal.keywords.iter().map(|k| format!("[{k}]")).collect();
    println!("Keywords: {}", badges.join(" "));
  }
  println!();

  for card in &modal.diagnostics {
    println!("  {} {}", format!("{}:", card.label).bold(), card.value);
  }
  println!();

  print_section("Documents");
  print_table(modal.documents.view());
  print_chart(similarity);
}

pub fn print_document_modal(modal: &DocumentModal, chart: Option<&str>) {
  println!("{} {}", "Document".bold(), modal.document.id.to_string().cyan());
  for line in wrap_text(&modal.text, TEXT_WIDTH) {
    println!("{line}");
  }
  println!();
  println!("{} {}", "Theme:".bold(), modal.theme);
  println!("{}", "Keywords:".bold());
  println!("{}", modal.keywords);

  if let Some(rationale) = &modal.rationale {
    println!("{}", "Rationale:".bold());
    for line in wrap_text(rationale, TEXT_WIDTH) {
      println!("{}", line.italic());
    }
  }
  println!();
  print_chart(chart);
}

// JSON views
// ==========

#[derive(Serialize)]
pub struct OverviewJson<'a> {
  pub model: &'a str,
  pub theme_chart: Option<&'a ChartSpec>,
  pub theme_map: Option<&'a ChartSpec>,
  pub theme_options: &'a [ThemeOption],
  pub documents: &'a TableView,
  pub diagnostics: &'a TableView,
  pub metrics: MetricsJson<'a>,
  #[serde(skip_serializing_if = "<[String]>::is_empty")]
  pub ambiguous_labels: &'a [String],
}

#[derive(Serialize)]
pub struct MetricsJson<'a> {
  pub scope: MetricScope,
  pub cards: &'a [MetricCard],
  pub toggle_label: &'a str,
}

impl<'a> From<&'a MetricsPanel> for MetricsJson<'a> {
  fn from(panel: &'a MetricsPanel) -> Self {
    Self { scope: panel.scope(), cards: panel.visible_cards(), toggle_label: panel.toggle_label() }
  }
}

#[derive(Serialize)]
pub struct ThemeModalJson<'a> {
  pub theme_id: ThemeId,
  pub label: &'a str,
  pub summary: &'a str,
  pub chrome: &'a ModalChrome,
  pub keywords: &'a [String],
  pub diagnostics: &'a [DiagnosticCard],
  pub documents: &'a TableView,
  pub similarity: Option<&'a ChartSpec>,
}

impl<'a> ThemeModalJson<'a> {
  pub fn new(modal: &'a ThemeModal, similarity: Option<&'a ChartSpec>) -> Self {
    Self {
      theme_id: modal.theme_id,
      label: &modal.label,
      summary: &modal.summary,
      chrome: &modal.chrome,
      keywords: &modal.keywords,
      diagnostics: &modal.diagnostics,
      documents: modal.documents.view(),
      similarity,
    }
  }
}

#[derive(Serialize)]
pub struct DocumentModalJson<'a> {
  pub document: &'a Document,
  pub theme: &'a str,
  pub keywords: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rationale: Option<&'a str>,
  pub top_themes: &'a [TopTheme],
  pub chart: Option<&'a ChartSpec>,
}

impl<'a> DocumentModalJson<'a> {
  pub fn new(modal: &'a DocumentModal, chart: Option<&'a ChartSpec>) -> Self {
    Self {
      document: &modal.document,
      theme: &modal.theme,
      keywords: &modal.keywords,
      rationale: modal.rationale.as_deref(),
      top_themes: &modal.top_themes,
      chart,
    }
  }
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::DocumentId;
  use crate::table::{render_documents, TableLayout};

  #[test]
  fn test_wrap_text_respects_width() {
    let lines = wrap_text("one two three four five", 9);
    assert_eq!(lines, vec!["one two", "three", "four five"]);
  }

  #[test]
  fn test_wrap_text_keeps_blank_paragraphs() {
    assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
  }

  #[test]
  fn test_render_table_aligns_and_hides_filtered_rows() {
    colored::control::set_override(false);
    let docs = vec![
      Document { id: DocumentId::Int(1), text: "foo".into(), theme: "A".into(), score: Some(0.82), rationale: None },
      Document { id: DocumentId::Int(22), text: "bar".into(), theme: "Bee".into(), score: None, rationale: None },
    ];
    let mut view = render_documents(TableLayout::Main, &docs);

    let text = render_table(&view);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Id  Text  Theme  Score");
    assert_eq!(lines[1], "1   foo   A      0.820");
    assert_eq!(lines[2], "22  bar   Bee    —");

    view.apply_search("bar");
    assert_eq!(render_table(&view).lines().count(), 2);
  }

  #[test]
  fn test_truncate_long_cells() {
    let long = "x".repeat(100);
    let cut = truncate(&long, 10);
    assert_eq!(cut.chars().count(), 10);
    assert!(cut.ends_with('…'));
  }
}
