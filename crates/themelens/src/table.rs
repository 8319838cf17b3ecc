//! Table and filter engine
//!
//! Tables are rebuilt from scratch on every render. Each row carries a
//! lowercase search blob so free-text search only toggles visibility, while
//! structural filters (theme, score range) re-render from the full source
//! collection and then re-apply the current search.

use serde::Serialize;
use serde_json::Value;

use crate::model::{DiagnosticsRow, Document};
use crate::PLACEHOLDER;

pub const EMPTY_HEADER: &str = "No data";
pub const EMPTY_DOCUMENTS: &str = "No documents to display.";
pub const EMPTY_DIAGNOSTICS_HEADER: &str = "No Data";
pub const EMPTY_DIAGNOSTICS: &str = "No diagnostics available.";

/// Value of the theme filter option that matches every theme.
pub const ALL_THEMES: &str = "";

// Table view
// ==========

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
  pub cells: Vec<String>,
  #[serde(skip)]
  pub search: String,
  pub visible: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub document: Option<Document>,
}

/// A rendered table: one header row and its body rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
  pub headers: Vec<String>,
  pub rows: Vec<TableRow>,
  /// True when the table shows the empty-state placeholder.
  pub placeholder: bool,
}

impl TableView {
  /// Single-header, single-row empty state.
  pub fn empty(header: &str, message: &str) -> Self {
    Self {
      headers: vec![header.to_string()],
      rows: vec![TableRow { cells: vec![message.to_string()], search: String::new(), visible: true, document: None }],
      placeholder: true,
    }
  }

  /// Hide rows whose search blob does not contain `query`, case-insensitively.
  pub fn apply_search(&mut self, query: &str) {
    let query = query.trim().to_lowercase();
    for row in &mut self.rows {
      row.visible = row.search.contains(&query);
    }
  }

  pub fn visible_rows(&self) -> impl Iterator<Item = &TableRow> {
    self.rows.iter().filter(|row| row.visible)
  }

  pub fn visible_documents(&self) -> Vec<&Document> {
    self.visible_rows().filter_map(|row| row.document.as_ref()).collect()
  }

  /// Document behind a click on body row `index`; hidden rows are not clickable.
  pub fn click(&self, index: usize) -> Option<&Document> {
    self.rows.get(index).filter(|row| row.visible).and_then(|row| row.document.as_ref())
  }
}

// Document tables
// ===============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentColumn {
  Id,
  Text,
  Theme,
  Rationale,
  Score,
}

impl DocumentColumn {
  pub fn header(self) -> &'static str {
    match self {
      DocumentColumn::Id => "Id",
      DocumentColumn::Text => "Text",
      DocumentColumn::Theme => "Theme",
      DocumentColumn::Rationale => "Rationale",
      DocumentColumn::Score => "Score",
    }
  }

  pub fn cell(self, document: &Document) -> String {
    match self {
      DocumentColumn::Id => document.id.to_string(),
      DocumentColumn::Text => document.text.clone(),
      DocumentColumn::Theme => document.theme.clone(),
      DocumentColumn::Rationale => document.rationale.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
      DocumentColumn::Score => format_score(document.score),
    }
  }
}

pub fn format_score(score: Option<f64>) -> String {
  match score {
    Some(score) => format!("{score:.3}"),
    None => PLACEHOLDER.to_string(),
  }
}

/// Which document table is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
  /// The dashboard's main document table, in source order.
  Main,
  /// The theme modal's document list, strongest score first.
  ThemeDocuments,
}

impl TableLayout {
  /// Column set for a batch; `rationale` only appears when a row carries one.
  pub fn columns(self, with_rationale: bool) -> Vec<DocumentColumn> {
    use DocumentColumn::*;
    match (self, with_rationale) {
      (TableLayout::Main, false) => vec![Id, Text, Theme, Score],
      (TableLayout::Main, true) => vec![Id, Text, Theme, Rationale, Score],
      (TableLayout::ThemeDocuments, false) => vec![Id, Text, Score],
      (TableLayout::ThemeDocuments, true) => vec![Id, Text, Score, Rationale],
    }
  }

  fn search_blob(self, document: &Document) -> String {
    let id = document.id.to_string();
    let rationale = document.rationale.as_deref().unwrap_or("");
    let score = document.score.map(|s| s.to_string()).unwrap_or_default();

    let parts: Vec<&str> = match self {
      TableLayout::Main => vec![id.as_str(), document.text.as_str(), document.theme.as_str(), rationale, score.as_str()],
      TableLayout::ThemeDocuments => vec![id.as_str(), document.text.as_str(), score.as_str(), rationale],
    };
    parts.join(" ").to_lowercase()
  }
}

/// Render a document collection; an empty collection yields the placeholder.
pub fn render_documents(layout: TableLayout, documents: &[Document]) -> TableView {
  if documents.is_empty() {
    return TableView::empty(EMPTY_HEADER, EMPTY_DOCUMENTS);
  }

  let with_rationale = documents.iter().any(|d| d.rationale.is_some());
  let columns = layout.columns(with_rationale);

  let mut ordered: Vec<&Document> = documents.iter().collect();
  if layout == TableLayout::ThemeDocuments {
    ordered.sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0)));
  }

  let rows = ordered
    .into_iter()
    .map(|document| TableRow {
      cells: columns.iter().map(|column| column.cell(document)).collect(),
      search: layout.search_blob(document),
      visible: true,
      document: Some(document.clone()),
    })
    .collect();

  TableView { headers: columns.iter().map(|c| c.header().to_string()).collect(), rows, placeholder: false }
}

// Structural filter
// =================

/// Theme and score-range filter for the main document table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentFilter {
  pub theme: Option<String>,
  pub min: Option<f64>,
  pub max: Option<f64>,
}

impl DocumentFilter {
  /// Build from raw form inputs. Empty or unparseable bounds are unconstrained.
  pub fn from_inputs(theme: &str, min: &str, max: &str) -> Self {
    let theme = theme.trim();
    Self {
      theme: (theme != ALL_THEMES).then(|| theme.to_string()),
      min: parse_bound(min),
      max: parse_bound(max),
    }
  }

  /// A document without a score never satisfies a set bound.
  pub fn matches(&self, document: &Document) -> bool {
    let theme_ok = self.theme.as_deref().map_or(true, |theme| document.theme == theme);
    let min_ok = self.min.map_or(true, |min| document.score.is_some_and(|s| s >= min));
    let max_ok = self.max.map_or(true, |max| document.score.is_some_and(|s| s <= max));
    theme_ok && min_ok && max_ok
  }

  pub fn is_unconstrained(&self) -> bool {
    self.theme.is_none() && self.min.is_none() && self.max.is_none()
  }
}

fn parse_bound(input: &str) -> Option<f64> {
  input.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeOption {
  pub value: String,
  pub label: String,
}

/// "All" followed by each distinct document theme label, in first-seen order.
pub fn theme_options(documents: &[Document]) -> Vec<ThemeOption> {
  let mut options = vec![ThemeOption { value: ALL_THEMES.to_string(), label: "All".to_string() }];
  for document in documents {
    let theme = document.theme.as_str();
    if !theme.is_empty() && !options[1..].iter().any(|o| o.value == theme) {
      options.push(ThemeOption { value: theme.to_string(), label: theme.to_string() });
    }
  }
  options
}

/// A document table bound to its full source collection.
#[derive(Debug, Clone)]
pub struct DocumentTable {
  layout: TableLayout,
  source: Vec<Document>,
  view: TableView,
  query: String,
  filter: DocumentFilter,
}

impl DocumentTable {
  pub fn new(layout: TableLayout) -> Self {
    Self {
      layout,
      source: Vec::new(),
      view: render_documents(layout, &[]),
      query: String::new(),
      filter: DocumentFilter::default(),
    }
  }

  /// Replace the source collection, clearing any filter and search.
  pub fn load(&mut self, documents: Vec<Document>) {
    self.source = documents;
    self.filter = DocumentFilter::default();
    self.query.clear();
    self.refresh();
  }

  /// Re-render from the full source with `filter`, then re-apply the search.
  pub fn apply_filter(&mut self, filter: DocumentFilter) {
    self.filter = filter;
    self.refresh();
  }

  pub fn search(&mut self, query: &str) {
    self.query = query.to_string();
    self.view.apply_search(&self.query);
  }

  pub fn click(&self, index: usize) -> Option<&Document> {
    self.view.click(index)
  }

  pub fn view(&self) -> &TableView {
    &self.view
  }

  pub fn source(&self) -> &[Document] {
    &self.source
  }

  pub fn filter(&self) -> &DocumentFilter {
    &self.filter
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  fn refresh(&mut self) {
    let filtered: Vec<Document> = self.source.iter().filter(|d| self.filter.matches(d)).cloned().collect();
    self.view = render_documents(self.layout, &filtered);
    self.view.apply_search(&self.query);
  }
}

// Diagnostics table
// =================

/// Columns are `theme` followed by the first row's remaining keys in order.
pub fn render_diagnostics(rows: &[DiagnosticsRow]) -> TableView {
  let Some(first) = rows.first() else {
    return TableView::empty(EMPTY_DIAGNOSTICS_HEADER, EMPTY_DIAGNOSTICS);
  };

  let columns: Vec<&str> = std::iter::once("theme").chain(first.keys().filter(|k| *k != "theme")).collect();

  let body = rows
    .iter()
    .map(|row| {
      let cells: Vec<String> = columns.iter().map(|column| diagnostics_cell(column, row.get(column))).collect();
      TableRow { search: cells.join(" ").to_lowercase(), cells, visible: true, document: None }
    })
    .collect();

  TableView { headers: columns.iter().map(|c| title_case(c)).collect(), rows: body, placeholder: false }
}

fn diagnostics_cell(column: &str, value: Option<&Value>) -> String {
  match value {
    Some(Value::Number(n)) => match n.as_f64() {
      Some(v) if column.to_lowercase().contains("prevalence") => format!("{:.1}%", v * 100.0),
      Some(v) => format!("{v:.3}"),
      None => n.to_string(),
    },
    Some(Value::String(s)) => s.clone(),
    Some(Value::Null) | None => PLACEHOLDER.to_string(),
    Some(other) => other.to_string(),
  }
}

/// `keyword_uniqueness` becomes `Keyword Uniqueness`.
pub fn title_case(key: &str) -> String {
  let mut out = String::with_capacity(key.len());
  let mut at_word_start = true;
  for ch in key.replace('_', " ").chars() {
    if ch.is_alphanumeric() {
      if at_word_start {
        out.extend(ch.to_uppercase());
      } else {
        out.push(ch);
      }
      at_word_start = false;
    } else {
      out.push(ch);
      at_word_start = true;
    }
  }
  out
}
