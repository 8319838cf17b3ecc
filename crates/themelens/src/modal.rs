//! Theme and document detail modals
//!
//! The theme modal is built entirely from the bundle store. The document modal
//! needs one inference call per open; [`ModalController::begin_document`]
//! hands out a ticket for it and only the most recent ticket may complete, so
//! a slow response for an older document can never overwrite a newer one.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::charts::inference::document_inference;
use crate::charts::similarity::similarity_plot;
use crate::charts::{wrap_keywords, Canvas, ChartHandle, ChartRegistry};
use crate::colors::{derive_translucent, BACKGROUND_ALPHA};
use crate::dashboard::targets;
use crate::error::InferenceError;
use crate::model::{DiagnosticsRow, Document, TextInfo, TextInfoRequest, ThemeId, TopTheme};
use crate::notice::{Notices, INFERENCE_FAILED};
use crate::store::{BundleStore, ColorLookup};
use crate::table::{DocumentTable, TableLayout};
use crate::PLACEHOLDER;

/// Accent and background colors tying a modal back to its theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalChrome {
  pub accent: String,
  pub background: String,
}

impl ModalChrome {
  pub fn for_color(color: &str) -> Self {
    Self { accent: color.to_string(), background: derive_translucent(color, BACKGROUND_ALPHA) }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticCard {
  pub label: &'static str,
  pub value: String,
}

/// The fixed diagnostics mini-grid shown in the theme modal.
pub fn diagnostics_grid(row: Option<&DiagnosticsRow>) -> Vec<DiagnosticCard> {
  let number = |key: &str| row.and_then(|r| r.number(key));
  let or_placeholder = |value: Option<String>| value.unwrap_or_else(|| PLACEHOLDER.to_string());

  vec![
    DiagnosticCard {
      label: "Prevalence",
      value: or_placeholder(number("prevalence").map(|v| format!("{:.3}%", v * 100.0))),
    },
    DiagnosticCard { label: "Coherence", value: or_placeholder(number("coherence").map(|v| format!("{v:.3}"))) },
    DiagnosticCard {
      label: "Keyword Uniqueness",
      value: or_placeholder(number("uniqueness").map(|v| format!("{v:.3}"))),
    },
    DiagnosticCard { label: "Document Matches", value: or_placeholder(number("theme_matches").map(format_count)) },
  ]
}

fn format_count(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{value:.0}")
  } else {
    value.to_string()
  }
}

// Theme modal
// ===========

#[derive(Debug)]
pub struct ThemeModal {
  pub theme_id: ThemeId,
  pub label: String,
  pub summary: String,
  pub chrome: ModalChrome,
  pub keywords: Vec<String>,
  pub diagnostics: Vec<DiagnosticCard>,
  pub documents: DocumentTable,
  similarity: ChartHandle,
}

impl ThemeModal {
  pub fn similarity_chart(&self) -> &ChartHandle {
    &self.similarity
  }
}

// Document modal
// ==============

#[derive(Debug)]
pub struct DocumentModal {
  pub document: Document,
  pub text: String,
  pub theme: String,
  /// Top theme keywords, five per line.
  pub keywords: String,
  /// Present only when the response carried a non-blank rationale.
  pub rationale: Option<String>,
  pub top_themes: Vec<TopTheme>,
  chart: ChartHandle,
}

impl DocumentModal {
  pub fn inference_chart(&self) -> &ChartHandle {
    &self.chart
  }
}

/// Permission to complete one document-modal open.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceTicket {
  pub generation: u64,
  pub document: Document,
}

impl InferenceTicket {
  pub fn request(&self, model: &str) -> TextInfoRequest {
    TextInfoRequest { text: self.document.text.clone(), id: self.document.id.clone(), model: model.to_string() }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
  /// The modal now shows this document.
  Shown,
  /// The request failed; a notice was raised and the modal is unchanged.
  Failed(InferenceError),
  /// A newer document open started while this one was in flight.
  Superseded,
}

// Controller
// ==========

#[derive(Debug, Default)]
pub struct ModalController {
  theme: Option<ThemeModal>,
  document: Option<DocumentModal>,
  generation: u64,
  pending: Option<u64>,
}

impl ModalController {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn theme(&self) -> Option<&ThemeModal> {
    self.theme.as_ref()
  }

  pub fn document(&self) -> Option<&DocumentModal> {
    self.document.as_ref()
  }

  pub fn is_inference_pending(&self) -> bool {
    self.pending.is_some()
  }

  /// Open (or re-open) the theme modal for `theme_id`, replacing every
  /// sub-view. Returns false and leaves the modal alone for unknown ids.
  pub fn open_theme<C: Canvas>(&mut self, store: &BundleStore, charts: &mut ChartRegistry<C>, theme_id: ThemeId) -> bool {
    let Some(theme) = store.theme(theme_id) else {
      warn!(theme_id, "Theme not found in bundle; modal not opened");
      return false;
    };

    let mut documents = DocumentTable::new(TableLayout::ThemeDocuments);
    documents.load(store.documents_for(&theme.label));

    let similarity = charts.render(
      targets::SIMILARITY_PLOT,
      similarity_plot(store.similarities_for(theme_id), store),
    );

    let modal = ThemeModal {
      theme_id,
      label: theme.label.clone(),
      summary: theme.summary.clone().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| PLACEHOLDER.to_string()),
      chrome: ModalChrome::for_color(&store.color_of(theme_id)),
      keywords: theme.keywords.as_ref().and_then(|k| k.words()).unwrap_or_default(),
      diagnostics: diagnostics_grid(store.diagnostics_for(&theme.label)),
      documents,
      similarity,
    };

    info!(theme_id, label = %modal.label, documents = modal.documents.source().len(), "Theme modal opened");
    self.theme = Some(modal);
    true
  }

  /// Free-text search over the open theme's document list.
  pub fn search_theme_documents(&mut self, query: &str) {
    if let Some(modal) = self.theme.as_mut() {
      modal.documents.search(query);
    }
  }

  pub fn close_theme<C: Canvas>(&mut self, charts: &mut ChartRegistry<C>) {
    if let Some(modal) = self.theme.take() {
      modal.similarity.dispose(charts);
      debug!(theme_id = modal.theme_id, "Theme modal closed");
    }
  }

  /// Start a document open. Any earlier ticket still in flight is superseded.
  pub fn begin_document(&mut self, document: Document) -> InferenceTicket {
    self.generation += 1;
    if self.pending.is_some() {
      debug!(generation = self.generation, "Superseding in-flight inference request");
    }
    self.pending = Some(self.generation);
    InferenceTicket { generation: self.generation, document }
  }

  pub fn complete_document<C: Canvas>(
    &mut self,
    ticket: InferenceTicket,
    result: Result<TextInfo, InferenceError>,
    colors: &dyn ColorLookup,
    charts: &mut ChartRegistry<C>,
    notices: &mut Notices,
  ) -> InferenceOutcome {
    if self.pending != Some(ticket.generation) {
      debug!(generation = ticket.generation, "Ignoring stale inference response");
      return InferenceOutcome::Superseded;
    }
    self.pending = None;

    let response = match result {
      Ok(response) => response,
      Err(e) => {
        warn!(document = %ticket.document.id, error = %e, "Inference failed");
        notices.push(INFERENCE_FAILED);
        return InferenceOutcome::Failed(e);
      }
    };

    let chart = charts.render(targets::DOC_INFERENCE, document_inference(&response.top_themes, colors));
    let document = ticket.document;
    let modal = DocumentModal {
      text: non_blank(Some(document.text.as_str())),
      theme: non_blank(response.theme.as_deref()),
      keywords: wrap_keywords(response.top_themes.first().and_then(|t| t.keywords.as_ref())).join("\n"),
      rationale: response.rationale.as_deref().map(str::trim).filter(|r| !r.is_empty()).map(str::to_string),
      top_themes: response.top_themes,
      document,
      chart,
    };

    info!(document = %modal.document.id, theme = %modal.theme, "Document modal opened");
    self.document = Some(modal);
    InferenceOutcome::Shown
  }

  /// Close the document modal and tear down its chart.
  pub fn close_document<C: Canvas>(&mut self, charts: &mut ChartRegistry<C>) {
    if let Some(modal) = self.document.take() {
      modal.chart.dispose(charts);
    }
  }
}

fn non_blank(value: Option<&str>) -> String {
  match value {
    Some(v) if !v.trim().is_empty() => v.to_string(),
    _ => PLACEHOLDER.to_string(),
  }
}
