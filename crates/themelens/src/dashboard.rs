//! The dashboard: boot, initial render, and interaction dispatch
//!
//! Interactions go in through [`Dashboard::handle`], which updates the views
//! synchronously and returns an [`Effect`] when a backend call is needed. The
//! only such call is document inference, driven by
//! [`Dashboard::open_document`].

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::DashboardBackend;
use crate::charts::distribution::theme_distribution;
use crate::charts::scatter::theme_map;
use crate::charts::{Canvas, ChartRegistry, Selection};
use crate::error::{BootError, InferenceError};
use crate::metrics::MetricsPanel;
use crate::modal::{InferenceOutcome, InferenceTicket, ModalController};
use crate::model::{Document, TextInfo, ThemeId};
use crate::notice::{Notices, BOOT_FAILED};
use crate::store::BundleStore;
use crate::table::{render_diagnostics, theme_options, DocumentFilter, DocumentTable, TableLayout, TableView, ThemeOption};

/// Draw surfaces, one live chart each.
pub mod targets {
  pub const THEME_CHART: &str = "themeChart";
  pub const THEME_MAP: &str = "themeChartGrid";
  pub const DOC_INFERENCE: &str = "docInferenceChart";
  pub const SIMILARITY_PLOT: &str = "similarityDotPlot";
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
  /// Click on element `index` of the chart drawn in `container`
  ChartClick { container: String, index: usize },
  /// A theme picked from anywhere that identifies one by id
  SelectTheme(ThemeId),
  /// Click on a row of the main document table
  DocumentRow(usize),
  /// Click on a row of the theme modal's document table
  ThemeDocumentRow(usize),
  Search(String),
  ThemeDocumentSearch(String),
  /// Raw theme / min / max form inputs
  Filter { theme: String, min: String, max: String },
  ToggleMetrics,
  CloseTheme,
  CloseDocument,
}

/// Follow-up work an interaction asks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
  None,
  /// Run inference for this document and show the document modal.
  InferDocument { document: Document },
}

pub struct Dashboard<C: Canvas> {
  model: String,
  store: BundleStore,
  charts: ChartRegistry<C>,
  documents: DocumentTable,
  theme_options: Vec<ThemeOption>,
  diagnostics: TableView,
  metrics: MetricsPanel,
  modals: ModalController,
}

impl<C: Canvas> Dashboard<C> {
  /// Fetch the bundle and render every view.
  ///
  /// On failure nothing is rendered and exactly one notice is raised.
  pub async fn boot(
    backend: &dyn DashboardBackend,
    model: &str,
    canvas: C,
    notices: &mut Notices,
  ) -> Result<Self, BootError> {
    match BundleStore::load(backend, model).await {
      Ok(store) => Ok(Self::from_store(store, model, canvas)),
      Err(e) => {
        warn!(model, error = %e, "Dashboard boot failed");
        notices.push(BOOT_FAILED);
        Err(e)
      }
    }
  }

  /// Initial render from an already loaded store.
  pub fn from_store(store: BundleStore, model: &str, canvas: C) -> Self {
    let mut charts = ChartRegistry::new(canvas);
    charts.render(targets::THEME_CHART, theme_distribution(store.themes(), &store));
    charts.render(targets::THEME_MAP, theme_map(&store.bundle().coordinates, &store));

    let mut documents = DocumentTable::new(TableLayout::Main);
    documents.load(store.documents().to_vec());

    let bundle = store.bundle();
    let dashboard = Self {
      model: model.to_string(),
      theme_options: theme_options(&bundle.documents),
      diagnostics: render_diagnostics(&bundle.diagnostics),
      metrics: MetricsPanel::new(&bundle.metrics, &bundle.model_metrics),
      modals: ModalController::new(),
      documents,
      charts,
      store,
    };

    info!(model, charts = dashboard.charts.live_count(), "Dashboard rendered");
    dashboard
  }

  pub fn handle(&mut self, interaction: Interaction) -> Effect {
    debug!(?interaction, "Handling interaction");
    match interaction {
      Interaction::ChartClick { container, index } => match self.charts.resolve_click(&container, index) {
        Some(Selection::Theme { id }) => {
          self.modals.open_theme(&self.store, &mut self.charts, id);
          Effect::None
        }
        None => Effect::None,
      },
      Interaction::SelectTheme(id) => {
        self.modals.open_theme(&self.store, &mut self.charts, id);
        Effect::None
      }
      Interaction::DocumentRow(index) => row_effect(self.documents.click(index)),
      Interaction::ThemeDocumentRow(index) => {
        row_effect(self.modals.theme().and_then(|modal| modal.documents.click(index)))
      }
      Interaction::Search(query) => {
        self.documents.search(&query);
        Effect::None
      }
      Interaction::ThemeDocumentSearch(query) => {
        self.modals.search_theme_documents(&query);
        Effect::None
      }
      Interaction::Filter { theme, min, max } => {
        self.documents.apply_filter(DocumentFilter::from_inputs(&theme, &min, &max));
        Effect::None
      }
      Interaction::ToggleMetrics => {
        self.metrics.toggle();
        Effect::None
      }
      Interaction::CloseTheme => {
        self.modals.close_theme(&mut self.charts);
        Effect::None
      }
      Interaction::CloseDocument => {
        self.modals.close_document(&mut self.charts);
        Effect::None
      }
    }
  }

  /// Issue one inference request for `document` and show the result.
  pub async fn open_document(
    &mut self,
    backend: &dyn DashboardBackend,
    document: Document,
    notices: &mut Notices,
  ) -> InferenceOutcome {
    let ticket = self.begin_document(document);
    let result = backend.text_info(&ticket.request(&self.model)).await;
    self.complete_document(ticket, result, notices)
  }

  /// First half of [`Dashboard::open_document`] for callers that run the
  /// request themselves.
  pub fn begin_document(&mut self, document: Document) -> InferenceTicket {
    self.modals.begin_document(document)
  }

  pub fn complete_document(
    &mut self,
    ticket: InferenceTicket,
    result: Result<TextInfo, InferenceError>,
    notices: &mut Notices,
  ) -> InferenceOutcome {
    self.modals.complete_document(ticket, result, &self.store, &mut self.charts, notices)
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  pub fn store(&self) -> &BundleStore {
    &self.store
  }

  pub fn charts(&self) -> &ChartRegistry<C> {
    &self.charts
  }

  pub fn documents(&self) -> &DocumentTable {
    &self.documents
  }

  pub fn theme_options(&self) -> &[ThemeOption] {
    &self.theme_options
  }

  pub fn diagnostics(&self) -> &TableView {
    &self.diagnostics
  }

  pub fn metrics(&self) -> &MetricsPanel {
    &self.metrics
  }

  pub fn modals(&self) -> &ModalController {
    &self.modals
  }
}

fn row_effect(document: Option<&Document>) -> Effect {
  match document {
    Some(document) => Effect::InferDocument { document: document.clone() },
    None => Effect::None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::MockDashboardBackend;
  use crate::charts::TextCanvas;
  use crate::model::{DashboardBundle, DocumentId, Keywords, TopTheme};
  use crate::notice::INFERENCE_FAILED;
  use serde_json::json;

  fn bundle() -> DashboardBundle {
    serde_json::from_value(json!({
      "themes": [
        { "id": 1, "label": "Billing", "document_count": 5, "keywords": "refund, charge" },
        { "id": 2, "label": "Bugs", "document_count": 2, "keywords": "crash" },
        { "id": 3, "label": "Praise", "document_count": 8 }
      ],
      "documents": [
        { "id": 1, "text": "foo", "theme": "Billing", "score": 0.82 },
        { "id": 2, "text": "app crashed", "theme": "Bugs", "score": 0.5 }
      ],
      "coordinates": [
        { "id": 1, "x": 0.0, "y": 0.0, "size": 5, "label": "Billing", "keywords": ["refund"] },
        { "id": 2, "x": 1.0, "y": 1.0, "size": 2, "label": "Bugs" }
      ],
      "diagnostics": [{ "theme": "Billing", "prevalence": 0.5 }],
      "similarities": { "1": [{ "ID": 2, "Similarity": 0.9 }, { "ID": 3, "Similarity": -0.95 }] },
      "metrics": [{ "label": "Themes", "value": 3 }],
      "model_metrics": [{ "label": "Model", "value": "lda" }]
    }))
    .unwrap()
  }

  fn booted() -> Dashboard<TextCanvas> {
    Dashboard::from_store(BundleStore::from_bundle(bundle()), "lda", TextCanvas::plain())
  }

  fn inference() -> TextInfo {
    TextInfo {
      theme: Some("Billing".to_string()),
      top_themes: vec![TopTheme {
        theme_id: 1,
        label: "Billing".to_string(),
        score: 0.8,
        keywords: Some(Keywords::Joined("refund, charge".to_string())),
      }],
      rationale: None,
    }
  }

  #[tokio::test]
  async fn test_boot_renders_every_view() {
    let mut backend = MockDashboardBackend::new();
    backend.expect_dashboard_data().times(1).returning(|_| Ok(bundle()));
    let mut notices = Notices::new();

    let dashboard = Dashboard::boot(&backend, "lda", TextCanvas::plain(), &mut notices).await.unwrap();

    assert!(notices.is_empty());
    assert_eq!(dashboard.charts().spec(targets::THEME_CHART).unwrap().values(), vec![5.0, 2.0, 8.0]);
    assert_eq!(dashboard.charts().spec(targets::THEME_MAP).unwrap().values(), vec![40.0, 10.0]);
    assert_eq!(dashboard.documents().view().rows.len(), 2);
    assert_eq!(dashboard.theme_options().len(), 3);
    assert_eq!(dashboard.diagnostics().rows[0].cells, vec!["Billing", "50.0%"]);
    assert_eq!(dashboard.metrics().visible_cards()[0].value, "3.00");
  }

  #[tokio::test]
  async fn test_boot_failure_renders_nothing_and_raises_one_notice() {
    let mut backend = MockDashboardBackend::new();
    backend.expect_dashboard_data().times(1).returning(|_| Err(BootError::status(500, "down")));
    let mut notices = Notices::new();

    let result = Dashboard::boot(&backend, "lda", TextCanvas::plain(), &mut notices).await;

    assert!(matches!(result, Err(BootError::Status { status: 500, .. })));
    assert_eq!(notices.len(), 1);
    assert_eq!(notices.last().unwrap().message, BOOT_FAILED);
  }

  #[tokio::test]
  async fn test_boot_tolerates_odd_field_values() {
    let odd: DashboardBundle = serde_json::from_value(json!({
      "themes": [{ "id": 1, "label": "Billing", "document_count": null }],
      "documents": [{ "id": 1, "text": null, "theme": "Billing", "score": "n/a" }],
      "metrics": [{ "label": "Themes", "value": null }]
    }))
    .unwrap();
    let mut backend = MockDashboardBackend::new();
    backend.expect_dashboard_data().times(1).returning(move |_| Ok(odd.clone()));
    let mut notices = Notices::new();

    let dashboard = Dashboard::boot(&backend, "lda", TextCanvas::plain(), &mut notices).await.unwrap();

    assert!(notices.is_empty());
    assert_eq!(dashboard.documents().view().rows[0].cells, vec!["1", "", "Billing", "—"]);
    assert_eq!(dashboard.charts().spec(targets::THEME_CHART).unwrap().values(), vec![0.0]);
    assert_eq!(dashboard.metrics().visible_cards()[0].value, "—");
  }

  #[test]
  fn test_chart_click_opens_theme_modal() {
    let mut dashboard = booted();

    let effect = dashboard.handle(Interaction::ChartClick { container: targets::THEME_CHART.to_string(), index: 0 });

    assert_eq!(effect, Effect::None);
    assert_eq!(dashboard.modals().theme().unwrap().label, "Billing");
    let similar = dashboard.charts().spec(targets::SIMILARITY_PLOT).unwrap();
    assert_eq!(similar.labels(), vec!["Theme 3", "Theme 2"]);
  }

  #[test]
  fn test_row_clicks_request_inference() {
    let mut dashboard = booted();

    match dashboard.handle(Interaction::DocumentRow(1)) {
      Effect::InferDocument { document } => assert_eq!(document.id, DocumentId::Int(2)),
      other => panic!("unexpected effect {other:?}"),
    }

    dashboard.handle(Interaction::SelectTheme(1));
    match dashboard.handle(Interaction::ThemeDocumentRow(0)) {
      Effect::InferDocument { document } => assert_eq!(document.text, "foo"),
      other => panic!("unexpected effect {other:?}"),
    }

    dashboard.handle(Interaction::Search("crash".to_string()));
    assert_eq!(dashboard.handle(Interaction::DocumentRow(0)), Effect::None);
  }

  #[test]
  fn test_filter_then_toggle_metrics() {
    let mut dashboard = booted();

    dashboard.handle(Interaction::Filter { theme: "Bugs".into(), min: "x".into(), max: "".into() });
    assert_eq!(dashboard.documents().view().visible_documents().len(), 1);

    dashboard.handle(Interaction::ToggleMetrics);
    assert_eq!(dashboard.metrics().visible_cards()[0].value, "lda");
  }

  #[tokio::test]
  async fn test_inference_success_opens_document_modal() {
    let mut backend = MockDashboardBackend::new();
    backend
      .expect_text_info()
      .withf(|request| request.text == "foo" && request.model == "lda")
      .times(1)
      .returning(|_| Ok(inference()));
    let mut dashboard = booted();
    let mut notices = Notices::new();

    let document = dashboard.store().documents()[0].clone();
    let outcome = dashboard.open_document(&backend, document, &mut notices).await;

    assert_eq!(outcome, InferenceOutcome::Shown);
    assert_eq!(dashboard.modals().document().unwrap().keywords, "refund, charge");
    assert!(dashboard.charts().is_live(targets::DOC_INFERENCE));
  }

  #[tokio::test]
  async fn test_inference_failure_leaves_dashboard_intact() {
    let mut backend = MockDashboardBackend::new();
    backend.expect_text_info().times(1).returning(|_| Err(InferenceError::status(502, "bad gateway")));
    let mut dashboard = booted();
    let mut notices = Notices::new();
    let before = dashboard.charts().spec(targets::THEME_CHART).cloned();

    let document = dashboard.store().documents()[0].clone();
    let outcome = dashboard.open_document(&backend, document, &mut notices).await;

    assert!(matches!(outcome, InferenceOutcome::Failed(_)));
    assert!(!dashboard.charts().is_live(targets::DOC_INFERENCE));
    assert!(dashboard.modals().document().is_none());
    assert_eq!(notices.len(), 1);
    assert_eq!(notices.last().unwrap().message, INFERENCE_FAILED);
    assert_eq!(dashboard.charts().spec(targets::THEME_CHART).cloned(), before);
    assert_eq!(dashboard.charts().live_count(), 2);
  }

  #[test]
  fn test_close_document_releases_inference_chart() {
    let mut dashboard = booted();
    let mut notices = Notices::new();

    let document = dashboard.store().documents()[0].clone();
    let ticket = dashboard.begin_document(document);
    dashboard.complete_document(ticket, Ok(inference()), &mut notices);
    dashboard.handle(Interaction::CloseDocument);

    assert!(!dashboard.charts().is_live(targets::DOC_INFERENCE));
    assert_eq!(dashboard.charts().canvas().live_count(), 2);
  }
}
