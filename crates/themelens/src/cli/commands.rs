use anyhow::{anyhow, bail, Result};
use colored::*;

use crate::backend::HttpBackend;
use crate::charts::TextCanvas;
use crate::cli::display::{self, DocumentModalJson, MetricsJson, OverviewJson, ThemeModalJson};
use crate::config::ClientConfig;
use crate::dashboard::{targets, Dashboard, Interaction};
use crate::modal::InferenceOutcome;
use crate::model::ThemeId;
use crate::notice::{NoticeRaised, Notices, BOOT_FAILED, INFERENCE_FAILED};

/// Structural and text filters for the `documents` command, as typed.
#[derive(Debug, Default, Clone)]
pub struct DocumentQuery {
  pub theme: Option<String>,
  pub min: Option<String>,
  pub max: Option<String>,
  pub search: Option<String>,
}

async fn boot(config: &ClientConfig, json: bool) -> Result<(HttpBackend, Dashboard<TextCanvas>, Notices)> {
  let backend = HttpBackend::with_config(config)?;
  let mut notices = Notices::echoing();
  let canvas = if json { TextCanvas::plain() } else { TextCanvas::new() };

  let dashboard = Dashboard::boot(&backend, &config.model, canvas, &mut notices)
    .await
    .map_err(|_| NoticeRaised::new(BOOT_FAILED))?;
  Ok((backend, dashboard, notices))
}

/// Print every dashboard view
pub async fn overview(config: &ClientConfig, model_metrics: bool, json: bool) -> Result<()> {
  let (_backend, mut dashboard, _notices) = boot(config, json).await?;
  if model_metrics {
    dashboard.handle(Interaction::ToggleMetrics);
  }

  if json {
    return display::print_json(&OverviewJson {
      model: dashboard.model(),
      theme_chart: dashboard.charts().spec(targets::THEME_CHART),
      theme_map: dashboard.charts().spec(targets::THEME_MAP),
      theme_options: dashboard.theme_options(),
      documents: dashboard.documents().view(),
      diagnostics: dashboard.diagnostics(),
      metrics: MetricsJson::from(dashboard.metrics()),
      ambiguous_labels: dashboard.store().ambiguous_labels(),
    });
  }

  let canvas = dashboard.charts().canvas();
  println!("{} {}", "Model:".bold(), dashboard.model().cyan());
  println!();
  display::print_chart(canvas.output_for(targets::THEME_CHART));
  display::print_chart(canvas.output_for(targets::THEME_MAP));

  display::print_section("Documents");
  display::print_table(dashboard.documents().view());

  display::print_section("Theme diagnostics");
  display::print_table(dashboard.diagnostics());

  display::print_metrics(dashboard.metrics());

  let ambiguous = dashboard.store().ambiguous_labels();
  if !ambiguous.is_empty() {
    println!("{} Labels shared by several themes: {}", "!".yellow(), ambiguous.join(", "));
  }
  Ok(())
}

/// Show the theme detail view
pub async fn theme(config: &ClientConfig, theme_id: ThemeId, json: bool) -> Result<()> {
  let (_backend, mut dashboard, _notices) = boot(config, json).await?;
  dashboard.handle(Interaction::SelectTheme(theme_id));

  let Some(modal) = dashboard.modals().theme() else {
    bail!("Theme {theme_id} not found");
  };

  if json {
    let similarity = dashboard.charts().spec(targets::SIMILARITY_PLOT);
    return display::print_json(&ThemeModalJson::new(modal, similarity));
  }

  display::print_theme_modal(modal, dashboard.charts().canvas().output_for(targets::SIMILARITY_PLOT));
  Ok(())
}

/// Run inference for one document and show the document detail view
pub async fn document(config: &ClientConfig, document_id: &str, json: bool) -> Result<()> {
  let (backend, mut dashboard, mut notices) = boot(config, json).await?;

  let document = dashboard
    .store()
    .documents()
    .iter()
    .find(|d| d.id.to_string() == document_id)
    .cloned()
    .ok_or_else(|| anyhow!("Document {document_id} not found"))?;

  match dashboard.open_document(&backend, document, &mut notices).await {
    InferenceOutcome::Shown => {}
    InferenceOutcome::Failed(_) => return Err(NoticeRaised::new(INFERENCE_FAILED).into()),
    InferenceOutcome::Superseded => bail!("Inference for document {document_id} was superseded"),
  }

  let Some(modal) = dashboard.modals().document() else {
    bail!("Document view did not open");
  };

  if json {
    let chart = dashboard.charts().spec(targets::DOC_INFERENCE);
    return display::print_json(&DocumentModalJson::new(modal, chart));
  }

  display::print_document_modal(modal, dashboard.charts().canvas().output_for(targets::DOC_INFERENCE));
  Ok(())
}

/// Print the main document table after filtering and search
pub async fn documents(config: &ClientConfig, query: DocumentQuery, json: bool) -> Result<()> {
  let (_backend, mut dashboard, _notices) = boot(config, json).await?;

  dashboard.handle(Interaction::Filter {
    theme: query.theme.unwrap_or_default(),
    min: query.min.unwrap_or_default(),
    max: query.max.unwrap_or_default(),
  });
  if let Some(search) = query.search {
    dashboard.handle(Interaction::Search(search));
  }

  let view = dashboard.documents().view();
  if json {
    return display::print_json(view);
  }

  display::print_table(view);
  let shown = view.visible_documents().len();
  println!("{} of {} documents", shown.to_string().bold(), dashboard.documents().source().len());
  Ok(())
}
