//! Metrics panel: theme-level and model-level cards behind one toggle

use serde::Serialize;

use crate::model::Metric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricScope {
  #[default]
  Theme,
  Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
  pub label: String,
  pub value: String,
}

impl From<&Metric> for MetricCard {
  fn from(metric: &Metric) -> Self {
    Self { label: metric.label.clone(), value: metric.value.to_string() }
  }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsPanel {
  theme: Vec<MetricCard>,
  model: Vec<MetricCard>,
  scope: MetricScope,
}

impl MetricsPanel {
  pub fn new(theme: &[Metric], model: &[Metric]) -> Self {
    Self {
      theme: theme.iter().map(MetricCard::from).collect(),
      model: model.iter().map(MetricCard::from).collect(),
      scope: MetricScope::Theme,
    }
  }

  pub fn scope(&self) -> MetricScope {
    self.scope
  }

  pub fn toggle(&mut self) -> MetricScope {
    self.scope = match self.scope {
      MetricScope::Theme => MetricScope::Model,
      MetricScope::Model => MetricScope::Theme,
    };
    self.scope
  }

  /// Text of the toggle control, naming the scope it switches to.
  pub fn toggle_label(&self) -> &'static str {
    match self.scope {
      MetricScope::Theme => "Switch to Model Metrics",
      MetricScope::Model => "Switch to Theme Metrics",
    }
  }

  pub fn visible_cards(&self) -> &[MetricCard] {
    match self.scope {
      MetricScope::Theme => &self.theme,
      MetricScope::Model => &self.model,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::MetricValue;

  fn metric(label: &str, value: MetricValue) -> Metric {
    Metric { label: label.to_string(), value }
  }

  #[test]
  fn test_cards_format_numbers_to_two_places() {
    let panel = MetricsPanel::new(
      &[metric("Avg coherence", MetricValue::Number(0.4567)), metric("Status", MetricValue::Text("ok".into()))],
      &[],
    );
    let values: Vec<&str> = panel.visible_cards().iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["0.46", "ok"]);
  }

  #[test]
  fn test_toggle_switches_scope_and_label() {
    let mut panel = MetricsPanel::new(&[], &[metric("Perplexity", MetricValue::Number(12.0))]);

    assert_eq!(panel.scope(), MetricScope::Theme);
    assert_eq!(panel.toggle_label(), "Switch to Model Metrics");
    assert!(panel.visible_cards().is_empty());

    assert_eq!(panel.toggle(), MetricScope::Model);
    assert_eq!(panel.toggle_label(), "Switch to Theme Metrics");
    assert_eq!(panel.visible_cards()[0].value, "12.00");

    panel.toggle();
    assert_eq!(panel.scope(), MetricScope::Theme);
  }
}
