//! Wire and in-memory data model for the dashboard bundle
//!
//! Everything here mirrors the JSON served by `/get-dashboard-data` and
//! `/text-info`. Fields the backend may omit default to empty so a sparse
//! bundle still renders.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Numeric theme identifier, unique within a bundle.
pub type ThemeId = i64;

// Keywords
// ========

/// Keyword data as it arrives on the wire.
///
/// Themes carry a comma-joined string, coordinates carry a list. Anything else
/// is kept so that rendering can fall back to a placeholder instead of failing
/// the whole bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keywords {
  Joined(String),
  List(Vec<String>),
  Other(Value),
}

impl Keywords {
  /// Discrete keywords, or `None` when the data is not keyword-shaped.
  pub fn words(&self) -> Option<Vec<String>> {
    match self {
      Keywords::Joined(joined) => Some(split_keywords(joined)),
      Keywords::List(list) => {
        Some(list.iter().map(|w| w.trim().to_string()).filter(|w| !w.is_empty()).collect())
      }
      Keywords::Other(_) => None,
    }
  }
}

/// Split a comma-joined keyword string into trimmed, non-empty words.
pub fn split_keywords(joined: &str) -> Vec<String> {
  joined.split(',').map(str::trim).filter(|w| !w.is_empty()).map(str::to_string).collect()
}

// Lenient scalars
// ===============

/// A number that may have been serialized as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
  Number(f64),
  Text(String),
}

impl LenientNumber {
  pub fn value(&self) -> Option<f64> {
    match self {
      LenientNumber::Number(n) => Some(*n).filter(|n| n.is_finite()),
      LenientNumber::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
    }
  }
}

/// Finite number from a JSON number or numeric string.
fn number_from(value: &Value) -> Option<f64> {
  let number = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  number.filter(|n| n.is_finite())
}

/// Optional score; anything non-numeric reads as absent.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
  Ok(Option::<Value>::deserialize(deserializer)?.as_ref().and_then(number_from))
}

/// Non-negative count; anything else reads as zero.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
  let value = Value::deserialize(deserializer)?;
  Ok(number_from(&value).filter(|n| *n >= 0.0).map_or(0, |n| n as u64))
}

/// Display text; `null` is empty and other scalars are stringified.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::String(s) => s,
    Value::Null => String::new(),
    other => other.to_string(),
  })
}

/// Document identifiers are integers in most bundles but strings in some.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentId {
  Int(i64),
  Text(String),
}

impl fmt::Display for DocumentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DocumentId::Int(id) => write!(f, "{id}"),
      DocumentId::Text(id) => f.write_str(id),
    }
  }
}

impl From<i64> for DocumentId {
  fn from(id: i64) -> Self {
    DocumentId::Int(id)
  }
}

impl From<&str> for DocumentId {
  fn from(id: &str) -> Self {
    DocumentId::Text(id.to_string())
  }
}

// Bundle entities
// ===============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
  pub id: ThemeId,
  pub label: String,
  #[serde(default, deserialize_with = "lenient_count")]
  pub document_count: u64,
  #[serde(default)]
  pub keywords: Option<Keywords>,
  #[serde(default)]
  pub summary: Option<String>,
  /// Explicit color from the backend, or the allocated one after load.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub id: DocumentId,
  #[serde(default, deserialize_with = "lenient_text")]
  pub text: String,
  /// Theme *label*; the only join path back to [`Theme`].
  #[serde(default, deserialize_with = "lenient_text")]
  pub theme: String,
  #[serde(default, deserialize_with = "lenient_score")]
  pub score: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatePoint {
  pub id: ThemeId,
  pub x: f64,
  pub y: f64,
  pub size: f64,
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub keywords: Option<Keywords>,
}

/// One row of per-theme diagnostics with an open-ended set of fields.
///
/// Key order is the wire order, which drives column order in the diagnostics
/// table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticsRow(pub Map<String, Value>);

impl DiagnosticsRow {
  pub fn theme(&self) -> Option<&str> {
    self.0.get("theme").and_then(Value::as_str)
  }

  /// Numeric field value; absent, null and non-numeric all read as `None`.
  pub fn number(&self, key: &str) -> Option<f64> {
    self.0.get(key).and_then(Value::as_f64)
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityEntry {
  #[serde(rename = "ID")]
  pub id: ThemeId,
  #[serde(rename = "Similarity")]
  pub similarity: LenientNumber,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
  Number(f64),
  Text(String),
  /// `null` or any other shape; shown as the placeholder.
  Other(Value),
}

impl fmt::Display for MetricValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      MetricValue::Number(n) => write!(f, "{n:.2}"),
      MetricValue::Text(s) => f.write_str(s),
      MetricValue::Other(_) => f.write_str(crate::PLACEHOLDER),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
  pub label: String,
  pub value: MetricValue,
}

/// The whole dashboard as fetched once at boot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardBundle {
  #[serde(default)]
  pub themes: Vec<Theme>,
  #[serde(default)]
  pub documents: Vec<Document>,
  #[serde(default)]
  pub coordinates: Vec<CoordinatePoint>,
  #[serde(default)]
  pub diagnostics: Vec<DiagnosticsRow>,
  /// Keyed by theme id rendered as a string.
  #[serde(default)]
  pub similarities: BTreeMap<String, Vec<SimilarityEntry>>,
  /// Theme-level metrics.
  #[serde(default)]
  pub metrics: Vec<Metric>,
  /// Model-level metrics.
  #[serde(default)]
  pub model_metrics: Vec<Metric>,
}

// Requests and inference results
// ==============================

/// Body of `POST /get-dashboard-data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
  pub model: String,
}

/// Body of `POST /text-info`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextInfoRequest {
  pub text: String,
  pub id: DocumentId,
  pub model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTheme {
  pub theme_id: ThemeId,
  pub label: String,
  pub score: f64,
  #[serde(default)]
  pub keywords: Option<Keywords>,
}

/// Normalized `/text-info` response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextInfo {
  #[serde(default)]
  pub theme: Option<String>,
  #[serde(default)]
  pub top_themes: Vec<TopTheme>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rationale: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_bundle_defaults_missing_collections() {
    let bundle: DashboardBundle =
      serde_json::from_value(json!({ "themes": [{ "id": 1, "label": "A" }] })).unwrap();

    assert_eq!(bundle.themes.len(), 1);
    assert_eq!(bundle.themes[0].document_count, 0);
    assert!(bundle.documents.is_empty());
    assert!(bundle.similarities.is_empty());
    assert!(bundle.model_metrics.is_empty());
  }

  #[test]
  fn test_keywords_accept_string_list_and_garbage() {
    let joined: Keywords = serde_json::from_value(json!("tax, budget,  ,vote")).unwrap();
    assert_eq!(joined.words().unwrap(), vec!["tax", "budget", "vote"]);

    let list: Keywords = serde_json::from_value(json!(["a", "b"])).unwrap();
    assert_eq!(list.words().unwrap(), vec!["a", "b"]);

    let other: Keywords = serde_json::from_value(json!(42)).unwrap();
    assert_eq!(other.words(), None);
  }

  #[test]
  fn test_diagnostics_row_preserves_key_order() {
    let row: DiagnosticsRow = serde_json::from_value(json!({
      "theme": "A",
      "prevalence": 0.25,
      "coherence": 0.5,
      "custom_score": "n/a"
    }))
    .unwrap();

    let keys: Vec<&str> = row.keys().collect();
    assert_eq!(keys, vec!["theme", "prevalence", "coherence", "custom_score"]);
    assert_eq!(row.theme(), Some("A"));
    assert_eq!(row.number("prevalence"), Some(0.25));
    assert_eq!(row.number("custom_score"), None);
    assert_eq!(row.number("missing"), None);
  }

  #[test]
  fn test_similarity_accepts_numeric_strings() {
    let entries: Vec<SimilarityEntry> = serde_json::from_value(json!([
      { "ID": 2, "Similarity": 0.9 },
      { "ID": 3, "Similarity": "-0.95" },
      { "ID": 4, "Similarity": "n/a" }
    ]))
    .unwrap();

    assert_eq!(entries[0].similarity.value(), Some(0.9));
    assert_eq!(entries[1].similarity.value(), Some(-0.95));
    assert_eq!(entries[2].similarity.value(), None);
  }

  #[test]
  fn test_document_ids_can_be_ints_or_strings() {
    let docs: Vec<Document> = serde_json::from_value(json!([
      { "id": 1, "text": "foo", "theme": "A", "score": 0.82 },
      { "id": "doc-7", "text": "bar", "theme": "B" }
    ]))
    .unwrap();

    assert_eq!(docs[0].id.to_string(), "1");
    assert_eq!(docs[1].id.to_string(), "doc-7");
    assert_eq!(docs[1].score, None);
    assert_eq!(docs[1].rationale, None);
  }

  #[test]
  fn test_metric_value_display() {
    assert_eq!(MetricValue::Number(0.456).to_string(), "0.46");
    assert_eq!(MetricValue::Text("LDA".into()).to_string(), "LDA");

    let odd: Vec<Metric> =
      serde_json::from_value(json!([{ "label": "A", "value": null }, { "label": "B", "value": [1] }])).unwrap();
    assert_eq!(odd[0].value.to_string(), crate::PLACEHOLDER);
    assert_eq!(odd[1].value.to_string(), crate::PLACEHOLDER);
  }

  #[test]
  fn test_odd_field_values_do_not_fail_the_bundle() {
    let bundle: DashboardBundle = serde_json::from_value(json!({
      "themes": [
        { "id": 1, "label": "A", "document_count": null },
        { "id": 2, "label": "B", "document_count": "7" },
        { "id": 3, "label": "C", "document_count": "many" }
      ],
      "documents": [
        { "id": 1, "text": null, "theme": null, "score": "n/a" },
        { "id": 2, "text": 42, "theme": "A", "score": "0.5" },
        { "id": 3, "text": "ok", "theme": "B", "score": null }
      ],
      "metrics": [{ "label": "Themes", "value": null }]
    }))
    .unwrap();

    let counts: Vec<u64> = bundle.themes.iter().map(|t| t.document_count).collect();
    assert_eq!(counts, vec![0, 7, 0]);
    assert_eq!(bundle.documents[0].text, "");
    assert_eq!(bundle.documents[0].theme, "");
    assert_eq!(bundle.documents[0].score, None);
    assert_eq!(bundle.documents[1].text, "42");
    assert_eq!(bundle.documents[1].score, Some(0.5));
    assert_eq!(bundle.documents[2].score, None);
  }
}
