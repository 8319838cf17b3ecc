//! Keyword-overlap theme scoring for `/text-info`
//!
//! Each theme scores the share of matched keywords across all themes. A
//! document already assigned to a theme in the bundle gets one extra hit for
//! that theme, so known documents lean towards their recorded label.

use std::collections::HashSet;

use themelens::model::{DashboardBundle, TextInfo, TextInfoRequest, Theme, TopTheme};

/// How many themes a response lists.
pub const TOP_K: usize = 3;

fn tokens(text: &str) -> HashSet<String> {
  text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|w| !w.is_empty())
    .map(str::to_lowercase)
    .collect()
}

fn keyword_hits(theme: &Theme, words: &HashSet<String>) -> Vec<String> {
  theme
    .keywords
    .as_ref()
    .and_then(|k| k.words())
    .unwrap_or_default()
    .into_iter()
    .filter(|keyword| {
      let parts = tokens(keyword);
      !parts.is_empty() && parts.iter().all(|p| words.contains(p))
    })
    .collect()
}

pub fn infer(bundle: &DashboardBundle, request: &TextInfoRequest) -> TextInfo {
  let words = tokens(&request.text);
  let recorded = bundle.documents.iter().find(|d| d.id == request.id).map(|d| d.theme.as_str());

  let mut scored: Vec<(&Theme, Vec<String>, f64)> = bundle
    .themes
    .iter()
    .map(|theme| {
      let matched = keyword_hits(theme, &words);
      let bonus = if recorded == Some(theme.label.as_str()) { 1.0 } else { 0.0 };
      let hits = matched.len() as f64 + bonus;
      (theme, matched, hits)
    })
    .filter(|(_, _, hits)| *hits > 0.0)
    .collect();

  let total: f64 = scored.iter().map(|(_, _, hits)| hits).sum();
  scored.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.id.cmp(&b.0.id)));
  scored.truncate(TOP_K);

  let rationale = scored.first().and_then(|(_, matched, _)| {
    (!matched.is_empty()).then(|| format!("Matched keywords: {}", matched.join(", ")))
  });

  TextInfo {
    theme: scored.first().map(|(theme, _, _)| theme.label.clone()),
    top_themes: scored
      .into_iter()
      .map(|(theme, _, hits)| TopTheme {
        theme_id: theme.id,
        label: theme.label.clone(),
        score: hits / total,
        keywords: theme.keywords.clone(),
      })
      .collect(),
    rationale,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use themelens::model::DocumentId;

  fn bundle() -> DashboardBundle {
    serde_json::from_value(json!({
      "themes": [
        { "id": 1, "label": "Billing", "keywords": "refund, charge, invoice" },
        { "id": 2, "label": "Bugs", "keywords": "crash, login, error message" },
        { "id": 3, "label": "Praise", "keywords": "great, thanks" }
      ],
      "documents": [{ "id": 7, "text": "thanks", "theme": "Praise" }]
    }))
    .unwrap()
  }

  fn request(text: &str, id: i64) -> TextInfoRequest {
    TextInfoRequest { text: text.to_string(), id: DocumentId::Int(id), model: "m".to_string() }
  }

  #[test]
  fn test_scores_are_keyword_shares() {
    let info = infer(&bundle(), &request("Refund the charge, app had a crash", 99));

    assert_eq!(info.theme.as_deref(), Some("Billing"));
    let scores: Vec<(i64, f64)> = info.top_themes.iter().map(|t| (t.theme_id, t.score)).collect();
    assert_eq!(scores, vec![(1, 2.0 / 3.0), (2, 1.0 / 3.0)]);
    assert_eq!(info.rationale.as_deref(), Some("Matched keywords: refund, charge"));
  }

  #[test]
  fn test_multi_word_keywords_need_every_word() {
    let info = infer(&bundle(), &request("an error occurred", 99));
    assert!(info.top_themes.is_empty());

    let info = infer(&bundle(), &request("the error message again", 99));
    assert_eq!(info.theme.as_deref(), Some("Bugs"));
  }

  #[test]
  fn test_recorded_theme_counts_as_a_hit() {
    let info = infer(&bundle(), &request("no keywords here", 7));

    assert_eq!(info.theme.as_deref(), Some("Praise"));
    assert_eq!(info.top_themes[0].score, 1.0);
    assert_eq!(info.rationale, None);
  }
}
