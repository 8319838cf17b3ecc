//! User-visible failure notices
//!
//! A notice is the single alert a user sees when boot fails or an inference
//! request cannot be shown. Notices are collected so callers (and tests) can
//! see exactly how many were raised, and optionally echoed to stderr.

use chrono::{DateTime, Local};
use colored::*;
use serde::Serialize;
use thiserror::Error;

pub const BOOT_FAILED: &str = "Failed to load dashboard.";
pub const INFERENCE_FAILED: &str = "Failed to infer topic.";

/// A failure the user has already been shown as a notice.
///
/// Front ends exit unsuccessfully on this error without reporting it again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NoticeRaised {
  pub message: String,
}

impl NoticeRaised {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
  pub message: String,
  pub raised_at: DateTime<Local>,
}

#[derive(Debug, Default)]
pub struct Notices {
  raised: Vec<Notice>,
  echo: bool,
}

impl Notices {
  /// Collect notices without printing them.
  pub fn new() -> Self {
    Self::default()
  }

  /// Collect notices and print each one to stderr as it is raised.
  pub fn echoing() -> Self {
    Self { raised: Vec::new(), echo: true }
  }

  pub fn push(&mut self, message: impl Into<String>) {
    let notice = Notice { message: message.into(), raised_at: Local::now() };
    if self.echo {
      print_notice(&notice);
    }
    self.raised.push(notice);
  }

  pub fn len(&self) -> usize {
    self.raised.len()
  }

  pub fn is_empty(&self) -> bool {
    self.raised.is_empty()
  }

  pub fn last(&self) -> Option<&Notice> {
    self.raised.last()
  }

  pub fn iter(&self) -> impl Iterator<Item = &Notice> {
    self.raised.iter()
  }

  pub fn drain(&mut self) -> Vec<Notice> {
    std::mem::take(&mut self.raised)
  }
}

fn print_notice(notice: &Notice) {
  let timestamp = notice.raised_at.format("%H:%M:%S").to_string();
  let prefix = format!("[{}] [{}]", "fail".bright_red().bold(), timestamp.cyan());
  for line in notice.message.lines() {
    eprintln!("{prefix} {line}");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_collects_in_order() {
    let mut notices = Notices::new();
    assert!(notices.is_empty());

    notices.push(BOOT_FAILED);
    notices.push(INFERENCE_FAILED);

    assert_eq!(notices.len(), 2);
    assert_eq!(notices.last().map(|n| n.message.as_str()), Some(INFERENCE_FAILED));
    let drained = notices.drain();
    assert_eq!(drained[0].message, BOOT_FAILED);
    assert!(notices.is_empty());
  }

  #[test]
  fn test_notice_raised_survives_anyhow() {
    let err: anyhow::Error = NoticeRaised::new(BOOT_FAILED).into();

    assert_eq!(err.downcast_ref::<NoticeRaised>(), Some(&NoticeRaised::new(BOOT_FAILED)));
    assert_eq!(err.to_string(), BOOT_FAILED);
  }
}
