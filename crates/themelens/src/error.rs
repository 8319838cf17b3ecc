//! Error types for the dashboard engine
//!
//! Boot failures are fatal to the page; inference failures are recoverable and
//! only degrade the document modal.

use thiserror::Error;

/// Failure while fetching the dashboard bundle at boot.
#[derive(Error, Debug)]
pub enum BootError {
  #[error("Dashboard fetch failed: {message}")]
  Transport { message: String },

  #[error("Dashboard fetch failed: {status} - {body}")]
  Status { status: u16, body: String },

  #[error("Dashboard bundle is malformed: {message}")]
  Malformed { message: String },
}

impl BootError {
  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport { message: message.into() }
  }

  pub fn status(status: u16, body: impl Into<String>) -> Self {
    Self::Status { status, body: body.into() }
  }

  pub fn malformed(message: impl Into<String>) -> Self {
    Self::Malformed { message: message.into() }
  }
}

/// Failure of a single `/text-info` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
  #[error("Inference request failed: {message}")]
  Transport { message: String },

  #[error("Inference request failed: {status} - {body}")]
  Status { status: u16, body: String },

  #[error("Inference response is malformed: {message}")]
  Malformed { message: String },
}

impl InferenceError {
  pub fn transport(message: impl Into<String>) -> Self {
    Self::Transport { message: message.into() }
  }

  pub fn status(status: u16, body: impl Into<String>) -> Self {
    Self::Status { status, body: body.into() }
  }

  pub fn malformed(message: impl Into<String>) -> Self {
    Self::Malformed { message: message.into() }
  }

  /// True for network and non-success status failures, false for bodies that
  /// arrived but could not be decoded.
  pub fn is_transport(&self) -> bool {
    matches!(self, Self::Transport { .. } | Self::Status { .. })
  }
}

/// Failure while reading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Failed to read config file {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}
