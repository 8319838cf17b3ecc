//! Backend access: bundle fetch and per-document inference
//!
//! [`DashboardBackend`] is the seam the rest of the engine talks to;
//! [`HttpBackend`] is the JSON-over-HTTP implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{BootError, InferenceError};
use crate::model::{DashboardBundle, DashboardRequest, TextInfo, TextInfoRequest};

pub const DASHBOARD_PATH: &str = "get-dashboard-data";
pub const TEXT_INFO_PATH: &str = "text-info";

/// The two calls the dashboard makes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardBackend: Send + Sync {
  /// `POST /get-dashboard-data`
  async fn dashboard_data(&self, model: &str) -> Result<DashboardBundle, BootError>;

  /// `POST /text-info`
  async fn text_info(&self, request: &TextInfoRequest) -> Result<TextInfo, InferenceError>;
}

/// How a request went wrong, before it is mapped onto the caller's error type.
#[derive(Debug)]
enum RequestFailure {
  Transport(String),
  Status(u16, String),
  Malformed(String),
}

impl From<RequestFailure> for BootError {
  fn from(failure: RequestFailure) -> Self {
    match failure {
      RequestFailure::Transport(message) => BootError::transport(message),
      RequestFailure::Status(status, body) => BootError::status(status, body),
      RequestFailure::Malformed(message) => BootError::malformed(message),
    }
  }
}

impl From<RequestFailure> for InferenceError {
  fn from(failure: RequestFailure) -> Self {
    match failure {
      RequestFailure::Transport(message) => InferenceError::transport(message),
      RequestFailure::Status(status, body) => InferenceError::status(status, body),
      RequestFailure::Malformed(message) => InferenceError::malformed(message),
    }
  }
}

/// HTTP client for the dashboard backend
pub struct HttpBackend {
  client: Client,
  base_url: Url,
  timeout: Duration,
}

impl HttpBackend {
  /// Create a client for the backend described by `config`.
  pub fn with_config(config: &ClientConfig) -> Result<Self> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let client = Client::builder().timeout(timeout).build().context("Failed to create HTTP client")?;

    let mut base = config.base_url.trim().to_string();
    if !base.ends_with('/') {
      base.push('/');
    }
    let base_url = Url::parse(&base).with_context(|| format!("Invalid backend URL: {}", config.base_url))?;

    Ok(Self { client, base_url, timeout })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RequestFailure>
  where
    B: Serialize + Sync,
    T: DeserializeOwned,
  {
    let url = self.base_url.join(path).map_err(|e| RequestFailure::Transport(e.to_string()))?;
    debug!(%url, "POST");

    let response = match timeout(self.timeout, self.client.post(url.clone()).json(body).send()).await {
      Ok(Ok(response)) => response,
      Ok(Err(e)) => return Err(RequestFailure::Transport(e.to_string())),
      Err(_) => {
        return Err(RequestFailure::Transport(format!(
          "request timed out after {}s",
          self.timeout.as_secs()
        )))
      }
    };

    let status = response.status();
    let text = response.text().await.map_err(|e| RequestFailure::Transport(e.to_string()))?;

    if !status.is_success() {
      warn!(%url, status = status.as_u16(), "Backend returned non-success status");
      return Err(RequestFailure::Status(status.as_u16(), text));
    }

    serde_json::from_str(&text).map_err(|e| {
      warn!(%url, error = %e, "Backend response did not match the expected shape");
      RequestFailure::Malformed(e.to_string())
    })
  }
}

#[async_trait]
impl DashboardBackend for HttpBackend {
  async fn dashboard_data(&self, model: &str) -> Result<DashboardBundle, BootError> {
    let request = DashboardRequest { model: model.to_string() };
    Ok(self.post(DASHBOARD_PATH, &request).await?)
  }

  async fn text_info(&self, request: &TextInfoRequest) -> Result<TextInfo, InferenceError> {
    Ok(self.post(TEXT_INFO_PATH, request).await?)
  }
}
