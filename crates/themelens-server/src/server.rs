//! Fixture server startup

use anyhow::Result;
use axum::serve;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::routing::create_router;
use crate::AppState;

/// Serve `state` on an already bound listener until the server stops.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
  let app = create_router(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

  match serve(listener, app).await {
    Ok(_) => {
      info!("Server shutdown gracefully");
      Ok(())
    }
    Err(e) => {
      error!(error = %e, "Server error");
      Err(anyhow::anyhow!("Server error: {}", e))
    }
  }
}

/// Load the bundle at `data` and serve it on `addr`
pub async fn start_server(addr: SocketAddr, data: &Path) -> Result<()> {
  let state = AppState::load(data)?;
  info!(
    data = %data.display(),
    themes = state.bundle.themes.len(),
    documents = state.bundle.documents.len(),
    "Loaded dashboard bundle"
  );

  let listener = TcpListener::bind(addr).await?;
  info!("Server listening on {}", listener.local_addr()?);

  serve_on(listener, state).await
}
