//! API module for the guitar catalog
//!
//! Provides REST endpoints for channel identification, suggestions and
//! publish predictions.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::catalog::Catalog;

pub mod handlers;
pub mod models;
pub mod server;

/// Header carrying the authenticated user's id, set by the fronting proxy
pub const USER_ID_HEADER: &str = "x-user-id";

/// API Server for handling REST requests
pub struct ApiServer {
    catalog: Arc<Catalog>,
    port: u16,
}

impl ApiServer {
    pub fn new(catalog: Arc<Catalog>, port: u16) -> Self {
        Self { catalog, port }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.port);
        server::start_http_server(self.catalog, self.port).await
    }
}
