// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Sandlog Server
//!
//! HTTP API over the pass-note store, plus a configuration-at-timestamp
//! endpoint that proxies the robot-management service.

pub mod api;
pub mod config;

use anyhow::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{
    delete_note, delete_old_notes, get_config_at, get_notes, health_check, upsert_note, AppState,
};
use config::ServerConfig;
use sandlog_client::{ClientConfig, RobotApi, RobotServiceClient};
use sandlog_storage::NoteStore;

/// Assemble the application router. Split out of [`run_server`] so tests
/// can drive the API without binding a socket.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/notes",
            post(upsert_note).get(get_notes).delete(delete_note),
        )
        .route("/api/notes/old", delete(delete_old_notes))
        .route("/api/config", get(get_config_at))
        .route("/api/health", get(health_check))
        .with_state(state)
}

pub async fn run_server(config: ServerConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sandlog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Sandlog Server");
    tracing::info!("Configuration: {:#?}", config);

    config.validate()?;

    let store = Arc::new(NoteStore::open(&config.storage.data_dir)?);
    tracing::info!("Note store opened at {:?}", config.storage.data_dir);

    let robot = match &config.robot.base_url {
        Some(base_url) => {
            let mut client_config = ClientConfig::new(base_url.clone())
                .with_timeout(Duration::from_secs(config.robot.timeout_secs));
            if let Some(api_key) = &config.robot.api_key {
                client_config = client_config.with_api_key(api_key.clone());
            }
            tracing::info!("Robot service configured at {}", base_url);
            let client = RobotServiceClient::new(client_config)?;
            Some(Arc::new(client) as Arc<dyn RobotApi>)
        }
        None => {
            tracing::info!("No robot service configured; /api/config disabled");
            None
        }
    };

    let state = AppState { store, robot };

    let mut app = build_router(state).layer(TraceLayer::new_for_http());

    if config.server.enable_cors {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    tracing::info!("Listening on {}", config.server.listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
