// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Depot data asset server binary.

use std::path::PathBuf;

use clap::Parser;
use depot_server::{create_router, AppState, AssetResolver};
use depot_server_config::AssetCatalog;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Depot server - serves data assets fetched with per-request credentials.
#[derive(Parser, Debug)]
#[command(name = "depot-server", about = "Depot data asset server", version)]
struct Args {
	/// Server config file (TOML). Defaults to /etc/depot/server.toml.
	#[arg(long, env = "DEPOT_SERVER_CONFIG")]
	config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => depot_server_config::load_config_with_file(path)?,
		None => depot_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		catalog = %config.paths.catalog_path.display(),
		"starting depot-server"
	);

	let catalog = AssetCatalog::load(&config.paths.catalog_path).inspect_err(|e| {
		tracing::error!(error = %e, "Failed to load asset catalog");
	})?;

	tokio::fs::create_dir_all(&config.paths.cache_dir)
		.await
		.inspect_err(|e| {
			tracing::error!(
				path = %config.paths.cache_dir.display(),
				error = %e,
				"Failed to create cache directory"
			);
		})?;

	let resolver = AssetResolver::from_config(&config, catalog)?;
	let app = create_router(AppState::new(resolver)).layer(TraceLayer::new_for_http());

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	// Run server with graceful shutdown
	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
