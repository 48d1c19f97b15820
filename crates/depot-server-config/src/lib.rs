// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the depot server.
//!
//! This crate provides:
//! - Layered server configuration (defaults, TOML file, environment)
//! - Consistent environment variable naming (`DEPOT_SERVER_*`)
//! - The data asset catalog loaded from YAML ([`AssetCatalog`])
//!
//! # Usage
//!
//! ```ignore
//! use depot_server_config::{load_config, AssetCatalog};
//!
//! let config = load_config()?;
//! let catalog = AssetCatalog::load(&config.paths.catalog_path)?;
//! ```

pub mod catalog;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use catalog::{AssetCatalog, AssetDescriptor, ConnectionDescriptor, StorageLocation, TrustAuthority};
pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub paths: PathsConfig,
	pub upstream: UpstreamConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`DEPOT_SERVER_*`)
/// 2. Config file (`/etc/depot/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let config = ServerConfig {
		http: layer.http.unwrap_or_default().finalize(),
		paths: layer.paths.unwrap_or_default().finalize(),
		upstream: layer.upstream.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	};

	validate_config(&config)?;

	info!(
		host = %config.http.host,
		port = config.http.port,
		catalog = %config.paths.catalog_path.display(),
		cache_dir = %config.paths.cache_dir.display(),
		request_timeout_secs = config.upstream.request_timeout_secs,
		"Server configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
	if config.http.port == 0 {
		return Err(ConfigError::Validation(
			"http.port must be non-zero".to_string(),
		));
	}
	if config.upstream.request_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"upstream.request_timeout_secs must be non-zero; requests to the trust authority \
			 and object store need a deadline"
				.to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	struct FixedSource(Precedence, ServerConfigLayer);

	impl ConfigSource for FixedSource {
		fn name(&self) -> &'static str {
			"fixed"
		}

		fn precedence(&self) -> Precedence {
			self.0
		}

		fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
			Ok(self.1.clone())
		}
	}

	fn port_layer(port: u16) -> ServerConfigLayer {
		ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(port),
				..Default::default()
			}),
			..Default::default()
		}
	}

	#[test]
	fn test_environment_beats_file_regardless_of_order() {
		let config = load_from_sources(vec![
			Box::new(FixedSource(Precedence::Environment, port_layer(7000))),
			Box::new(FixedSource(Precedence::ConfigFile, port_layer(6000))),
			Box::new(DefaultsSource),
		])
		.unwrap();
		assert_eq!(config.http.port, 7000);
	}

	#[test]
	fn test_defaults_only() {
		let config = load_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config.socket_addr(), "0.0.0.0:8080");
		assert_eq!(config.upstream.request_timeout_secs, 30);
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let layer = ServerConfigLayer {
			upstream: Some(UpstreamConfigLayer {
				request_timeout_secs: Some(0),
			}),
			..Default::default()
		};
		let err = load_from_sources(vec![Box::new(FixedSource(Precedence::ConfigFile, layer))])
			.unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_zero_port_rejected() {
		let err = load_from_sources(vec![Box::new(FixedSource(
			Precedence::ConfigFile,
			port_layer(0),
		))])
		.unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}
}
