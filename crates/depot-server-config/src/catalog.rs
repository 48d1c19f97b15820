// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data asset catalog.
//!
//! The catalog is a YAML document listing every asset the server can
//! resolve, where its object lives, and how to obtain credentials for it:
//!
//! ```yaml
//! data:
//!   - name: reports
//!     capability: read
//!     format: csv
//!     connection:
//!       type: s3
//!       s3:
//!         bucket: analytics
//!         object_key: reports/latest.csv
//!         endpoint_url: minio.storage.svc:9000
//!         vault_credentials:
//!           address: http://vault.vault.svc:8200
//!           authPath: /v1/auth/kubernetes/login
//!           role: depot
//!           secretPath: /v1/secret/data/analytics
//! ```
//!
//! It is loaded once at startup and never mutated afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;

/// The only connection type the retrieval path understands.
pub const S3_CONNECTION: &str = "s3";

/// One named data asset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetDescriptor {
	pub name: String,
	#[serde(default)]
	pub capability: String,
	#[serde(default)]
	pub format: String,
	pub connection: ConnectionDescriptor,
	/// Carried for catalog consumers; not used when fetching.
	#[serde(default)]
	pub transformations: Option<String>,
}

impl AssetDescriptor {
	pub fn storage(&self) -> &StorageLocation {
		&self.connection.s3
	}

	pub fn trust_authority(&self) -> &TrustAuthority {
		&self.connection.s3.vault_credentials
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionDescriptor {
	#[serde(rename = "type")]
	pub kind: String,
	pub s3: StorageLocation,
}

/// Where an asset's object lives and which trust authority vends its keys.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageLocation {
	pub bucket: String,
	pub object_key: String,
	/// `host[:port]`, or a full URL when a scheme is given.
	pub endpoint_url: String,
	#[serde(default)]
	pub region: Option<String>,
	pub vault_credentials: TrustAuthority,
}

/// Trust-authority connection parameters for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrustAuthority {
	pub address: String,
	#[serde(rename = "authPath", alias = "auth_path")]
	pub auth_path: String,
	pub role: String,
	#[serde(rename = "secretPath", alias = "secret_path")]
	pub secret_path: String,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
	#[serde(default)]
	data: Vec<AssetDescriptor>,
}

/// Immutable, validated table of data assets keyed by name.
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
	assets: Vec<AssetDescriptor>,
}

impl AssetCatalog {
	/// Build a catalog, rejecting duplicate names and unusable entries.
	pub fn new(assets: Vec<AssetDescriptor>) -> Result<Self, ConfigError> {
		let mut seen = HashSet::new();
		for asset in &assets {
			validate_asset(asset)?;
			if !seen.insert(asset.name.as_str()) {
				return Err(ConfigError::Validation(format!(
					"duplicate data asset name '{}'",
					asset.name
				)));
			}
		}
		Ok(Self { assets })
	}

	/// Parse a catalog from YAML text. `origin` is only used in errors.
	pub fn from_yaml_str(content: &str, origin: impl Into<PathBuf>) -> Result<Self, ConfigError> {
		let document: CatalogDocument =
			serde_yaml::from_str(content).map_err(|e| ConfigError::YamlParse {
				path: origin.into(),
				source: e,
			})?;
		Self::new(document.data)
	}

	/// Read and validate the catalog file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		debug!(path = %path.display(), "loading asset catalog");
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
			path: path.to_path_buf(),
			source: e,
		})?;
		let catalog = Self::from_yaml_str(&content, path)?;
		info!(
			path = %path.display(),
			assets = catalog.len(),
			"Asset catalog loaded"
		);
		Ok(catalog)
	}

	pub fn get(&self, name: &str) -> Option<&AssetDescriptor> {
		self.assets.iter().find(|asset| asset.name == name)
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.assets.iter().map(|asset| asset.name.as_str())
	}

	pub fn len(&self) -> usize {
		self.assets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.assets.is_empty()
	}
}

fn validate_asset(asset: &AssetDescriptor) -> Result<(), ConfigError> {
	if asset.name.trim().is_empty() {
		return Err(ConfigError::Validation(
			"data asset with empty name".to_string(),
		));
	}

	if !asset.connection.kind.eq_ignore_ascii_case(S3_CONNECTION) {
		return Err(invalid(
			asset,
			format!("unsupported connection type '{}'", asset.connection.kind),
		));
	}

	let storage = asset.storage();
	let authority = asset.trust_authority();
	let required = [
		("bucket", &storage.bucket),
		("object_key", &storage.object_key),
		("endpoint_url", &storage.endpoint_url),
		("address", &authority.address),
		("authPath", &authority.auth_path),
		("role", &authority.role),
		("secretPath", &authority.secret_path),
	];
	for (field, value) in required {
		if value.trim().is_empty() {
			return Err(invalid(asset, format!("{field} must not be empty")));
		}
	}

	if !is_safe_object_key(&storage.object_key) {
		return Err(invalid(
			asset,
			format!(
				"object_key '{}' must be a relative path without '.' or '..' segments",
				storage.object_key
			),
		));
	}

	Ok(())
}

/// Object keys become paths under the cache directory, so they must not
/// be able to escape it.
pub fn is_safe_object_key(key: &str) -> bool {
	!key.is_empty()
		&& !key.starts_with('/')
		&& !key.contains('\\')
		&& key
			.split('/')
			.all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

fn invalid(asset: &AssetDescriptor, message: String) -> ConfigError {
	ConfigError::Validation(format!("data asset '{}': {message}", asset.name))
}
