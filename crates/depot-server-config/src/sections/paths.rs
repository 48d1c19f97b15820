// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filesystem locations: catalog document, local cache, identity token.

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "./etc/conf/conf.yaml";
pub const DEFAULT_CACHE_DIR: &str = "./tmp";
pub const DEFAULT_IDENTITY_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// YAML document listing the data assets.
	pub catalog_path: PathBuf,
	/// Directory downloaded assets are written into.
	pub cache_dir: PathBuf,
	/// Projected service account token presented to the trust authority.
	pub identity_token_path: PathBuf,
}

impl Default for PathsConfig {
	fn default() -> Self {
		PathsConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfigLayer {
	#[serde(default)]
	pub catalog_path: Option<PathBuf>,
	#[serde(default)]
	pub cache_dir: Option<PathBuf>,
	#[serde(default)]
	pub identity_token_path: Option<PathBuf>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: PathsConfigLayer) {
		if other.catalog_path.is_some() {
			self.catalog_path = other.catalog_path;
		}
		if other.cache_dir.is_some() {
			self.cache_dir = other.cache_dir;
		}
		if other.identity_token_path.is_some() {
			self.identity_token_path = other.identity_token_path;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			catalog_path: self
				.catalog_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH)),
			cache_dir: self
				.cache_dir
				.unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
			identity_token_path: self
				.identity_token_path
				.unwrap_or_else(|| PathBuf::from(DEFAULT_IDENTITY_TOKEN_PATH)),
		}
	}
}
